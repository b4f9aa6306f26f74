/// Colour palette and visual theme for DriveSweep.
///
/// Provides dark and light variants. Colour constants live here so the rest
/// of the UI code references semantically-named values rather than raw hex
/// codes.
use egui::{Color32, Stroke, Visuals};

/// Semantic colours used by the table, bars and dialogs.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub accent: Color32,
    pub muted: Color32,
    pub error: Color32,
    pub warning: Color32,
    pub success: Color32,
    pub restricted: Color32,
    pub bar_track: Color32,
    pub bar_small: Color32,
    pub bar_large: Color32,
    pub selection: Color32,
}

impl Palette {
    /// Dark palette — the default.
    pub fn dark() -> Self {
        Self {
            accent: Color32::from_rgb(0x89, 0xb4, 0xfa),
            muted: Color32::from_rgb(0x6c, 0x70, 0x86),
            error: Color32::from_rgb(0xf3, 0x8b, 0xa8),
            warning: Color32::from_rgb(0xfa, 0xb3, 0x87),
            success: Color32::from_rgb(0xa6, 0xe3, 0xa1),
            restricted: Color32::from_rgb(0xf9, 0xe2, 0xaf),
            bar_track: Color32::from_rgb(0x2a, 0x2a, 0x3c),
            bar_small: Color32::from_rgb(0xa6, 0xe3, 0xa1),
            bar_large: Color32::from_rgb(0xf3, 0x8b, 0xa8),
            selection: Color32::from_rgb(0x28, 0x3a, 0x5c),
        }
    }

    pub fn light() -> Self {
        Self {
            accent: Color32::from_rgb(0x3a, 0x6f, 0xd8),
            muted: Color32::from_rgb(0x8a, 0x8a, 0x9a),
            error: Color32::from_rgb(0xd0, 0x40, 0x50),
            warning: Color32::from_rgb(0xd0, 0x80, 0x20),
            success: Color32::from_rgb(0x30, 0x98, 0x30),
            restricted: Color32::from_rgb(0xc0, 0x98, 0x20),
            bar_track: Color32::from_rgb(0xe0, 0xe0, 0xe8),
            bar_small: Color32::from_rgb(0x60, 0xb0, 0x60),
            bar_large: Color32::from_rgb(0xd0, 0x50, 0x60),
            selection: Color32::from_rgba_premultiplied(0x3a, 0x6f, 0xd8, 0x30),
        }
    }

    /// Palette matching the active egui visuals.
    pub fn for_visuals(visuals: &Visuals) -> Self {
        if visuals.dark_mode {
            Self::dark()
        } else {
            Self::light()
        }
    }

    /// Full egui visuals for the chosen mode, with our selection colour.
    pub fn visuals(dark_mode: bool) -> Visuals {
        let (mut visuals, palette) = if dark_mode {
            (Visuals::dark(), Self::dark())
        } else {
            (Visuals::light(), Self::light())
        };
        visuals.selection.bg_fill = palette.selection;
        visuals.selection.stroke = Stroke::new(1.0, palette.accent);
        visuals
    }

    /// Bar colour interpolated between `bar_small` and `bar_large` by
    /// percentage (0.0 – 100.0).
    pub fn bar_color(&self, percent: f32) -> Color32 {
        let t = (percent / 100.0).clamp(0.0, 1.0);
        lerp_color(self.bar_small, self.bar_large, t)
    }
}

/// Linear interpolation between two colours.
fn lerp_color(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    Color32::from_rgb(
        (a.r() as f32 * (1.0 - t) + b.r() as f32 * t) as u8,
        (a.g() as f32 * (1.0 - t) + b.g() as f32 * t) as u8,
        (a.b() as f32 * (1.0 - t) + b.b() as f32 * t) as u8,
    )
}
