/// Main `eframe::App` implementation for DriveSweep.
///
/// This is the top-level UI layout that composes all panels and widgets.
use crate::panels;
use crate::state::{AppPhase, AppState};
use crate::theme::Palette;
use crate::widgets;

/// Pre-built application state.
///
/// Construct this **before** calling `eframe::run_native` so that drive
/// enumeration and config loading complete before the OS window is
/// created, and the window never sits on a white background while setup
/// runs.
pub struct DriveSweepState {
    pub(crate) inner: AppState,
}

impl DriveSweepState {
    /// Load settings, enumerate drives and preselect the OS drive.
    /// Call this before `eframe::run_native`.
    pub fn build() -> Self {
        let mut state = AppState::new();

        let os_drive = std::env::var("SystemDrive").unwrap_or_else(|_| "C:".to_string());
        let os_drive_path = format!("{os_drive}\\");
        if let Some(idx) = state.drives.iter().position(|d| {
            d.path
                .to_string_lossy()
                .eq_ignore_ascii_case(&os_drive_path)
        }) {
            state.selected_drive_index = Some(idx);
        }

        Self { inner: state }
    }

    /// Whether settings asked for DEBUG-level logging.
    pub fn verbose_logging(&self) -> bool {
        self.inner.config.verbose_logging
    }
}

/// The DriveSweep application.
pub struct DriveSweepApp {
    state: AppState,
}

impl DriveSweepApp {
    /// Create a new application instance from pre-built state.
    ///
    /// The state should have been constructed by [`DriveSweepState::build()`]
    /// *before* `eframe::run_native` is called.
    pub fn with_state(cc: &eframe::CreationContext<'_>, state: DriveSweepState) -> Self {
        // ── Font: Segoe UI ────────────────────────────────────────────────
        // Load Segoe UI from the Windows fonts directory and register it as
        // the highest-priority proportional font so every widget uses it.
        let system_root = std::env::var("SystemRoot").unwrap_or_else(|_| "C:\\Windows".to_string());
        let font_path = format!("{system_root}\\Fonts\\segoeui.ttf");

        let mut fonts = egui::FontDefinitions::default();
        match std::fs::read(&font_path) {
            Ok(bytes) => {
                fonts.font_data.insert(
                    "SegoeUI".to_owned(),
                    egui::FontData::from_owned(bytes).into(),
                );
                fonts
                    .families
                    .entry(egui::FontFamily::Proportional)
                    .or_default()
                    .insert(0, "SegoeUI".to_owned());
                tracing::info!("Loaded Segoe UI from {font_path}");
            }
            Err(e) => {
                tracing::warn!("Could not load Segoe UI from {font_path}: {e} -- using default font");
            }
        }
        cc.egui_ctx.set_fonts(fonts);

        cc.egui_ctx
            .set_visuals(Palette::visuals(state.inner.config.dark_mode));

        Self { state: state.inner }
    }
}

impl eframe::App for DriveSweepApp {
    /// Override the GPU clear colour to match the active theme background,
    /// preventing a colour mismatch flash between frames.
    fn clear_color(&self, visuals: &egui::Visuals) -> [f32; 4] {
        let [r, g, b, a] = visuals.panel_fill.to_array();
        [
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        ]
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ── Apply theme ───────────────────────────────────────────────────
        // Every frame, so a toggle takes effect on the next rendered frame.
        ctx.set_visuals(Palette::visuals(self.state.config.dark_mode));

        // ── Process background messages ───────────────────────────────────
        self.state.process_scan_messages();
        self.state.process_delete_messages();

        // Keep polling while a worker is running; the delete worker may be
        // waiting on a dialog answer.
        if self.state.phase == AppPhase::Scanning || self.state.is_deleting() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        // ── Top toolbar ───────────────────────────────────────────────────
        egui::TopBottomPanel::top("toolbar")
            .min_height(36.0)
            .show(ctx, |ui| {
                ui.add_space(4.0);
                widgets::toolbar::toolbar(ui, &mut self.state);
                ui.add_space(4.0);
            });

        // ── Bottom bar ────────────────────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(30.0)
            .show(ctx, |ui| {
                ui.add_space(3.0);
                widgets::status_bar::status_bar(ui, &mut self.state);
                ui.add_space(3.0);
            });

        // ── Central panel (inventory table) ───────────────────────────────
        egui::CentralPanel::default().show(ctx, |ui| {
            widgets::inventory_table::inventory_table(ui, &mut self.state);
        });

        // ── Windows ───────────────────────────────────────────────────────
        panels::log_panel::log_panel(ctx, &mut self.state);
        panels::dialogs::dialogs(ctx, &mut self.state);
    }
}
