/// Message log window — deletion outcomes, exports and errors with their
/// timestamps.
use crate::state::{AppState, LogLevel};
use crate::theme::Palette;
use egui::Context;

/// Draw the log window when it is open.
pub fn log_panel(ctx: &Context, state: &mut AppState) {
    let palette = Palette::for_visuals(&ctx.style().visuals);
    let mut open = state.show_log;
    let mut clear = false;

    egui::Window::new("Messages")
        .open(&mut open)
        .default_size([560.0, 260.0])
        .resizable(true)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(format!("{} message(s)", state.messages.len()))
                        .size(11.0)
                        .color(palette.muted),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("🗑 Clear").clicked() {
                        clear = true;
                    }
                });
            });
            ui.separator();

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for message in &state.messages {
                        let color = match message.level {
                            LogLevel::Info => ui.visuals().text_color(),
                            LogLevel::Warning => palette.warning,
                            LogLevel::Error => palette.error,
                        };
                        ui.horizontal_wrapped(|ui| {
                            ui.label(
                                egui::RichText::new(
                                    message.timestamp.format("%H:%M:%S").to_string(),
                                )
                                .monospace()
                                .size(11.0)
                                .color(palette.muted),
                            );
                            ui.label(egui::RichText::new(&message.text).color(color));
                        });
                    }
                });
        });

    if clear {
        state.messages.clear();
    }
    state.show_log = open;
}
