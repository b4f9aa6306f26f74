/// Bottom bar — "Delete selected", scan progress and statistics.
use crate::state::{AppPhase, AppState};
use crate::theme::Palette;
use drivesweep_core::model::size::{format_count, format_size};
use egui::Ui;

/// Draw the status bar at the bottom of the window.
pub fn status_bar(ui: &mut Ui, state: &mut AppState) {
    let palette = Palette::for_visuals(ui.visuals());
    let color_weak = ui.visuals().weak_text_color();
    let color_normal = ui.visuals().text_color();

    ui.horizontal(|ui| {
        let selected = state.selection.len();
        let can_delete = selected > 0 && !state.is_scanning() && !state.is_deleting();
        let label = if selected > 1 {
            format!("🗑 Delete selected ({selected})")
        } else {
            "🗑 Delete selected".to_string()
        };
        if ui
            .add_enabled(can_delete, egui::Button::new(label).min_size(egui::vec2(150.0, 24.0)))
            .on_disabled_hover_text(if state.is_scanning() {
                "Wait for the scan to finish"
            } else {
                "Select one or more rows first"
            })
            .clicked()
        {
            state.request_delete();
        }

        if state.is_deleting() {
            ui.spinner();
        }

        ui.separator();

        match state.phase {
            AppPhase::Idle => {
                ui.label(egui::RichText::new("Ready").size(12.0).color(color_weak));
            }
            AppPhase::Scanning => {
                ui.spinner();

                let display_path = truncate_path(&state.scan_current_path, 60);
                ui.label(
                    egui::RichText::new(format!("Scanning {display_path}..."))
                        .size(12.0)
                        .color(color_normal),
                );
                ui.separator();
                counters(ui, state, &palette);
            }
            AppPhase::Results => {
                let (status_text, status_color) = if state.scan_was_cancelled {
                    ("\u{23f9} Scan stopped (partial results)", palette.warning)
                } else {
                    ("\u{2713} Scan complete", palette.success)
                };
                ui.label(
                    egui::RichText::new(status_text)
                        .size(12.0)
                        .color(status_color),
                );
                ui.separator();
                counters(ui, state, &palette);

                if let Some(duration) = state.scan_duration {
                    ui.separator();
                    ui.label(
                        egui::RichText::new(format!("{:.1}s", duration.as_secs_f64()))
                            .size(12.0)
                            .color(color_weak),
                    );
                }
            }
        }

        if !state.status.is_empty() {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new(truncate_path(&state.status, 80))
                        .size(12.0)
                        .color(color_weak),
                );
            });
        }
    });
}

fn counters(ui: &mut Ui, state: &AppState, palette: &Palette) {
    let color_normal = ui.visuals().text_color();

    ui.label(
        egui::RichText::new(format!("{} files", format_count(state.scan_files_found)))
            .size(12.0)
            .color(color_normal),
    );
    ui.separator();
    ui.label(
        egui::RichText::new(format!("{} shown", format_count(state.rows.len() as u64)))
            .size(12.0)
            .color(color_normal),
    );
    ui.separator();
    ui.label(
        egui::RichText::new(format_size(state.scan_total_size))
            .size(12.0)
            .color(palette.accent),
    );

    if state.scan_error_count > 0 {
        ui.separator();
        ui.label(
            egui::RichText::new(format!(
                "{} skipped",
                format_count(state.scan_error_count)
            ))
            .size(12.0)
            .color(palette.warning),
        );
    }
}

/// Truncate a string to fit within `max_len` characters, replacing the
/// middle with "..." if needed.
fn truncate_path(path: &str, max_len: usize) -> String {
    let chars: Vec<char> = path.chars().collect();
    if chars.len() <= max_len {
        return path.to_string();
    }
    let half = (max_len - 3) / 2;
    let head: String = chars[..half].iter().collect();
    let tail: String = chars[chars.len() - half..].iter().collect();
    format!("{head}...{tail}")
}
