/// Top action bar -- drive selection, scan controls, filter, export and theme.
use crate::state::{AppPhase, AppState};
use crate::widgets::drive_picker::drive_picker;
use drivesweep_core::view::ALL_FILTERS;
use egui::Ui;

/// Draw the toolbar.
pub fn toolbar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        // App title -- uses the egui accent/hyperlink colour so it adapts to
        // dark and light mode automatically.
        ui.label(
            egui::RichText::new("🧹 DriveSweep")
                .size(18.0)
                .strong()
                .color(ui.visuals().hyperlink_color),
        );

        ui.separator();

        let scanning = state.phase == AppPhase::Scanning;
        let deleting = state.is_deleting();

        ui.add_enabled_ui(!scanning && !deleting, |ui| drive_picker(ui, state));

        // Scan button.
        let can_scan = !scanning && !deleting && state.selected_drive_index.is_some();
        let scan_btn = ui.add_enabled(
            can_scan,
            egui::Button::new("▶ Scan").min_size(egui::vec2(70.0, 28.0)),
        );
        if scan_btn.clicked() {
            if let Some(idx) = state.selected_drive_index {
                let path = state.drives[idx].path.clone();
                state.start_scan(path);
            }
        }

        // Stop button (only during scan).
        let stop_btn = ui.add_enabled(
            scanning,
            egui::Button::new("⏹ Stop").min_size(egui::vec2(70.0, 28.0)),
        );
        if stop_btn.clicked() {
            state.cancel_scan();
        }

        // Refresh drives — disabled during a scan to prevent a jarring
        // state reset while results are being accumulated.
        if ui
            .add_enabled(!scanning, egui::Button::new("🔄 Refresh"))
            .on_hover_text(if scanning {
                "Cannot refresh drives while a scan is running"
            } else {
                "Re-enumerate drives"
            })
            .clicked()
        {
            state.refresh_drives();
        }

        ui.separator();

        // Category filter.
        let mut filter = state.filter;
        egui::ComboBox::from_id_salt("category_filter")
            .selected_text(filter.label())
            .width(90.0)
            .show_ui(ui, |ui| {
                for choice in ALL_FILTERS {
                    ui.selectable_value(&mut filter, choice, choice.label());
                }
            });
        state.set_filter(filter);

        let mut include_folders = state.config.include_folders;
        if ui
            .checkbox(&mut include_folders, "Include folders")
            .on_hover_text("List folders with the total size of their files (next scan)")
            .changed()
        {
            state.set_include_folders(include_folders);
        }

        ui.separator();

        // Export button (only when results available).
        let can_export = !state.inventory.read().is_empty();
        if ui
            .add_enabled(can_export, egui::Button::new("📤 Export CSV"))
            .on_hover_text(if can_export {
                "Export the inventory to CSV"
            } else {
                "Run a scan first to enable export"
            })
            .clicked()
        {
            state.export();
        }

        // Right-aligned controls.
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            // ── Theme toggle (☀ light / 🌙 dark) ──────────────────
            let dark = state.config.dark_mode;
            let theme_label = if dark { "☀" } else { "🌙" };
            let theme_tip = if dark {
                "Switch to light mode"
            } else {
                "Switch to dark mode"
            };
            if ui.button(theme_label).on_hover_text(theme_tip).clicked() {
                state.toggle_theme();
            }

            if ui
                .button("📜")
                .on_hover_text("Show message log")
                .clicked()
            {
                state.show_log = !state.show_log;
            }

            if ui
                .button("🔗")
                .on_hover_text("Create a desktop shortcut")
                .clicked()
            {
                state.create_shortcut();
            }
        });
    });
}
