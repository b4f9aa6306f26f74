/// Drive selection combo box.
///
/// Lists the drives from the enumerator with their capacity and a usage
/// bar, and stores the chosen index in the application state.
use crate::state::AppState;
use crate::theme::Palette;
use crate::widgets::size_bar::size_bar;
use egui::Ui;

/// Draw the drive picker.
pub fn drive_picker(ui: &mut Ui, state: &mut AppState) {
    let selected_text = state
        .selected_drive_index
        .and_then(|i| state.drives.get(i))
        .map(|d| d.display_name())
        .unwrap_or_else(|| "No drives".to_string());

    let palette = Palette::for_visuals(ui.visuals());
    let mut new_selection = state.selected_drive_index;

    egui::ComboBox::from_id_salt("drive_picker")
        .selected_text(selected_text)
        .width(220.0)
        .show_ui(ui, |ui| {
            for (i, drive) in state.drives.iter().enumerate() {
                ui.horizontal(|ui| {
                    if ui
                        .selectable_label(new_selection == Some(i), drive.display_name())
                        .on_hover_text(format!(
                            "{} · {} · {} free",
                            drive.filesystem,
                            drive.drive_type.label(),
                            drive.free_display
                        ))
                        .clicked()
                    {
                        new_selection = Some(i);
                    }
                    size_bar(ui, &palette, drive.usage_percent, 60.0, 8.0);
                });
            }
        });

    state.selected_drive_index = new_selection;
}
