/// Inventory table — the central component.
///
/// `egui_extras::TableBuilder` virtualises the body, so only rows in the
/// viewport are laid out regardless of inventory size. Header clicks toggle
/// the per-column sort; row clicks select (ctrl toggles, shift extends).
use crate::state::{AppPhase, AppState};
use crate::theme::Palette;
use crate::widgets::size_bar::size_bar;
use drivesweep_core::model::size::{format_percent, format_size};
use drivesweep_core::model::Category;
use drivesweep_core::view::SortColumn;
use egui::Ui;
use egui_extras::{Column, TableBuilder};

/// Height of each row in pixels.
const ROW_HEIGHT: f32 = 22.0;

const HEADER_HEIGHT: f32 = 24.0;

/// Draw the inventory table.
pub fn inventory_table(ui: &mut Ui, state: &mut AppState) {
    if state.rows.is_empty() {
        let text = match state.phase {
            AppPhase::Scanning => "Scanning... waiting for results",
            AppPhase::Results => "No items match the current filter.",
            AppPhase::Idle => "No scan results. Select a drive and click Scan.",
        };
        ui.centered_and_justified(|ui| {
            ui.label(egui::RichText::new(text).color(ui.visuals().weak_text_color()));
        });
        return;
    }

    let palette = Palette::for_visuals(ui.visuals());
    let modifiers = ui.input(|i| i.modifiers);

    // Deferred actions: the table borrows `state.rows` while rendering.
    let mut sort_click: Option<SortColumn> = None;
    let mut row_click: Option<usize> = None;

    let active = state.sort_state.active();
    let header_label = |column: SortColumn, text: &str| -> String {
        match active {
            Some((c, dir)) if c == column => format!("{text} {}", dir.arrow()),
            _ => text.to_string(),
        }
    };

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .sense(egui::Sense::click())
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::remainder().at_least(220.0).clip(true))
        .column(Column::initial(90.0).at_least(70.0))
        .column(Column::initial(150.0).at_least(110.0))
        .column(Column::initial(80.0).at_least(60.0))
        .column(Column::initial(60.0).at_least(50.0))
        .column(Column::initial(200.0).at_least(80.0).clip(true))
        .header(HEADER_HEIGHT, |mut header| {
            for (column, text) in [
                (Some(SortColumn::Name), "Name"),
                (Some(SortColumn::Size), "Size"),
                (Some(SortColumn::Percent), "% of drive"),
                (Some(SortColumn::Category), "Type"),
                (Some(SortColumn::Restricted), "System"),
                (None, "Process"),
            ] {
                header.col(|ui| match column {
                    Some(column) => {
                        let button = egui::Button::new(
                            egui::RichText::new(header_label(column, text)).strong(),
                        )
                        .frame(false);
                        if ui.add(button).clicked() {
                            sort_click = Some(column);
                        }
                    }
                    None => {
                        ui.strong(text);
                    }
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, state.rows.len(), |mut row| {
                let index = row.index();
                let entry = &state.rows[index];
                row.set_selected(state.is_selected(entry));

                row.col(|ui| {
                    let icon = if entry.category == Category::Folder {
                        "📁"
                    } else {
                        "📄"
                    };
                    ui.label(format!("{icon} {}", entry.name))
                        .on_hover_text(entry.path.display().to_string());
                });
                row.col(|ui| {
                    ui.label(format_size(entry.size_bytes));
                });
                row.col(|ui| {
                    let percent = entry.percent_of_volume as f32;
                    size_bar(ui, &palette, percent, 60.0, 10.0);
                    ui.label(format_percent(entry.percent_of_volume));
                });
                row.col(|ui| {
                    ui.label(entry.category.label());
                });
                row.col(|ui| {
                    if entry.is_restricted {
                        ui.colored_label(palette.restricted, "Yes");
                    } else {
                        ui.label("No");
                    }
                });
                row.col(|ui| {
                    if !entry.locking_processes.is_empty() {
                        ui.colored_label(palette.warning, entry.process_display());
                    }
                });

                if row.response().clicked() {
                    row_click = Some(index);
                }
            });
        });

    if let Some(column) = sort_click {
        state.toggle_sort(column);
    }
    if let Some(index) = row_click {
        state.click_row(index, modifiers.command, modifiers.shift);
    }
}
