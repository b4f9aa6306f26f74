/// Modal dialogs: restricted-batch warning, delete confirmation and the
/// lock-holder termination prompt.
///
/// Each dialog is a centred, non-collapsible window. The buttons only
/// record the choice; the state methods do the work after the window
/// closure returns.
use crate::state::{AppState, Dialog};
use crate::theme::Palette;
use drivesweep_core::model::format_holders;
use egui::Context;

#[derive(Clone, Copy)]
enum Choice {
    Accept,
    Reject,
}

fn modal(title: &str) -> egui::Window<'_> {
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([420.0, 0.0])
}

/// Draw whichever dialog is active.
pub fn dialogs(ctx: &Context, state: &mut AppState) {
    let palette = Palette::for_visuals(&ctx.style().visuals);

    // The worker is blocked on this question, so it takes precedence.
    if let Some(pending) = &state.pending_confirmation {
        let mut choice = None;
        modal("File in use").show(ctx, |ui| {
            ui.label(format!("{} is in use by:", pending.path.display()));
            ui.add_space(4.0);
            ui.label(
                egui::RichText::new(format_holders(&pending.holders))
                    .strong()
                    .color(palette.warning),
            );
            ui.add_space(8.0);
            ui.label("Terminate these processes and try again?");
            ui.label(
                egui::RichText::new("Unsaved work in those programs will be lost.")
                    .size(11.0)
                    .color(palette.muted),
            );
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Terminate and delete").clicked() {
                    choice = Some(Choice::Accept);
                }
                if ui.button("Skip").clicked() {
                    choice = Some(Choice::Reject);
                }
            });
        });
        match choice {
            Some(Choice::Accept) => state.answer_confirmation(true),
            Some(Choice::Reject) => state.answer_confirmation(false),
            None => {}
        }
        return;
    }

    let mut choice = None;
    match &state.dialog {
        None => return,
        Some(Dialog::RestrictedBatch { count, first }) => {
            modal("System files selected").show(ctx, |ui| {
                ui.label(
                    egui::RichText::new(format!(
                        "{count} of the selected items carry the system attribute."
                    ))
                    .color(palette.restricted),
                );
                ui.label(format!("First: {}", first.display()));
                ui.add_space(4.0);
                ui.label("Nothing was deleted. Deselect system files and try again.");
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    choice = Some(Choice::Reject);
                }
            });
        }
        Some(Dialog::ConfirmDelete { paths }) => {
            modal("Confirm deletion").show(ctx, |ui| {
                let noun = if paths.len() == 1 { "item" } else { "items" };
                ui.label(
                    egui::RichText::new(format!("Delete {} {noun}?", paths.len())).strong(),
                );
                ui.label(
                    egui::RichText::new("Deleted items are not moved to the Recycle Bin.")
                        .size(11.0)
                        .color(palette.muted),
                );
                ui.add_space(4.0);
                // Only the visible slice is laid out.
                let row_height = ui.fonts(|f| f.row_height(&egui::FontId::proportional(11.0)));
                egui::ScrollArea::vertical()
                    .max_height(160.0)
                    .auto_shrink([false, true])
                    .show_rows(ui, row_height, paths.len(), |ui, range| {
                        for path in &paths[range] {
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new(path.display().to_string()).size(11.0),
                                )
                                .truncate(),
                            );
                        }
                    });
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui
                        .button(egui::RichText::new("Delete").color(palette.error))
                        .clicked()
                    {
                        choice = Some(Choice::Accept);
                    }
                    if ui.button("Cancel").clicked() {
                        choice = Some(Choice::Reject);
                    }
                });
            });
        }
    }

    match choice {
        Some(Choice::Accept) => state.confirm_delete(),
        Some(Choice::Reject) => state.dismiss_dialog(),
        None => {}
    }
}
