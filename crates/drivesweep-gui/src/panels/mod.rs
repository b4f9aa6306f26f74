/// Panels and windows layered over the main table.

pub mod dialogs;
pub mod log_panel;
