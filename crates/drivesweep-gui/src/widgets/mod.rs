/// UI widgets for DriveSweep.

pub mod drive_picker;
pub mod inventory_table;
pub mod size_bar;
pub mod status_bar;
pub mod toolbar;
