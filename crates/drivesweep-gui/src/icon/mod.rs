//! DriveSweep application icon.
//!
//! The pixels come from [`raster`], which the build script shares to
//! produce the executable's `.ico` resource.
pub mod raster;

/// Generate the icon as egui `IconData`.
pub fn generate_icon(size: u32) -> egui::IconData {
    egui::IconData {
        rgba: raster::render(size),
        width: size,
        height: size,
    }
}
