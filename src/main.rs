//! DriveSweep: drive inventory and cleanup tool.
//!
//! Thin binary entry point. All logic lives in the `drivesweep-core`
//! and `drivesweep-gui` crates.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() -> anyhow::Result<()> {
    if cfg!(not(windows)) {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .init();
        tracing::error!("DriveSweep only runs on Windows");
        std::process::exit(1);
    }

    // Settings decide the log level, so build state before the subscriber.
    // Building state first also means the first frame is ready as soon as
    // the window opens, with no white flash while drives are enumerated.
    let state = drivesweep_gui::DriveSweepState::build();

    let level = if state.verbose_logging() {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    tracing::info!(
        "DriveSweep {} starting (config: {})",
        env!("CARGO_PKG_VERSION"),
        drivesweep_core::config::AppConfig::default_path().display()
    );

    let icon = drivesweep_gui::icon::generate_icon(64);

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("DriveSweep -- Drive Cleanup")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 500.0])
            .with_icon(icon)
            // DWM compositing starts black instead of white before the
            // first frame.
            .with_transparent(true),
        ..Default::default()
    };

    eframe::run_native(
        "DriveSweep",
        options,
        Box::new(|cc| {
            Ok(Box::new(drivesweep_gui::DriveSweepApp::with_state(
                cc, state,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))?;

    Ok(())
}
