/// DriveSweep Core — drive inventory, filtering and safe deletion.
///
/// This crate contains all business logic with zero UI dependencies.
///
/// # Modules
///
/// - [`model`] — Inventory entries, categories and the shared inventory store.
/// - [`scanner`] — Background volume walk with progress reporting.
/// - [`view`] — Category filter and column sorting over the inventory.
/// - [`executor`] — Batch deletion with lock detection and one retry.
/// - [`export`] — CSV export.
/// - [`platform`] — Drive enumeration, file attributes, lock holders,
///   process termination and desktop shortcuts.
/// - [`config`] — Persistent user settings.
pub mod config;
pub mod error;
pub mod executor;
pub mod export;
pub mod model;
pub mod platform;
pub mod scanner;
pub mod view;

pub use error::{DriveSweepError, Result};
