/// Scan progress reporting: lightweight messages sent from the scan
/// thread to the UI thread via a crossbeam channel.
///
/// The entries themselves go straight into the shared inventory; these
/// messages only carry counters and status.
use crate::model::VolumeInfo;
use std::time::Duration;

#[derive(Debug)]
pub enum ScanProgress {
    /// First message of every scan, with the capacity captured for it.
    Started { volume: VolumeInfo },
    /// Periodic update with running totals. Advisory only.
    Update {
        files_found: u64,
        dirs_found: u64,
        total_size: u64,
        current_path: String,
    },
    /// A subtree or file could not be read and was skipped.
    Error { path: String, message: String },
    /// The walk finished; every entry is in the inventory.
    Complete {
        duration: Duration,
        files_found: u64,
        error_count: u64,
    },
    /// The scan was cancelled. Entries found so far stay in the inventory
    /// unless a newer scan has already replaced it.
    Cancelled,
}
