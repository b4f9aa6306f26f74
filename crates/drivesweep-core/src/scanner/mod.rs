/// Scanner module: inventories a volume on a background thread.
///
/// The walk writes entries straight into the shared inventory in batches
/// so the UI can show results while the scan runs. Progress and completion
/// travel over a bounded crossbeam channel.
///
/// Only one scan is meant to own the inventory at a time. Starting a scan
/// begins a new inventory generation, which makes any older scan's writes
/// no-ops; callers should still [`ScanHandle::cancel`] the old handle so its
/// thread stops walking.
pub mod progress;
pub mod walk;

use crate::config::{AppConfig, DEFAULT_PROGRESS_INTERVAL};
use crate::model::{SharedInventory, VolumeInfo};
use crate::platform::{AttributeProbe, SystemAttributeProbe};
use progress::ScanProgress;
use walk::ScanJob;

use crossbeam_channel::Receiver;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::info;

/// Maximum number of progress messages that may queue up in the channel.
///
/// The UI drains this channel once per frame. If it falls behind (hidden
/// window) the scanner stalls briefly rather than consuming unbounded heap.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 4_096;

/// Knobs for one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Also emit one `Folder` entry per directory, sized as the sum of its
    /// descendant files.
    pub include_folders: bool,
    /// Files between two `ScanProgress::Update` messages.
    pub progress_interval: u64,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            include_folders: false,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl From<&AppConfig> for ScanOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            include_folders: config.include_folders,
            progress_interval: config.progress_interval,
        }
    }
}

/// Handle to a running or completed scan.
pub struct ScanHandle {
    /// Receiver for progress updates from the scan thread.
    pub progress_rx: Receiver<ScanProgress>,
    /// Inventory generation this scan writes to.
    pub generation: u64,
    cancel_flag: Arc<AtomicBool>,
    _thread: Option<thread::JoinHandle<()>>,
}

impl ScanHandle {
    /// Request the scan to stop as soon as possible.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }
}

/// Start scanning `root` into `inventory` on a background thread, using the
/// platform attribute probe.
pub fn start_scan(root: PathBuf, inventory: SharedInventory, options: ScanOptions) -> ScanHandle {
    start_scan_with_probe(root, inventory, options, Arc::new(SystemAttributeProbe))
}

/// [`start_scan`] with an explicit attribute probe.
///
/// The volume capacity is captured and the inventory cleared on the calling
/// thread, before this returns, so callers see an empty inventory of the new
/// generation immediately.
pub fn start_scan_with_probe(
    root: PathBuf,
    inventory: SharedInventory,
    options: ScanOptions,
    probe: Arc<dyn AttributeProbe>,
) -> ScanHandle {
    let (progress_tx, progress_rx) =
        crossbeam_channel::bounded::<ScanProgress>(PROGRESS_CHANNEL_CAPACITY);
    let cancel_flag = Arc::new(AtomicBool::new(false));

    let volume = VolumeInfo::probe(&root);
    let generation = inventory.write().begin_generation();

    info!(
        "Starting scan {generation} of {} ({} bytes capacity)",
        root.display(),
        volume.total_bytes
    );

    let job = ScanJob {
        volume,
        inventory,
        generation,
        options,
        probe,
        cancel_flag: cancel_flag.clone(),
    };

    let thread = thread::Builder::new()
        .name("drivesweep-scanner".into())
        .spawn(move || walk::run(job, progress_tx));

    let thread = match thread {
        Ok(handle) => Some(handle),
        Err(e) => {
            // Without a thread there is no walk; the receiver reports a
            // disconnect and the caller leaves the scanning phase.
            tracing::error!("Failed to spawn scanner thread: {e}");
            None
        }
    };

    ScanHandle {
        progress_rx,
        generation,
        cancel_flag,
        _thread: thread,
    }
}
