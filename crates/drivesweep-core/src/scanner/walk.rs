/// Depth-first inventory walk using `jwalk` in serial mode.
///
/// Entries are buffered locally and flushed to the shared inventory under a
/// single write lock per batch, so the UI can read a consistent, growing
/// inventory while the walk is running. Every flush carries the scan's
/// generation; once a newer scan has started, the inventory silently drops
/// this walk's batches.
use super::progress::ScanProgress;
use super::ScanOptions;
use crate::model::{InventoryEntry, SharedInventory, VolumeInfo};
use crate::platform::AttributeProbe;
use crossbeam_channel::Sender;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Entries accumulated before one flush to the shared inventory.
///
/// Small enough that the table fills in visibly during a scan, large enough
/// that a million-file drive needs only a few thousand lock acquisitions.
pub const BATCH_SIZE: usize = 256;

/// Everything one walk needs, moved into the scan thread.
pub struct ScanJob {
    pub volume: VolumeInfo,
    pub inventory: SharedInventory,
    pub generation: u64,
    pub options: ScanOptions,
    pub probe: Arc<dyn AttributeProbe>,
    pub cancel_flag: Arc<AtomicBool>,
}

/// Running totals and the directory-size ledger for one walk.
struct WalkState {
    files_found: u64,
    dirs_found: u64,
    total_size: u64,
    error_count: u64,
    pending: Vec<InventoryEntry>,
    /// Directories below the root in discovery order, only tracked when
    /// folder entries are requested.
    dirs: Vec<PathBuf>,
    dir_sizes: HashMap<PathBuf, u64>,
}

impl WalkState {
    fn new() -> Self {
        Self {
            files_found: 0,
            dirs_found: 0,
            total_size: 0,
            error_count: 0,
            pending: Vec::with_capacity(BATCH_SIZE),
            dirs: Vec::new(),
            dir_sizes: HashMap::new(),
        }
    }

    /// Count and report something the walk could not read.
    fn skip(&mut self, progress_tx: &Sender<ScanProgress>, path: String, message: String) {
        self.error_count += 1;
        debug!("Skipping {path}: {message}");
        let _ = progress_tx.send(ScanProgress::Error { path, message });
    }

    /// Add a file's size to every tracked ancestor below `root`.
    fn charge_ancestors(&mut self, file: &Path, root: &Path, size: u64) {
        for ancestor in file.ancestors().skip(1) {
            if ancestor == root {
                break;
            }
            if let Some(total) = self.dir_sizes.get_mut(ancestor) {
                *total += size;
            }
        }
    }
}

/// Push `pending` into the inventory. Returns `false` if the inventory has
/// moved on to a newer generation.
fn flush(job: &ScanJob, pending: &mut Vec<InventoryEntry>) -> bool {
    if pending.is_empty() {
        return true;
    }
    let accepted = job
        .inventory
        .write()
        .append_batch(job.generation, pending.drain(..));
    if !accepted {
        debug!("Scan generation {} superseded, dropping batch", job.generation);
    }
    accepted
}

/// Walk `job.volume.root` and fill the inventory. Runs to completion on the
/// calling thread; [`super::start_scan`] wraps it in a background thread.
pub fn run(job: ScanJob, progress_tx: Sender<ScanProgress>) {
    let start = Instant::now();
    let root = job.volume.root.clone();
    let interval = job.options.progress_interval.max(1);
    let mut state = WalkState::new();

    let _ = progress_tx.send(ScanProgress::Started {
        volume: job.volume.clone(),
    });

    let walker = jwalk::WalkDir::new(&root)
        .skip_hidden(false)
        .follow_links(false)
        .sort(true)
        .parallelism(jwalk::Parallelism::Serial);

    for entry_result in walker {
        if job.cancel_flag.load(Ordering::Relaxed) {
            flush(&job, &mut state.pending);
            let _ = progress_tx.send(ScanProgress::Cancelled);
            return;
        }

        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                let path = err
                    .path()
                    .map(|p| p.to_string_lossy().into_owned())
                    .unwrap_or_default();
                state.skip(&progress_tx, path, err.to_string());
                continue;
            }
        };

        // A directory that could not be listed still arrives as an entry;
        // the failure rides along and its subtree is simply absent.
        if let Some(err) = &entry.read_children_error {
            state.skip(
                &progress_tx,
                entry.path().to_string_lossy().into_owned(),
                err.to_string(),
            );
        }

        if entry.depth == 0 {
            continue;
        }

        let path = entry.path();

        if entry.file_type().is_dir() {
            state.dirs_found += 1;
            if job.options.include_folders {
                state.dir_sizes.insert(path.clone(), 0);
                state.dirs.push(path);
            }
            continue;
        }

        let size = match std::fs::symlink_metadata(&path) {
            Ok(meta) => meta.len(),
            Err(err) => {
                state.skip(
                    &progress_tx,
                    path.to_string_lossy().into_owned(),
                    err.to_string(),
                );
                0
            }
        };

        if job.options.include_folders {
            state.charge_ancestors(&path, &root, size);
        }

        let restricted = job.probe.is_restricted(&path);
        state.files_found += 1;
        state.total_size += size;
        state
            .pending
            .push(InventoryEntry::new(path, false, size, restricted, &job.volume));

        if state.pending.len() >= BATCH_SIZE && !flush(&job, &mut state.pending) {
            // A newer scan owns the inventory now; nothing we find matters.
            let _ = progress_tx.send(ScanProgress::Cancelled);
            return;
        }

        if state.files_found % interval == 0 {
            let _ = progress_tx.send(ScanProgress::Update {
                files_found: state.files_found,
                dirs_found: state.dirs_found,
                total_size: state.total_size,
                current_path: entry.parent_path().to_string_lossy().into_owned(),
            });
        }
    }

    if job.options.include_folders {
        let dirs = std::mem::take(&mut state.dirs);
        for dir in dirs {
            let size = state.dir_sizes.get(&dir).copied().unwrap_or(0);
            let restricted = job.probe.is_restricted(&dir);
            state
                .pending
                .push(InventoryEntry::new(dir, true, size, restricted, &job.volume));
        }
    }

    flush(&job, &mut state.pending);

    let duration = start.elapsed();
    info!(
        "Scan of {} complete: {} files, {} dirs, {} errors in {duration:?}",
        root.display(),
        state.files_found,
        state.dirs_found,
        state.error_count
    );

    let _ = progress_tx.send(ScanProgress::Complete {
        duration,
        files_found: state.files_found,
        error_count: state.error_count,
    });
}
