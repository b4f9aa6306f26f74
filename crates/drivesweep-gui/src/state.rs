/// Application state management.
///
/// Centralises all mutable state that the UI reads and writes.
/// The scan and delete workers communicate via channels; state updates
/// happen in `process_scan_messages()` and `process_delete_messages()`,
/// which run once per frame.
///
/// During scanning, the table reads from the **shared inventory**
/// (`Arc<RwLock<Inventory>>`) so results appear in real time.
use crossbeam_channel::Sender;
use drivesweep_core::config::AppConfig;
use drivesweep_core::executor::{
    self, start_delete, DeleteError, DeleteEvent, DeleteHandle, ExecutorContext,
};
use drivesweep_core::model::{inventory, InventoryEntry, LockingProcess, SharedInventory, VolumeInfo};
use drivesweep_core::platform::DriveInfo;
use drivesweep_core::scanner::progress::ScanProgress;
use drivesweep_core::scanner::{ScanHandle, ScanOptions};
use drivesweep_core::view::{visible_rows, CategoryFilter, SortColumn, SortState};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// The current phase of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppPhase {
    /// Idle — no scan in progress, possibly showing previous results.
    Idle,
    /// Scanning — progress counters and a live table.
    Scanning,
    /// Scan complete — results are available.
    Results,
}

/// Modal dialog currently shown over the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    /// The selection contains system-flagged items; nothing will be deleted.
    RestrictedBatch { count: usize, first: PathBuf },
    /// "Delete N items?" for the captured selection.
    ConfirmDelete { paths: Vec<PathBuf> },
}

/// A lock-holder question from the delete worker, waiting for the user.
#[derive(Debug)]
pub struct PendingConfirmation {
    pub path: PathBuf,
    pub holders: Vec<LockingProcess>,
    reply: Sender<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

/// One line of the message log window.
#[derive(Debug, Clone)]
pub struct LogMessage {
    pub timestamp: chrono::DateTime<chrono::Local>,
    pub level: LogLevel,
    pub text: String,
}

/// Maximum number of scan-progress messages drained from the channel per frame.
///
/// Prevents a backlog (e.g. after the window was hidden) from blocking the
/// render thread for a perceptible duration when it is eventually shown again.
const MAX_MESSAGES_PER_FRAME: usize = 300;

/// Maximum delete-worker events handled per frame.
const MAX_DELETE_EVENTS_PER_FRAME: usize = 100;

/// Oldest lines are dropped beyond this.
const MAX_LOG_MESSAGES: usize = 2_000;

/// Scan errors kept for display; the count keeps going past this.
const MAX_SCAN_ERRORS: usize = 1_000;

/// Minimum time between two table refreshes while a scan is running.
const LIVE_REFRESH_INTERVAL: Duration = Duration::from_millis(250);

/// A live full rebuild that took `t` is not repeated for `t` times this,
/// so the UI thread spends at most a fifth of its time on it.
const LIVE_REBUILD_BACKOFF: u32 = 4;

/// All application state.
pub struct AppState {
    // ── Drives ─────────────────────────────────────────
    pub drives: Vec<DriveInfo>,
    pub selected_drive_index: Option<usize>,

    // ── Scan ───────────────────────────────────────────
    pub phase: AppPhase,
    pub scan_handle: Option<ScanHandle>,
    pub scan_volume: Option<VolumeInfo>,
    pub scan_files_found: u64,
    pub scan_dirs_found: u64,
    pub scan_total_size: u64,
    pub scan_current_path: String,
    pub scan_error_count: u64,
    pub scan_duration: Option<Duration>,
    /// True if the most recent scan was cancelled (partial results).
    pub scan_was_cancelled: bool,
    pub scan_errors: Vec<(String, String)>,

    // ── Results ────────────────────────────────────────
    pub inventory: SharedInventory,
    /// Filtered and sorted copy of the inventory the table renders.
    pub rows: Vec<InventoryEntry>,
    pub filter: CategoryFilter,
    pub sort_state: SortState,
    pub selection: HashSet<PathBuf>,
    /// Row index of the last plain or ctrl click, anchor for shift-click.
    pub selection_anchor: Option<usize>,
    /// Inventory length when `rows` was last built, so live scans only
    /// rebuild when something arrived.
    rows_built_from_len: usize,
    rows_dirty: bool,
    /// Earliest time the next live refresh may run.
    next_live_refresh: Instant,

    // ── Deletion ───────────────────────────────────────
    pub executor: ExecutorContext,
    pub delete_handle: Option<DeleteHandle>,
    pub dialog: Option<Dialog>,
    pub pending_confirmation: Option<PendingConfirmation>,

    // ── UI state ───────────────────────────────────────
    pub messages: Vec<LogMessage>,
    pub show_log: bool,
    pub status: String,

    // ── Settings ───────────────────────────────────────
    pub config: AppConfig,
    /// Where settings are saved. `None` keeps them in memory only.
    pub config_path: Option<PathBuf>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Create initial application state from the user's saved settings.
    pub fn new() -> Self {
        let path = AppConfig::default_path();
        let config = AppConfig::load_from(&path);
        Self::with_config(config, Some(path))
    }

    /// Create state with explicit settings. With `config_path = None`
    /// nothing is ever written to disk.
    pub fn with_config(config: AppConfig, config_path: Option<PathBuf>) -> Self {
        let drives = drivesweep_core::platform::enumerate_drives();
        let selected = if drives.is_empty() { None } else { Some(0) };

        Self {
            drives,
            selected_drive_index: selected,
            phase: AppPhase::Idle,
            scan_handle: None,
            scan_volume: None,
            scan_files_found: 0,
            scan_dirs_found: 0,
            scan_total_size: 0,
            scan_current_path: String::new(),
            scan_error_count: 0,
            scan_duration: None,
            scan_was_cancelled: false,
            scan_errors: Vec::new(),
            inventory: inventory::shared(),
            rows: Vec::new(),
            filter: CategoryFilter::All,
            sort_state: SortState::default(),
            selection: HashSet::new(),
            selection_anchor: None,
            rows_built_from_len: 0,
            rows_dirty: false,
            next_live_refresh: Instant::now(),
            executor: ExecutorContext::system(),
            delete_handle: None,
            dialog: None,
            pending_confirmation: None,
            messages: Vec::new(),
            show_log: false,
            status: String::new(),
            config,
            config_path,
        }
    }

    // ── Scan ───────────────────────────────────────────────────────────────

    /// Start a scan of `path`. Any running scan is cancelled first; its
    /// late writes are discarded by the inventory's generation check.
    pub fn start_scan(&mut self, path: PathBuf) {
        if self.is_deleting() {
            self.log(LogLevel::Warning, "Wait for the deletion to finish before rescanning");
            return;
        }
        self.cancel_scan();

        self.phase = AppPhase::Scanning;
        self.scan_volume = None;
        self.scan_files_found = 0;
        self.scan_dirs_found = 0;
        self.scan_total_size = 0;
        self.scan_current_path = path.to_string_lossy().into_owned();
        self.scan_error_count = 0;
        self.scan_duration = None;
        self.scan_was_cancelled = false;
        self.scan_errors.clear();
        self.selection.clear();
        self.selection_anchor = None;
        self.rows.clear();
        self.rows_built_from_len = 0;
        self.next_live_refresh = Instant::now();

        let options = ScanOptions::from(&self.config);
        self.log(LogLevel::Info, format!("Scanning {}", path.display()));
        let handle = drivesweep_core::scanner::start_scan(path, self.inventory.clone(), options);
        self.scan_handle = Some(handle);
    }

    /// Cancel any running scan.
    pub fn cancel_scan(&mut self) {
        if let Some(ref handle) = self.scan_handle {
            handle.cancel();
        }
    }

    /// Process pending scan progress messages. Called once per frame.
    ///
    /// Returns `true` if the UI should repaint (new data arrived).
    pub fn process_scan_messages(&mut self) -> bool {
        let handle = match &self.scan_handle {
            Some(h) => h,
            None => return false,
        };

        let mut repaint = false;
        let mut finished = false;

        // Drain available messages without blocking, subject to a per-frame
        // budget so a large backlog cannot stall the render thread.
        let mut messages_this_frame = 0usize;
        while messages_this_frame < MAX_MESSAGES_PER_FRAME {
            let msg = match handle.progress_rx.try_recv() {
                Ok(m) => m,
                Err(crossbeam_channel::TryRecvError::Empty) => break,
                Err(crossbeam_channel::TryRecvError::Disconnected) => {
                    // Worker gone without a terminal message (spawn failure).
                    self.scan_was_cancelled = true;
                    finished = true;
                    break;
                }
            };
            messages_this_frame += 1;
            repaint = true;
            match msg {
                ScanProgress::Started { volume } => {
                    self.scan_volume = Some(volume);
                }
                ScanProgress::Update {
                    files_found,
                    dirs_found,
                    total_size,
                    current_path,
                } => {
                    self.scan_files_found = files_found;
                    self.scan_dirs_found = dirs_found;
                    self.scan_total_size = total_size;
                    self.scan_current_path = current_path;
                }
                ScanProgress::Error { path, message } => {
                    self.scan_error_count += 1;
                    if self.scan_errors.len() < MAX_SCAN_ERRORS {
                        self.scan_errors.push((path, message));
                    }
                }
                ScanProgress::Complete {
                    duration,
                    files_found,
                    error_count,
                } => {
                    self.scan_files_found = files_found;
                    self.scan_error_count = error_count;
                    self.scan_duration = Some(duration);
                    finished = true;
                    break;
                }
                ScanProgress::Cancelled => {
                    self.scan_was_cancelled = true;
                    finished = true;
                    break;
                }
            }
        }

        if finished {
            self.phase = AppPhase::Results;
            self.scan_handle = None;
            let inv = self.inventory.read();
            self.scan_total_size = inv.total_size();
            let summary = format!(
                "Scan {}: {} items, {} skipped",
                if self.scan_was_cancelled { "stopped" } else { "complete" },
                inv.len(),
                self.scan_error_count
            );
            drop(inv);
            self.log(LogLevel::Info, summary);
            self.rows_dirty = true;
        }

        if self.rows_dirty {
            self.rebuild_rows();
            repaint = true;
        } else if self.refresh_live_rows() {
            repaint = true;
        }

        repaint
    }

    /// Bring the rows up to date with a growing inventory during a scan.
    ///
    /// Unsorted tables only copy the entries appended since the last build.
    /// Sorted ones need a full rebuild, which is throttled by how long the
    /// previous one took. Returns `true` if the rows changed.
    pub fn refresh_live_rows(&mut self) -> bool {
        let started = Instant::now();
        if started < self.next_live_refresh {
            return false;
        }
        let inv = self.inventory.read();
        let len = inv.len();
        if len == self.rows_built_from_len {
            return false;
        }

        if self.sort_state.active().is_none() && len > self.rows_built_from_len {
            let tail = visible_rows(&inv.entries()[self.rows_built_from_len..], self.filter);
            drop(inv);
            self.rows.extend(tail);
            self.rows_built_from_len = len;
            self.next_live_refresh = Instant::now() + LIVE_REFRESH_INTERVAL;
        } else {
            drop(inv);
            self.rebuild_rows();
            let cost = started.elapsed() * LIVE_REBUILD_BACKOFF;
            self.next_live_refresh = Instant::now() + cost.max(LIVE_REFRESH_INTERVAL);
        }
        true
    }

    pub fn is_scanning(&self) -> bool {
        self.phase == AppPhase::Scanning
    }

    // ── View ───────────────────────────────────────────────────────────────

    /// Rebuild the table rows from the inventory with the current filter
    /// and sort.
    pub fn rebuild_rows(&mut self) {
        // Copy under the read lock, sort after releasing it.
        let inv = self.inventory.read();
        let mut rows = visible_rows(inv.entries(), self.filter);
        self.rows_built_from_len = inv.len();
        drop(inv);
        self.sort_state.apply(&mut rows);
        self.rows = rows;
        self.rows_dirty = false;

        // Selection only ever refers to rows that still exist.
        let visible: HashSet<&PathBuf> = self.rows.iter().map(|r| &r.path).collect();
        self.selection.retain(|p| visible.contains(p));
        self.selection_anchor = None;
    }

    /// Change the category filter. The last sort stays in effect.
    pub fn set_filter(&mut self, filter: CategoryFilter) {
        if self.filter != filter {
            self.filter = filter;
            self.rebuild_rows();
        }
    }

    /// Header click on `column`.
    pub fn toggle_sort(&mut self, column: SortColumn) {
        self.sort_state.toggle(column);
        self.sort_state.apply(&mut self.rows);
        self.selection_anchor = None;
    }

    /// Row click with the modifier state at the time of the click.
    pub fn click_row(&mut self, index: usize, ctrl: bool, shift: bool) {
        let Some(row) = self.rows.get(index) else {
            return;
        };

        if shift {
            if let Some(anchor) = self.selection_anchor {
                let (lo, hi) = if anchor <= index { (anchor, index) } else { (index, anchor) };
                if !ctrl {
                    self.selection.clear();
                }
                for r in &self.rows[lo..=hi] {
                    self.selection.insert(r.path.clone());
                }
                return;
            }
        }

        if ctrl {
            if !self.selection.remove(&row.path) {
                self.selection.insert(row.path.clone());
            }
        } else {
            self.selection.clear();
            self.selection.insert(row.path.clone());
        }
        self.selection_anchor = Some(index);
    }

    pub fn is_selected(&self, entry: &InventoryEntry) -> bool {
        self.selection.contains(&entry.path)
    }

    /// Selected paths in table order.
    pub fn selected_paths(&self) -> Vec<PathBuf> {
        self.rows
            .iter()
            .filter(|r| self.selection.contains(&r.path))
            .map(|r| r.path.clone())
            .collect()
    }

    // ── Deletion ───────────────────────────────────────────────────────────

    pub fn is_deleting(&self) -> bool {
        self.delete_handle.is_some()
    }

    /// "Delete selected": check the batch and open the matching dialog.
    pub fn request_delete(&mut self) {
        if self.is_deleting() || self.is_scanning() {
            return;
        }
        let paths = self.selected_paths();
        match executor::check_batch(&self.inventory, &paths) {
            Ok(()) => self.dialog = Some(Dialog::ConfirmDelete { paths }),
            Err(DeleteError::RestrictedInBatch { count, first }) => {
                self.log(
                    LogLevel::Warning,
                    format!(
                        "Deletion refused: {count} selected item(s) are system files (first: {})",
                        first.display()
                    ),
                );
                self.dialog = Some(Dialog::RestrictedBatch { count, first });
            }
            Err(DeleteError::EmptySelection) => {
                self.status = "Select one or more rows to delete".into();
            }
        }
    }

    /// The user accepted "Delete N items?": start the worker.
    pub fn confirm_delete(&mut self) {
        let Some(Dialog::ConfirmDelete { paths }) = self.dialog.take() else {
            return;
        };
        self.log(LogLevel::Info, format!("Deleting {} item(s)", paths.len()));
        self.delete_handle = Some(start_delete(
            self.inventory.clone(),
            paths,
            self.executor.clone(),
        ));
    }

    pub fn dismiss_dialog(&mut self) {
        self.dialog = None;
    }

    /// Answer the worker's "terminate these processes?" question.
    pub fn answer_confirmation(&mut self, terminate: bool) {
        if let Some(pending) = self.pending_confirmation.take() {
            // The worker may be gone; it then treats the path as declined.
            let _ = pending.reply.send(terminate);
        }
    }

    /// Drain delete-worker events. Called once per frame.
    ///
    /// Returns `true` if the UI should repaint.
    pub fn process_delete_messages(&mut self) -> bool {
        let mut events = Vec::new();
        let mut disconnected = false;
        if let Some(handle) = &self.delete_handle {
            while events.len() < MAX_DELETE_EVENTS_PER_FRAME {
                match handle.events.try_recv() {
                    Ok(event) => events.push(event),
                    Err(crossbeam_channel::TryRecvError::Empty) => break,
                    Err(crossbeam_channel::TryRecvError::Disconnected) => {
                        disconnected = true;
                        break;
                    }
                }
            }
        } else {
            return false;
        }

        let repaint = !events.is_empty() || disconnected;
        for event in events {
            match event {
                DeleteEvent::Progress { path } => {
                    self.status = format!("Deleting {}", path.display());
                }
                DeleteEvent::ConfirmTermination {
                    path,
                    holders,
                    reply,
                } => {
                    self.pending_confirmation = Some(PendingConfirmation {
                        path,
                        holders,
                        reply,
                    });
                }
                DeleteEvent::Outcome(report) => {
                    let level = if report.outcome.is_success() {
                        self.selection.remove(&report.path);
                        LogLevel::Info
                    } else if matches!(
                        report.outcome,
                        drivesweep_core::executor::DeleteOutcome::Declined { .. }
                    ) {
                        LogLevel::Warning
                    } else {
                        LogLevel::Error
                    };
                    self.log(level, report.to_string());
                    self.rows_dirty = true;
                }
                DeleteEvent::Finished(summary) => {
                    self.status = summary.to_string();
                    self.log(LogLevel::Info, format!("Deletion finished: {summary}"));
                    self.delete_handle = None;
                    self.rows_dirty = true;
                }
                DeleteEvent::Rejected(e) => {
                    self.log(LogLevel::Warning, e.to_string());
                    if let DeleteError::RestrictedInBatch { count, first } = e {
                        self.dialog = Some(Dialog::RestrictedBatch { count, first });
                    }
                    self.delete_handle = None;
                }
            }
        }

        if disconnected && self.delete_handle.is_some() {
            self.log(LogLevel::Error, "Deletion worker stopped unexpectedly");
            self.delete_handle = None;
            self.pending_confirmation = None;
        }

        if self.rows_dirty {
            self.rebuild_rows();
        }
        repaint
    }

    // ── Export / shortcut ──────────────────────────────────────────────────

    /// Export the whole inventory to the configured CSV target.
    pub fn export(&mut self) {
        let target = drivesweep_core::export::export_target(&self.config);
        // Copy off the lock so a running scan is not held up by disk I/O.
        let entries = self.inventory.read().snapshot();
        match drivesweep_core::export::export_csv(&target, &entries) {
            Ok(rows) => self.log(
                LogLevel::Info,
                format!("Exported {rows} row(s) to {}", target.display()),
            ),
            Err(e) => self.log(LogLevel::Error, format!("Export failed: {e}")),
        }
    }

    pub fn create_shortcut(&mut self) {
        match drivesweep_core::platform::shortcut::create_for_current_exe() {
            Ok(path) => self.log(
                LogLevel::Info,
                format!("Created shortcut {}", path.display()),
            ),
            Err(e) => self.log(LogLevel::Error, format!("Shortcut creation failed: {e}")),
        }
    }

    // ── Settings ───────────────────────────────────────────────────────────

    pub fn refresh_drives(&mut self) {
        self.drives = drivesweep_core::platform::enumerate_drives();
        self.selected_drive_index = match self.selected_drive_index {
            Some(i) if i < self.drives.len() => Some(i),
            _ if self.drives.is_empty() => None,
            _ => Some(0),
        };
    }

    pub fn toggle_theme(&mut self) {
        self.config.dark_mode = !self.config.dark_mode;
        self.save_config();
    }

    /// Takes effect on the next scan.
    pub fn set_include_folders(&mut self, include: bool) {
        if self.config.include_folders != include {
            self.config.include_folders = include;
            self.save_config();
        }
    }

    fn save_config(&mut self) {
        let Some(path) = self.config_path.clone() else {
            return;
        };
        if let Err(e) = self.config.save_to(&path) {
            self.log(LogLevel::Warning, format!("Could not save settings: {e}"));
        }
    }

    // ── Log ────────────────────────────────────────────────────────────────

    pub fn log(&mut self, level: LogLevel, text: impl Into<String>) {
        let text = text.into();
        match level {
            LogLevel::Info => tracing::info!("{text}"),
            LogLevel::Warning => tracing::warn!("{text}"),
            LogLevel::Error => tracing::error!("{text}"),
        }
        if level != LogLevel::Info {
            self.show_log = true;
        }
        if self.messages.len() >= MAX_LOG_MESSAGES {
            self.messages.remove(0);
        }
        self.status.clone_from(&text);
        self.messages.push(LogMessage {
            timestamp: chrono::Local::now(),
            level,
            text,
        });
    }
}
