/// End-to-end tests for `AppState`, the GUI application state machine.
///
/// These drive the same methods the widgets call, without an egui window.
/// Scans run the real scanner against temporary directories; deletions use
/// the real filesystem remover with a lock simulation for the
/// "terminate and retry" path.
use drivesweep_core::config::AppConfig;
use drivesweep_core::executor::ExecutorContext;
use drivesweep_core::model::{Category, InventoryEntry, LockingProcess, VolumeInfo};
use drivesweep_core::platform::{FsRemover, LockProbe, ProcessTerminator, Remover};
use drivesweep_core::view::{CategoryFilter, SortColumn};
use drivesweep_gui::state::{AppPhase, AppState, Dialog, LogLevel};
use parking_lot::Mutex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_state() -> AppState {
    AppState::with_config(AppConfig::default(), None)
}

/// a.txt 100, b.bin 200, sub/c.exe 300.
fn make_temp_tree() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("a.txt"), vec![0u8; 100]).unwrap();
    fs::write(tmp.path().join("b.bin"), vec![0u8; 200]).unwrap();
    let sub = tmp.path().join("sub");
    fs::create_dir_all(&sub).unwrap();
    fs::write(sub.join("c.exe"), vec![0u8; 300]).unwrap();
    tmp
}

fn pump_until_done(state: &mut AppState) {
    let deadline = Instant::now() + Duration::from_secs(30);
    while state.phase == AppPhase::Scanning {
        assert!(Instant::now() < deadline, "scan did not complete within 30 seconds");
        state.process_scan_messages();
        std::thread::sleep(Duration::from_millis(10));
    }
}

fn pump_deletes_until_done(state: &mut AppState) {
    let deadline = Instant::now() + Duration::from_secs(30);
    while state.is_deleting() {
        assert!(Instant::now() < deadline, "deletion did not finish within 30 seconds");
        state.process_delete_messages();
        std::thread::sleep(Duration::from_millis(10));
    }
}

fn scanned_state(tmp: &TempDir) -> AppState {
    let mut state = test_state();
    state.start_scan(tmp.path().to_path_buf());
    pump_until_done(&mut state);
    state
}

fn row_index(state: &AppState, name: &str) -> usize {
    state
        .rows
        .iter()
        .position(|r| r.name.as_str() == name)
        .unwrap_or_else(|| panic!("{name} not in rows"))
}

/// `path` refuses removal while `pid` is alive.
struct SimulatedLock {
    path: PathBuf,
    holder: LockingProcess,
    alive: Mutex<bool>,
}

impl Remover for SimulatedLock {
    fn remove(&self, path: &Path) -> io::Result<()> {
        if path == self.path && *self.alive.lock() {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "in use"));
        }
        FsRemover.remove(path)
    }
}

impl LockProbe for SimulatedLock {
    fn holders(&self, path: &Path) -> Vec<LockingProcess> {
        if path == self.path && *self.alive.lock() {
            vec![self.holder.clone()]
        } else {
            Vec::new()
        }
    }
}

impl ProcessTerminator for SimulatedLock {
    fn terminate(&self, _pid: u32) -> io::Result<()> {
        *self.alive.lock() = false;
        Ok(())
    }
}

fn locked_context(path: PathBuf) -> ExecutorContext {
    let lock = Arc::new(SimulatedLock {
        path,
        holder: LockingProcess::new(4242, "editor.exe"),
        alive: Mutex::new(true),
    });
    ExecutorContext {
        remover: lock.clone(),
        lock_probe: lock.clone(),
        terminator: lock,
    }
}

// ── Scan lifecycle ────────────────────────────────────────────────────────────

#[test]
fn start_scan_enters_scanning_phase() {
    let tmp = make_temp_tree();
    let mut state = test_state();
    state.start_scan(tmp.path().to_path_buf());
    assert!(state.is_scanning());
    pump_until_done(&mut state);
}

#[test]
fn completed_scan_fills_rows() {
    let tmp = make_temp_tree();
    let state = scanned_state(&tmp);

    assert_eq!(state.phase, AppPhase::Results);
    assert!(!state.scan_was_cancelled);
    assert!(state.scan_handle.is_none());
    assert_eq!(state.rows.len(), 3, "folders are excluded by default");
    assert_eq!(state.scan_total_size, 600);
    assert!(state.scan_volume.is_some());
    assert!(state.scan_duration.is_some());
    assert!(state
        .messages
        .iter()
        .any(|m| m.text.starts_with("Scan complete")));
}

#[test]
fn include_folders_adds_folder_rows_on_next_scan() {
    let tmp = make_temp_tree();
    let mut state = test_state();
    state.set_include_folders(true);
    state.start_scan(tmp.path().to_path_buf());
    pump_until_done(&mut state);

    let sub = &state.rows[row_index(&state, "sub")];
    assert_eq!(sub.category, Category::Folder);
    assert_eq!(sub.size_bytes, 300);
}

#[test]
fn cancel_scan_ends_in_results() {
    let tmp = make_temp_tree();
    let mut state = test_state();
    state.start_scan(tmp.path().to_path_buf());
    state.cancel_scan();
    pump_until_done(&mut state);
    assert_eq!(state.phase, AppPhase::Results);
}

#[test]
fn rescan_clears_previous_selection() {
    let tmp = make_temp_tree();
    let mut state = scanned_state(&tmp);
    state.click_row(0, false, false);
    assert_eq!(state.selection.len(), 1);

    state.start_scan(tmp.path().to_path_buf());
    assert!(state.selection.is_empty());
    pump_until_done(&mut state);
    assert_eq!(state.rows.len(), 3);
}

#[test]
fn live_refresh_appends_new_entries_at_most_once_per_interval() {
    let mut state = test_state();
    let volume = VolumeInfo::new("/vol", 1_000_000);
    let generation = state.inventory.write().begin_generation();
    let append = |state: &AppState, names: &[&str]| {
        state.inventory.write().append_batch(
            generation,
            names
                .iter()
                .map(|n| InventoryEntry::new(PathBuf::from("/vol").join(n), false, 10, false, &volume)),
        );
    };
    state.set_filter(CategoryFilter::Only(Category::Program));

    append(&state, &["a.exe", "b.txt"]);
    assert!(state.refresh_live_rows());
    assert_eq!(state.rows.len(), 1);

    // A second batch right away waits for the next interval.
    append(&state, &["c.exe", "d.exe"]);
    assert!(!state.refresh_live_rows());
    assert_eq!(state.rows.len(), 1);

    std::thread::sleep(Duration::from_millis(300));
    assert!(state.refresh_live_rows());
    let names: Vec<&str> = state.rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["a.exe", "c.exe", "d.exe"]);

    // Nothing new: nothing to do.
    std::thread::sleep(Duration::from_millis(300));
    assert!(!state.refresh_live_rows());
}

#[test]
fn live_refresh_keeps_an_active_sort() {
    let mut state = test_state();
    let volume = VolumeInfo::new("/vol", 1_000_000);
    let generation = state.inventory.write().begin_generation();
    state.toggle_sort(SortColumn::Size);

    for (name, size) in [("small.bin", 1u64), ("big.bin", 100), ("mid.bin", 50)] {
        state.inventory.write().append_batch(
            generation,
            [InventoryEntry::new(PathBuf::from("/vol").join(name), false, size, false, &volume)],
        );
    }
    assert!(state.refresh_live_rows());
    let sizes: Vec<u64> = state.rows.iter().map(|r| r.size_bytes).collect();
    assert_eq!(sizes, [100, 50, 1]);
}

// ── Filter and sort ───────────────────────────────────────────────────────────

#[test]
fn filter_narrows_rows_and_all_restores_them() {
    let tmp = make_temp_tree();
    let mut state = scanned_state(&tmp);

    state.set_filter(CategoryFilter::Only(Category::Program));
    assert_eq!(state.rows.len(), 1);
    assert_eq!(state.rows[0].name.as_str(), "c.exe");

    state.set_filter(CategoryFilter::Only(Category::Folder));
    assert!(state.rows.is_empty());

    state.set_filter(CategoryFilter::All);
    assert_eq!(state.rows.len(), 3);
}

#[test]
fn size_header_sorts_largest_first_then_flips() {
    let tmp = make_temp_tree();
    let mut state = scanned_state(&tmp);

    state.toggle_sort(SortColumn::Size);
    let sizes: Vec<u64> = state.rows.iter().map(|r| r.size_bytes).collect();
    assert_eq!(sizes, vec![300, 200, 100]);

    state.toggle_sort(SortColumn::Size);
    let sizes: Vec<u64> = state.rows.iter().map(|r| r.size_bytes).collect();
    assert_eq!(sizes, vec![100, 200, 300]);
}

#[test]
fn filter_change_keeps_last_sort() {
    let tmp = make_temp_tree();
    fs::write(tmp.path().join("z.bin"), vec![0u8; 50]).unwrap();
    let mut state = scanned_state(&tmp);

    state.toggle_sort(SortColumn::Size);
    state.set_filter(CategoryFilter::Only(Category::File));
    let names: Vec<&str> = state.rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["b.bin", "z.bin"]);
}

// ── Selection ─────────────────────────────────────────────────────────────────

#[test]
fn click_ctrl_and_shift_select_rows() {
    let tmp = make_temp_tree();
    let mut state = scanned_state(&tmp);
    state.toggle_sort(SortColumn::Size);

    state.click_row(0, false, false);
    assert_eq!(state.selected_paths().len(), 1);

    // Plain click replaces the selection.
    state.click_row(1, false, false);
    assert_eq!(state.selected_paths(), vec![state.rows[1].path.clone()]);

    // Ctrl-click adds, then removes again.
    state.click_row(2, true, false);
    assert_eq!(state.selected_paths().len(), 2);
    state.click_row(2, true, false);
    assert_eq!(state.selected_paths().len(), 1);

    // Shift-click selects the range from the anchor.
    state.click_row(0, false, false);
    state.click_row(2, false, true);
    assert_eq!(state.selected_paths().len(), 3);
}

#[test]
fn click_outside_rows_is_ignored() {
    let tmp = make_temp_tree();
    let mut state = scanned_state(&tmp);
    state.click_row(99, false, false);
    assert!(state.selection.is_empty());
}

// ── Deletion ──────────────────────────────────────────────────────────────────

#[test]
fn empty_selection_opens_no_dialog() {
    let tmp = make_temp_tree();
    let mut state = scanned_state(&tmp);
    state.request_delete();
    assert!(state.dialog.is_none());
    assert!(!state.is_deleting());
}

#[test]
fn restricted_row_in_selection_blocks_the_batch() {
    let tmp = make_temp_tree();
    let mut state = scanned_state(&tmp);

    // The real probe never flags temp files, so add a system-flagged row.
    let pagefile = tmp.path().join("pagefile.sys");
    fs::write(&pagefile, b"x").unwrap();
    let volume = VolumeInfo::new(tmp.path(), 1_000_000);
    {
        let mut inv = state.inventory.write();
        let generation = inv.generation();
        inv.append_batch(
            generation,
            [InventoryEntry::new(pagefile.clone(), false, 1, true, &volume)],
        );
    }
    state.rebuild_rows();

    state.click_row(row_index(&state, "a.txt"), false, false);
    state.click_row(row_index(&state, "pagefile.sys"), true, false);
    state.request_delete();

    assert_eq!(
        state.dialog,
        Some(Dialog::RestrictedBatch {
            count: 1,
            first: pagefile.clone(),
        })
    );
    assert!(!state.is_deleting());
    assert!(tmp.path().join("a.txt").exists(), "nothing may be deleted");
    assert!(pagefile.exists());
    assert!(state.show_log, "warnings open the log window");
}

#[test]
fn confirmed_delete_removes_files_and_rows() {
    let tmp = make_temp_tree();
    let mut state = scanned_state(&tmp);

    state.click_row(row_index(&state, "a.txt"), false, false);
    state.click_row(row_index(&state, "b.bin"), true, false);
    state.request_delete();
    match &state.dialog {
        Some(Dialog::ConfirmDelete { paths }) => assert_eq!(paths.len(), 2),
        other => panic!("expected delete confirmation, got {other:?}"),
    }

    state.confirm_delete();
    assert!(state.dialog.is_none());
    pump_deletes_until_done(&mut state);

    assert!(!tmp.path().join("a.txt").exists());
    assert!(!tmp.path().join("b.bin").exists());
    assert_eq!(state.rows.len(), 1);
    assert_eq!(state.rows[0].name.as_str(), "c.exe");
    assert!(state.selection.is_empty());
    assert!(state.status.contains("2 deleted"), "status: {}", state.status);
}

#[test]
fn cancelled_dialog_deletes_nothing() {
    let tmp = make_temp_tree();
    let mut state = scanned_state(&tmp);
    state.click_row(0, false, false);
    state.request_delete();
    state.dismiss_dialog();
    state.confirm_delete();

    assert!(!state.is_deleting());
    assert_eq!(state.rows.len(), 3);
}

#[test]
fn locked_file_asks_before_terminating() {
    let tmp = make_temp_tree();
    let locked = tmp.path().join("b.bin");
    let mut state = scanned_state(&tmp);
    state.executor = locked_context(locked.clone());

    state.click_row(row_index(&state, "b.bin"), false, false);
    state.request_delete();
    state.confirm_delete();

    let deadline = Instant::now() + Duration::from_secs(30);
    while state.pending_confirmation.is_none() {
        assert!(Instant::now() < deadline, "no lock confirmation arrived");
        state.process_delete_messages();
        std::thread::sleep(Duration::from_millis(10));
    }
    let pending = state.pending_confirmation.as_ref().unwrap();
    assert_eq!(pending.path, locked);
    assert_eq!(pending.holders[0].name, "editor.exe");

    state.answer_confirmation(true);
    assert!(state.pending_confirmation.is_none());
    pump_deletes_until_done(&mut state);

    assert!(!locked.exists());
    assert_eq!(state.rows.len(), 2);
}

#[test]
fn declined_lock_keeps_row_with_holder() {
    let tmp = make_temp_tree();
    let locked = tmp.path().join("b.bin");
    let mut state = scanned_state(&tmp);
    state.executor = locked_context(locked.clone());

    state.click_row(row_index(&state, "b.bin"), false, false);
    state.request_delete();
    state.confirm_delete();

    let deadline = Instant::now() + Duration::from_secs(30);
    while state.pending_confirmation.is_none() {
        assert!(Instant::now() < deadline, "no lock confirmation arrived");
        state.process_delete_messages();
        std::thread::sleep(Duration::from_millis(10));
    }
    state.answer_confirmation(false);
    pump_deletes_until_done(&mut state);

    assert!(locked.exists());
    let row = &state.rows[row_index(&state, "b.bin")];
    assert_eq!(row.process_display(), "editor.exe(4242)");
    assert!(state
        .messages
        .iter()
        .any(|m| m.level == LogLevel::Warning));
}

#[test]
fn rescan_is_refused_while_deleting() {
    let tmp = make_temp_tree();
    let locked = tmp.path().join("a.txt");
    let mut state = scanned_state(&tmp);
    state.executor = locked_context(locked);

    state.click_row(row_index(&state, "a.txt"), false, false);
    state.request_delete();
    state.confirm_delete();
    assert!(state.is_deleting());

    state.start_scan(tmp.path().to_path_buf());
    assert_eq!(state.phase, AppPhase::Results, "scan must not start");

    // Let the worker finish so the test leaves no thread behind.
    let deadline = Instant::now() + Duration::from_secs(30);
    while state.is_deleting() {
        assert!(Instant::now() < deadline, "deletion did not finish");
        state.process_delete_messages();
        if state.pending_confirmation.is_some() {
            state.answer_confirmation(false);
        }
        std::thread::sleep(Duration::from_millis(10));
    }
}

// ── Export ────────────────────────────────────────────────────────────────────

#[test]
fn export_writes_every_inventory_row() {
    let tmp = make_temp_tree();
    let out = TempDir::new().unwrap();
    let target = out.path().join("inventory.csv");

    let mut state = scanned_state(&tmp);
    state.config.export_path = Some(target.clone());
    state.set_filter(CategoryFilter::Only(Category::Program));
    state.export();

    let text = fs::read_to_string(&target).unwrap();
    assert_eq!(text.lines().count(), 4, "header plus all three entries");
    assert!(text.starts_with("path,name,size_bytes,size_human,percent,type,system,process"));
}

#[test]
fn export_failure_is_logged_not_fatal() {
    let tmp = make_temp_tree();
    let mut state = scanned_state(&tmp);
    state.config.export_path = Some(tmp.path().join("missing").join("out.csv"));
    state.export();

    let last = state.messages.last().unwrap();
    assert_eq!(last.level, LogLevel::Error);
    assert!(last.text.starts_with("Export failed"));
}

// ── Settings and log ──────────────────────────────────────────────────────────

#[test]
fn settings_are_saved_when_a_path_is_set() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    let mut state = AppState::with_config(AppConfig::default(), Some(path.clone()));

    state.toggle_theme();
    state.set_include_folders(true);

    let saved = AppConfig::load_from(&path);
    assert!(!saved.dark_mode);
    assert!(saved.include_folders);
}

#[test]
fn log_sets_status_and_info_keeps_window_closed() {
    let mut state = test_state();
    state.log(LogLevel::Info, "hello");
    assert_eq!(state.status, "hello");
    assert!(!state.show_log);

    state.log(LogLevel::Error, "boom");
    assert!(state.show_log);
    assert_eq!(state.messages.len(), 2);
}
