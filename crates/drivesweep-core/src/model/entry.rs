/// A single row of the drive inventory.
use super::category::{classify_path, Category};
use super::volume::VolumeInfo;
use compact_str::CompactString;
use std::path::{Path, PathBuf};

/// A process found holding a handle to an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockingProcess {
    pub pid: u32,
    pub name: String,
}

impl LockingProcess {
    pub fn new(pid: u32, name: impl Into<String>) -> Self {
        Self {
            pid,
            name: name.into(),
        }
    }
}

impl std::fmt::Display for LockingProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.pid)
    }
}

/// Render a holder list as `name(pid), name(pid)`.
pub fn format_holders(holders: &[LockingProcess]) -> String {
    holders
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// One file or folder discovered by a scan.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryEntry {
    /// Absolute path. Unique within one scan generation.
    pub path: PathBuf,

    /// Base name only.
    pub name: CompactString,

    /// Logical size in bytes. Folders carry the sum of their descendant
    /// files when folder sizing is enabled, zero otherwise.
    pub size_bytes: u64,

    pub category: Category,

    /// `true` if the entry carries the platform "system" attribute.
    /// A single restricted entry blocks a whole deletion batch.
    pub is_restricted: bool,

    /// Share of the volume capacity, 0.0–100.0.
    pub percent_of_volume: f64,

    /// Processes found holding the entry open. Empty until a delete attempt
    /// fails and the lock probe finds someone.
    pub locking_processes: Vec<LockingProcess>,
}

impl InventoryEntry {
    /// Build an entry for a path on `volume`, classifying it by extension.
    pub fn new(
        path: PathBuf,
        is_dir: bool,
        size_bytes: u64,
        is_restricted: bool,
        volume: &VolumeInfo,
    ) -> Self {
        let name = display_name(&path);
        Self {
            category: classify_path(&path, is_dir),
            name,
            size_bytes,
            is_restricted,
            percent_of_volume: volume.percent_of(size_bytes),
            locking_processes: Vec::new(),
            path,
        }
    }

    /// `name(pid), ...` for the Process column, empty when nothing was found.
    pub fn process_display(&self) -> String {
        format_holders(&self.locking_processes)
    }

    pub fn is_dir(&self) -> bool {
        self.category == Category::Folder
    }
}

fn display_name(path: &Path) -> CompactString {
    match path.file_name() {
        Some(name) => CompactString::new(name.to_string_lossy()),
        None => CompactString::new(path.to_string_lossy()),
    }
}
