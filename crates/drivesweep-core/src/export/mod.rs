/// CSV export of the inventory.
///
/// One header line, then one row per entry in inventory order. Sizes are
/// written both raw and human-readable; the percentage keeps six decimals
/// so the file can be re-sorted exactly.
use crate::config::AppConfig;
use crate::error::{DriveSweepError, Result};
use crate::model::size::format_size;
use crate::model::{format_holders, InventoryEntry};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name used when no export path is configured.
pub const DEFAULT_EXPORT_FILE: &str = "drivesweep_export.csv";

#[derive(Serialize)]
struct Row<'a> {
    path: std::borrow::Cow<'a, str>,
    name: &'a str,
    size_bytes: u64,
    size_human: String,
    percent: String,
    #[serde(rename = "type")]
    category: &'static str,
    system: &'static str,
    process: String,
}

impl<'a> From<&'a InventoryEntry> for Row<'a> {
    fn from(entry: &'a InventoryEntry) -> Self {
        Self {
            path: entry.path.to_string_lossy(),
            name: &entry.name,
            size_bytes: entry.size_bytes,
            size_human: format_size(entry.size_bytes),
            percent: format!("{:.6}", entry.percent_of_volume),
            category: entry.category.label(),
            system: if entry.is_restricted { "Yes" } else { "No" },
            process: format_holders(&entry.locking_processes),
        }
    }
}

/// Write `entries` as CSV to `writer`. Returns the number of data rows.
pub fn write_csv<W: Write>(writer: W, entries: &[InventoryEntry]) -> Result<usize> {
    let mut csv = csv::Writer::from_writer(writer);
    for entry in entries {
        csv.serialize(Row::from(entry))?;
    }
    if entries.is_empty() {
        // `serialize` writes the header with the first row; an empty
        // inventory still gets one.
        csv.write_record([
            "path",
            "name",
            "size_bytes",
            "size_human",
            "percent",
            "type",
            "system",
            "process",
        ])?;
    }
    csv.flush().map_err(|e| DriveSweepError::io("CSV output", e))?;
    Ok(entries.len())
}

/// Write `entries` to a CSV file at `path`, replacing any existing file.
pub fn export_csv(path: &Path, entries: &[InventoryEntry]) -> Result<usize> {
    let file = std::fs::File::create(path).map_err(|e| DriveSweepError::io(path, e))?;
    let rows = write_csv(std::io::BufWriter::new(file), entries)?;
    info!("Exported {rows} row(s) to {}", path.display());
    Ok(rows)
}

pub fn default_export_file_name() -> &'static str {
    DEFAULT_EXPORT_FILE
}

/// Where an export goes: the configured path, or the default file name in
/// the current directory.
pub fn export_target(config: &AppConfig) -> PathBuf {
    config
        .export_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(default_export_file_name()))
}
