/// Volume metadata captured at the start of a scan.
use crate::platform;
use std::path::{Path, PathBuf};

/// A scanned volume and its capacity.
///
/// Captured once before the walk starts so that percentages stay stable
/// even if free space changes while the scan runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeInfo {
    /// Root of the volume, e.g. `C:\`.
    pub root: PathBuf,
    /// Total capacity in bytes. Zero when the capacity could not be read.
    pub total_bytes: u64,
}

impl VolumeInfo {
    pub fn new(root: impl Into<PathBuf>, total_bytes: u64) -> Self {
        Self {
            root: root.into(),
            total_bytes,
        }
    }

    /// Query the capacity of the volume holding `root`.
    pub fn probe(root: &Path) -> Self {
        let total_bytes = platform::volume_capacity(root).unwrap_or_else(|| {
            tracing::warn!("Could not read capacity of {}", root.display());
            0
        });
        Self::new(root, total_bytes)
    }

    /// Share of this volume taken by `size_bytes`, in percent.
    ///
    /// Zero when the capacity is unknown. Clamped to 100 so that sparse or
    /// oversized reports never break the `[0, 100]` invariant.
    pub fn percent_of(&self, size_bytes: u64) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        (size_bytes as f64 / self.total_bytes as f64 * 100.0).clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_is_zero_for_unknown_capacity() {
        let vol = VolumeInfo::new("C:\\", 0);
        assert_eq!(vol.percent_of(12_345), 0.0);
    }

    #[test]
    fn percent_is_proportional() {
        let vol = VolumeInfo::new("C:\\", 1_000);
        assert_eq!(vol.percent_of(0), 0.0);
        assert_eq!(vol.percent_of(250), 25.0);
        assert_eq!(vol.percent_of(1_000), 100.0);
    }

    #[test]
    fn percent_never_exceeds_one_hundred() {
        let vol = VolumeInfo::new("C:\\", 10);
        assert_eq!(vol.percent_of(u64::MAX), 100.0);
    }
}
