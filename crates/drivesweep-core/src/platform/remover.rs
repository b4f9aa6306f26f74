/// Filesystem removal behind a trait so the executor's retry logic can be
/// driven by a simulated lock in tests.
use std::path::Path;

pub trait Remover: Send + Sync {
    /// Remove `path`: recursively for directories, directly for files.
    fn remove(&self, path: &Path) -> std::io::Result<()>;
}

/// Removes entries from the real filesystem.
///
/// The kind is read with `symlink_metadata`, so a symlink to a directory is
/// unlinked rather than followed.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsRemover;

impl Remover for FsRemover {
    fn remove(&self, path: &Path) -> std::io::Result<()> {
        let meta = std::fs::symlink_metadata(path)?;
        if meta.is_dir() {
            std::fs::remove_dir_all(path)
        } else {
            std::fs::remove_file(path)
        }
    }
}
