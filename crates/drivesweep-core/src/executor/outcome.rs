/// Per-path results of a deletion batch.
use crate::model::{format_holders, LockingProcess};
use std::fmt;
use std::path::PathBuf;

/// What happened to one selected path.
#[derive(Debug)]
pub enum DeleteOutcome {
    /// Removed on the first attempt.
    Deleted,
    /// Removed on the retry after the holders were terminated.
    ///
    /// `unterminated` lists holders whose termination failed; the retry
    /// succeeded anyway.
    DeletedAfterTermination {
        terminated: Vec<LockingProcess>,
        unterminated: Vec<LockingProcess>,
    },
    /// Not removed. `holders` is empty when no locking process was found,
    /// otherwise the error is the one from the retry.
    Failed {
        error: std::io::Error,
        holders: Vec<LockingProcess>,
    },
    /// The user chose not to terminate the holders.
    Declined { holders: Vec<LockingProcess> },
}

impl DeleteOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Self::Deleted | Self::DeletedAfterTermination { .. }
        )
    }
}

/// Outcome for one path, as reported to the observer.
#[derive(Debug)]
pub struct DeleteReport {
    pub path: PathBuf,
    pub outcome: DeleteOutcome,
    /// Bytes the inventory attributed to the path (0 if it was unknown).
    pub size_bytes: u64,
}

impl fmt::Display for DeleteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path.display();
        match &self.outcome {
            DeleteOutcome::Deleted => write!(f, "Deleted {path}"),
            DeleteOutcome::DeletedAfterTermination {
                terminated,
                unterminated,
            } => {
                write!(
                    f,
                    "Deleted {path} after terminating {}",
                    format_holders(terminated)
                )?;
                if !unterminated.is_empty() {
                    write!(f, " (could not terminate {})", format_holders(unterminated))?;
                }
                Ok(())
            }
            DeleteOutcome::Failed { error, holders } if holders.is_empty() => {
                write!(f, "Failed to delete {path}: {error}")
            }
            DeleteOutcome::Failed { error, holders } => write!(
                f,
                "Failed to delete {path}: {error} (in use by {})",
                format_holders(holders)
            ),
            DeleteOutcome::Declined { holders } => write!(
                f,
                "Skipped {path}: in use by {}",
                format_holders(holders)
            ),
        }
    }
}

/// Totals for a finished batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub deleted: usize,
    pub failed: usize,
    pub declined: usize,
    /// Sum of the inventory sizes of the deleted paths.
    pub freed_bytes: u64,
}

impl BatchSummary {
    pub(crate) fn record(&mut self, report: &DeleteReport) {
        match report.outcome {
            DeleteOutcome::Deleted | DeleteOutcome::DeletedAfterTermination { .. } => {
                self.deleted += 1;
                self.freed_bytes += report.size_bytes;
            }
            DeleteOutcome::Failed { .. } => self.failed += 1,
            DeleteOutcome::Declined { .. } => self.declined += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.deleted + self.failed + self.declined
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} deleted, {} failed, {} skipped ({} freed)",
            self.deleted,
            self.failed,
            self.declined,
            crate::model::size::format_size(self.freed_bytes)
        )
    }
}
