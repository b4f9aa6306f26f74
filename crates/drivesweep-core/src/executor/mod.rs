/// Deletion executor: removes selected inventory entries from disk.
///
/// A batch is all-or-nothing at the policy level: if any selected entry is
/// restricted the whole batch is rejected before anything is touched.
/// Otherwise paths are removed one at a time. A failed removal asks the lock
/// probe who holds the path; if anyone does, the caller is asked whether to
/// terminate them, and after termination the removal is retried exactly once.
///
/// [`delete_paths`] is the synchronous core. [`start_delete`] runs it on a
/// background thread and turns every step into a [`DeleteEvent`].
pub mod outcome;
pub mod worker;

pub use outcome::{BatchSummary, DeleteOutcome, DeleteReport};
pub use worker::{start_delete, DeleteEvent, DeleteHandle};

use crate::model::{LockingProcess, SharedInventory};
use crate::platform::{
    FsRemover, LockProbe, ProcessTerminator, Remover, SystemTerminator,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Successful removals collected before the inventory is pruned in one pass.
const PRUNE_BATCH: usize = 256;

/// Batch-level refusals. Reported once; nothing on disk changes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeleteError {
    #[error(
        "{count} selected item(s) carry the system attribute (first: {}); nothing was deleted",
        first.display()
    )]
    RestrictedInBatch { count: usize, first: PathBuf },

    #[error("nothing is selected")]
    EmptySelection,
}

/// OS capabilities used by the executor.
#[derive(Clone)]
pub struct ExecutorContext {
    pub remover: Arc<dyn Remover>,
    pub lock_probe: Arc<dyn LockProbe>,
    pub terminator: Arc<dyn ProcessTerminator>,
}

impl ExecutorContext {
    /// The real filesystem, the platform lock probe and real termination.
    pub fn system() -> Self {
        Self {
            remover: Arc::new(FsRemover),
            lock_probe: Arc::from(crate::platform::system_lock_probe()),
            terminator: Arc::new(SystemTerminator),
        }
    }
}

impl std::fmt::Debug for ExecutorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutorContext").finish_non_exhaustive()
    }
}

/// Receives the steps of a running batch.
pub trait DeleteObserver {
    /// About to remove `path`.
    fn starting(&mut self, _path: &Path) {}

    /// `path` is held open by `holders`. Return `true` to terminate them
    /// and retry.
    fn confirm_termination(&mut self, path: &Path, holders: &[LockingProcess]) -> bool;

    /// Final result for one path, reported as soon as it is known.
    fn outcome(&mut self, report: DeleteReport);
}

/// Reject the batch if any selected path is restricted in the inventory.
pub fn check_batch(inventory: &SharedInventory, paths: &[PathBuf]) -> Result<(), DeleteError> {
    if paths.is_empty() {
        return Err(DeleteError::EmptySelection);
    }

    let inv = inventory.read();
    let mut restricted = paths
        .iter()
        .filter(|p| inv.get(p).is_some_and(|e| e.is_restricted));

    match restricted.next() {
        None => Ok(()),
        Some(first) => Err(DeleteError::RestrictedInBatch {
            count: 1 + restricted.count(),
            first: first.clone(),
        }),
    }
}

/// Delete `paths` with closures for the two callbacks.
///
/// `confirm` decides whether to terminate lock holders; `on_outcome` sees
/// every per-path result immediately. See [`delete_with`].
pub fn delete_paths<C, O>(
    inventory: &SharedInventory,
    paths: &[PathBuf],
    ctx: &ExecutorContext,
    confirm: C,
    on_outcome: O,
) -> Result<BatchSummary, DeleteError>
where
    C: FnMut(&Path, &[LockingProcess]) -> bool,
    O: FnMut(DeleteReport),
{
    struct Callbacks<C, O> {
        confirm: C,
        on_outcome: O,
    }

    impl<C, O> DeleteObserver for Callbacks<C, O>
    where
        C: FnMut(&Path, &[LockingProcess]) -> bool,
        O: FnMut(DeleteReport),
    {
        fn confirm_termination(&mut self, path: &Path, holders: &[LockingProcess]) -> bool {
            (self.confirm)(path, holders)
        }

        fn outcome(&mut self, report: DeleteReport) {
            (self.on_outcome)(report)
        }
    }

    delete_with(
        inventory,
        paths,
        ctx,
        &mut Callbacks {
            confirm,
            on_outcome,
        },
    )
}

/// Run a deletion batch, reporting each step to `observer`.
///
/// Returns `Err` only for batch-level refusals, in which case the observer
/// was never called and nothing was removed.
pub fn delete_with(
    inventory: &SharedInventory,
    paths: &[PathBuf],
    ctx: &ExecutorContext,
    observer: &mut dyn DeleteObserver,
) -> Result<BatchSummary, DeleteError> {
    if let Err(e) = check_batch(inventory, paths) {
        warn!("Deletion batch rejected: {e}");
        return Err(e);
    }

    info!("Deleting {} item(s)", paths.len());
    let mut summary = BatchSummary::default();
    let mut removed = Vec::new();

    for path in paths {
        observer.starting(path);
        let size_bytes = inventory.read().get(path).map_or(0, |e| e.size_bytes);
        let outcome = delete_one(inventory, path, ctx, observer);
        if outcome.is_success() {
            removed.push(path.clone());
            if removed.len() >= PRUNE_BATCH {
                inventory.write().remove_subtrees(&removed);
                removed.clear();
            }
        }
        let report = DeleteReport {
            path: path.clone(),
            outcome,
            size_bytes,
        };
        info!("{report}");
        summary.record(&report);
        observer.outcome(report);
    }
    inventory.write().remove_subtrees(&removed);

    info!("Deletion batch finished: {summary}");
    Ok(summary)
}

/// Removal through `ctx`, where a path that is already gone counts as
/// removed.
fn remove_path(ctx: &ExecutorContext, path: &Path) -> io::Result<()> {
    match ctx.remover.remove(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("{} was already gone", path.display());
            Ok(())
        }
        result => result,
    }
}

/// Delete one path. Does not touch the inventory on success; the caller
/// prunes removed paths in batches.
fn delete_one(
    inventory: &SharedInventory,
    path: &Path,
    ctx: &ExecutorContext,
    observer: &mut dyn DeleteObserver,
) -> DeleteOutcome {
    let error = match remove_path(ctx, path) {
        Ok(()) => return DeleteOutcome::Deleted,
        Err(e) => e,
    };

    let holders = ctx.lock_probe.holders(path);
    if holders.is_empty() {
        return DeleteOutcome::Failed {
            error,
            holders,
        };
    }

    inventory.write().set_locking_processes(path, holders.clone());

    if !observer.confirm_termination(path, &holders) {
        return DeleteOutcome::Declined { holders };
    }

    let mut terminated = Vec::with_capacity(holders.len());
    let mut unterminated = Vec::new();
    for holder in &holders {
        match ctx.terminator.terminate(holder.pid) {
            Ok(()) => {
                info!("Terminated {holder} holding {}", path.display());
                terminated.push(holder.clone());
            }
            Err(e) => {
                warn!("Could not terminate {holder}: {e}");
                unterminated.push(holder.clone());
            }
        }
    }

    match remove_path(ctx, path) {
        Ok(()) => DeleteOutcome::DeletedAfterTermination {
            terminated,
            unterminated,
        },
        Err(error) => DeleteOutcome::Failed { error, holders },
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    //! Scriptable stand-ins for the OS capabilities.
    use crate::model::LockingProcess;
    use crate::platform::{LockProbe, ProcessTerminator, Remover};
    use parking_lot::Mutex;
    use std::collections::{HashMap, HashSet};
    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    /// Shared fake OS: a set of locked paths with their holders.
    ///
    /// Removal goes to the real filesystem unless the path is locked by a
    /// process that has not been terminated yet.
    #[derive(Default)]
    pub struct FakeOs {
        locks: Mutex<HashMap<PathBuf, Vec<LockingProcess>>>,
        /// Pids that refuse to die.
        immortal: Mutex<HashSet<u32>>,
        /// Paths that fail to delete with nobody holding them.
        broken: Mutex<HashSet<PathBuf>>,
        pub remove_calls: Mutex<Vec<PathBuf>>,
        pub terminated: Mutex<Vec<u32>>,
    }

    impl FakeOs {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn lock(&self, path: &Path, holder: LockingProcess) {
            self.locks
                .lock()
                .entry(path.to_path_buf())
                .or_default()
                .push(holder);
        }

        pub fn make_immortal(&self, pid: u32) {
            self.immortal.lock().insert(pid);
        }

        pub fn break_path(&self, path: &Path) {
            self.broken.lock().insert(path.to_path_buf());
        }

        pub fn remove_count(&self, path: &Path) -> usize {
            self.remove_calls.lock().iter().filter(|p| *p == path).count()
        }

        pub fn context(self: &Arc<Self>) -> super::ExecutorContext {
            super::ExecutorContext {
                remover: self.clone(),
                lock_probe: self.clone(),
                terminator: self.clone(),
            }
        }
    }

    impl Remover for FakeOs {
        fn remove(&self, path: &Path) -> io::Result<()> {
            self.remove_calls.lock().push(path.to_path_buf());
            if self.broken.lock().contains(path) {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "access denied"));
            }
            if self.locks.lock().get(path).is_some_and(|h| !h.is_empty()) {
                return Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "file is in use",
                ));
            }
            crate::platform::FsRemover.remove(path)
        }
    }

    impl LockProbe for FakeOs {
        fn holders(&self, path: &Path) -> Vec<LockingProcess> {
            self.locks.lock().get(path).cloned().unwrap_or_default()
        }
    }

    impl ProcessTerminator for FakeOs {
        fn terminate(&self, pid: u32) -> io::Result<()> {
            if self.immortal.lock().contains(&pid) {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "access denied"));
            }
            self.terminated.lock().push(pid);
            for holders in self.locks.lock().values_mut() {
                holders.retain(|h| h.pid != pid);
            }
            Ok(())
        }
    }
}
