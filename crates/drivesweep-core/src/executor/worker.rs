/// Background deletion worker.
///
/// The worker owns the batch; the UI thread only drains events. When the
/// worker needs a yes/no answer it sends [`DeleteEvent::ConfirmTermination`]
/// with a one-shot reply channel and blocks on it. The UI answers whenever
/// the user clicks, without ever blocking itself.
use super::{delete_with, BatchSummary, DeleteError, DeleteObserver, DeleteReport, ExecutorContext};
use crate::model::{LockingProcess, SharedInventory};
use crossbeam_channel::{Receiver, Sender};
use std::path::{Path, PathBuf};
use std::thread;
use tracing::{error, warn};

/// Worker -> UI messages.
#[derive(Debug)]
pub enum DeleteEvent {
    /// The batch was refused; this is the only event sent.
    Rejected(DeleteError),
    /// Removal of `path` is starting.
    Progress { path: PathBuf },
    /// `path` is held open. Send `true` on `reply` to terminate `holders`
    /// and retry, `false` to skip. Dropping `reply` counts as `false`.
    ConfirmTermination {
        path: PathBuf,
        holders: Vec<LockingProcess>,
        reply: Sender<bool>,
    },
    /// Result for one path.
    Outcome(DeleteReport),
    /// Every path has been handled.
    Finished(BatchSummary),
}

/// Handle to a running deletion batch.
pub struct DeleteHandle {
    pub events: Receiver<DeleteEvent>,
    _thread: Option<thread::JoinHandle<()>>,
}

struct ChannelObserver {
    tx: Sender<DeleteEvent>,
}

impl DeleteObserver for ChannelObserver {
    fn starting(&mut self, path: &Path) {
        let _ = self.tx.send(DeleteEvent::Progress {
            path: path.to_path_buf(),
        });
    }

    fn confirm_termination(&mut self, path: &Path, holders: &[LockingProcess]) -> bool {
        let (reply, answer) = crossbeam_channel::bounded(1);
        let request = DeleteEvent::ConfirmTermination {
            path: path.to_path_buf(),
            holders: holders.to_vec(),
            reply,
        };
        if self.tx.send(request).is_err() {
            warn!("No one to confirm termination for {}; skipping", path.display());
            return false;
        }
        answer.recv().unwrap_or(false)
    }

    fn outcome(&mut self, report: DeleteReport) {
        let _ = self.tx.send(DeleteEvent::Outcome(report));
    }
}

/// Start deleting `paths` on a background thread.
pub fn start_delete(
    inventory: SharedInventory,
    paths: Vec<PathBuf>,
    ctx: ExecutorContext,
) -> DeleteHandle {
    let (tx, events) = crossbeam_channel::unbounded();

    let thread = thread::Builder::new()
        .name("drivesweep-deleter".into())
        .spawn(move || {
            let mut observer = ChannelObserver { tx };
            let event = match delete_with(&inventory, &paths, &ctx, &mut observer) {
                Ok(summary) => DeleteEvent::Finished(summary),
                Err(e) => DeleteEvent::Rejected(e),
            };
            let _ = observer.tx.send(event);
        });

    let thread = match thread {
        Ok(handle) => Some(handle),
        Err(e) => {
            error!("Failed to spawn deletion thread: {e}");
            None
        }
    };

    DeleteHandle {
        events,
        _thread: thread,
    }
}
