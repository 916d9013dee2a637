//! Periodic background push of the full ledger to the server.
use crate::session::{RemoteStatus, SharedSession, WriteState};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

/// Owns the reconciliation task. Dropping the handle also stops the task.
pub struct ReconcileHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ReconcileHandle {
    /// Stops the task, letting an in-flight sync finish first.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            warn!("Reconciler task ended abnormally: {e}");
        }
    }
}

/// Starts reconciling `session` every `period`; the first run is one period away.
pub fn spawn(session: SharedSession, period: Duration) -> ReconcileHandle {
    let (shutdown, mut stop) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        // Runs are sequential, so a slow sync swallows the ticks it overlaps.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    reconcile_once(&session).await;
                }
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        break;
                    }
                }
            }
        }
        debug!("Reconciler stopped");
    });

    ReconcileHandle { shutdown, task }
}

/// One reconciliation pass. Returns `None` when it was skipped, either because
/// the remote is not reachable or because a user action holds the session.
pub async fn reconcile_once(session: &SharedSession) -> Option<WriteState> {
    let Ok(mut session) = session.try_lock() else {
        debug!("Session busy, deferring reconciliation to next tick");
        return None;
    };
    if session.remote_status() != RemoteStatus::Reachable {
        return None;
    }

    let state = session.sync_remote().await;
    debug!(?state, "Background reconciliation finished");
    Some(state)
}
