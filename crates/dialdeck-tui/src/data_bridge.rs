//! Data bridge — connects the [`Session`]'s change stream to TUI actions.
//!
//! Runs as a background task: pushes initial snapshots, then forwards
//! every applied snapshot from the session as cloned data through the
//! TUI's action channel. Screens never touch the session directly for
//! reads; they only see the snapshots this bridge sends.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use dialdeck_core::Session;

use crate::action::Action;

/// Forward session snapshots into the action loop until cancelled.
pub async fn run_data_bridge(
    session: Session,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut changed = session.subscribe();

    // Push initial snapshots so screens have data immediately
    push_snapshots(&session, &action_tx);

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            result = changed.changed() => {
                if result.is_err() {
                    break;
                }
                push_snapshots(&session, &action_tx);
            }
        }
    }

    debug!("data bridge shut down");
}

fn push_snapshots(session: &Session, action_tx: &mpsc::UnboundedSender<Action>) {
    let _ = action_tx.send(Action::CampaignsUpdated(session.campaigns()));
    if let Some(metrics) = session.metrics() {
        let _ = action_tx.send(Action::MetricsUpdated(metrics));
    }
    let _ = action_tx.send(Action::SelectionUpdated(session.selected()));
    let _ = action_tx.send(Action::CallsUpdated(session.pager()));
}
