//! Data bridge — connects `stowage_core` streams to TUI actions.
//!
//! Runs as a background task: subscribes to the store's entity streams,
//! the load-state channel, and (when a scanner is configured) the scan
//! event channel, forwarding every change as an [`Action`] through the
//! TUI's action channel.

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use stowage_core::{Inventory, ScanEvent, ScannerState};

use crate::action::Action;

/// Forward store and scanner changes to the TUI until cancelled.
pub async fn run_data_bridge(
    inventory: Inventory,
    scan_events: Option<mpsc::UnboundedReceiver<ScanEvent>>,
    scan_state: Option<watch::Receiver<ScannerState>>,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut packages = inventory.store().packages();
    let mut users = inventory.store().users();
    let mut load_state = inventory.load_state();

    // With no scanner configured these channels simply never fire; the
    // senders are parked here so the receivers stay open.
    let (_parked_events_tx, parked_events_rx) = mpsc::unbounded_channel();
    let mut scan_events = scan_events.unwrap_or(parked_events_rx);
    let (_parked_state_tx, parked_state_rx) = watch::channel(ScannerState::Idle);
    let mut scan_state = scan_state.unwrap_or(parked_state_rx);

    // Push initial snapshots so screens have data immediately
    let _ = action_tx.send(Action::PackagesUpdated(packages.current().clone()));
    let _ = action_tx.send(Action::UsersUpdated(users.current().clone()));
    let _ = action_tx.send(Action::LoadStateChanged(
        load_state.borrow_and_update().clone(),
    ));

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Some(snapshot) = packages.changed() => {
                let _ = action_tx.send(Action::PackagesUpdated(snapshot));
            }
            Some(snapshot) = users.changed() => {
                let _ = action_tx.send(Action::UsersUpdated(snapshot));
            }
            Ok(()) = load_state.changed() => {
                let state = load_state.borrow_and_update().clone();
                let _ = action_tx.send(Action::LoadStateChanged(state));
            }
            Some(event) = scan_events.recv() => {
                let action = match event {
                    ScanEvent::Decoded(text) => Action::ScanDecoded(text),
                    ScanEvent::Failed(message) => Action::ScanFailed(message),
                };
                let _ = action_tx.send(action);
            }
            Ok(()) = scan_state.changed() => {
                let state = *scan_state.borrow_and_update();
                let _ = action_tx.send(Action::ScanStateChanged(state));
            }
        }
    }

    debug!("data bridge shut down");
}
