//! Serialized dispatch point and subscription fan-out
//!
//! The `Store` is the single logical mutator of the state tree. Dispatch is
//! synchronous and exclusive (`&mut self`), so two dispatches issued in
//! order observe transitions in that order and no subscriber ever sees a
//! half-applied transition.
//!
//! Collaborators connect at two boundaries:
//!
//! - `subscribe()` hands out a broadcast receiver of committed state
//!   snapshots (the rendering layer). Absent or lagging subscribers never
//!   block dispatch.
//! - `effects()` hands out the queue of effect descriptors (the async
//!   bridge). The bridge executes them and reports outcomes back by
//!   dispatching `Action::ApiUpdate`.

use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use tokio::sync::broadcast;
use tracing::debug;

use crate::actions::Action;
use crate::effects::Effect;
use crate::reducer::reduce;
use crate::state::GlobalState;

/// Snapshots buffered per subscriber before the slowest one starts lagging.
const SNAPSHOT_BUFFER: usize = 64;

/// Owns the current state tree and serializes all transitions through it.
pub struct Store {
    state: Arc<GlobalState>,
    snapshot_tx: broadcast::Sender<Arc<GlobalState>>,
    effect_tx: Sender<Effect>,
    effect_rx: Receiver<Effect>,
}

impl Store {
    /// Create a store holding the initial state tree.
    pub fn new() -> Self {
        Self::with_state(GlobalState::new())
    }

    /// Create a store from a pre-built tree (restored session, tests).
    pub fn with_state(state: GlobalState) -> Self {
        let (snapshot_tx, _) = broadcast::channel(SNAPSHOT_BUFFER);
        let (effect_tx, effect_rx) = unbounded();
        Self {
            state: Arc::new(state),
            snapshot_tx,
            effect_tx,
            effect_rx,
        }
    }

    /// The current committed snapshot.
    pub fn state(&self) -> Arc<GlobalState> {
        Arc::clone(&self.state)
    }

    /// Subscribe to committed state snapshots.
    ///
    /// Every `dispatch` publishes exactly one snapshot, in dispatch order.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<GlobalState>> {
        self.snapshot_tx.subscribe()
    }

    /// The outbound effect queue for the async bridge.
    pub fn effects(&self) -> Receiver<Effect> {
        self.effect_rx.clone()
    }

    /// Apply one action: reduce, commit the new tree, queue effects and
    /// publish the snapshot. Returns the committed snapshot.
    pub fn dispatch(&mut self, action: Action) -> Arc<GlobalState> {
        debug!(action = action.name(), "dispatch");

        let (next, effects) = reduce((*self.state).clone(), action);
        self.state = Arc::new(next);

        for effect in effects {
            debug!(effect = effect.name(), "effect queued");
            // The store keeps its own receiver, so the channel cannot close.
            let _ = self.effect_tx.send(effect);
        }

        // Err only means there are no subscribers right now.
        let _ = self.snapshot_tx.send(Arc::clone(&self.state));

        Arc::clone(&self.state)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{AuthPhase, TransferPhase};

    #[test]
    fn dispatch_replaces_the_tree_and_returns_the_snapshot() {
        let mut store = Store::new();
        let before = store.state();

        let after = store.dispatch(Action::StartCreatingWallet);

        assert_eq!(before.auth.phase, AuthPhase::None);
        assert_eq!(after.auth.phase, AuthPhase::CreatingWallet);
        assert_eq!(store.state().auth.phase, AuthPhase::CreatingWallet);
    }

    #[test]
    fn effects_reach_the_bridge_in_dispatch_order() {
        let mut store = Store::new();
        let effects = store.effects();

        store.dispatch(Action::InitApi);
        store.dispatch(Action::FetchNfts);

        assert_eq!(effects.try_recv(), Ok(Effect::InitApi));
        assert_eq!(effects.try_recv(), Ok(Effect::FetchNfts));
        assert!(effects.try_recv().is_err());
    }

    #[test]
    fn subscribers_see_every_committed_snapshot_in_order() {
        let mut store = Store::new();
        let mut snapshots = store.subscribe();

        store.dispatch(Action::ShowDialog {
            message: "first".to_string(),
        });
        store.dispatch(Action::ShowDialog {
            message: "second".to_string(),
        });

        let first = snapshots.try_recv().unwrap();
        let second = snapshots.try_recv().unwrap();
        assert_eq!(first.dialogs.len(), 1);
        assert_eq!(second.dialogs.len(), 2);
        assert!(snapshots.try_recv().is_err());
    }

    #[test]
    fn dispatch_without_subscribers_is_fine() {
        let mut store = Store::new();
        let state = store.dispatch(Action::ShowNotification {
            message: "sent".to_string(),
            icon: None,
        });
        assert_eq!(state.notifications.len(), 1);
    }

    #[tokio::test]
    async fn snapshots_can_be_awaited_from_async_subscribers() {
        let mut store = Store::new();
        let mut snapshots = store.subscribe();

        store.dispatch(Action::SubmitTransferConfirm); // illegal, still publishes

        let snapshot = snapshots.recv().await.unwrap();
        assert_eq!(snapshot.current_transfer.phase, TransferPhase::None);
    }

    #[test]
    fn restored_sessions_start_from_the_given_tree() {
        let mut initial = GlobalState::new();
        initial.settings.are_tiny_transfers_hidden = true;

        let store = Store::with_state(initial);
        assert!(store.state().settings.are_tiny_transfers_hidden);
    }
}
