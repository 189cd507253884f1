//! Application-state core for a TON wallet front-end
//!
//! A single authoritative state tree ([`state::GlobalState`]) mutated
//! exclusively through a closed vocabulary of actions
//! ([`actions::Action`]). The pure reducer ([`reducer::reduce`]) owns all
//! transition rules, including the embedded state machines for onboarding,
//! asset transfer and message signing; the [`store::Store`] serializes
//! dispatches, publishes committed snapshots to subscribers and hands effect
//! descriptors ([`effects::Effect`]) to the async bridge.
//!
//! The core never touches the network or any cryptography itself. External
//! work is described by effects; outcomes come back through the single
//! `Action::ApiUpdate` channel, which keeps the transition log serialized
//! and replayable.

pub mod actions;
pub mod effects;
pub mod error;
pub mod logging;
pub mod reducer;
pub mod state;
pub mod store;

// Re-export commonly used types
pub use actions::{Action, ApiUpdate};
pub use effects::Effect;
pub use error::TxDraftError;
pub use reducer::reduce;
pub use state::{
    AuthPhase, GlobalState, RequestId, TokenPeriod, TransferPhase,
};
pub use store::Store;
