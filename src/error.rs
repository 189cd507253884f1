//! Error vocabulary for the state core
//!
//! Domain failures never cross the dispatch boundary as panics or results;
//! they are recorded into the relevant sub-state so the rendering layer can
//! display them:
//!
//! - Unregistered actions or mismatched payloads are unrepresentable: the
//!   action set is a closed enum, so that entire error class is rejected at
//!   construction time.
//! - Actions that are valid but not permitted in the current phase are
//!   absorbed as no-ops (logged at debug level).
//! - Failed async operations arrive as `ApiUpdate` failure variants and are
//!   written into the waiting sub-state's `error` field.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons the API layer can reject a transfer draft before submission.
///
/// The `Display` text doubles as the user-facing dialog message pushed by
/// `Action::ShowTxDraftError`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxDraftError {
    #[error("Invalid amount")]
    InvalidAmount,

    #[error("Invalid recipient address")]
    InvalidToAddress,

    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("TON domain could not be resolved")]
    DomainNotResolved,

    #[error("Wallet is not initialized yet")]
    WalletNotInitialized,

    #[error("Unexpected error, please try again")]
    Unexpected,
}
