//! Effect descriptors
//!
//! The reducer never performs I/O. When a transition requires external work
//! it returns one of these descriptors alongside the new state; the async
//! bridge executes it and reports the outcome back through
//! `Action::ApiUpdate`. This is the only outbound boundary of the core.

use serde::{Deserialize, Serialize};

use crate::state::RequestId;

/// A description of external work requested by a transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Connect the API client and start update streams.
    InitApi,

    /// Generate a fresh mnemonic for the create-wallet flow.
    GenerateMnemonic,

    /// Derive and persist the wallet keypair from the held mnemonic.
    CreateWallet {
        password: String,
        mnemonic: Vec<String>,
        is_importing: bool,
    },

    /// Unlock and return the stored mnemonic for backup display.
    RequestBackup { password: String },

    /// Quote the network fee for a transfer draft.
    FetchFee {
        request_id: RequestId,
        token_slug: String,
        amount: String,
        to_address: String,
        comment: Option<String>,
    },

    /// Sign and submit the confirmed transfer.
    SubmitTransfer {
        request_id: RequestId,
        password: String,
        token_slug: String,
        amount: String,
        to_address: String,
        comment: Option<String>,
    },

    /// Resolve the external transfer promise as rejected.
    CancelTransfer { request_id: RequestId },

    /// Load a page of transaction history.
    FetchTransactions {
        limit: usize,
        offset_id: Option<String>,
    },

    /// Load the NFT listing.
    FetchNfts,

    /// Sign the pending data blob.
    SignData {
        request_id: RequestId,
        data_hex: String,
        password: String,
    },

    /// Resolve the external signature promise as rejected.
    CancelSignature { request_id: RequestId },

    /// Wipe stored accounts on sign-out.
    ResetAccounts,
}

impl Effect {
    /// Stable, payload-free name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Effect::InitApi => "initApi",
            Effect::GenerateMnemonic => "generateMnemonic",
            Effect::CreateWallet { .. } => "createWallet",
            Effect::RequestBackup { .. } => "requestBackup",
            Effect::FetchFee { .. } => "fetchFee",
            Effect::SubmitTransfer { .. } => "submitTransfer",
            Effect::CancelTransfer { .. } => "cancelTransfer",
            Effect::FetchTransactions { .. } => "fetchTransactions",
            Effect::FetchNfts => "fetchNfts",
            Effect::SignData { .. } => "signData",
            Effect::CancelSignature { .. } => "cancelSignature",
            Effect::ResetAccounts => "resetAccounts",
        }
    }
}
