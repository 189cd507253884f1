//! Action registry
//!
//! The closed catalog of everything that can happen to the state tree. One
//! variant per action name; a name outside the catalog or a payload of the
//! wrong shape cannot be constructed, so dispatch never sees an invalid
//! action at runtime.
//!
//! Asynchronous results from the networking/crypto collaborator come back
//! through exactly one action, `Action::ApiUpdate`, carrying a tagged
//! [`ApiUpdate`] payload which the reducer demultiplexes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::TxDraftError;
use crate::state::{Nft, RequestId, TokenInfo, TokenPeriod, Transaction, TransferPhase};

/// A named, typed request to mutate the state tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    // Lifecycle
    Init,
    InitApi,
    ApiUpdate(ApiUpdate),

    // Auth flow
    RestartAuth,
    StartCreatingWallet,
    AfterCreatePassword { password: String, is_importing: bool },
    StartCheckMnemonic,
    RestartCheckMnemonicIndexes,
    AfterCheckMnemonic,
    SkipCheckMnemonic,
    StartImportingWallet,
    AfterImportMnemonic { mnemonic: Vec<String> },
    AfterSignIn,
    SignOut,

    // Backup of an existing wallet
    StartBackupWallet { password: String },
    CleanBackupWalletError,
    CloseBackupWallet { is_mnemonic_checked: bool },

    // Transfer flow
    SetTransferScreen { phase: TransferPhase },
    StartTransfer {
        token_slug: String,
        amount: Option<String>,
        to_address: Option<String>,
        comment: Option<String>,
    },
    ChangeTransferToken { token_slug: String },
    FetchFee {
        token_slug: String,
        amount: String,
        to_address: String,
        comment: Option<String>,
    },
    SubmitTransferInitial {
        token_slug: String,
        amount: String,
        to_address: String,
        comment: Option<String>,
    },
    SubmitTransferConfirm,
    SubmitTransferPassword { password: String },
    CleanTransferError,
    CancelTransfer,

    // Message signing
    SubmitSignature { password: String },
    CleanSignatureError,
    CancelSignature,

    // Dialogs and notifications
    ShowDialog { message: String },
    DismissDialog,
    ShowTxDraftError { error: Option<TxDraftError> },
    ShowNotification { message: String, icon: Option<String> },
    DismissNotification,

    // History and collectibles
    FetchTransactions { limit: usize, offset_id: Option<String> },
    FetchNfts,
    ShowTransactionInfo { tx_id: Option<String> },
    CloseTransactionInfo,

    // Selections
    SelectToken { slug: Option<String> },
    SetCurrentTokenPeriod { period: TokenPeriod },
    ChangeLanguage { lang: String },

    // Settings
    ToggleTinyTransfersHidden { is_enabled: bool },
    ToggleTonProxy { is_enabled: bool },
    ToggleTonMagic { is_enabled: bool },

    // Saved addresses
    AddSavedAddress { address: String, name: String },
    RemoveFromSavedAddress { address: String },
}

impl Action {
    /// The registered name of this action, for logs and transition traces.
    ///
    /// Names are stable and never include payload data, so they are safe to
    /// log even for password-bearing actions.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Init => "init",
            Action::InitApi => "initApi",
            Action::ApiUpdate(_) => "apiUpdate",
            Action::RestartAuth => "restartAuth",
            Action::StartCreatingWallet => "startCreatingWallet",
            Action::AfterCreatePassword { .. } => "afterCreatePassword",
            Action::StartCheckMnemonic => "startCheckMnemonic",
            Action::RestartCheckMnemonicIndexes => "restartCheckMnemonicIndexes",
            Action::AfterCheckMnemonic => "afterCheckMnemonic",
            Action::SkipCheckMnemonic => "skipCheckMnemonic",
            Action::StartImportingWallet => "startImportingWallet",
            Action::AfterImportMnemonic { .. } => "afterImportMnemonic",
            Action::AfterSignIn => "afterSignIn",
            Action::SignOut => "signOut",
            Action::StartBackupWallet { .. } => "startBackupWallet",
            Action::CleanBackupWalletError => "cleanBackupWalletError",
            Action::CloseBackupWallet { .. } => "closeBackupWallet",
            Action::SetTransferScreen { .. } => "setTransferScreen",
            Action::StartTransfer { .. } => "startTransfer",
            Action::ChangeTransferToken { .. } => "changeTransferToken",
            Action::FetchFee { .. } => "fetchFee",
            Action::SubmitTransferInitial { .. } => "submitTransferInitial",
            Action::SubmitTransferConfirm => "submitTransferConfirm",
            Action::SubmitTransferPassword { .. } => "submitTransferPassword",
            Action::CleanTransferError => "cleanTransferError",
            Action::CancelTransfer => "cancelTransfer",
            Action::SubmitSignature { .. } => "submitSignature",
            Action::CleanSignatureError => "cleanSignatureError",
            Action::CancelSignature => "cancelSignature",
            Action::ShowDialog { .. } => "showDialog",
            Action::DismissDialog => "dismissDialog",
            Action::ShowTxDraftError { .. } => "showTxDraftError",
            Action::ShowNotification { .. } => "showNotification",
            Action::DismissNotification => "dismissNotification",
            Action::FetchTransactions { .. } => "fetchTransactions",
            Action::FetchNfts => "fetchNfts",
            Action::ShowTransactionInfo { .. } => "showTransactionInfo",
            Action::CloseTransactionInfo => "closeTransactionInfo",
            Action::SelectToken { .. } => "selectToken",
            Action::SetCurrentTokenPeriod { .. } => "setCurrentTokenPeriod",
            Action::ChangeLanguage { .. } => "changeLanguage",
            Action::ToggleTinyTransfersHidden { .. } => "toggleTinyTransfersHidden",
            Action::ToggleTonProxy { .. } => "toggleTonProxy",
            Action::ToggleTonMagic { .. } => "toggleTonMagic",
            Action::AddSavedAddress { .. } => "addSavedAddress",
            Action::RemoveFromSavedAddress { .. } => "removeFromSavedAddress",
        }
    }
}

/// Tagged results delivered by the networking/crypto collaborator.
///
/// Request/response pairs carry the `RequestId` minted when the request was
/// issued; the reducer drops results whose identifier no longer matches the
/// pending one, so cancelled or superseded requests cannot mutate state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ApiUpdate {
    /// One account's balance for one token changed.
    Balance {
        account_id: String,
        slug: String,
        balance: String,
    },

    /// Token metadata/prices refreshed.
    Tokens { by_slug: HashMap<String, TokenInfo> },

    /// Freshly confirmed transactions pushed by the API (newest first).
    NewTransactions { transactions: Vec<Transaction> },

    /// A requested page of older history (answers `fetchTransactions`).
    TransactionsChunk { transactions: Vec<Transaction> },

    /// Full NFT listing (answers `fetchNfts`).
    Nfts { nfts: Vec<Nft> },

    /// Fee quote for the pending transfer draft.
    FeeQuote { request_id: RequestId, fee: String },

    /// The transfer draft was rejected before submission.
    FeeFailed {
        request_id: RequestId,
        error: TxDraftError,
    },

    /// The signed transfer reached the network.
    TransferSubmitted {
        request_id: RequestId,
        tx_id: String,
    },

    /// Submission or signing of the transfer failed.
    TransferFailed {
        request_id: RequestId,
        error: String,
    },

    /// A dapp asked the wallet to send a prepared transfer.
    TransferRequested {
        token_slug: Option<String>,
        to_address: String,
        amount: String,
        comment: Option<String>,
        fee: Option<String>,
    },

    /// A dapp asked the wallet to sign arbitrary data.
    SignatureRequested { data_hex: String },

    /// The pending signature request was signed.
    SignatureSigned { request_id: RequestId },

    /// The pending signature request failed.
    SignatureFailed {
        request_id: RequestId,
        error: String,
    },

    /// A new mnemonic is ready for the create-wallet flow.
    MnemonicGenerated { mnemonic: Vec<String> },

    /// The wallet keypair was derived and stored.
    WalletCreated { address: String },

    /// Mnemonic generation or wallet creation failed.
    AuthFailed { error: String },

    /// The mnemonic of the existing wallet, re-revealed for backup.
    BackupMnemonic { mnemonic: Vec<String> },

    /// Backup unlock failed (typically a wrong password).
    BackupFailed { error: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_stable_and_payload_free() {
        let action = Action::SubmitTransferPassword {
            password: "hunter2".to_string(),
        };
        assert_eq!(action.name(), "submitTransferPassword");

        let action = Action::AddSavedAddress {
            address: "EQabc".to_string(),
            name: "Alice".to_string(),
        };
        assert_eq!(action.name(), "addSavedAddress");
    }

    #[test]
    fn actions_round_trip_through_serde() {
        let action = Action::ApiUpdate(ApiUpdate::FeeQuote {
            request_id: RequestId(7),
            fee: "0.005".to_string(),
        });
        let json = serde_json::to_string(&action).unwrap();
        let back: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(action, back);
    }
}
