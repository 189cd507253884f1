//! Wallet state tree
//!
//! Single source of truth for the application. The tree is never mutated in
//! place by callers; every change goes through the reducer (see `reducer.rs`)
//! which consumes the current tree and returns a replacement.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of words in a wallet mnemonic.
pub const MNEMONIC_COUNT: usize = 24;

/// Number of words the user must re-enter during backup verification.
pub const MNEMONIC_CHECK_COUNT: usize = 3;

/// Correlation token linking an in-flight async request to its eventual
/// result delivered through `ApiUpdate`.
///
/// Identifiers are minted by the reducer from a monotonic counter stored in
/// the state tree, so transitions stay deterministic and replayable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// Phases of the onboarding (authentication) flow.
///
/// The create branch runs None -> CreatingWallet -> CreatePassword ->
/// CreateBackup -> CheckMnemonic -> Ready; the import branch runs
/// None -> ImportWallet -> ImportWalletCreatePassword -> Ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthPhase {
    None,
    CreatingWallet,
    CreatePassword,
    CreateBackup,
    CheckMnemonic,
    ImportWallet,
    ImportWalletCreatePassword,
    Ready,
}

/// Phases of the asset-transfer flow, strictly ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferPhase {
    None,
    Initial,
    Confirm,
    Password,
    Complete,
}

/// Price-history window for the token chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenPeriod {
    #[serde(rename = "24h")]
    Hours24,
    #[serde(rename = "7d")]
    Days7,
    #[serde(rename = "30d")]
    Days30,
}

/// Animation preference: 0 = none, 1 = reduced, 2 = full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationLevel {
    None,
    Reduced,
    Full,
}

/// Onboarding sub-state.
///
/// `mnemonic` is transient: it is only held while the user still needs to see
/// or verify it, and is wiped when the flow reaches `Ready` or restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthState {
    pub phase: AuthPhase,
    pub is_loading: bool,
    pub mnemonic: Option<Vec<String>>,
    pub mnemonic_check_indexes: Option<Vec<usize>>,
    pub address: Option<String>,
    pub error: Option<String>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            phase: AuthPhase::None,
            is_loading: false,
            mnemonic: None,
            mnemonic_check_indexes: None,
            address: None,
            error: None,
        }
    }
}

/// What the pending transfer `promise_id` correlates.
///
/// A fee quote and a submission can overlap (the user may confirm and enter
/// the password before the quote arrives), so results must match on kind as
/// well as identifier; otherwise a consumed fee quote could strand the
/// submission result as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferRequestKind {
    /// A fee quote requested while editing or confirming the draft.
    Fee,
    /// The signed transfer handed to the network.
    Submission,
    /// A dapp-initiated transfer whose promise lives outside the core.
    External,
}

/// Asset-transfer sub-state.
///
/// `promise_id` identifies the in-flight fee or submission request and
/// `promise_kind` says which of the two it is; a result arriving for any
/// other identifier or kind is stale and must be dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferState {
    pub phase: TransferPhase,
    pub is_loading: bool,
    pub token_slug: Option<String>,
    pub to_address: Option<String>,
    pub amount: Option<String>,
    pub fee: Option<String>,
    pub comment: Option<String>,
    pub promise_id: Option<RequestId>,
    pub promise_kind: Option<TransferRequestKind>,
    pub tx_id: Option<String>,
    pub error: Option<String>,
}

impl Default for TransferState {
    fn default() -> Self {
        Self {
            phase: TransferPhase::None,
            is_loading: false,
            token_slug: None,
            to_address: None,
            amount: None,
            fee: None,
            comment: None,
            promise_id: None,
            promise_kind: None,
            tx_id: None,
            error: None,
        }
    }
}

impl TransferState {
    /// True when an async result answers the request that is still pending.
    pub fn pending_matches(&self, id: RequestId, kind: TransferRequestKind) -> bool {
        self.promise_id == Some(id) && self.promise_kind == Some(kind)
    }
}

/// One-shot message-signing sub-state, created when a signing request
/// arrives and dropped when it completes or is cancelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureState {
    pub promise_id: RequestId,
    pub data_hex: String,
    pub is_loading: bool,
    pub is_signed: bool,
    pub error: Option<String>,
}

/// Backup-wallet sub-state: re-reveals the mnemonic of an existing wallet
/// after password confirmation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BackupWalletState {
    pub is_loading: bool,
    pub mnemonic: Option<Vec<String>>,
    pub error: Option<String>,
}

/// Token metadata and price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    pub price: f64,
    pub change_24h: f64,
    pub change_7d: f64,
    pub change_30d: f64,
    /// `(timestamp, price)` points, oldest first.
    pub history_24h: Option<Vec<(i64, f64)>>,
    pub history_7d: Option<Vec<(i64, f64)>>,
    pub history_30d: Option<Vec<(i64, f64)>>,
}

/// A confirmed on-chain transaction as reported by the API layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub tx_id: String,
    pub timestamp: i64,
    /// Decimal-string amount, positive.
    pub amount: String,
    pub fee: Option<String>,
    pub comment: Option<String>,
    pub is_incoming: bool,
    pub from_address: Option<String>,
    pub to_address: Option<String>,
    pub slug: Option<String>,
}

/// Transaction history: an ordering plus a by-id map, with a loading flag
/// guarding concurrent refresh.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Transactions {
    pub is_loading: bool,
    pub by_tx_id: HashMap<String, Transaction>,
    pub ordered_tx_ids: Vec<String>,
}

/// An NFT owned by the wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nft {
    pub address: String,
    pub name: Option<String>,
    pub collection_name: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// NFT collection: ordering plus a by-address map.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Nfts {
    pub by_address: HashMap<String, Nft>,
    pub ordered_addresses: Vec<String>,
}

/// A toast message queued for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub icon: Option<String>,
}

/// User preferences. Always present, with explicit defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub animation_level: AnimationLevel,
    pub are_tiny_transfers_hidden: bool,
    pub is_ton_proxy_enabled: bool,
    pub is_ton_magic_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            animation_level: AnimationLevel::Full,
            are_tiny_transfers_hidden: false,
            is_ton_proxy_enabled: false,
            is_ton_magic_enabled: false,
        }
    }
}

/// Root application state.
///
/// Exactly one tree exists at any instant; the reducer replaces it wholesale
/// on every transition. `auth`, `current_transfer`, `settings`, `dialogs`,
/// `notifications` and `backup_wallet` are always present; the remaining
/// branches start out absent and are created by the first update that
/// touches them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalState {
    pub auth: AuthState,
    pub current_transfer: TransferState,
    pub current_signature: Option<SignatureState>,

    /// Account id -> token slug -> decimal-string balance.
    pub balances: Option<HashMap<String, HashMap<String, String>>>,
    /// Token slug -> metadata.
    pub token_info: Option<HashMap<String, TokenInfo>>,
    pub transactions: Option<Transactions>,
    pub nfts: Option<Nfts>,

    pub backup_wallet: BackupWalletState,
    pub is_backup_required: bool,

    /// Modal dialog queue; the head is the visible dialog.
    pub dialogs: VecDeque<String>,
    /// FIFO toast queue.
    pub notifications: VecDeque<Notification>,

    pub settings: Settings,
    /// Address -> display name. Append/remove only.
    pub saved_addresses: HashMap<String, String>,

    pub current_token_slug: Option<String>,
    pub current_transaction_id: Option<String>,
    pub current_token_period: Option<TokenPeriod>,
    pub current_language: Option<String>,

    /// Monotonic source for `RequestId`s, advanced by the reducer.
    pub(crate) next_request_id: u64,
}

impl Default for GlobalState {
    fn default() -> Self {
        Self {
            auth: AuthState::default(),
            current_transfer: TransferState::default(),
            current_signature: None,
            balances: None,
            token_info: None,
            transactions: None,
            nfts: None,
            backup_wallet: BackupWalletState::default(),
            is_backup_required: false,
            dialogs: VecDeque::new(),
            notifications: VecDeque::new(),
            settings: Settings::default(),
            saved_addresses: HashMap::new(),
            current_token_slug: None,
            current_transaction_id: None,
            current_token_period: None,
            current_language: None,
            next_request_id: 0,
        }
    }
}

impl GlobalState {
    /// Create the initial tree with defaults for all non-optional fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint the next correlation token.
    pub(crate) fn mint_request_id(&mut self) -> RequestId {
        self.next_request_id += 1;
        RequestId(self.next_request_id)
    }

    /// Balance for one account and token, if known.
    pub fn balance(&self, account_id: &str, slug: &str) -> Option<&str> {
        self.balances
            .as_ref()?
            .get(account_id)?
            .get(slug)
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_tree_has_explicit_defaults() {
        let state = GlobalState::new();

        assert_eq!(state.auth.phase, AuthPhase::None);
        assert_eq!(state.current_transfer.phase, TransferPhase::None);
        assert!(state.current_signature.is_none());
        assert!(state.dialogs.is_empty());
        assert!(state.notifications.is_empty());
        assert_eq!(state.settings.animation_level, AnimationLevel::Full);
        assert!(!state.settings.are_tiny_transfers_hidden);
        assert!(state.saved_addresses.is_empty());
    }

    #[test]
    fn request_ids_are_monotonic() {
        let mut state = GlobalState::new();
        let a = state.mint_request_id();
        let b = state.mint_request_id();
        assert!(b.0 > a.0);
        assert_eq!(a.to_string(), "req-1");
    }

    #[test]
    fn balance_lookup_handles_missing_branches() {
        let mut state = GlobalState::new();
        assert_eq!(state.balance("acc", "toncoin"), None);

        let mut by_slug = HashMap::new();
        by_slug.insert("toncoin".to_string(), "12.5".to_string());
        let mut by_account = HashMap::new();
        by_account.insert("acc".to_string(), by_slug);
        state.balances = Some(by_account);

        assert_eq!(state.balance("acc", "toncoin"), Some("12.5"));
        assert_eq!(state.balance("acc", "other"), None);
    }

    #[test]
    fn state_round_trips_through_serde() {
        let state = GlobalState::new();
        let json = serde_json::to_string(&state).unwrap();
        let back: GlobalState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, back);
    }
}
