//! Pure transition engine
//!
//! `reduce` is a pure, total function `(State, Action) -> (State, Effects)`.
//! It never performs I/O; transitions that need external work return effect
//! descriptors which the async bridge executes outside the reducer. Actions
//! that are valid but not permitted in the current phase are absorbed as
//! no-ops and logged at debug level.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::actions::{Action, ApiUpdate};
use crate::effects::Effect;
use crate::error::TxDraftError;
use crate::state::{
    AuthPhase, AuthState, BackupWalletState, GlobalState, Nfts, Notification, SignatureState,
    Transactions, TransferPhase, TransferRequestKind, TransferState, MNEMONIC_CHECK_COUNT,
    MNEMONIC_COUNT,
};

/// Apply one action to the state tree.
///
/// Each call is a single indivisible step: the caller replaces its tree with
/// the returned one and forwards the effects to the async bridge. The same
/// `(state, action)` pair always produces the same output.
pub fn reduce(state: GlobalState, action: Action) -> (GlobalState, Vec<Effect>) {
    let mut state = state;
    let mut effects = Vec::new();

    match action {
        // === Lifecycle ===
        Action::Init => {
            state = GlobalState::default();
        }

        Action::InitApi => {
            effects.push(Effect::InitApi);
        }

        Action::ApiUpdate(update) => {
            apply_api_update(&mut state, update, &mut effects);
        }

        // === Auth flow ===
        Action::RestartAuth => {
            state.auth = AuthState::default();
        }

        Action::StartCreatingWallet => {
            if state.auth.phase == AuthPhase::None {
                state.auth.phase = AuthPhase::CreatingWallet;
                state.auth.is_loading = true;
                state.auth.error = None;
                effects.push(Effect::GenerateMnemonic);
            } else {
                debug!(phase = ?state.auth.phase, "startCreatingWallet ignored");
            }
        }

        Action::AfterCreatePassword {
            password,
            is_importing,
        } => match (is_importing, state.auth.phase, state.auth.mnemonic.clone()) {
            (true, AuthPhase::ImportWalletCreatePassword, Some(mnemonic)) => {
                state.auth.mnemonic = None;
                state.auth.mnemonic_check_indexes = None;
                state.auth.phase = AuthPhase::Ready;
                state.auth.is_loading = true;
                effects.push(Effect::CreateWallet {
                    password,
                    mnemonic,
                    is_importing: true,
                });
            }
            (false, AuthPhase::CreatePassword, Some(mnemonic)) => {
                state.auth.phase = AuthPhase::CreateBackup;
                state.auth.is_loading = true;
                effects.push(Effect::CreateWallet {
                    password,
                    mnemonic,
                    is_importing: false,
                });
            }
            _ => debug!(phase = ?state.auth.phase, "afterCreatePassword ignored"),
        },

        Action::StartCheckMnemonic => {
            if state.auth.phase == AuthPhase::CreateBackup {
                state.auth.phase = AuthPhase::CheckMnemonic;
                if state.auth.mnemonic_check_indexes.is_none() {
                    let seed = state.mint_request_id().0;
                    state.auth.mnemonic_check_indexes = Some(select_check_indexes(seed));
                }
            } else {
                debug!(phase = ?state.auth.phase, "startCheckMnemonic ignored");
            }
        }

        Action::RestartCheckMnemonicIndexes => {
            if state.auth.mnemonic.is_some() {
                let seed = state.mint_request_id().0;
                state.auth.mnemonic_check_indexes = Some(select_check_indexes(seed));
            } else {
                debug!("restartCheckMnemonicIndexes ignored: no mnemonic held");
            }
        }

        Action::AfterCheckMnemonic | Action::SkipCheckMnemonic => {
            if state.auth.phase == AuthPhase::CheckMnemonic {
                state.auth.phase = AuthPhase::Ready;
                state.auth.mnemonic = None;
                state.auth.mnemonic_check_indexes = None;
                state.auth.error = None;
            } else {
                debug!(phase = ?state.auth.phase, "mnemonic check completion ignored");
            }
        }

        Action::StartImportingWallet => {
            if state.auth.phase == AuthPhase::None {
                state.auth.phase = AuthPhase::ImportWallet;
                state.auth.error = None;
            } else {
                debug!(phase = ?state.auth.phase, "startImportingWallet ignored");
            }
        }

        Action::AfterImportMnemonic { mnemonic } => {
            if state.auth.phase == AuthPhase::ImportWallet {
                state.auth.mnemonic = Some(mnemonic);
                state.auth.phase = AuthPhase::ImportWalletCreatePassword;
            } else {
                debug!(phase = ?state.auth.phase, "afterImportMnemonic ignored");
            }
        }

        Action::AfterSignIn => {
            if state.auth.phase == AuthPhase::Ready {
                state.auth.mnemonic = None;
                state.auth.mnemonic_check_indexes = None;
                state.auth.error = None;
                state.auth.is_loading = false;
            } else {
                debug!(phase = ?state.auth.phase, "afterSignIn ignored");
            }
        }

        Action::SignOut => {
            state = GlobalState::default();
            effects.push(Effect::ResetAccounts);
        }

        // === Backup of an existing wallet ===
        Action::StartBackupWallet { password } => {
            state.backup_wallet.is_loading = true;
            state.backup_wallet.error = None;
            effects.push(Effect::RequestBackup { password });
        }

        Action::CleanBackupWalletError => {
            state.backup_wallet.error = None;
        }

        Action::CloseBackupWallet {
            is_mnemonic_checked,
        } => {
            state.backup_wallet = BackupWalletState::default();
            if is_mnemonic_checked {
                state.is_backup_required = false;
            }
        }

        // === Transfer flow ===
        Action::SetTransferScreen { phase } => {
            state.current_transfer.phase = phase;
        }

        Action::StartTransfer {
            token_slug,
            amount,
            to_address,
            comment,
        } => {
            if let Some(request_id) = state.current_transfer.promise_id {
                effects.push(Effect::CancelTransfer { request_id });
            }
            state.current_transfer = TransferState {
                phase: TransferPhase::Initial,
                token_slug: Some(token_slug),
                amount,
                to_address,
                comment,
                ..TransferState::default()
            };
        }

        Action::ChangeTransferToken { token_slug } => {
            let transfer = &mut state.current_transfer;
            transfer.token_slug = Some(token_slug);
            transfer.phase = TransferPhase::Initial;
            // Any quoted fee belonged to the previous token.
            transfer.fee = None;
        }

        Action::FetchFee {
            token_slug,
            amount,
            to_address,
            comment,
        } => {
            if state.current_transfer.phase == TransferPhase::Initial {
                let request_id = state.mint_request_id();
                let transfer = &mut state.current_transfer;
                transfer.promise_id = Some(request_id);
                transfer.promise_kind = Some(TransferRequestKind::Fee);
                transfer.is_loading = true;
                effects.push(Effect::FetchFee {
                    request_id,
                    token_slug,
                    amount,
                    to_address,
                    comment,
                });
            } else {
                debug!(phase = ?state.current_transfer.phase, "fetchFee ignored");
            }
        }

        Action::SubmitTransferInitial {
            token_slug,
            amount,
            to_address,
            comment,
        } => {
            if state.current_transfer.phase == TransferPhase::Initial {
                let request_id = state.mint_request_id();
                let transfer = &mut state.current_transfer;
                transfer.token_slug = Some(token_slug.clone());
                transfer.amount = Some(amount.clone());
                transfer.to_address = Some(to_address.clone());
                transfer.comment = comment.clone();
                transfer.phase = TransferPhase::Confirm;
                transfer.promise_id = Some(request_id);
                transfer.promise_kind = Some(TransferRequestKind::Fee);
                transfer.is_loading = true;
                transfer.error = None;
                effects.push(Effect::FetchFee {
                    request_id,
                    token_slug,
                    amount,
                    to_address,
                    comment,
                });
            } else {
                debug!(phase = ?state.current_transfer.phase, "submitTransferInitial ignored");
            }
        }

        Action::SubmitTransferConfirm => {
            if state.current_transfer.phase == TransferPhase::Confirm {
                state.current_transfer.phase = TransferPhase::Password;
            } else {
                debug!(phase = ?state.current_transfer.phase, "submitTransferConfirm ignored");
            }
        }

        Action::SubmitTransferPassword { password } => {
            if state.current_transfer.phase != TransferPhase::Password {
                debug!(phase = ?state.current_transfer.phase, "submitTransferPassword ignored");
            } else if let (Some(token_slug), Some(amount), Some(to_address)) = (
                state.current_transfer.token_slug.clone(),
                state.current_transfer.amount.clone(),
                state.current_transfer.to_address.clone(),
            ) {
                // Only a dapp correlation id survives into the submission;
                // a fee request still in flight keeps its own id so its late
                // quote cannot consume the submission's slot.
                let request_id = match (
                    state.current_transfer.promise_id,
                    state.current_transfer.promise_kind,
                ) {
                    (Some(id), Some(TransferRequestKind::External)) => id,
                    _ => state.mint_request_id(),
                };
                let transfer = &mut state.current_transfer;
                transfer.promise_id = Some(request_id);
                transfer.promise_kind = Some(TransferRequestKind::Submission);
                transfer.is_loading = true;
                transfer.error = None;
                effects.push(Effect::SubmitTransfer {
                    request_id,
                    password,
                    token_slug,
                    amount,
                    to_address,
                    comment: transfer.comment.clone(),
                });
            } else {
                debug!("submitTransferPassword ignored: transfer draft incomplete");
            }
        }

        Action::CleanTransferError => {
            state.current_transfer.error = None;
        }

        Action::CancelTransfer => {
            if let Some(request_id) = state.current_transfer.promise_id {
                effects.push(Effect::CancelTransfer { request_id });
            }
            state.current_transfer = TransferState::default();
        }

        // === Message signing ===
        Action::SubmitSignature { password } => match state.current_signature.as_mut() {
            Some(signature) if !signature.is_signed => {
                signature.is_loading = true;
                signature.error = None;
                effects.push(Effect::SignData {
                    request_id: signature.promise_id,
                    data_hex: signature.data_hex.clone(),
                    password,
                });
            }
            _ => debug!("submitSignature ignored: no pending signature request"),
        },

        Action::CleanSignatureError => {
            if let Some(signature) = state.current_signature.as_mut() {
                signature.error = None;
            }
        }

        Action::CancelSignature => {
            if let Some(signature) = state.current_signature.take() {
                if !signature.is_signed {
                    effects.push(Effect::CancelSignature {
                        request_id: signature.promise_id,
                    });
                }
            }
        }

        // === Dialogs and notifications ===
        Action::ShowDialog { message } => {
            state.dialogs.push_back(message);
        }

        Action::DismissDialog => {
            state.dialogs.pop_front();
        }

        Action::ShowTxDraftError { error } => {
            let message = error.unwrap_or(TxDraftError::Unexpected).to_string();
            state.dialogs.push_back(message);
        }

        Action::ShowNotification { message, icon } => {
            state.notifications.push_back(Notification { message, icon });
        }

        Action::DismissNotification => {
            state.notifications.pop_front();
        }

        // === History and collectibles ===
        Action::FetchTransactions { limit, offset_id } => {
            let transactions = state.transactions.get_or_insert_with(Transactions::default);
            if transactions.is_loading {
                debug!("fetchTransactions ignored: refresh already in flight");
            } else {
                transactions.is_loading = true;
                effects.push(Effect::FetchTransactions { limit, offset_id });
            }
        }

        Action::FetchNfts => {
            effects.push(Effect::FetchNfts);
        }

        Action::ShowTransactionInfo { tx_id } => {
            state.current_transaction_id = tx_id;
        }

        Action::CloseTransactionInfo => {
            state.current_transaction_id = None;
        }

        // === Selections ===
        Action::SelectToken { slug } => {
            state.current_token_slug = slug;
        }

        Action::SetCurrentTokenPeriod { period } => {
            state.current_token_period = Some(period);
        }

        Action::ChangeLanguage { lang } => {
            state.current_language = Some(lang);
        }

        // === Settings ===
        Action::ToggleTinyTransfersHidden { is_enabled } => {
            state.settings.are_tiny_transfers_hidden = is_enabled;
        }

        Action::ToggleTonProxy { is_enabled } => {
            state.settings.is_ton_proxy_enabled = is_enabled;
        }

        Action::ToggleTonMagic { is_enabled } => {
            state.settings.is_ton_magic_enabled = is_enabled;
        }

        // === Saved addresses ===
        Action::AddSavedAddress { address, name } => {
            state.saved_addresses.insert(address, name);
        }

        Action::RemoveFromSavedAddress { address } => {
            state.saved_addresses.remove(&address);
        }
    }

    (state, effects)
}

/// Demultiplex an async result into the sub-state that is waiting for it.
///
/// Results carrying a `RequestId` are dropped unless the identifier still
/// matches the pending one; cancelled or superseded requests must not
/// mutate state.
fn apply_api_update(state: &mut GlobalState, update: ApiUpdate, effects: &mut Vec<Effect>) {
    match update {
        ApiUpdate::Balance {
            account_id,
            slug,
            balance,
        } => {
            state
                .balances
                .get_or_insert_with(Default::default)
                .entry(account_id)
                .or_default()
                .insert(slug, balance);
        }

        ApiUpdate::Tokens { by_slug } => {
            state
                .token_info
                .get_or_insert_with(Default::default)
                .extend(by_slug);
        }

        ApiUpdate::NewTransactions { transactions } => {
            let history = state.transactions.get_or_insert_with(Transactions::default);
            // Input is newest first; pushing in reverse keeps that order at
            // the front of the existing list.
            for tx in transactions.into_iter().rev() {
                if !history.by_tx_id.contains_key(&tx.tx_id) {
                    history.ordered_tx_ids.insert(0, tx.tx_id.clone());
                }
                history.by_tx_id.insert(tx.tx_id.clone(), tx);
            }
        }

        ApiUpdate::TransactionsChunk { transactions } => {
            let history = state.transactions.get_or_insert_with(Transactions::default);
            history.is_loading = false;
            for tx in transactions {
                if !history.by_tx_id.contains_key(&tx.tx_id) {
                    history.ordered_tx_ids.push(tx.tx_id.clone());
                }
                history.by_tx_id.insert(tx.tx_id.clone(), tx);
            }
        }

        ApiUpdate::Nfts { nfts } => {
            let mut next = Nfts::default();
            for nft in nfts {
                next.ordered_addresses.push(nft.address.clone());
                next.by_address.insert(nft.address.clone(), nft);
            }
            state.nfts = Some(next);
        }

        ApiUpdate::FeeQuote { request_id, fee } => {
            if state
                .current_transfer
                .pending_matches(request_id, TransferRequestKind::Fee)
            {
                let transfer = &mut state.current_transfer;
                transfer.fee = Some(fee);
                transfer.is_loading = false;
                transfer.promise_id = None;
                transfer.promise_kind = None;
            } else {
                debug!(%request_id, "stale fee quote dropped");
            }
        }

        ApiUpdate::FeeFailed { request_id, error } => {
            if state
                .current_transfer
                .pending_matches(request_id, TransferRequestKind::Fee)
            {
                let transfer = &mut state.current_transfer;
                transfer.is_loading = false;
                transfer.promise_id = None;
                transfer.promise_kind = None;
                transfer.error = Some(error.to_string());
                state.dialogs.push_back(error.to_string());
            } else {
                debug!(%request_id, "stale draft error dropped");
            }
        }

        ApiUpdate::TransferSubmitted { request_id, tx_id } => {
            if state
                .current_transfer
                .pending_matches(request_id, TransferRequestKind::Submission)
            {
                let transfer = &mut state.current_transfer;
                transfer.phase = TransferPhase::Complete;
                transfer.tx_id = Some(tx_id);
                transfer.is_loading = false;
                transfer.promise_id = None;
                transfer.promise_kind = None;
                transfer.error = None;
            } else {
                debug!(%request_id, "stale submission result dropped");
            }
        }

        ApiUpdate::TransferFailed { request_id, error } => {
            if state
                .current_transfer
                .pending_matches(request_id, TransferRequestKind::Submission)
            {
                let transfer = &mut state.current_transfer;
                transfer.is_loading = false;
                transfer.promise_id = None;
                transfer.promise_kind = None;
                transfer.error = Some(error);
            } else {
                debug!(%request_id, "stale submission failure dropped");
            }
        }

        ApiUpdate::TransferRequested {
            token_slug,
            to_address,
            amount,
            comment,
            fee,
        } => {
            if let Some(request_id) = state.current_transfer.promise_id {
                // A dapp request supersedes whatever was pending.
                effects.push(Effect::CancelTransfer { request_id });
            }
            let request_id = state.mint_request_id();
            state.current_transfer = TransferState {
                phase: TransferPhase::Confirm,
                token_slug: token_slug.or_else(|| Some("toncoin".to_string())),
                to_address: Some(to_address),
                amount: Some(amount),
                comment,
                fee,
                promise_id: Some(request_id),
                promise_kind: Some(TransferRequestKind::External),
                ..TransferState::default()
            };
        }

        ApiUpdate::SignatureRequested { data_hex } => {
            let request_id = state.mint_request_id();
            state.current_signature = Some(SignatureState {
                promise_id: request_id,
                data_hex,
                is_loading: false,
                is_signed: false,
                error: None,
            });
        }

        ApiUpdate::SignatureSigned { request_id } => {
            match state.current_signature.as_mut() {
                Some(signature) if signature.promise_id == request_id => {
                    signature.is_signed = true;
                    signature.is_loading = false;
                    signature.error = None;
                }
                _ => debug!(%request_id, "stale signature result dropped"),
            }
        }

        ApiUpdate::SignatureFailed { request_id, error } => {
            match state.current_signature.as_mut() {
                Some(signature) if signature.promise_id == request_id => {
                    signature.is_loading = false;
                    signature.error = Some(error);
                }
                _ => debug!(%request_id, "stale signature failure dropped"),
            }
        }

        ApiUpdate::MnemonicGenerated { mnemonic } => {
            if state.auth.phase == AuthPhase::CreatingWallet {
                let seed = state.mint_request_id().0;
                state.auth.mnemonic = Some(mnemonic);
                state.auth.mnemonic_check_indexes = Some(select_check_indexes(seed));
                state.auth.phase = AuthPhase::CreatePassword;
                state.auth.is_loading = false;
            } else {
                debug!(phase = ?state.auth.phase, "mnemonic arrived outside create flow");
            }
        }

        ApiUpdate::WalletCreated { address } => {
            state.auth.address = Some(address);
            state.auth.is_loading = false;
        }

        ApiUpdate::AuthFailed { error } => {
            state.auth.error = Some(error);
            state.auth.is_loading = false;
        }

        ApiUpdate::BackupMnemonic { mnemonic } => {
            state.backup_wallet.mnemonic = Some(mnemonic);
            state.backup_wallet.is_loading = false;
            state.backup_wallet.error = None;
        }

        ApiUpdate::BackupFailed { error } => {
            state.backup_wallet.error = Some(error);
            state.backup_wallet.is_loading = false;
        }
    }
}

/// Pick the word positions the user must re-enter to verify the backup.
///
/// Seeded from the state's request counter so the reducer stays
/// deterministic; each regeneration advances the counter and yields a new
/// sample.
fn select_check_indexes(seed: u64) -> Vec<usize> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut indexes =
        rand::seq::index::sample(&mut rng, MNEMONIC_COUNT, MNEMONIC_CHECK_COUNT).into_vec();
    indexes.sort_unstable();
    indexes
}
