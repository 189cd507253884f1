//! Onboarding flow integration tests
//!
//! Walks the create and import branches end to end through the store,
//! including the async results the networking collaborator feeds back, and
//! verifies recovery from failure at any step.

use ton_wallet_core::actions::ApiUpdate;
use ton_wallet_core::state::AuthPhase;
use ton_wallet_core::{Action, Effect, Store};

fn mnemonic() -> Vec<String> {
    (0..24).map(|i| format!("word{i}")).collect()
}

#[test]
fn create_wallet_end_to_end() {
    let mut store = Store::new();
    let effects = store.effects();

    let state = store.dispatch(Action::StartCreatingWallet);
    assert_eq!(state.auth.phase, AuthPhase::CreatingWallet);
    assert_eq!(effects.try_recv(), Ok(Effect::GenerateMnemonic));

    let state = store.dispatch(Action::ApiUpdate(ApiUpdate::MnemonicGenerated {
        mnemonic: mnemonic(),
    }));
    assert_eq!(state.auth.phase, AuthPhase::CreatePassword);
    assert_eq!(state.auth.mnemonic.as_ref().unwrap().len(), 24);

    let state = store.dispatch(Action::AfterCreatePassword {
        password: "correct horse".to_string(),
        is_importing: false,
    });
    assert_eq!(state.auth.phase, AuthPhase::CreateBackup);
    match effects.try_recv() {
        Ok(Effect::CreateWallet {
            is_importing,
            mnemonic,
            ..
        }) => {
            assert!(!is_importing);
            assert_eq!(mnemonic.len(), 24);
        }
        other => panic!("expected createWallet effect, got {other:?}"),
    }

    let state = store.dispatch(Action::ApiUpdate(ApiUpdate::WalletCreated {
        address: "EQwallet".to_string(),
    }));
    assert_eq!(state.auth.address.as_deref(), Some("EQwallet"));
    assert!(!state.auth.is_loading);

    let state = store.dispatch(Action::StartCheckMnemonic);
    assert_eq!(state.auth.phase, AuthPhase::CheckMnemonic);
    assert!(state.auth.mnemonic_check_indexes.is_some());

    let state = store.dispatch(Action::AfterCheckMnemonic);
    assert_eq!(state.auth.phase, AuthPhase::Ready);
    assert!(state.auth.mnemonic.is_none());

    let state = store.dispatch(Action::AfterSignIn);
    assert_eq!(state.auth.phase, AuthPhase::Ready);
    assert!(!state.auth.is_loading);
}

#[test]
fn skip_check_also_reaches_ready_and_wipes_the_mnemonic() {
    let mut store = Store::new();
    store.dispatch(Action::StartCreatingWallet);
    store.dispatch(Action::ApiUpdate(ApiUpdate::MnemonicGenerated {
        mnemonic: mnemonic(),
    }));
    store.dispatch(Action::AfterCreatePassword {
        password: "pw".to_string(),
        is_importing: false,
    });
    store.dispatch(Action::StartCheckMnemonic);

    let state = store.dispatch(Action::SkipCheckMnemonic);
    assert_eq!(state.auth.phase, AuthPhase::Ready);
    assert!(state.auth.mnemonic.is_none());
    assert!(state.auth.mnemonic_check_indexes.is_none());
}

#[test]
fn import_wallet_end_to_end() {
    let mut store = Store::new();
    let effects = store.effects();

    let state = store.dispatch(Action::StartImportingWallet);
    assert_eq!(state.auth.phase, AuthPhase::ImportWallet);

    let state = store.dispatch(Action::AfterImportMnemonic {
        mnemonic: mnemonic(),
    });
    assert_eq!(state.auth.phase, AuthPhase::ImportWalletCreatePassword);

    let state = store.dispatch(Action::AfterCreatePassword {
        password: "pw".to_string(),
        is_importing: true,
    });
    assert_eq!(state.auth.phase, AuthPhase::Ready);
    assert!(state.auth.mnemonic.is_none());
    match effects.try_recv() {
        Ok(Effect::CreateWallet { is_importing, .. }) => assert!(is_importing),
        other => panic!("expected createWallet effect, got {other:?}"),
    }
}

#[test]
fn generation_failure_is_recorded_and_flow_can_restart() {
    let mut store = Store::new();
    store.dispatch(Action::StartCreatingWallet);

    let state = store.dispatch(Action::ApiUpdate(ApiUpdate::AuthFailed {
        error: "entropy source unavailable".to_string(),
    }));
    assert_eq!(state.auth.phase, AuthPhase::CreatingWallet);
    assert_eq!(
        state.auth.error.as_deref(),
        Some("entropy source unavailable")
    );
    assert!(!state.auth.is_loading);

    let state = store.dispatch(Action::RestartAuth);
    assert_eq!(state.auth.phase, AuthPhase::None);
    assert!(state.auth.error.is_none());

    // The flow starts over cleanly.
    let state = store.dispatch(Action::StartCreatingWallet);
    assert_eq!(state.auth.phase, AuthPhase::CreatingWallet);
}

#[test]
fn backup_wallet_reveals_mnemonic_and_clears_the_flag() {
    let mut store = Store::new();
    let effects = store.effects();

    let state = store.dispatch(Action::StartBackupWallet {
        password: "pw".to_string(),
    });
    assert!(state.backup_wallet.is_loading);
    assert!(matches!(effects.try_recv(), Ok(Effect::RequestBackup { .. })));

    // Wrong password first.
    let state = store.dispatch(Action::ApiUpdate(ApiUpdate::BackupFailed {
        error: "Wrong password".to_string(),
    }));
    assert_eq!(state.backup_wallet.error.as_deref(), Some("Wrong password"));
    assert!(!state.backup_wallet.is_loading);

    let state = store.dispatch(Action::CleanBackupWalletError);
    assert!(state.backup_wallet.error.is_none());

    // Retry succeeds.
    store.dispatch(Action::StartBackupWallet {
        password: "pw2".to_string(),
    });
    let state = store.dispatch(Action::ApiUpdate(ApiUpdate::BackupMnemonic {
        mnemonic: mnemonic(),
    }));
    assert!(state.backup_wallet.mnemonic.is_some());

    let state = store.dispatch(Action::CloseBackupWallet {
        is_mnemonic_checked: true,
    });
    assert!(state.backup_wallet.mnemonic.is_none());
    assert!(!state.is_backup_required);
}

#[test]
fn sign_out_resets_the_whole_tree() {
    let mut store = Store::new();
    let effects = store.effects();

    store.dispatch(Action::AddSavedAddress {
        address: "EQabc".to_string(),
        name: "Alice".to_string(),
    });
    store.dispatch(Action::ToggleTonProxy { is_enabled: true });

    let state = store.dispatch(Action::SignOut);
    assert!(state.saved_addresses.is_empty());
    assert!(!state.settings.is_ton_proxy_enabled);
    assert_eq!(state.auth.phase, AuthPhase::None);

    // Only the reset effect remains queued.
    let mut queued = Vec::new();
    while let Ok(effect) = effects.try_recv() {
        queued.push(effect);
    }
    assert_eq!(queued, vec![Effect::ResetAccounts]);
}
