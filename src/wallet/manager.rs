//! Wallet Manager
//!
//! Lifecycle of the root wallet: create, restore, unlock, lock, export.
//! There is at most one root wallet per data directory; its record is
//! read-only after creation.
//!
//! SECURITY: The seed exists in plaintext only inside `unseal_seed`
//! callers' scopes and is zeroized on drop. Only the password is
//! cached (in the vault) while unlocked.

use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

use zeroize::Zeroizing;

use crate::config::CofferConfig;
use crate::error::{CofferError, CofferResult};
use crate::keystore::SealedBlob;
use crate::logging;
use crate::mnemonic;
use crate::security::PasswordVault;
use crate::storage::FileStorage;
use crate::types::RootWalletRecord;

/// Entropy strength for newly generated wallets (24 words)
const NEW_WALLET_STRENGTH: u32 = 256;

pub struct WalletManager {
    storage: Arc<FileStorage>,
    config: CofferConfig,
    vault: Arc<PasswordVault>,
    root: RwLock<Option<RootWalletRecord>>,
}

impl WalletManager {
    /// Load the root wallet record (if any) and start Locked
    pub fn new(
        storage: Arc<FileStorage>,
        config: CofferConfig,
        vault: Arc<PasswordVault>,
    ) -> CofferResult<Self> {
        let root = storage.load_root_wallet()?;
        Ok(Self {
            storage,
            config,
            vault,
            root: RwLock::new(root),
        })
    }

    /// Generate a fresh mnemonic and create the root wallet.
    ///
    /// The wallet is Locked when this returns; call `unlock` before
    /// deriving. Fails with `WalletAlreadyExists` if a root wallet is
    /// already present.
    pub fn create_new_wallet(&self, password: &str) -> CofferResult<RootWalletRecord> {
        let mnemonic_phrase = Zeroizing::new(mnemonic::generate_mnemonic(NEW_WALLET_STRENGTH)?);
        let record = self.store_new_root(&mnemonic_phrase, password)?;
        logging::info("wallet", "created new root wallet").emit();
        Ok(record)
    }

    /// Create the root wallet from an existing mnemonic
    pub fn restore_from_mnemonic(
        &self,
        mnemonic_phrase: &str,
        password: &str,
    ) -> CofferResult<RootWalletRecord> {
        if !mnemonic::validate_mnemonic(mnemonic_phrase) {
            return Err(CofferError::invalid_mnemonic("invalid mnemonic"));
        }
        let record = self.store_new_root(mnemonic_phrase, password)?;
        logging::info("wallet", "restored root wallet from mnemonic").emit();
        Ok(record)
    }

    /// Decrypt and return the mnemonic. Requires only that the wallet
    /// exists and that `password` opens it; the lock state is untouched.
    pub fn export_mnemonic(&self, password: &str) -> CofferResult<Zeroizing<String>> {
        let record = self.require_root()?;
        let blob = SealedBlob::decode(&record.encrypted_mnemonic)?;
        let plaintext = blob.open(password.as_bytes())?;
        let phrase = String::from_utf8(plaintext.to_vec())
            .map_err(|_| CofferError::corrupt_store("stored mnemonic is not valid UTF-8"))?;
        Ok(Zeroizing::new(phrase))
    }

    /// Verify `password` against the sealed seed and cache it.
    ///
    /// On failure the state is unchanged and the error does not reveal
    /// whether the password was wrong or the record was tampered with.
    pub fn unlock(&self, password: &str) -> CofferResult<()> {
        let record = self.require_root()?;
        let blob = SealedBlob::decode(&record.encrypted_seed)?;
        // Unsealed only to prove the password; dropped (and zeroized)
        // immediately.
        let _seed = blob.open(password.as_bytes())?;

        self.vault.store(password.as_bytes());
        logging::debug("wallet", "unlocked").emit();
        Ok(())
    }

    /// Zeroize the cached password. Idempotent.
    pub fn lock(&self) {
        self.vault.clear();
        logging::debug("wallet", "locked").emit();
    }

    pub fn is_locked(&self) -> bool {
        self.vault.is_locked()
    }

    /// True once a root wallet exists on disk
    pub fn wallet_exists(&self) -> CofferResult<bool> {
        if self.root.read().expect("root lock poisoned").is_some() {
            return Ok(true);
        }
        Ok(self.storage.load_root_wallet()?.is_some())
    }

    /// Decrypt the seed with the cached password (requires Unlocked)
    pub(crate) fn unseal_seed(&self) -> CofferResult<Zeroizing<Vec<u8>>> {
        let password = self
            .vault
            .password()
            .map_err(|_| CofferError::wallet_locked())?;
        let record = self.require_root()?;
        let blob = SealedBlob::decode(&record.encrypted_seed)?;
        blob.open(&password)
    }

    pub(crate) fn vault(&self) -> &PasswordVault {
        &self.vault
    }

    fn require_root(&self) -> CofferResult<RootWalletRecord> {
        if let Some(record) = self.root.read().expect("root lock poisoned").as_ref() {
            return Ok(record.clone());
        }

        // A second process may have created the wallet since we loaded.
        match self.storage.load_root_wallet()? {
            Some(record) => {
                *self.root.write().expect("root lock poisoned") = Some(record.clone());
                Ok(record)
            }
            None => Err(CofferError::wallet_not_found()),
        }
    }

    fn store_new_root(&self, mnemonic_phrase: &str, password: &str) -> CofferResult<RootWalletRecord> {
        if self.wallet_exists()? {
            return Err(CofferError::wallet_already_exists());
        }

        let seed = mnemonic::seed_from_mnemonic(mnemonic_phrase, &self.config.cloak)?;

        let sealed_mnemonic = SealedBlob::seal(
            mnemonic_phrase.trim().as_bytes(),
            password.as_bytes(),
            self.config.kdf,
            self.config.aead,
        )?;
        let sealed_seed = SealedBlob::seal(
            seed.as_ref(),
            password.as_bytes(),
            self.config.kdf,
            self.config.aead,
        )?;

        let record = RootWalletRecord {
            encrypted_mnemonic: sealed_mnemonic.encode_hex(),
            encrypted_seed: sealed_seed.encode_hex(),
            creation_time: unix_now(),
        };

        self.storage.save_root_wallet(&record)?;
        *self.root.write().expect("root lock poisoned") = Some(record.clone());

        // Creation leaves the wallet Locked; the caller unlocks
        // explicitly when it wants to derive.
        self.vault.clear();

        Ok(record)
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
