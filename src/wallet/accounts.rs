//! Account and Address Catalog
//!
//! Derivation anchors and leaf addresses on top of the root wallet.
//! Mutations require the wallet to be Unlocked; reads work in either
//! state and never decrypt anything. Writes go to disk first, then to
//! the in-memory index, so memory always agrees with what a crash would
//! leave behind.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::coins;
use crate::config::CofferConfig;
use crate::crypto::hashes::sha256;
use crate::error::{CofferError, CofferResult};
use crate::hd::path::{DerivationPath, HARDENED};
use crate::hd::ExtendedKey;
use crate::keystore::SealedBlob;
use crate::logging;
use crate::storage::FileStorage;
use crate::types::{AddressKey, Coin, CoinAccount};
use crate::wallet::manager::WalletManager;

/// Prefix for derived account ids
const ID_PREFIX: &str = "file_";

pub struct AccountCatalog {
    storage: Arc<FileStorage>,
    config: CofferConfig,
    manager: Arc<WalletManager>,
    index: RwLock<HashMap<String, CoinAccount>>,
}

impl AccountCatalog {
    /// Build the in-memory index from the accounts on disk
    pub fn new(
        storage: Arc<FileStorage>,
        config: CofferConfig,
        manager: Arc<WalletManager>,
    ) -> CofferResult<Self> {
        let mut index = HashMap::new();
        for account in storage.load_accounts()? {
            index.insert(account.id.clone(), account);
        }
        Ok(Self {
            storage,
            config,
            manager,
            index: RwLock::new(index),
        })
    }

    /// Create the derivation anchor for a five-level BIP-44 path.
    ///
    /// The change and address-index positions are masked to zero; the
    /// account extended key is derived at depth 3 and sealed with the
    /// cached password. Calling this again with the same path returns
    /// the stored account without re-sealing.
    pub fn create_account(&self, path: &str) -> CofferResult<CoinAccount> {
        if self.manager.is_locked() {
            return Err(CofferError::wallet_locked());
        }

        let anchor = DerivationPath::parse(path)?.mask_suffix();
        let coin = Coin::from_coin_type(anchor.coin_type).ok_or_else(|| {
            CofferError::unsupported_coin(format!(
                "coin type {} is not supported",
                anchor.coin_type & !HARDENED
            ))
        })?;

        let id = self.account_id(&anchor.to_string());
        if let Some(existing) = self.index.read().expect("catalog poisoned").get(&id) {
            return Ok(existing.clone());
        }

        let seed = self.manager.unseal_seed()?;
        let master = ExtendedKey::master_from_seed(coin.curve(), &seed)?;
        let account_key = master.derive_path(&anchor.account_components())?;
        drop(seed);

        let password = self.manager.vault().password()?;
        let serialized = account_key.serialize();
        let sealed = SealedBlob::seal(&serialized, &password, self.config.kdf, self.config.aead)?;

        let account = CoinAccount {
            id: id.clone(),
            coin_symbol: coin.symbol().to_string(),
            derivation_path: anchor.to_string(),
            encrypted_account_private_key: sealed.encode_hex(),
        };

        self.storage.save_account(&account)?;
        self.index
            .write()
            .expect("catalog poisoned")
            .insert(id, account.clone());

        logging::info("catalog", "account created")
            .field("id", &account.id)
            .field("coin", &account.coin_symbol)
            .emit();

        Ok(account)
    }

    /// Derive `/change/index` under an account and encode its address.
    ///
    /// (account, change, index) is unique: deriving an existing slot
    /// returns the stored record. Gaps in the index sequence are fine;
    /// the catalog tracks exactly what was derived.
    pub fn derive_address(
        &self,
        account_id: &str,
        change: u32,
        address_index: u32,
    ) -> CofferResult<AddressKey> {
        if self.manager.is_locked() {
            return Err(CofferError::wallet_locked());
        }
        if change > 1 {
            return Err(CofferError::invalid_input(format!(
                "change must be 0 or 1, got {}",
                change
            )));
        }
        if address_index & HARDENED != 0 {
            return Err(CofferError::invalid_input(
                "address index must be below 2^31",
            ));
        }

        let account = self.find_account(account_id)?;
        let coin = account.coin()?;

        if let Some(existing) = self
            .storage
            .load_addresses(account_id)?
            .into_iter()
            .find(|a| a.change_type == change && a.address_index == address_index)
        {
            return Ok(existing);
        }

        let password = self.manager.vault().password()?;
        let account_blob = SealedBlob::decode(&account.encrypted_account_private_key)?;
        let account_key_bytes = account_blob.open(&password)?;
        let account_key = ExtendedKey::deserialize(&account_key_bytes)?;
        drop(account_key_bytes);

        let child = account_key
            .derive_child(change)?
            .derive_child(address_index)?;

        let public_key = child.public_key_for_coin(coin)?;
        let address = coins::encode_address(coin, &public_key)?;

        let private_key = child.private_key_bytes();
        let sealed = SealedBlob::seal(
            private_key.as_ref(),
            &password,
            self.config.kdf,
            self.config.aead,
        )?;

        let record = AddressKey {
            account_id: account_id.to_string(),
            change_type: change,
            address_index,
            encrypted_private_key: sealed.encode_hex(),
            public_key: hex::encode(&public_key),
            address,
            coin_symbol: coin.symbol().to_string(),
        };

        self.storage.save_address(&record)?;

        logging::info("catalog", "address derived")
            .field("account", account_id)
            .field("change", change)
            .field("index", address_index)
            .field("address", logging::redact(&record.address))
            .emit();

        Ok(record)
    }

    /// Accounts for one SLIP-44 coin type (hardened bit tolerated).
    /// Read-only; permitted while Locked. Sealed fields stay opaque.
    pub fn list_accounts_by_coin(&self, coin_type: u32) -> CofferResult<Vec<CoinAccount>> {
        let wanted = coin_type & !HARDENED;
        let index = self.index.read().expect("catalog poisoned");
        let mut accounts: Vec<CoinAccount> = index
            .values()
            .filter(|a| {
                a.coin_type()
                    .map(|ct| ct & !HARDENED == wanted)
                    .unwrap_or(false)
            })
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.derivation_path.cmp(&b.derivation_path));
        Ok(accounts)
    }

    /// All derived addresses under an account. Read-only; permitted
    /// while Locked.
    pub fn list_addresses(&self, account_id: &str) -> CofferResult<Vec<AddressKey>> {
        self.storage.load_addresses(account_id)
    }

    fn find_account(&self, account_id: &str) -> CofferResult<CoinAccount> {
        if let Some(account) = self.index.read().expect("catalog poisoned").get(account_id) {
            return Ok(account.clone());
        }

        // Fall back to disk in case another handle created it.
        for account in self.storage.load_accounts()? {
            if account.id == account_id {
                self.index
                    .write()
                    .expect("catalog poisoned")
                    .insert(account.id.clone(), account.clone());
                return Ok(account);
            }
        }

        Err(CofferError::account_not_found(account_id))
    }

    /// Deterministic id: `file_` + sha256 of the canonical anchor path,
    /// truncated (prefix preserved) when a maximum length is configured.
    fn account_id(&self, derivation_path: &str) -> String {
        let digest = hex::encode(sha256(derivation_path.as_bytes()));
        let id = format!("{}{}", ID_PREFIX, digest);

        match self.config.id_max_length {
            Some(max) if id.len() > max => {
                if max > ID_PREFIX.len() {
                    format!("{}{}", ID_PREFIX, &digest[..max - ID_PREFIX.len()])
                } else {
                    id[..max].to_string()
                }
            }
            _ => id,
        }
    }
}
