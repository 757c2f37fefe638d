//! Wallet Facade
//!
//! The composition root: wires storage, configuration, and the password
//! vault into the wallet manager and account catalog, and exposes the
//! operation surface external callers consume.

pub mod accounts;
pub mod manager;

pub use accounts::AccountCatalog;
pub use manager::WalletManager;

use std::sync::Arc;

use zeroize::Zeroizing;

use crate::config::CofferConfig;
use crate::error::CofferResult;
use crate::security::PasswordVault;
use crate::storage::FileStorage;
use crate::types::{AddressKey, CoinAccount, RootWalletRecord};

/// One handle over the whole wallet core
pub struct Coffer {
    manager: Arc<WalletManager>,
    catalog: AccountCatalog,
}

impl Coffer {
    /// Open (or initialize) the data directory named by `config` and
    /// load existing records. The wallet starts Locked.
    pub fn open(config: CofferConfig) -> CofferResult<Self> {
        let storage = Arc::new(FileStorage::open(&config.base_dir)?);
        let vault = Arc::new(PasswordVault::new());
        let manager = Arc::new(WalletManager::new(
            storage.clone(),
            config.clone(),
            vault,
        )?);
        let catalog = AccountCatalog::new(storage, config, manager.clone())?;
        Ok(Self { manager, catalog })
    }

    /// Open with defaults (`COFFER_DATA_DIR` or `~/.coffer`)
    pub fn open_default() -> CofferResult<Self> {
        Self::open(CofferConfig::default())
    }

    pub fn create_new_wallet(&self, password: &str) -> CofferResult<RootWalletRecord> {
        self.manager.create_new_wallet(password)
    }

    pub fn restore_from_mnemonic(
        &self,
        mnemonic: &str,
        password: &str,
    ) -> CofferResult<RootWalletRecord> {
        self.manager.restore_from_mnemonic(mnemonic, password)
    }

    pub fn export_mnemonic(&self, password: &str) -> CofferResult<Zeroizing<String>> {
        self.manager.export_mnemonic(password)
    }

    pub fn unlock(&self, password: &str) -> CofferResult<()> {
        self.manager.unlock(password)
    }

    pub fn lock(&self) {
        self.manager.lock()
    }

    pub fn is_locked(&self) -> bool {
        self.manager.is_locked()
    }

    pub fn create_account(&self, path: &str) -> CofferResult<CoinAccount> {
        self.catalog.create_account(path)
    }

    pub fn derive_address(
        &self,
        account_id: &str,
        change: u32,
        address_index: u32,
    ) -> CofferResult<AddressKey> {
        self.catalog.derive_address(account_id, change, address_index)
    }

    pub fn list_accounts_by_coin(&self, coin_type: u32) -> CofferResult<Vec<CoinAccount>> {
        self.catalog.list_accounts_by_coin(coin_type)
    }

    pub fn list_addresses(&self, account_id: &str) -> CofferResult<Vec<AddressKey>> {
        self.catalog.list_addresses(account_id)
    }
}
