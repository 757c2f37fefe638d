//! File Persistence
//!
//! JSON records under a single base directory:
//!
//! ```text
//! <base>/wallets/root_wallet.json
//! <base>/accounts/accounts.json
//! <base>/addresses/<account_id>_addresses.json
//! ```
//!
//! Writes go to `<file>.tmp`, fsync, then rename, so a crash leaves
//! either the old file or the new one, never a torn mix. Directories are
//! created 0700 and files 0600. An advisory lock on `<base>/.lock`
//! serializes processes; an in-process RwLock serializes threads.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CofferError, CofferResult};
use crate::types::{AddressKey, CoinAccount, RootWalletRecord};

const ROOT_WALLET_FILE: &str = "root_wallet.json";
const ACCOUNTS_FILE: &str = "accounts.json";
const LOCK_FILE: &str = ".lock";

/// Filesystem-backed store for wallet, account, and address records
pub struct FileStorage {
    wallets_dir: PathBuf,
    accounts_dir: PathBuf,
    addresses_dir: PathBuf,
    mutex: RwLock<()>,
    // Held for the lifetime of the storage; dropping releases the flock.
    _lock: File,
}

impl FileStorage {
    /// Create the directory tree (0700) and take the advisory lock.
    ///
    /// Fails with `StoreBusy` when another process holds the lock.
    pub fn open(base_dir: &Path) -> CofferResult<Self> {
        let wallets_dir = base_dir.join("wallets");
        let accounts_dir = base_dir.join("accounts");
        let addresses_dir = base_dir.join("addresses");

        for dir in [base_dir, &wallets_dir, &accounts_dir, &addresses_dir] {
            create_private_dir(dir)?;
        }

        let lock_path = base_dir.join(LOCK_FILE);
        let lock = open_private(&lock_path)?;
        match lock.try_lock_exclusive() {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                return Err(CofferError::store_busy(format!(
                    "another process holds {}",
                    lock_path.display()
                )));
            }
            Err(e) => {
                return Err(CofferError::storage_error(format!(
                    "failed to lock {}: {}",
                    lock_path.display(),
                    e
                )));
            }
        }

        Ok(Self {
            wallets_dir,
            accounts_dir,
            addresses_dir,
            mutex: RwLock::new(()),
            _lock: lock,
        })
    }

    pub fn save_root_wallet(&self, wallet: &RootWalletRecord) -> CofferResult<()> {
        let _guard = self.mutex.write().expect("storage lock poisoned");
        save_to_file(&self.wallets_dir.join(ROOT_WALLET_FILE), wallet)
    }

    /// `None` when no wallet has been created yet
    pub fn load_root_wallet(&self) -> CofferResult<Option<RootWalletRecord>> {
        let _guard = self.mutex.read().expect("storage lock poisoned");
        load_from_file(&self.wallets_dir.join(ROOT_WALLET_FILE))
    }

    /// Insert or replace one account in the accounts index
    pub fn save_account(&self, account: &CoinAccount) -> CofferResult<()> {
        let _guard = self.mutex.write().expect("storage lock poisoned");

        let path = self.accounts_dir.join(ACCOUNTS_FILE);
        let mut accounts: Vec<CoinAccount> = load_from_file(&path)?.unwrap_or_default();

        match accounts.iter_mut().find(|a| a.id == account.id) {
            Some(existing) => *existing = account.clone(),
            None => accounts.push(account.clone()),
        }

        save_to_file(&path, &accounts)
    }

    pub fn load_accounts(&self) -> CofferResult<Vec<CoinAccount>> {
        let _guard = self.mutex.read().expect("storage lock poisoned");
        let path = self.accounts_dir.join(ACCOUNTS_FILE);
        Ok(load_from_file(&path)?.unwrap_or_default())
    }

    /// Insert or replace one address in its account's address file
    pub fn save_address(&self, address: &AddressKey) -> CofferResult<()> {
        let _guard = self.mutex.write().expect("storage lock poisoned");

        let path = self.address_file(&address.account_id);
        let mut addresses: Vec<AddressKey> = load_from_file(&path)?.unwrap_or_default();

        let slot = addresses.iter_mut().find(|a| {
            a.change_type == address.change_type && a.address_index == address.address_index
        });
        match slot {
            Some(existing) => *existing = address.clone(),
            None => addresses.push(address.clone()),
        }

        save_to_file(&path, &addresses)
    }

    pub fn load_addresses(&self, account_id: &str) -> CofferResult<Vec<AddressKey>> {
        let _guard = self.mutex.read().expect("storage lock poisoned");
        Ok(load_from_file(&self.address_file(account_id))?.unwrap_or_default())
    }

    /// Probe every directory for existence and writability
    pub fn health_check(&self) -> CofferResult<()> {
        let _guard = self.mutex.read().expect("storage lock poisoned");
        for dir in [&self.wallets_dir, &self.accounts_dir, &self.addresses_dir] {
            if !dir.is_dir() {
                return Err(CofferError::storage_error(format!(
                    "directory missing: {}",
                    dir.display()
                )));
            }
            let probe = dir.join(".healthcheck");
            fs::write(&probe, b"probe").map_err(|e| {
                CofferError::storage_error(format!("directory not writable {}: {}", dir.display(), e))
            })?;
            let _ = fs::remove_file(&probe);
        }
        Ok(())
    }

    fn address_file(&self, account_id: &str) -> PathBuf {
        self.addresses_dir.join(format!("{}_addresses.json", account_id))
    }
}

fn create_private_dir(dir: &Path) -> CofferResult<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        fs::DirBuilder::new()
            .recursive(true)
            .mode(0o700)
            .create(dir)
            .map_err(|e| {
                CofferError::storage_error(format!("failed to create {}: {}", dir.display(), e))
            })
    }
    #[cfg(not(unix))]
    {
        fs::create_dir_all(dir).map_err(|e| {
            CofferError::storage_error(format!("failed to create {}: {}", dir.display(), e))
        })
    }
}

fn open_private(path: &Path) -> CofferResult<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(false);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options
        .open(path)
        .map_err(|e| CofferError::storage_error(format!("failed to open {}: {}", path.display(), e)))
}

/// Serialize to `<file>.tmp`, fsync, then rename over the target
fn save_to_file<T: Serialize>(path: &Path, value: &T) -> CofferResult<()> {
    let json = serde_json::to_vec_pretty(value)
        .map_err(|e| CofferError::storage_error(format!("JSON encoding failed: {}", e)))?;

    let tmp_path = path.with_extension("json.tmp");
    let mut file = open_private(&tmp_path)?;
    file.set_len(0)
        .map_err(|e| CofferError::storage_error(format!("failed to truncate temp file: {}", e)))?;
    file.write_all(&json)
        .map_err(|e| CofferError::storage_error(format!("failed to write {}: {}", tmp_path.display(), e)))?;
    file.sync_all()
        .map_err(|e| CofferError::storage_error(format!("failed to sync {}: {}", tmp_path.display(), e)))?;
    drop(file);

    fs::rename(&tmp_path, path).map_err(|e| {
        CofferError::storage_error(format!("failed to rename into {}: {}", path.display(), e))
    })
}

/// Missing file reads as `None`; unparseable JSON is `CorruptStore`
fn load_from_file<T: DeserializeOwned>(path: &Path) -> CofferResult<Option<T>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(CofferError::storage_error(format!(
                "failed to read {}: {}",
                path.display(),
                e
            )));
        }
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| CofferError::corrupt_store(format!("corrupt JSON in {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use tempfile::tempdir;

    fn wallet_record() -> RootWalletRecord {
        RootWalletRecord {
            encrypted_mnemonic: "01ab".into(),
            encrypted_seed: "02cd".into(),
            creation_time: 1_700_000_000,
        }
    }

    fn account(id: &str) -> CoinAccount {
        CoinAccount {
            id: id.into(),
            coin_symbol: "ETH".into(),
            derivation_path: "m/44'/60'/0'/0/0".into(),
            encrypted_account_private_key: "beef".into(),
        }
    }

    fn address(account_id: &str, change: u32, index: u32) -> AddressKey {
        AddressKey {
            account_id: account_id.into(),
            change_type: change,
            address_index: index,
            encrypted_private_key: "dead".into(),
            public_key: "beef".into(),
            address: "0x0".into(),
            coin_symbol: "ETH".into(),
        }
    }

    #[test]
    fn test_missing_files_read_as_empty() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();

        assert!(storage.load_root_wallet().unwrap().is_none());
        assert!(storage.load_accounts().unwrap().is_empty());
        assert!(storage.load_addresses("file_missing").unwrap().is_empty());
    }

    #[test]
    fn test_root_wallet_roundtrip() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();

        storage.save_root_wallet(&wallet_record()).unwrap();
        assert_eq!(storage.load_root_wallet().unwrap(), Some(wallet_record()));
    }

    #[test]
    fn test_account_upsert() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();

        storage.save_account(&account("file_a")).unwrap();
        storage.save_account(&account("file_b")).unwrap();
        storage.save_account(&account("file_a")).unwrap();

        let accounts = storage.load_accounts().unwrap();
        assert_eq!(accounts.len(), 2);
    }

    #[test]
    fn test_addresses_partition_by_account() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();

        storage.save_address(&address("file_a", 0, 0)).unwrap();
        storage.save_address(&address("file_a", 0, 1)).unwrap();
        storage.save_address(&address("file_b", 0, 0)).unwrap();
        // Same slot again replaces rather than appends
        storage.save_address(&address("file_a", 0, 1)).unwrap();

        assert_eq!(storage.load_addresses("file_a").unwrap().len(), 2);
        assert_eq!(storage.load_addresses("file_b").unwrap().len(), 1);
    }

    #[test]
    fn test_corrupt_json_surfaces() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();

        fs::write(dir.path().join("wallets").join(ROOT_WALLET_FILE), b"{not json").unwrap();
        assert_eq!(
            storage.load_root_wallet().unwrap_err().code,
            ErrorCode::CorruptStore
        );
    }

    #[test]
    fn test_stale_tmp_file_is_ignored() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        storage.save_root_wallet(&wallet_record()).unwrap();

        // Simulate a crash that left a half-written temp file behind.
        fs::write(
            dir.path().join("wallets").join("root_wallet.json.tmp"),
            b"{\"trunca",
        )
        .unwrap();

        assert_eq!(storage.load_root_wallet().unwrap(), Some(wallet_record()));
    }

    #[test]
    fn test_second_open_in_process_is_busy() {
        let dir = tempdir().unwrap();
        let _storage = FileStorage::open(dir.path()).unwrap();
        // flock is per file description, so a second open in the same
        // process contends just like another process would.
        let second = FileStorage::open(dir.path());
        assert!(matches!(
            second.map(|_| ()).unwrap_err().code,
            ErrorCode::StoreBusy | ErrorCode::StorageError
        ));
    }

    #[test]
    fn test_lock_released_on_drop() {
        let dir = tempdir().unwrap();
        {
            let _storage = FileStorage::open(dir.path()).unwrap();
        }
        assert!(FileStorage::open(dir.path()).is_ok());
    }

    #[test]
    fn test_health_check() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        assert!(storage.health_check().is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_unix_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        storage.save_root_wallet(&wallet_record()).unwrap();

        let dir_mode = fs::metadata(dir.path().join("wallets")).unwrap().permissions().mode();
        assert_eq!(dir_mode & 0o777, 0o700);

        let file_mode = fs::metadata(dir.path().join("wallets").join(ROOT_WALLET_FILE))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(file_mode & 0o777, 0o600);
    }
}
