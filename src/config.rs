//! Configuration
//!
//! Everything a composition root needs to wire the wallet: the data
//! directory, the default crypto algorithms for new seals, and the
//! optional BIP-39 cloak. Defaults are read once at startup; sealed
//! blobs embed their own parameters, so changing these later only
//! affects new seals.

use std::path::PathBuf;

use crate::crypto::aead::AeadAlgorithm;
use crate::crypto::kdf::KdfAlgorithm;

/// Environment variable overriding the data base directory
pub const DATA_DIR_ENV: &str = "COFFER_DATA_DIR";

/// Directory name under the home directory when no override is set
const DEFAULT_DIR_NAME: &str = ".coffer";

#[derive(Debug, Clone)]
pub struct CofferConfig {
    /// Base directory for wallets/accounts/addresses
    pub base_dir: PathBuf,
    /// KDF for newly sealed blobs
    pub kdf: KdfAlgorithm,
    /// AEAD for newly sealed blobs
    pub aead: AeadAlgorithm,
    /// BIP-39 passphrase folded into seed derivation. Independent of the
    /// keystore password: changing the cloak changes every derived
    /// address without changing the mnemonic.
    pub cloak: String,
    /// Optional cap on generated account-id length (prefix preserved)
    pub id_max_length: Option<usize>,
}

impl CofferConfig {
    /// Resolve the data directory: `COFFER_DATA_DIR` if set, otherwise
    /// `~/.coffer`, falling back to a relative directory when the home
    /// directory cannot be determined.
    pub fn default_base_dir() -> PathBuf {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.is_empty() {
                return PathBuf::from(dir);
            }
        }
        if let Some(home) = dirs::home_dir() {
            return home.join(DEFAULT_DIR_NAME);
        }
        PathBuf::from(DEFAULT_DIR_NAME)
    }

    /// Defaults rooted at an explicit directory (tests, embedders)
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }
}

impl Default for CofferConfig {
    fn default() -> Self {
        Self {
            base_dir: Self::default_base_dir(),
            kdf: KdfAlgorithm::default(),
            aead: AeadAlgorithm::default(),
            cloak: String::new(),
            id_max_length: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CofferConfig::with_base_dir("/tmp/coffer-test");
        assert_eq!(config.kdf, KdfAlgorithm::Scrypt { log_n: 15, r: 8, p: 1 });
        assert_eq!(config.aead, AeadAlgorithm::Aes256Gcm);
        assert!(config.cloak.is_empty());
        assert_eq!(config.base_dir, PathBuf::from("/tmp/coffer-test"));
    }

    #[test]
    fn test_default_dir_is_not_empty() {
        // Whatever the environment, the fallback chain must yield a path.
        assert!(!CofferConfig::default_base_dir().as_os_str().is_empty());
    }
}
