//! Coffer Core Library
//!
//! A local hierarchical-deterministic wallet core.
//!
//! # Architecture
//!
//! This crate provides:
//! - **mnemonic**: BIP-39 generation, validation, seed expansion
//! - **hd**: BIP-32 (secp256k1) and SLIP-0010 (Ed25519) key trees
//! - **coins**: per-coin address encoding and validation
//! - **keystore**: password-sealed envelopes for every secret at rest
//! - **security**: pinned-memory secret buffers and the password vault
//! - **storage**: atomic JSON persistence under one data directory
//! - **wallet**: the manager/catalog facade external callers consume
//!
//! # Security
//!
//! This crate uses `zeroize` to clear sensitive data from memory. Seeds
//! and derived private keys live only inside the operation that needs
//! them; the one long-lived secret is the unlocked password, held in an
//! mlock-pinned buffer until `lock()`.
//!
//! # Example
//!
//! ```rust,ignore
//! use coffer::{Coffer, CofferConfig};
//!
//! let wallet = Coffer::open(CofferConfig::with_base_dir("/tmp/demo"))?;
//! wallet.create_new_wallet("correct horse battery staple")?;
//! wallet.unlock("correct horse battery staple")?;
//! let account = wallet.create_account("m/44'/60'/0'/0/0")?;
//! let address = wallet.derive_address(&account.id, 0, 0)?;
//! println!("ETH address: {}", address.address);
//! ```

pub mod coins;
pub mod config;
pub mod crypto;
pub mod error;
pub mod hd;
pub mod keystore;
pub mod logging;
pub mod mnemonic;
pub mod security;
pub mod serde_bytes;
pub mod storage;
pub mod types;
pub mod wallet;

// Re-export key types for convenience
pub use config::CofferConfig;
pub use error::{CofferError, CofferResult, ErrorCode};
pub use keystore::SealedBlob;
pub use types::{AddressKey, Coin, CoinAccount, Curve, RootWalletRecord};
pub use wallet::{AccountCatalog, Coffer, WalletManager};

// Re-export the operations most callers reach for directly
pub use coins::{encode_address, validate_address};
pub use mnemonic::{generate_mnemonic, seed_from_mnemonic, validate_mnemonic};
