//! Unified error types for Coffer
//!
//! All errors flow through this module for consistent handling and
//! serialization at the API boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Main error type for all Coffer operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CofferError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl CofferError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, msg)
    }

    pub fn invalid_mnemonic(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidMnemonic, msg)
    }

    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidPath, msg)
    }

    pub fn unsupported_coin(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnsupportedCoin, msg)
    }

    pub fn wallet_locked() -> Self {
        Self::new(ErrorCode::WalletLocked, "wallet is locked")
    }

    pub fn wallet_already_exists() -> Self {
        Self::new(ErrorCode::WalletAlreadyExists, "wallet already exists")
    }

    pub fn wallet_not_found() -> Self {
        Self::new(ErrorCode::WalletNotFound, "no wallet has been created")
    }

    pub fn account_not_found(id: impl Into<String>) -> Self {
        Self::new(ErrorCode::AccountNotFound, format!("account not found: {}", id.into()))
    }

    /// Authentication failure. Wrong password and tampered ciphertext are
    /// deliberately indistinguishable; the message never says which.
    pub fn auth_failed() -> Self {
        Self::new(ErrorCode::AuthFailed, "decryption failed")
    }

    pub fn password_not_set() -> Self {
        Self::new(ErrorCode::PasswordNotSet, "password not set")
    }

    pub fn crypto_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::CryptoError, msg)
    }

    pub fn storage_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, msg)
    }

    pub fn corrupt_store(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::CorruptStore, msg)
    }

    pub fn store_busy(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::StoreBusy, msg)
    }

    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Cancelled, msg)
    }
}

impl fmt::Display for CofferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for CofferError {}

impl From<std::io::Error> for CofferError {
    fn from(e: std::io::Error) -> Self {
        CofferError::storage_error(e.to_string())
    }
}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Input errors
    InvalidInput,
    InvalidMnemonic,
    InvalidPath,
    UnsupportedCoin,

    // Wallet state errors
    WalletLocked,
    WalletAlreadyExists,
    WalletNotFound,
    AccountNotFound,

    // Authentication errors
    AuthFailed,
    PasswordNotSet,

    // Cryptographic failures
    CryptoError,

    // Storage errors
    StorageError,
    CorruptStore,
    StoreBusy,

    // Cooperative cancellation
    Cancelled,
}

/// Result type alias used throughout the crate
pub type CofferResult<T> = Result<T, CofferError>;
