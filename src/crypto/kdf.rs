//! Password Key Derivation
//!
//! Maps a password + salt to a 256-bit key-encryption-key using one of
//! three standard KDFs. The chosen algorithm and its parameters are
//! embedded in every sealed blob so decryption never consults
//! configuration.
//!
//! SECURITY: Derived keys are returned in `Zeroizing` wrappers and must
//! not be copied out of them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::{CofferError, CofferResult};

/// Key-encryption-key length in bytes
pub const KEY_LEN: usize = 32;

/// Default salt length in bytes
pub const SALT_LEN: usize = 16;

/// Password KDF selection with algorithm-specific parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "name", rename_all = "kebab-case")]
pub enum KdfAlgorithm {
    /// scrypt; `log_n` is log2 of the CPU/memory cost (N = 2^log_n)
    Scrypt { log_n: u8, r: u32, p: u32 },
    /// Argon2id; memory cost in KiB
    Argon2id { m_cost: u32, t_cost: u32, p_cost: u32 },
    /// PBKDF2-HMAC-SHA-256
    Pbkdf2Sha256 { iterations: u32 },
}

impl KdfAlgorithm {
    /// Default scrypt parameters: N=32768, r=8, p=1
    pub fn default_scrypt() -> Self {
        KdfAlgorithm::Scrypt { log_n: 15, r: 8, p: 1 }
    }

    /// Default Argon2id parameters: 64 MiB, 3 passes, 4 lanes
    pub fn default_argon2id() -> Self {
        KdfAlgorithm::Argon2id { m_cost: 65536, t_cost: 3, p_cost: 4 }
    }

    /// Default PBKDF2-SHA-256 parameters: 100k iterations
    pub fn default_pbkdf2() -> Self {
        KdfAlgorithm::Pbkdf2Sha256 { iterations: 100_000 }
    }

    /// Stable single-byte identifier used by the binary blob codec
    pub fn wire_id(&self) -> u8 {
        match self {
            KdfAlgorithm::Scrypt { .. } => 0,
            KdfAlgorithm::Argon2id { .. } => 1,
            KdfAlgorithm::Pbkdf2Sha256 { .. } => 2,
        }
    }

    /// Derive a 32-byte key from `password` and `salt`.
    ///
    /// Fails only on parameter domain errors; identical inputs always
    /// produce identical output.
    pub fn derive_key(
        &self,
        password: &[u8],
        salt: &[u8],
    ) -> CofferResult<Zeroizing<[u8; KEY_LEN]>> {
        self.derive_key_cancellable(password, salt, None)
    }

    /// Derive a key, checking the token at coarse boundaries.
    ///
    /// The underlying KDF calls are not interruptible mid-computation;
    /// the token is consulted before the expensive work starts so a
    /// cancelled request never produces (or leaks) partial key material.
    pub fn derive_key_cancellable(
        &self,
        password: &[u8],
        salt: &[u8],
        cancel: Option<&CancelToken>,
    ) -> CofferResult<Zeroizing<[u8; KEY_LEN]>> {
        if salt.len() < SALT_LEN {
            return Err(CofferError::crypto_error(format!(
                "salt must be at least {} bytes, got {}",
                SALT_LEN,
                salt.len()
            )));
        }
        if let Some(token) = cancel {
            if token.is_cancelled() {
                return Err(CofferError::cancelled("key derivation cancelled"));
            }
        }

        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        match self {
            KdfAlgorithm::Scrypt { log_n, r, p } => {
                let params = scrypt::Params::new(*log_n, *r, *p, KEY_LEN)
                    .map_err(|e| CofferError::crypto_error(format!("invalid scrypt parameters: {}", e)))?;
                scrypt::scrypt(password, salt, &params, key.as_mut())
                    .map_err(|e| CofferError::crypto_error(format!("scrypt derivation failed: {}", e)))?;
            }
            KdfAlgorithm::Argon2id { m_cost, t_cost, p_cost } => {
                let params = argon2::Params::new(*m_cost, *t_cost, *p_cost, Some(KEY_LEN))
                    .map_err(|e| CofferError::crypto_error(format!("invalid argon2 parameters: {}", e)))?;
                let argon2 = argon2::Argon2::new(
                    argon2::Algorithm::Argon2id,
                    argon2::Version::V0x13,
                    params,
                );
                argon2
                    .hash_password_into(password, salt, key.as_mut())
                    .map_err(|e| CofferError::crypto_error(format!("argon2id derivation failed: {}", e)))?;
            }
            KdfAlgorithm::Pbkdf2Sha256 { iterations } => {
                if *iterations == 0 {
                    return Err(CofferError::crypto_error("pbkdf2 iterations must be nonzero"));
                }
                pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, *iterations, key.as_mut());
            }
        }

        if let Some(token) = cancel {
            if token.is_cancelled() {
                // Key is dropped (and zeroized) here; nothing escapes.
                return Err(CofferError::cancelled("key derivation cancelled"));
            }
        }
        Ok(key)
    }
}

impl Default for KdfAlgorithm {
    fn default() -> Self {
        Self::default_scrypt()
    }
}

/// Generate a random salt of the given length
pub fn generate_salt(length: usize) -> Vec<u8> {
    super::csprng_bytes(length)
}

/// Cooperative cancellation token for long-running KDF work.
///
/// Cloning shares the underlying flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
