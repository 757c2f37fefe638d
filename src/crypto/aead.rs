//! Authenticated Encryption
//!
//! AES-256-GCM and ChaCha20-Poly1305 behind one interface. Nonces are
//! drawn from the OS CSPRNG per seal; the 16-byte tag is appended to the
//! ciphertext. A failed open never says whether the key was wrong or the
//! data was tampered with.

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use chacha20poly1305::ChaCha20Poly1305;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{CofferError, CofferResult};

/// Nonce length shared by both supported ciphers
pub const NONCE_LEN: usize = 12;

/// AEAD cipher selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AeadAlgorithm {
    #[serde(rename = "aes-256-gcm")]
    Aes256Gcm,
    #[serde(rename = "chacha20-poly1305")]
    ChaCha20Poly1305,
}

impl AeadAlgorithm {
    /// Stable single-byte identifier used by the binary blob codec
    pub fn wire_id(&self) -> u8 {
        match self {
            AeadAlgorithm::Aes256Gcm => 0,
            AeadAlgorithm::ChaCha20Poly1305 => 1,
        }
    }

    pub fn from_wire_id(id: u8) -> CofferResult<Self> {
        match id {
            0 => Ok(AeadAlgorithm::Aes256Gcm),
            1 => Ok(AeadAlgorithm::ChaCha20Poly1305),
            _ => Err(CofferError::crypto_error(format!("unknown AEAD id: {}", id))),
        }
    }
}

impl Default for AeadAlgorithm {
    fn default() -> Self {
        AeadAlgorithm::Aes256Gcm
    }
}

/// Encrypt `plaintext` under `key` with a fresh random nonce.
///
/// Returns the nonce and the ciphertext with the authentication tag
/// appended.
pub fn aead_seal(
    algo: AeadAlgorithm,
    key: &[u8; 32],
    plaintext: &[u8],
    aad: &[u8],
) -> CofferResult<([u8; NONCE_LEN], Vec<u8>)> {
    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);

    let payload = Payload { msg: plaintext, aad };
    let ciphertext = match algo {
        AeadAlgorithm::Aes256Gcm => {
            let cipher = Aes256Gcm::new_from_slice(key)
                .map_err(|e| CofferError::crypto_error(format!("failed to create cipher: {}", e)))?;
            cipher
                .encrypt(Nonce::from_slice(&nonce_bytes), payload)
                .map_err(|e| CofferError::crypto_error(format!("encryption failed: {}", e)))?
        }
        AeadAlgorithm::ChaCha20Poly1305 => {
            let cipher = ChaCha20Poly1305::new_from_slice(key)
                .map_err(|e| CofferError::crypto_error(format!("failed to create cipher: {}", e)))?;
            cipher
                .encrypt(Nonce::from_slice(&nonce_bytes), payload)
                .map_err(|e| CofferError::crypto_error(format!("encryption failed: {}", e)))?
        }
    };

    Ok((nonce_bytes, ciphertext))
}

/// Decrypt and authenticate. Any failure collapses to `AuthFailed`.
pub fn aead_open(
    algo: AeadAlgorithm,
    key: &[u8; 32],
    nonce: &[u8],
    ciphertext: &[u8],
    aad: &[u8],
) -> CofferResult<Vec<u8>> {
    if nonce.len() != NONCE_LEN {
        return Err(CofferError::auth_failed());
    }

    let payload = Payload { msg: ciphertext, aad };
    let plaintext = match algo {
        AeadAlgorithm::Aes256Gcm => {
            let cipher = Aes256Gcm::new_from_slice(key)
                .map_err(|_| CofferError::auth_failed())?;
            cipher
                .decrypt(Nonce::from_slice(nonce), payload)
                .map_err(|_| CofferError::auth_failed())?
        }
        AeadAlgorithm::ChaCha20Poly1305 => {
            let cipher = ChaCha20Poly1305::new_from_slice(key)
                .map_err(|_| CofferError::auth_failed())?;
            cipher
                .decrypt(Nonce::from_slice(nonce), payload)
                .map_err(|_| CofferError::auth_failed())?
        }
    };

    Ok(plaintext)
}
