//! Envelope Keystore
//!
//! One seal/open pair for every secret at rest: mnemonic, seed, account
//! extended keys, address private keys. The KDF and AEAD choice plus all
//! their parameters are embedded in the blob, so opening never consults
//! configuration. A wrong password and a tampered blob are reported as
//! the same `AuthFailed`.
//!
//! # Canonical encodings
//!
//! Two wire shapes round-trip; `decode` sniffs them apart by the leading
//! character (`{` means JSON):
//!
//! **Legacy hex**: hex over this binary layout (all integers
//! big-endian):
//!
//! ```text
//! version   (1)  currently 0x01
//! kdf id    (1)  0 = scrypt, 1 = argon2id, 2 = pbkdf2-sha256
//! aead id   (1)  0 = aes-256-gcm, 1 = chacha20-poly1305
//! kdf p0    (4)  scrypt: log2(N)   argon2id: m_cost (KiB)  pbkdf2: iterations
//! kdf p1    (4)  scrypt: r         argon2id: t_cost        pbkdf2: 0
//! kdf p2    (4)  scrypt: p         argon2id: p_cost        pbkdf2: 0
//! salt len  (1)  followed by the salt bytes
//! nonce len (1)  followed by the nonce bytes
//! ct len    (4)  followed by ciphertext || 16-byte tag
//! ```
//!
//! **JSON**: the serde shape of [`SealedBlob`] with base64 byte fields.

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::crypto::aead::{aead_open, aead_seal, AeadAlgorithm};
use crate::crypto::kdf::{generate_salt, CancelToken, KdfAlgorithm, SALT_LEN};
use crate::error::{CofferError, CofferResult};

/// Current envelope version
pub const BLOB_VERSION: u8 = 1;

/// A password-sealed secret with its crypto parameters carried in-band
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SealedBlob {
    pub version: u8,
    pub kdf: KdfAlgorithm,
    pub aead: AeadAlgorithm,
    #[serde(with = "crate::serde_bytes::base64vec")]
    pub salt: Vec<u8>,
    #[serde(with = "crate::serde_bytes::base64vec")]
    pub nonce: Vec<u8>,
    #[serde(with = "crate::serde_bytes::base64vec")]
    pub ciphertext: Vec<u8>,
}

impl SealedBlob {
    /// Seal `plaintext` under `password` with a fresh salt and nonce.
    ///
    /// The derived key-encryption-key is zeroized before returning.
    pub fn seal(
        plaintext: &[u8],
        password: &[u8],
        kdf: KdfAlgorithm,
        aead: AeadAlgorithm,
    ) -> CofferResult<Self> {
        Self::seal_cancellable(plaintext, password, kdf, aead, None)
    }

    /// Seal with a cooperative cancellation token for the KDF work
    pub fn seal_cancellable(
        plaintext: &[u8],
        password: &[u8],
        kdf: KdfAlgorithm,
        aead: AeadAlgorithm,
        cancel: Option<&CancelToken>,
    ) -> CofferResult<Self> {
        let salt = generate_salt(SALT_LEN);
        let key = kdf.derive_key_cancellable(password, &salt, cancel)?;
        let (nonce, ciphertext) = aead_seal(aead, &key, plaintext, &[])?;

        Ok(Self {
            version: BLOB_VERSION,
            kdf,
            aead,
            salt,
            nonce: nonce.to_vec(),
            ciphertext,
        })
    }

    /// Recover the plaintext. Any mismatch (wrong password, flipped
    /// bit, truncated blob) is the same `AuthFailed`.
    pub fn open(&self, password: &[u8]) -> CofferResult<Zeroizing<Vec<u8>>> {
        self.open_cancellable(password, None)
    }

    pub fn open_cancellable(
        &self,
        password: &[u8],
        cancel: Option<&CancelToken>,
    ) -> CofferResult<Zeroizing<Vec<u8>>> {
        let key = self
            .kdf
            .derive_key_cancellable(password, &self.salt, cancel)
            .map_err(|e| match e.code {
                crate::error::ErrorCode::Cancelled => e,
                // A mangled salt or parameter block is tampering
                _ => CofferError::auth_failed(),
            })?;
        let plaintext = aead_open(self.aead, &key, &self.nonce, &self.ciphertext, &[])?;
        Ok(Zeroizing::new(plaintext))
    }

    /// Legacy hex encoding (layout in the module docs)
    pub fn encode_hex(&self) -> String {
        let (p0, p1, p2) = match self.kdf {
            KdfAlgorithm::Scrypt { log_n, r, p } => (log_n as u32, r, p),
            KdfAlgorithm::Argon2id { m_cost, t_cost, p_cost } => (m_cost, t_cost, p_cost),
            KdfAlgorithm::Pbkdf2Sha256 { iterations } => (iterations, 0, 0),
        };

        let mut out = Vec::with_capacity(21 + self.salt.len() + self.nonce.len() + self.ciphertext.len());
        out.push(self.version);
        out.push(self.kdf.wire_id());
        out.push(self.aead.wire_id());
        out.extend_from_slice(&p0.to_be_bytes());
        out.extend_from_slice(&p1.to_be_bytes());
        out.extend_from_slice(&p2.to_be_bytes());
        out.push(self.salt.len() as u8);
        out.extend_from_slice(&self.salt);
        out.push(self.nonce.len() as u8);
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&(self.ciphertext.len() as u32).to_be_bytes());
        out.extend_from_slice(&self.ciphertext);

        hex::encode(out)
    }

    /// JSON encoding with base64 byte fields
    pub fn encode_json(&self) -> CofferResult<String> {
        serde_json::to_string(self)
            .map_err(|e| CofferError::crypto_error(format!("blob serialization failed: {}", e)))
    }

    /// Parse either encoding. Failures collapse to `AuthFailed`: a blob
    /// that no longer parses has been tampered with.
    pub fn decode(encoded: &str) -> CofferResult<Self> {
        let trimmed = encoded.trim();
        let blob = if trimmed.starts_with('{') {
            serde_json::from_str(trimmed).map_err(|_| CofferError::auth_failed())?
        } else {
            Self::decode_hex(trimmed)?
        };
        if blob.version != BLOB_VERSION {
            return Err(CofferError::auth_failed());
        }
        Ok(blob)
    }

    fn decode_hex(encoded: &str) -> CofferResult<Self> {
        let bytes = hex::decode(encoded).map_err(|_| CofferError::auth_failed())?;
        let mut cursor = Cursor::new(&bytes);

        let version = cursor.take_u8()?;
        let kdf_id = cursor.take_u8()?;
        let aead_id = cursor.take_u8()?;
        let p0 = cursor.take_u32()?;
        let p1 = cursor.take_u32()?;
        let p2 = cursor.take_u32()?;

        let kdf = match kdf_id {
            0 => {
                let log_n = u8::try_from(p0).map_err(|_| CofferError::auth_failed())?;
                KdfAlgorithm::Scrypt { log_n, r: p1, p: p2 }
            }
            1 => KdfAlgorithm::Argon2id { m_cost: p0, t_cost: p1, p_cost: p2 },
            2 => {
                // p1/p2 are unused for PBKDF2 and must be zero so that
                // every bit of the envelope is load-bearing.
                if p1 != 0 || p2 != 0 {
                    return Err(CofferError::auth_failed());
                }
                KdfAlgorithm::Pbkdf2Sha256 { iterations: p0 }
            }
            _ => return Err(CofferError::auth_failed()),
        };
        let aead = AeadAlgorithm::from_wire_id(aead_id).map_err(|_| CofferError::auth_failed())?;

        let salt_len = cursor.take_u8()? as usize;
        let salt = cursor.take_bytes(salt_len)?;
        let nonce_len = cursor.take_u8()? as usize;
        let nonce = cursor.take_bytes(nonce_len)?;
        let ct_len = cursor.take_u32()? as usize;
        let ciphertext = cursor.take_bytes(ct_len)?;

        if !cursor.is_empty() {
            return Err(CofferError::auth_failed());
        }

        Ok(Self { version, kdf, aead, salt, nonce, ciphertext })
    }
}

/// Bounds-checked reader over the binary blob layout
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take_u8(&mut self) -> CofferResult<u8> {
        let byte = *self.data.get(self.pos).ok_or_else(CofferError::auth_failed)?;
        self.pos += 1;
        Ok(byte)
    }

    fn take_u32(&mut self) -> CofferResult<u32> {
        let slice = self
            .data
            .get(self.pos..self.pos + 4)
            .ok_or_else(CofferError::auth_failed)?;
        self.pos += 4;
        Ok(u32::from_be_bytes(slice.try_into().expect("sized above")))
    }

    fn take_bytes(&mut self, len: usize) -> CofferResult<Vec<u8>> {
        let slice = self
            .data
            .get(self.pos..self.pos + len)
            .ok_or_else(CofferError::auth_failed)?;
        self.pos += len;
        Ok(slice.to_vec())
    }

    fn is_empty(&self) -> bool {
        self.pos == self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn fast_kdf() -> KdfAlgorithm {
        KdfAlgorithm::Pbkdf2Sha256 { iterations: 1000 }
    }

    #[test]
    fn test_seal_open_roundtrip() {
        let blob = SealedBlob::seal(b"the mnemonic", b"pw", fast_kdf(), AeadAlgorithm::Aes256Gcm)
            .unwrap();
        let plaintext = blob.open(b"pw").unwrap();
        assert_eq!(plaintext.as_slice(), b"the mnemonic");
    }

    #[test]
    fn test_wrong_password_is_auth_failure() {
        let blob = SealedBlob::seal(b"data", b"pw", fast_kdf(), AeadAlgorithm::Aes256Gcm).unwrap();
        assert_eq!(blob.open(b"wrong").unwrap_err().code, ErrorCode::AuthFailed);
    }

    #[test]
    fn test_fresh_salt_and_nonce_per_seal() {
        let a = SealedBlob::seal(b"x", b"pw", fast_kdf(), AeadAlgorithm::Aes256Gcm).unwrap();
        let b = SealedBlob::seal(b"x", b"pw", fast_kdf(), AeadAlgorithm::Aes256Gcm).unwrap();
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn test_hex_roundtrip_all_kdfs() {
        for kdf in [
            KdfAlgorithm::Scrypt { log_n: 4, r: 8, p: 1 },
            KdfAlgorithm::Argon2id { m_cost: 256, t_cost: 1, p_cost: 1 },
            fast_kdf(),
        ] {
            for aead in [AeadAlgorithm::Aes256Gcm, AeadAlgorithm::ChaCha20Poly1305] {
                let blob = SealedBlob::seal(b"payload", b"pw", kdf, aead).unwrap();
                let decoded = SealedBlob::decode(&blob.encode_hex()).unwrap();
                assert_eq!(decoded, blob);
                assert_eq!(decoded.open(b"pw").unwrap().as_slice(), b"payload");
            }
        }
    }

    #[test]
    fn test_json_roundtrip() {
        let blob =
            SealedBlob::seal(b"payload", b"pw", fast_kdf(), AeadAlgorithm::ChaCha20Poly1305)
                .unwrap();
        let json = blob.encode_json().unwrap();
        assert!(json.starts_with('{'));
        let decoded = SealedBlob::decode(&json).unwrap();
        assert_eq!(decoded, blob);
        assert_eq!(decoded.open(b"pw").unwrap().as_slice(), b"payload");
    }

    #[test]
    fn test_hex_bit_flip_is_auth_failure() {
        let blob = SealedBlob::seal(b"payload", b"pw", fast_kdf(), AeadAlgorithm::Aes256Gcm)
            .unwrap();
        let encoded = blob.encode_hex();

        // Flip one nibble at every position; whether the blob still
        // parses or not, opening must fail the same way.
        for i in 0..encoded.len() {
            let mut mangled: Vec<char> = encoded.chars().collect();
            mangled[i] = if mangled[i] == '0' { '1' } else { '0' };
            let mangled: String = mangled.into_iter().collect();
            if mangled == encoded {
                continue;
            }

            let outcome = SealedBlob::decode(&mangled).and_then(|b| b.open(b"pw").map(|_| ()));
            let err = outcome.expect_err(&format!("undetected flip at offset {}", i));
            assert_eq!(err.code, ErrorCode::AuthFailed, "offset {}", i);
        }
    }

    #[test]
    fn test_truncated_hex_is_auth_failure() {
        let blob = SealedBlob::seal(b"payload", b"pw", fast_kdf(), AeadAlgorithm::Aes256Gcm)
            .unwrap();
        let encoded = blob.encode_hex();
        let truncated = &encoded[..encoded.len() - 8];
        assert_eq!(
            SealedBlob::decode(truncated).unwrap_err().code,
            ErrorCode::AuthFailed
        );
    }

    #[test]
    fn test_garbage_json_is_auth_failure() {
        assert_eq!(
            SealedBlob::decode("{\"not\":\"a blob\"}").unwrap_err().code,
            ErrorCode::AuthFailed
        );
    }

    #[test]
    fn test_cancelled_seal_surfaces() {
        let token = CancelToken::new();
        token.cancel();
        let result = SealedBlob::seal_cancellable(
            b"data",
            b"pw",
            fast_kdf(),
            AeadAlgorithm::Aes256Gcm,
            Some(&token),
        );
        assert_eq!(result.unwrap_err().code, ErrorCode::Cancelled);
    }

    #[test]
    fn test_default_parameters() {
        let kdf = KdfAlgorithm::default();
        assert_eq!(kdf, KdfAlgorithm::Scrypt { log_n: 15, r: 8, p: 1 });
        assert_eq!(AeadAlgorithm::default(), AeadAlgorithm::Aes256Gcm);
    }
}
