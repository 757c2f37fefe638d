//! Cryptographic Primitives
//!
//! Password KDFs, authenticated encryption, hashes, and CSPRNG access.
//! Everything here is a standard primitive composed in a standard way;
//! no custom constructions.

pub mod aead;
pub mod hashes;
pub mod kdf;

pub use aead::{aead_open, aead_seal, AeadAlgorithm};
pub use hashes::{blake2b256, hash160, keccak256, ripemd160, sha256, sha256d, sha512};
pub use kdf::{CancelToken, KdfAlgorithm};

use rand::rngs::OsRng;
use rand::RngCore;

/// Draw `n` bytes from the operating system CSPRNG
pub fn csprng_bytes(n: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; n];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csprng_bytes_length_and_freshness() {
        let a = csprng_bytes(32);
        let b = csprng_bytes(32);
        assert_eq!(a.len(), 32);
        assert_eq!(b.len(), 32);
        assert_ne!(a, b);
    }
}
