//! Hash Helpers
//!
//! Thin wrappers over the digest crates so callers never juggle hasher
//! state. Keccak-256 is the original Keccak (pre-NIST padding) required
//! for EVM addresses, not SHA3-256.

use bitcoin::hashes::Hash;
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest as BlakeDigest};
use sha2::{Digest, Sha256, Sha512};
use tiny_keccak::{Hasher, Keccak};

type Blake2b256 = Blake2b<U32>;

/// SHA-256
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA-512
pub fn sha512(data: &[u8]) -> [u8; 64] {
    let mut hasher = Sha512::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Double SHA-256 (Base58Check checksums)
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    bitcoin::hashes::sha256d::Hash::hash(data).to_byte_array()
}

/// RIPEMD-160
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    bitcoin::hashes::ripemd160::Hash::hash(data).to_byte_array()
}

/// RIPEMD-160 of SHA-256 (Bitcoin public key hash)
pub fn hash160(data: &[u8]) -> [u8; 20] {
    bitcoin::hashes::hash160::Hash::hash(data).to_byte_array()
}

/// Keccak-256 (used for EVM addresses)
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

/// BLAKE2b-256 (Sui address derivation)
pub fn blake2b256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_empty_vector() {
        assert_eq!(
            hex::encode(sha256(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_sha512_abc_vector() {
        assert_eq!(
            hex::encode(sha512(b"abc")),
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
             2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
        );
    }

    #[test]
    fn test_keccak256_is_not_sha3() {
        // Keccak-256 of empty input; SHA3-256 would give a76... instead.
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_hash160_matches_composition() {
        let data = b"public key bytes";
        assert_eq!(hash160(data), ripemd160(&sha256(data)));
    }

    #[test]
    fn test_sha256d_matches_composition() {
        let data = b"checksum input";
        assert_eq!(sha256d(data), sha256(&sha256(data)));
    }

    #[test]
    fn test_blake2b256_length() {
        let out = blake2b256(b"sui");
        assert_eq!(out.len(), 32);
        assert_ne!(out, [0u8; 32]);
    }
}
