//! Bitcoin P2PKH Addresses
//!
//! Compressed public key → SHA-256 → RIPEMD-160 → version 0x00 →
//! Base58Check. Mainnet legacy addresses always start with '1'.

use crate::crypto::hashes::{hash160, sha256d};
use crate::error::{CofferError, CofferResult};

const VERSION_P2PKH: u8 = 0x00;
const CHECKSUM_LEN: usize = 4;

pub fn encode(public_key: &[u8]) -> CofferResult<String> {
    if public_key.len() != 33 {
        return Err(CofferError::invalid_input(
            "BTC requires a 33-byte compressed public key",
        ));
    }

    let pubkey_hash = hash160(public_key);

    let mut payload = Vec::with_capacity(21 + CHECKSUM_LEN);
    payload.push(VERSION_P2PKH);
    payload.extend_from_slice(&pubkey_hash);

    let checksum = sha256d(&payload);
    payload.extend_from_slice(&checksum[..CHECKSUM_LEN]);

    Ok(bs58::encode(payload).into_string())
}

pub fn validate(address: &str) -> bool {
    let decoded = match bs58::decode(address).into_vec() {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    if decoded.len() != 1 + 20 + CHECKSUM_LEN || decoded[0] != VERSION_P2PKH {
        return false;
    }

    let (payload, checksum) = decoded.split_at(21);
    sha256d(payload)[..CHECKSUM_LEN] == *checksum
}
