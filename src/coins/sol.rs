//! Solana Addresses
//!
//! The address is the 32-byte Ed25519 public key itself, Base58-encoded.

use crate::error::{CofferError, CofferResult};

pub fn encode(public_key: &[u8]) -> CofferResult<String> {
    if public_key.len() != 32 {
        return Err(CofferError::invalid_input(
            "SOL requires a 32-byte Ed25519 public key",
        ));
    }

    Ok(bs58::encode(public_key).into_string())
}

pub fn validate(address: &str) -> bool {
    match bs58::decode(address).into_vec() {
        Ok(bytes) => bytes.len() == 32,
        Err(_) => false,
    }
}
