//! Sui Addresses
//!
//! BLAKE2b-256 over a one-byte signature-scheme flag (0x00 for Ed25519)
//! followed by the 32-byte public key; rendered as 0x-prefixed hex.

use crate::crypto::hashes::blake2b256;
use crate::error::{CofferError, CofferResult};

/// Ed25519 signature scheme flag
const FLAG_ED25519: u8 = 0x00;

pub fn encode(public_key: &[u8]) -> CofferResult<String> {
    if public_key.len() != 32 {
        return Err(CofferError::invalid_input(
            "SUI requires a 32-byte Ed25519 public key",
        ));
    }

    let mut flagged = Vec::with_capacity(33);
    flagged.push(FLAG_ED25519);
    flagged.extend_from_slice(public_key);

    Ok(format!("0x{}", hex::encode(blake2b256(&flagged))))
}

pub fn validate(address: &str) -> bool {
    match address.strip_prefix("0x") {
        Some(rest) => rest.len() == 64 && rest.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_shape() {
        let address = encode(&[0x77u8; 32]).unwrap();
        assert!(address.starts_with("0x"));
        assert_eq!(address.len(), 66);
        assert!(validate(&address));
    }

    #[test]
    fn test_flag_changes_address() {
        // The flag byte is part of the hash input; hashing the bare key
        // must give a different address.
        let key = [0x77u8; 32];
        let address = encode(&key).unwrap();
        let bare = format!("0x{}", hex::encode(blake2b256(&key)));
        assert_ne!(address, bare);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(encode(&[1u8; 32]).unwrap(), encode(&[1u8; 32]).unwrap());
    }

    #[test]
    fn test_validate_rejects_eth_length() {
        assert!(!validate("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
    }

    #[test]
    fn test_validate_rejects_missing_prefix() {
        let address = encode(&[0x77u8; 32]).unwrap();
        assert!(!validate(&address[2..]));
    }

    #[test]
    fn test_wrong_key_length_rejected() {
        assert!(encode(&[0u8; 31]).is_err());
    }
}
