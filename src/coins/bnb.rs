//! BNB Beacon Chain Addresses
//!
//! Same 20-byte body as an EVM address (Keccak-256, last 20 bytes of the
//! uncompressed public key hash), carried in Bech32 with the `bnb`
//! human-readable part.

use bech32::{self, Variant};

use crate::crypto::hashes::keccak256;
use crate::error::{CofferError, CofferResult};

const HRP: &str = "bnb";

pub fn encode(public_key: &[u8]) -> CofferResult<String> {
    if public_key.len() != 64 {
        return Err(CofferError::invalid_input(
            "BNB requires a 64-byte uncompressed public key (X||Y)",
        ));
    }

    let hash = keccak256(public_key);
    let body = &hash[12..];

    let converted = bech32::convert_bits(body, 8, 5, true)
        .map_err(|e| CofferError::crypto_error(format!("bech32 conversion failed: {}", e)))?;
    let mut data = Vec::with_capacity(converted.len());
    for value in converted {
        let u5 = bech32::u5::try_from_u8(value)
            .map_err(|e| CofferError::crypto_error(format!("bech32 conversion failed: {}", e)))?;
        data.push(u5);
    }

    bech32::encode(HRP, data, Variant::Bech32)
        .map_err(|e| CofferError::crypto_error(format!("bech32 encoding failed: {}", e)))
}

pub fn validate(address: &str) -> bool {
    let (hrp, data, variant) = match bech32::decode(address) {
        Ok(parts) => parts,
        Err(_) => return false,
    };

    if hrp != HRP || variant != Variant::Bech32 {
        return false;
    }

    match bech32::convert_bits(&data, 5, 8, false) {
        Ok(bytes) => bytes.len() == 20,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_shape() {
        let address = encode(&[0x42u8; 64]).unwrap();
        assert!(address.starts_with("bnb1"));
        assert!(validate(&address));
    }

    #[test]
    fn test_deterministic() {
        let a = encode(&[0x42u8; 64]).unwrap();
        let b = encode(&[0x42u8; 64]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_validate_rejects_other_hrp() {
        // Valid bech32, wrong network prefix
        assert!(!validate("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"));
    }

    #[test]
    fn test_validate_rejects_mangled_checksum() {
        let mut address = encode(&[0x42u8; 64]).unwrap();
        let last = address.pop().unwrap();
        address.push(if last == 'q' { 'p' } else { 'q' });
        assert!(!validate(&address));
    }

    #[test]
    fn test_wrong_key_length_rejected() {
        assert!(encode(&[0u8; 20]).is_err());
    }
}
