//! Ethereum Addresses
//!
//! Keccak-256 over the 64-byte uncompressed public key body, last 20
//! bytes, rendered with the EIP-55 mixed-case checksum.

use crate::crypto::hashes::keccak256;
use crate::error::{CofferError, CofferResult};

pub fn encode(public_key: &[u8]) -> CofferResult<String> {
    if public_key.len() != 64 {
        return Err(CofferError::invalid_input(
            "ETH requires a 64-byte uncompressed public key (X||Y)",
        ));
    }

    let hash = keccak256(public_key);
    Ok(to_checksum_address(&hash[12..]))
}

/// EIP-55: uppercase the hex digit wherever the corresponding nibble of
/// keccak256(lowercase_address) is >= 8
pub fn to_checksum_address(address: &[u8]) -> String {
    let lower = hex::encode(address);
    let hash = keccak256(lower.as_bytes());

    let mut result = String::from("0x");
    for (i, ch) in lower.chars().enumerate() {
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };

        if ch.is_ascii_digit() {
            result.push(ch);
        } else if nibble >= 8 {
            result.push(ch.to_ascii_uppercase());
        } else {
            result.push(ch);
        }
    }

    result
}

pub fn validate(address: &str) -> bool {
    let hex_part = match address.strip_prefix("0x") {
        Some(rest) => rest,
        None => return false,
    };

    if hex_part.len() != 40 || !hex_part.bytes().all(|b| b.is_ascii_hexdigit()) {
        return false;
    }

    // All-lowercase and all-uppercase forms carry no checksum; mixed case
    // must match EIP-55 exactly.
    let has_lower = hex_part.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = hex_part.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        let bytes = match hex::decode(hex_part.to_ascii_lowercase()) {
            Ok(b) => b,
            Err(_) => return false,
        };
        return to_checksum_address(&bytes) == address;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eip55_reference_addresses() {
        // From the EIP-55 specification examples
        for checksummed in [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ] {
            let bytes = hex::decode(&checksummed[2..].to_ascii_lowercase()).unwrap();
            assert_eq!(to_checksum_address(&bytes), checksummed);
            assert!(validate(checksummed));
        }
    }

    #[test]
    fn test_encode_shape() {
        let address = encode(&[0xabu8; 64]).unwrap();
        assert!(address.starts_with("0x"));
        assert_eq!(address.len(), 42);
        assert!(validate(&address));
    }

    #[test]
    fn test_lowercase_accepted() {
        let address = encode(&[0xabu8; 64]).unwrap().to_ascii_lowercase();
        assert!(validate(&address));
    }

    #[test]
    fn test_bad_mixed_case_rejected() {
        let good = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
        let bad = good.replace("aA", "Aa");
        assert!(!validate(&bad));
    }

    #[test]
    fn test_wrong_shapes_rejected() {
        assert!(!validate("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
        assert!(!validate("0x5aAeb6"));
        assert!(!validate("0xZZZZb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
    }

    #[test]
    fn test_wrong_key_length_rejected() {
        assert!(encode(&[0u8; 33]).is_err());
        assert!(encode(&[0u8; 65]).is_err());
    }
}
