//! Coin Address Codecs
//!
//! Public key to address for each supported coin, plus the inverse
//! format check. Dispatch is a closed match over `Coin`; new coins are
//! added here and in the `Coin` enum, never registered dynamically.

mod bnb;
mod btc;
mod eth;
mod sol;
mod sui;

use crate::error::CofferResult;
use crate::types::Coin;

/// Encode a public key as a coin address.
///
/// The expected key form differs per coin: 33-byte compressed secp256k1
/// for BTC, 64-byte uncompressed X||Y for ETH/BNB, 32-byte Ed25519 for
/// SOL/SUI. A wrong length is an input error.
pub fn encode_address(coin: Coin, public_key: &[u8]) -> CofferResult<String> {
    match coin {
        Coin::Btc => btc::encode(public_key),
        Coin::Eth => eth::encode(public_key),
        Coin::Bnb => bnb::encode(public_key),
        Coin::Sol => sol::encode(public_key),
        Coin::Sui => sui::encode(public_key),
    }
}

/// Check address shape, checksum, and prefix for `coin`
pub fn validate_address(coin: Coin, address: &str) -> bool {
    let trimmed = address.trim();
    match coin {
        Coin::Btc => btc::validate(trimmed),
        Coin::Eth => eth::validate(trimmed),
        Coin::Bnb => bnb::validate(trimmed),
        Coin::Sol => sol::validate(trimmed),
        Coin::Sui => sui::validate(trimmed),
    }
}
