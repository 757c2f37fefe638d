//! Shared Types
//!
//! The coin registry and the record shapes that cross module boundaries.
//! Field names mirror the on-disk JSON exactly; changing them breaks
//! existing data directories.

use serde::{Deserialize, Serialize};

use crate::error::{CofferError, CofferResult};
use crate::hd::path::HARDENED;

/// Supported coins, closed set.
///
/// Adding a coin means extending this enum and the dispatch tables in
/// `coins`; there is no dynamic registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Coin {
    Btc,
    Eth,
    Sol,
    Bnb,
    Sui,
}

/// Signature curve a coin derives on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curve {
    Secp256k1,
    Ed25519,
}

impl Coin {
    pub const ALL: [Coin; 5] = [Coin::Btc, Coin::Eth, Coin::Sol, Coin::Bnb, Coin::Sui];

    /// SLIP-44 coin type (without the hardened bit)
    pub fn coin_type(&self) -> u32 {
        match self {
            Coin::Btc => 0,
            Coin::Eth => 60,
            Coin::Sol => 501,
            Coin::Bnb => 714,
            Coin::Sui => 784,
        }
    }

    /// Look up a coin by SLIP-44 type; tolerates the hardened bit
    pub fn from_coin_type(coin_type: u32) -> Option<Coin> {
        match coin_type & !HARDENED {
            0 => Some(Coin::Btc),
            60 => Some(Coin::Eth),
            501 => Some(Coin::Sol),
            714 => Some(Coin::Bnb),
            784 => Some(Coin::Sui),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Coin::Btc => "BTC",
            Coin::Eth => "ETH",
            Coin::Sol => "SOL",
            Coin::Bnb => "BNB",
            Coin::Sui => "SUI",
        }
    }

    pub fn curve(&self) -> Curve {
        match self {
            Coin::Btc | Coin::Eth | Coin::Bnb => Curve::Secp256k1,
            Coin::Sol | Coin::Sui => Curve::Ed25519,
        }
    }
}

/// The single record of the master secret.
///
/// Both blobs must open with the same password; never mutated after
/// creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootWalletRecord {
    /// Sealed mnemonic phrase (legacy hex blob encoding)
    pub encrypted_mnemonic: String,
    /// Sealed 64-byte BIP-39 seed (legacy hex blob encoding)
    pub encrypted_seed: String,
    /// Unix seconds at creation
    pub creation_time: u64,
}

/// A derivation anchor for one coin and account index.
///
/// `derivation_path` always stores the account-level anchor: the change
/// and address-index positions are zeroed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinAccount {
    pub id: String,
    pub coin_symbol: String,
    pub derivation_path: String,
    /// Sealed BIP-32/SLIP-0010 extended key at depth 3
    pub encrypted_account_private_key: String,
}

impl CoinAccount {
    /// Coin type parsed back out of the stored path (hardened bit kept)
    pub fn coin_type(&self) -> CofferResult<u32> {
        let parsed = crate::hd::path::DerivationPath::parse(&self.derivation_path)?;
        Ok(parsed.coin_type)
    }

    pub fn coin(&self) -> CofferResult<Coin> {
        let coin_type = self.coin_type()?;
        Coin::from_coin_type(coin_type)
            .ok_or_else(|| CofferError::unsupported_coin(format!("coin type {}", coin_type & !HARDENED)))
    }
}

/// A leaf derivation: one address under one account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressKey {
    #[serde(rename = "accountID")]
    pub account_id: String,
    /// 0 = external, 1 = internal change
    pub change_type: u32,
    pub address_index: u32,
    /// Sealed raw child private key bytes
    pub encrypted_private_key: String,
    /// Hex-encoded public key
    pub public_key: String,
    /// Coin-specific address encoding of `public_key`
    pub address: String,
    pub coin_symbol: String,
}
