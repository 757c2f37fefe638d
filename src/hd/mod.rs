//! Hierarchical Deterministic Key Tree
//!
//! BIP-32 over secp256k1 for BTC/ETH/BNB, SLIP-0010 over Ed25519 for
//! SOL/SUI, and the BIP-44 path grammar shared by both.

pub mod keys;
pub mod path;
pub mod slip10;

pub use keys::ExtendedKey;
pub use path::{DerivationPath, HARDENED};
