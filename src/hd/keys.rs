//! Extended Keys
//!
//! One type over both curves the wallet derives on. secp256k1 keys are
//! the `bitcoin` crate's `Xpriv` (BIP-32 semantics and serialization);
//! Ed25519 keys are SLIP-0010 (`slip10`).
//!
//! # Wire layout
//!
//! Serialized extended keys carry a one-byte curve tag so the two forms
//! interoperate across implementations:
//!
//! ```text
//! 0x00 || BIP-32 extended private key (78 bytes: version, depth,
//!         parent fingerprint, child number, chain code, 0x00 || key)
//! 0x01 || depth (1) || child number (4, big-endian) ||
//!         chain code (32) || key (32)
//! ```

use bitcoin::bip32::{ChildNumber, Xpriv};
use bitcoin::secp256k1::Secp256k1;
use zeroize::Zeroizing;

use crate::error::{CofferError, CofferResult};
use crate::hd::slip10::Slip10Key;
use crate::types::{Coin, Curve};

const TAG_SECP256K1: u8 = 0x00;
const TAG_ED25519: u8 = 0x01;

/// A private extended key on either supported curve
pub enum ExtendedKey {
    Secp256k1(Xpriv),
    Ed25519(Slip10Key),
}

impl ExtendedKey {
    /// Master key for `curve` from a BIP-39 seed
    pub fn master_from_seed(curve: Curve, seed: &[u8]) -> CofferResult<Self> {
        match curve {
            Curve::Secp256k1 => {
                let xprv = Xpriv::new_master(bitcoin::Network::Bitcoin, seed)
                    .map_err(|e| CofferError::crypto_error(format!("master key derivation failed: {}", e)))?;
                Ok(ExtendedKey::Secp256k1(xprv))
            }
            Curve::Ed25519 => Ok(ExtendedKey::Ed25519(Slip10Key::from_seed(seed)?)),
        }
    }

    pub fn curve(&self) -> Curve {
        match self {
            ExtendedKey::Secp256k1(_) => Curve::Secp256k1,
            ExtendedKey::Ed25519(_) => Curve::Ed25519,
        }
    }

    /// Derive one child. The index carries the hardened bit for
    /// secp256k1; Ed25519 children are always hardened (SLIP-0010).
    ///
    /// A secp256k1 derivation can fail for an index whose tweak falls
    /// outside the curve order; the error names the index so the caller
    /// can retry the next one. Nothing is persisted for a failed
    /// derivation.
    pub fn derive_child(&self, index: u32) -> CofferResult<Self> {
        match self {
            ExtendedKey::Secp256k1(xprv) => {
                let secp = Secp256k1::new();
                let child = xprv
                    .derive_priv(&secp, &[ChildNumber::from(index)])
                    .map_err(|e| {
                        CofferError::crypto_error(format!(
                            "child derivation failed at index {}: {}",
                            index, e
                        ))
                    })?;
                Ok(ExtendedKey::Secp256k1(child))
            }
            ExtendedKey::Ed25519(key) => Ok(ExtendedKey::Ed25519(key.derive_child(index)?)),
        }
    }

    /// Derive along a component list in order
    pub fn derive_path(&self, components: &[u32]) -> CofferResult<Self> {
        let mut current = self.try_clone();
        for &index in components {
            current = current.derive_child(index)?;
        }
        Ok(current)
    }

    /// Raw 32-byte private key (scalar for secp256k1, seed for Ed25519)
    pub fn private_key_bytes(&self) -> Zeroizing<[u8; 32]> {
        match self {
            ExtendedKey::Secp256k1(xprv) => Zeroizing::new(xprv.private_key.secret_bytes()),
            ExtendedKey::Ed25519(key) => Zeroizing::new(*key.private_key_bytes()),
        }
    }

    /// Public key in the byte form `coin`'s address encoder consumes:
    /// 33-byte compressed for BTC, 64-byte uncompressed X||Y for
    /// ETH/BNB, 32-byte Ed25519 point for SOL/SUI.
    pub fn public_key_for_coin(&self, coin: Coin) -> CofferResult<Vec<u8>> {
        if coin.curve() != self.curve() {
            return Err(CofferError::crypto_error(format!(
                "{} key requested from a {:?} extended key",
                coin.symbol(),
                self.curve()
            )));
        }

        match self {
            ExtendedKey::Secp256k1(xprv) => {
                let secp = Secp256k1::new();
                let public = xprv.private_key.public_key(&secp);
                match coin {
                    Coin::Btc => Ok(public.serialize().to_vec()),
                    Coin::Eth | Coin::Bnb => Ok(public.serialize_uncompressed()[1..].to_vec()),
                    _ => unreachable!("curve checked above"),
                }
            }
            ExtendedKey::Ed25519(key) => Ok(key.public_key().to_vec()),
        }
    }

    /// Serialize with the curve tag prefix (layout in the module docs)
    pub fn serialize(&self) -> Zeroizing<Vec<u8>> {
        match self {
            ExtendedKey::Secp256k1(xprv) => {
                let mut out = Vec::with_capacity(79);
                out.push(TAG_SECP256K1);
                out.extend_from_slice(&xprv.encode());
                Zeroizing::new(out)
            }
            ExtendedKey::Ed25519(key) => {
                let mut out = Vec::with_capacity(70);
                out.push(TAG_ED25519);
                out.push(key.depth());
                out.extend_from_slice(&key.child_number().to_be_bytes());
                out.extend_from_slice(key.chain_code());
                out.extend_from_slice(key.private_key_bytes());
                Zeroizing::new(out)
            }
        }
    }

    pub fn deserialize(bytes: &[u8]) -> CofferResult<Self> {
        match bytes.split_first() {
            Some((&TAG_SECP256K1, rest)) => {
                let xprv = Xpriv::decode(rest)
                    .map_err(|e| CofferError::crypto_error(format!("invalid extended key: {}", e)))?;
                Ok(ExtendedKey::Secp256k1(xprv))
            }
            Some((&TAG_ED25519, rest)) => {
                if rest.len() != 69 {
                    return Err(CofferError::crypto_error("invalid extended key length"));
                }
                let depth = rest[0];
                let child_number = u32::from_be_bytes(rest[1..5].try_into().expect("sized above"));
                let mut chain_code = [0u8; 32];
                chain_code.copy_from_slice(&rest[5..37]);
                let mut key = [0u8; 32];
                key.copy_from_slice(&rest[37..69]);
                Ok(ExtendedKey::Ed25519(Slip10Key::from_parts(
                    depth,
                    child_number,
                    chain_code,
                    key,
                )))
            }
            _ => Err(CofferError::crypto_error("invalid extended key tag")),
        }
    }

    fn try_clone(&self) -> Self {
        match self {
            ExtendedKey::Secp256k1(xprv) => ExtendedKey::Secp256k1(*xprv),
            ExtendedKey::Ed25519(key) => ExtendedKey::Ed25519(Slip10Key::from_parts(
                key.depth(),
                key.child_number(),
                *key.chain_code(),
                *key.private_key_bytes(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hd::path::HARDENED;

    /// BIP-32 test vector 1, seed 000102030405060708090a0b0c0d0e0f:
    /// extended private keys down the chain m/0'/1/2'/2/1000000000.
    #[test]
    fn test_bip32_vector1_chain() {
        let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let mut key = ExtendedKey::master_from_seed(Curve::Secp256k1, &seed).unwrap();

        let expected = [
            "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi",
            "xprv9uHRZZhk6KAJC1avXpDAp4MDc3sQKNxDiPvvkX8Br5ngLNv1TxvUxt4cV1rGL5hj6KCesnDYUhd7oWgT11eZG7XnxHrnYeSvkzY7d2bhkJ7",
            "xprv9wTYmMFdV23N2TdNG573QoEsfRrWKQgWeibmLntzniatZvR9BmLnvSxqu53Kw1UmYPxLgboyZQaXwTCg8MSY3H2EU4pWcQDnRnrVA1xe8fs",
            "xprv9z4pot5VBttmtdRTWfWQmoH1taj2axGVzFqSb8C9xaxKymcFzXBDptWmT7FwuEzG3ryjH4ktypQSAewRiNMjANTtpgP4mLTj34bhnZX7UiM",
            "xprvA2JDeKCSNNZky6uBCviVfJSKyQ1mDYahRjijr5idH2WwLsEd4Hsb2Tyh8RfQMuPh7f7RtyzTtdrbdqqsunu5Mm3wDvUAKRHSC34sJ7in334",
            "xprvA41z7zogVVwxVSgdKUHDy1SKmdb533PjDz7J6N6mV6uS3ze1ai8FHa8kmHScGpWmj4WggLyQjgPie1rFSruoUihUZREPSL39UNdE3BBDu76",
        ];
        let steps = [
            HARDENED,       // m/0'
            1,              // m/0'/1
            2 | HARDENED,   // m/0'/1/2'
            2,              // m/0'/1/2'/2
            1_000_000_000,  // m/0'/1/2'/2/1000000000
        ];

        let master_string = match &key {
            ExtendedKey::Secp256k1(xprv) => xprv.to_string(),
            _ => unreachable!(),
        };
        assert_eq!(master_string, expected[0]);

        for (step, want) in steps.iter().zip(&expected[1..]) {
            key = key.derive_child(*step).unwrap();
            let got = match &key {
                ExtendedKey::Secp256k1(xprv) => xprv.to_string(),
                _ => unreachable!(),
            };
            assert_eq!(&got, want);
        }
    }

    #[test]
    fn test_serialize_roundtrip_secp() {
        let seed = [3u8; 64];
        let key = ExtendedKey::master_from_seed(Curve::Secp256k1, &seed)
            .unwrap()
            .derive_path(&[44 | HARDENED, HARDENED, HARDENED])
            .unwrap();

        let bytes = key.serialize();
        assert_eq!(bytes[0], TAG_SECP256K1);
        assert_eq!(bytes.len(), 79);

        let back = ExtendedKey::deserialize(&bytes).unwrap();
        assert_eq!(
            back.private_key_bytes().as_slice(),
            key.private_key_bytes().as_slice()
        );
        let child_a = key.derive_child(0).unwrap();
        let child_b = back.derive_child(0).unwrap();
        assert_eq!(
            child_a.private_key_bytes().as_slice(),
            child_b.private_key_bytes().as_slice()
        );
    }

    #[test]
    fn test_serialize_roundtrip_ed25519() {
        let seed = [5u8; 64];
        let key = ExtendedKey::master_from_seed(Curve::Ed25519, &seed)
            .unwrap()
            .derive_path(&[44 | HARDENED, 501 | HARDENED, HARDENED])
            .unwrap();

        let bytes = key.serialize();
        assert_eq!(bytes[0], TAG_ED25519);
        assert_eq!(bytes.len(), 70);

        let back = ExtendedKey::deserialize(&bytes).unwrap();
        let child_a = key.derive_child(0).unwrap();
        let child_b = back.derive_child(0).unwrap();
        assert_eq!(
            child_a.private_key_bytes().as_slice(),
            child_b.private_key_bytes().as_slice()
        );
    }

    #[test]
    fn test_deserialize_rejects_garbage() {
        assert!(ExtendedKey::deserialize(&[]).is_err());
        assert!(ExtendedKey::deserialize(&[0x07, 1, 2, 3]).is_err());
        assert!(ExtendedKey::deserialize(&[TAG_ED25519, 0, 0]).is_err());
    }

    #[test]
    fn test_public_key_forms() {
        let seed = [7u8; 64];
        let secp_key = ExtendedKey::master_from_seed(Curve::Secp256k1, &seed).unwrap();
        assert_eq!(secp_key.public_key_for_coin(Coin::Btc).unwrap().len(), 33);
        assert_eq!(secp_key.public_key_for_coin(Coin::Eth).unwrap().len(), 64);

        let ed_key = ExtendedKey::master_from_seed(Curve::Ed25519, &seed).unwrap();
        assert_eq!(ed_key.public_key_for_coin(Coin::Sol).unwrap().len(), 32);
    }

    #[test]
    fn test_curve_mismatch_rejected() {
        let seed = [7u8; 64];
        let secp_key = ExtendedKey::master_from_seed(Curve::Secp256k1, &seed).unwrap();
        assert!(secp_key.public_key_for_coin(Coin::Sol).is_err());

        let ed_key = ExtendedKey::master_from_seed(Curve::Ed25519, &seed).unwrap();
        assert!(ed_key.public_key_for_coin(Coin::Eth).is_err());
    }
}
