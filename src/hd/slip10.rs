//! SLIP-0010 Ed25519 Derivation
//!
//! Master key: HMAC-SHA-512 keyed with "ed25519 seed" over the BIP-39
//! seed. Children: HMAC-SHA-512(chain_code, 0x00 || key || index), with
//! every index hardened (SLIP-0010 defines no non-hardened derivation
//! for Ed25519).
//!
//! SECURITY: Key and chain code are zeroized on drop.

use ed25519_dalek::SigningKey;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CofferError, CofferResult};
use crate::hd::path::HARDENED;

type HmacSha512 = Hmac<Sha512>;

/// An extended Ed25519 key: private scalar seed plus chain code
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Slip10Key {
    key: [u8; 32],
    chain_code: [u8; 32],
    #[zeroize(skip)]
    depth: u8,
    #[zeroize(skip)]
    child_number: u32,
}

impl Slip10Key {
    /// Master key from a BIP-39 seed
    pub fn from_seed(seed: &[u8]) -> CofferResult<Self> {
        if seed.len() < 16 {
            return Err(CofferError::crypto_error(
                "seed must be at least 16 bytes",
            ));
        }

        let mut mac = HmacSha512::new_from_slice(b"ed25519 seed")
            .map_err(|e| CofferError::crypto_error(format!("HMAC init failed: {}", e)))?;
        mac.update(seed);
        let digest = mac.finalize().into_bytes();

        let mut key = [0u8; 32];
        let mut chain_code = [0u8; 32];
        key.copy_from_slice(&digest[..32]);
        chain_code.copy_from_slice(&digest[32..]);

        Ok(Self {
            key,
            chain_code,
            depth: 0,
            child_number: 0,
        })
    }

    /// Derive a child. The hardened bit is forced on: Ed25519 has no
    /// public-key derivation, so a non-hardened index is silently
    /// promoted to its hardened sibling.
    pub fn derive_child(&self, index: u32) -> CofferResult<Self> {
        let index = index | HARDENED;

        let mut mac = HmacSha512::new_from_slice(&self.chain_code)
            .map_err(|e| CofferError::crypto_error(format!("HMAC init failed: {}", e)))?;
        mac.update(&[0x00]);
        mac.update(&self.key);
        mac.update(&index.to_be_bytes());
        let digest = mac.finalize().into_bytes();

        let mut key = [0u8; 32];
        let mut chain_code = [0u8; 32];
        key.copy_from_slice(&digest[..32]);
        chain_code.copy_from_slice(&digest[32..]);

        Ok(Self {
            key,
            chain_code,
            depth: self.depth.wrapping_add(1),
            child_number: index,
        })
    }

    /// Raw 32-byte private key seed
    pub fn private_key_bytes(&self) -> &[u8; 32] {
        &self.key
    }

    /// 32-byte Ed25519 public key
    pub fn public_key(&self) -> [u8; 32] {
        SigningKey::from_bytes(&self.key).verifying_key().to_bytes()
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn child_number(&self) -> u32 {
        self.child_number
    }

    /// Rebuild from serialized parts (see `keys` for the wire layout)
    pub fn from_parts(depth: u8, child_number: u32, chain_code: [u8; 32], key: [u8; 32]) -> Self {
        Self {
            key,
            chain_code,
            depth,
            child_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex32(s: &str) -> [u8; 32] {
        let bytes = hex::decode(s).unwrap();
        bytes.try_into().unwrap()
    }

    /// SLIP-0010 Ed25519 test vector 1: seed 000102030405060708090a0b0c0d0e0f
    #[test]
    fn test_slip10_vector1_master() {
        let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let master = Slip10Key::from_seed(&seed).unwrap();

        assert_eq!(
            master.chain_code(),
            &hex32("90046a93de5380a72b5e45010748567d5ea02bbf6522f979e05c0d8d8ca9fffb")
        );
        assert_eq!(
            master.private_key_bytes(),
            &hex32("2b4be7f19ee27bbf30c667b642d5f4aa69fd169872f8fc3059c08ebae2eb19e7")
        );
        assert_eq!(
            master.public_key(),
            hex32("a4b2856bfec510abab89753fac1ac0e1112364e7d250545963f135f2a33188ed")
        );
    }

    /// SLIP-0010 Ed25519 test vector 1: m/0'
    #[test]
    fn test_slip10_vector1_child() {
        let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let child = Slip10Key::from_seed(&seed).unwrap().derive_child(0).unwrap();

        assert_eq!(
            child.chain_code(),
            &hex32("8b59aa11380b624e81507a27fedda59fea6d0b779a778918a2fd3590e16e9c69")
        );
        assert_eq!(
            child.private_key_bytes(),
            &hex32("68e0fe46dfb67e368c75379acec591dad19df3cde26e63b93a8e704f1dade7a3")
        );
    }

    /// SLIP-0010 Ed25519 test vector 1: m/0'/1'/2'/2'/1000000000'
    #[test]
    fn test_slip10_vector1_deep_chain() {
        let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let mut key = Slip10Key::from_seed(&seed).unwrap();
        for index in [0u32, 1, 2, 2, 1_000_000_000] {
            key = key.derive_child(index).unwrap();
        }

        assert_eq!(
            key.private_key_bytes(),
            &hex32("8f94d394a8e8fd6b1bc2f3f49f5c47e385281d5c17e65324b0f62483e37e8793")
        );
        assert_eq!(
            key.public_key(),
            hex32("3c24da049451555d51a7014a37337aa4e12d41e485abccfa46b47dfb2af54b7a")
        );
    }

    #[test]
    fn test_hardened_bit_is_forced() {
        let seed = [9u8; 32];
        let master = Slip10Key::from_seed(&seed).unwrap();
        let plain = master.derive_child(5).unwrap();
        let hardened = master.derive_child(5 | HARDENED).unwrap();
        assert_eq!(plain.private_key_bytes(), hardened.private_key_bytes());
        assert_eq!(plain.child_number(), 5 | HARDENED);
    }

    #[test]
    fn test_short_seed_rejected() {
        assert!(Slip10Key::from_seed(&[0u8; 8]).is_err());
    }

    #[test]
    fn test_depth_tracks_chain() {
        let master = Slip10Key::from_seed(&[1u8; 32]).unwrap();
        assert_eq!(master.depth(), 0);
        let child = master.derive_child(0).unwrap();
        assert_eq!(child.depth(), 1);
    }
}
