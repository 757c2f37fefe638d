//! Mnemonic and Seed
//!
//! BIP-39 entropy/mnemonic conversion and seed expansion.
//!
//! SECURITY: Entropy and seeds are zeroized on drop; the mnemonic string
//! itself is returned to the caller, who owns its lifetime.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha512;
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::csprng_bytes;
use crate::error::{CofferError, CofferResult};

/// Permitted entropy strengths in bits
pub const VALID_STRENGTHS: [u32; 5] = [128, 160, 192, 224, 256];

/// PBKDF2 round count fixed by BIP-39
const SEED_ROUNDS: u32 = 2048;

/// Generate a fresh mnemonic from `strength` bits of OS entropy.
///
/// Word count follows from strength: 128 → 12 words up to 256 → 24.
pub fn generate_mnemonic(strength: u32) -> CofferResult<String> {
    if !VALID_STRENGTHS.contains(&strength) {
        return Err(CofferError::invalid_input(format!(
            "mnemonic strength must be one of {:?}, got {}",
            VALID_STRENGTHS, strength
        )));
    }

    let mut entropy = Zeroizing::new(csprng_bytes((strength / 8) as usize));
    let mnemonic = bip39::Mnemonic::from_entropy(entropy.as_ref())
        .map_err(|e| CofferError::crypto_error(format!("failed to create mnemonic: {}", e)))?;
    entropy.zeroize();

    Ok(mnemonic.to_string())
}

/// Map raw entropy to its mnemonic encoding (checksum appended per BIP-39)
pub fn entropy_to_mnemonic(entropy: &[u8]) -> CofferResult<String> {
    let bits = entropy.len() as u32 * 8;
    if !VALID_STRENGTHS.contains(&bits) {
        return Err(CofferError::invalid_input(format!(
            "entropy must be 16/20/24/28/32 bytes, got {}",
            entropy.len()
        )));
    }
    let mnemonic = bip39::Mnemonic::from_entropy(entropy)
        .map_err(|e| CofferError::crypto_error(format!("failed to create mnemonic: {}", e)))?;
    Ok(mnemonic.to_string())
}

/// Recover the entropy a valid mnemonic encodes
pub fn mnemonic_to_entropy(mnemonic: &str) -> CofferResult<Vec<u8>> {
    let parsed = parse_strict(mnemonic)?;
    Ok(parsed.to_entropy())
}

/// Validate word count, wordlist membership, and checksum.
///
/// Leading/trailing whitespace is trimmed first; any interior whitespace
/// other than single ASCII spaces fails validation.
pub fn validate_mnemonic(mnemonic: &str) -> bool {
    parse_strict(mnemonic).is_ok()
}

/// Expand a mnemonic to its 64-byte seed.
///
/// PBKDF2-HMAC-SHA-512, 2048 rounds, salt = "mnemonic" + passphrase.
/// The passphrase here is the cloak: independent of the keystore
/// password, and changing it changes every derived address.
pub fn seed_from_mnemonic(mnemonic: &str, passphrase: &str) -> CofferResult<Zeroizing<[u8; 64]>> {
    let parsed = parse_strict(mnemonic)?;
    let phrase = parsed.to_string();

    let mut salt = Vec::with_capacity(8 + passphrase.len());
    salt.extend_from_slice(b"mnemonic");
    salt.extend_from_slice(passphrase.as_bytes());

    let mut seed = Zeroizing::new([0u8; 64]);
    pbkdf2_hmac::<Sha512>(phrase.as_bytes(), &salt, SEED_ROUNDS, seed.as_mut());
    salt.zeroize();

    Ok(seed)
}

/// Parse with the whitespace rules above enforced before checksum checks
fn parse_strict(mnemonic: &str) -> CofferResult<bip39::Mnemonic> {
    let trimmed = mnemonic.trim();
    if trimmed.is_empty() {
        return Err(CofferError::invalid_mnemonic("empty mnemonic"));
    }
    // Interior separators must be exactly one ASCII space. split(' ')
    // yields an empty token for doubled spaces and keeps tabs/newlines
    // glued to words, so both are caught by the wordlist check below.
    if trimmed.split(' ').any(|w| w.is_empty() || w.chars().any(char::is_whitespace)) {
        return Err(CofferError::invalid_mnemonic(
            "words must be separated by single spaces",
        ));
    }

    let word_count = trimmed.split(' ').count();
    if ![12, 15, 18, 21, 24].contains(&word_count) {
        return Err(CofferError::invalid_mnemonic(format!(
            "mnemonic must have 12/15/18/21/24 words, got {}",
            word_count
        )));
    }

    bip39::Mnemonic::parse(trimmed)
        .map_err(|e| CofferError::invalid_mnemonic(format!("invalid mnemonic: {}", e)))
}
