//! BIP-44 Derivation Paths
//!
//! Parses and formats five-level paths `m/purpose'/coin'/account'/change/index`.
//! Hardened segments carry the high bit; the account anchor form zeroes
//! the change and address-index positions.

use std::fmt;

use crate::error::{CofferError, CofferResult};

/// Hardened derivation marker (BIP-32)
pub const HARDENED: u32 = 0x8000_0000;

/// A parsed five-level BIP-44 path.
///
/// Hardened components store the high bit set; `change` and
/// `address_index` are plain indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivationPath {
    pub purpose: u32,
    pub coin_type: u32,
    pub account_index: u32,
    pub change: u32,
    pub address_index: u32,
}

impl DerivationPath {
    /// Parse a path string. Requires the `m/` prefix, exactly five
    /// numeric segments, and change ∈ {0, 1}.
    pub fn parse(path: &str) -> CofferResult<Self> {
        let rest = path
            .strip_prefix("m/")
            .ok_or_else(|| CofferError::invalid_path("path must start with 'm/'"))?;

        let components: Vec<&str> = rest.split('/').collect();
        if components.len() != 5 {
            return Err(CofferError::invalid_path(format!(
                "BIP-44 path must have exactly 5 components, got {}",
                components.len()
            )));
        }

        let purpose = parse_component(components[0])?;
        let coin_type = parse_component(components[1])?;
        let account_index = parse_component(components[2])?;

        let change = parse_component(components[3])?;
        if change != 0 && change != 1 {
            return Err(CofferError::invalid_path(format!(
                "change must be 0 or 1, got component '{}'",
                components[3]
            )));
        }

        let address_index = parse_component(components[4])?;
        if address_index & HARDENED != 0 {
            return Err(CofferError::invalid_path(
                "address index must be non-hardened",
            ));
        }

        Ok(Self {
            purpose,
            coin_type,
            account_index,
            change,
            address_index,
        })
    }

    /// The account anchor: same prefix, change and address index zeroed
    pub fn mask_suffix(&self) -> Self {
        Self {
            change: 0,
            address_index: 0,
            ..*self
        }
    }

    /// The three account-level components in derivation order
    pub fn account_components(&self) -> [u32; 3] {
        [self.purpose, self.coin_type, self.account_index]
    }
}

/// Parse one component; a trailing apostrophe sets the hardened bit
fn parse_component(component: &str) -> CofferResult<u32> {
    let (digits, hardened) = match component.strip_suffix('\'') {
        Some(digits) => (digits, true),
        None => (component, false),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CofferError::invalid_path(format!(
            "invalid path component '{}'",
            component
        )));
    }

    let value: u32 = digits.parse().map_err(|_| {
        CofferError::invalid_path(format!("path component out of range: '{}'", component))
    })?;
    if value & HARDENED != 0 {
        return Err(CofferError::invalid_path(format!(
            "path component out of range: '{}'",
            component
        )));
    }

    Ok(if hardened { value | HARDENED } else { value })
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for value in [
            self.purpose,
            self.coin_type,
            self.account_index,
            self.change,
            self.address_index,
        ] {
            if value & HARDENED != 0 {
                write!(f, "/{}'", value & !HARDENED)?;
            } else {
                write!(f, "/{}", value)?;
            }
        }
        Ok(())
    }
}
