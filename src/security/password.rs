//! Password Vault
//!
//! Process-wide cache for the keystore password. Two states:
//! Locked (nothing cached, the initial state) and Unlocked (password
//! held in a pinned buffer). Derivations re-seal new keys and therefore
//! need the password; the seed itself is never cached, which bounds the
//! lifetime of the highest-value secret to a single operation.
//!
//! The vault is a handle, not a global: the composition root constructs
//! one and threads it into the managers that need it.

use std::sync::RwLock;

use zeroize::Zeroizing;

use crate::error::{CofferError, CofferResult};
use crate::security::memory::SecretBytes;

/// Cached-password state machine
#[derive(Default)]
pub struct PasswordVault {
    cached: RwLock<Option<SecretBytes>>,
}

impl PasswordVault {
    /// Create a vault in the Locked state
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache `password`, replacing (and zeroizing) any previous value.
    /// Transitions to Unlocked.
    pub fn store(&self, password: &[u8]) {
        let mut guard = self.cached.write().expect("password vault poisoned");
        if let Some(mut old) = guard.take() {
            old.zeroize_in_place();
        }
        *guard = Some(SecretBytes::new(password));
    }

    /// Zeroize and drop the cached password. Idempotent; transitions to
    /// Locked.
    pub fn clear(&self) {
        let mut guard = self.cached.write().expect("password vault poisoned");
        if let Some(mut old) = guard.take() {
            old.zeroize_in_place();
        }
    }

    /// Copy of the cached password, or `PasswordNotSet` while Locked.
    ///
    /// The copy zeroizes itself on drop; callers must not move the bytes
    /// out of the wrapper.
    pub fn password(&self) -> CofferResult<Zeroizing<Vec<u8>>> {
        let guard = self.cached.read().expect("password vault poisoned");
        match guard.as_ref() {
            Some(secret) => Ok(Zeroizing::new(secret.as_bytes().to_vec())),
            None => Err(CofferError::password_not_set()),
        }
    }

    /// Constant-time check of a candidate against the cached password
    /// without exposing the cached bytes.
    pub fn verify(&self, candidate: &[u8]) -> CofferResult<bool> {
        let guard = self.cached.read().expect("password vault poisoned");
        match guard.as_ref() {
            Some(secret) => Ok(secret.ct_eq(candidate)),
            None => Err(CofferError::password_not_set()),
        }
    }

    /// True while no password is cached
    pub fn is_locked(&self) -> bool {
        self.cached
            .read()
            .expect("password vault poisoned")
            .is_none()
    }
}

impl Drop for PasswordVault {
    fn drop(&mut self) {
        // Unwind-safe: runs on panic as well as normal exit.
        self.clear();
    }
}
