//! Secret Handling
//!
//! Locked-memory buffers, constant-time comparison, and the single
//! process-wide password cache that gates every derivation.

pub mod memory;
pub mod password;

pub use memory::{ct_eq, SecretBytes};
pub use password::PasswordVault;
