//! Secure Memory
//!
//! Buffers for plaintext secret material:
//! - Pinned with mlock so the pages cannot be swapped to disk
//! - Zeroized on drop (volatile writes via the zeroize crate)
//! - Compared in constant time
//!
//! On non-Unix platforms pinning degrades to a no-op; zeroization always
//! runs.

use std::fmt;

use zeroize::Zeroize;

#[cfg(unix)]
fn lock_region(ptr: *const u8, len: usize) -> bool {
    if len == 0 {
        return true;
    }
    // safety: ptr/len describe a live allocation owned by the caller
    unsafe { libc::mlock(ptr as *const libc::c_void, len as libc::size_t) == 0 }
}

#[cfg(unix)]
fn unlock_region(ptr: *const u8, len: usize) {
    if len == 0 {
        return;
    }
    unsafe {
        libc::munlock(ptr as *const libc::c_void, len as libc::size_t);
    }
}

#[cfg(not(unix))]
fn lock_region(_ptr: *const u8, _len: usize) -> bool {
    false
}

#[cfg(not(unix))]
fn unlock_region(_ptr: *const u8, _len: usize) {}

/// A byte buffer that is pinned in RAM while alive and zeroized on drop.
///
/// The buffer never reallocates after construction, so the locked region
/// stays valid for its whole lifetime. There is intentionally no `Clone`
/// and the `Debug` impl shows only the length.
pub struct SecretBytes {
    data: Vec<u8>,
    pinned: bool,
}

impl SecretBytes {
    /// Copy `bytes` into a fresh pinned buffer
    pub fn new(bytes: &[u8]) -> Self {
        Self::from_vec(bytes.to_vec())
    }

    /// Take ownership of `data`, pinning its allocation.
    ///
    /// The caller should not retain other copies of the secret.
    pub fn from_vec(data: Vec<u8>) -> Self {
        let pinned = lock_region(data.as_ptr(), data.capacity());
        Self { data, pinned }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether the mlock call succeeded (it can fail under RLIMIT_MEMLOCK)
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Constant-time equality against a candidate
    pub fn ct_eq(&self, other: &[u8]) -> bool {
        ct_eq(&self.data, other)
    }

    /// Overwrite the contents with zeros without dropping the buffer
    pub fn zeroize_in_place(&mut self) {
        self.data.as_mut_slice().zeroize();
    }
}

impl Drop for SecretBytes {
    fn drop(&mut self) {
        self.data.zeroize();
        if self.pinned {
            unlock_region(self.data.as_ptr(), self.data.capacity());
        }
    }
}

impl fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretBytes")
            .field("len", &self.data.len())
            .field("pinned", &self.pinned)
            .finish()
    }
}

/// Constant-time byte comparison.
///
/// Length mismatch returns early; the lengths of the secrets compared
/// here are not themselves secret.
pub fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// True if every byte is zero (test observability hook)
pub fn is_zeroized(data: &[u8]) -> bool {
    data.iter().all(|&b| b == 0)
}
