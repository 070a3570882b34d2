//! # Secure Buffer Types
//!
//! Zero-on-drop wrappers for key material and passwords.
//!
//! Every secret in this crate lives in one of these types for the lifetime of
//! a stream object, and the backing memory is explicitly zeroed before it is
//! released. Access goes through `expose`/`expose_mut` so secrets never leak
//! through `Debug`, `Display`, or accidental copies.

use zeroize::Zeroize;

/// A fixed-size secret buffer, zeroed on drop.
///
/// Used for the wrapping key/IV (Key1/IV1) and the bulk key/IV (Key2/IV2).
pub struct SecretBytes<const N: usize>([u8; N]);

impl<const N: usize> SecretBytes<N> {
    /// Wraps an existing byte array. The caller's copy should not outlive
    /// this wrapper; prefer filling via [`expose_mut`](Self::expose_mut).
    pub fn new(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    /// An all-zero buffer, typically filled in place afterwards.
    pub fn zeroed() -> Self {
        Self([0u8; N])
    }

    pub fn expose(&self) -> &[u8; N] {
        &self.0
    }

    pub fn expose_mut(&mut self) -> &mut [u8; N] {
        &mut self.0
    }
}

impl<const N: usize> Drop for SecretBytes<N> {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl<const N: usize> std::fmt::Debug for SecretBytes<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretBytes<{N}>([REDACTED])")
    }
}

/// A password, zeroed on drop.
pub struct Password(String);

impl Password {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Password {
    fn from(password: &str) -> Self {
        Self(password.to_string())
    }
}

impl Drop for Password {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}
