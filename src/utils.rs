//! Utility functions used across the library.

use zeroize::Zeroizing;

/// Re-encodes a password as UTF-16LE bytes.
///
/// The key-stretching step hashes the password in UTF-16LE regardless of the
/// host platform's native encoding; this is required for byte compatibility
/// with files produced by the reference tool.
pub(crate) fn utf16le_bytes(password: &str) -> Zeroizing<Vec<u8>> {
    let mut out = Zeroizing::new(Vec::with_capacity(password.len() * 2));
    for unit in password.encode_utf16() {
        out.extend_from_slice(&unit.to_le_bytes());
    }
    out
}

/// XORs two 16-byte blocks into `out`.
///
/// Callers always pass exact 16-byte arrays, so the indexing never panics.
#[inline(always)]
pub(crate) fn xor_blocks(a: &[u8; 16], b: &[u8; 16], out: &mut [u8; 16]) {
    for i in 0..16 {
        out[i] = a[i] ^ b[i];
    }
}
