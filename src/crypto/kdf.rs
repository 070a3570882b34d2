//! Password key stretch for AES Crypt v0-v2.
//!
//! The wrapping key (Key1) is derived by seeding a 32-byte state with the
//! public IV and iterating `SHA256(state || password)` 8192 times, with the
//! password re-encoded as UTF-16LE. Slow on purpose.

use crate::secret::{Password, SecretBytes};
use crate::utils::utf16le_bytes;
use sha2::{Digest, Sha256};

/// Fixed iteration count of the stretch, defined by the file format.
pub const KEY_STRETCH_ROUNDS: u32 = 8192;

/// Derives the 32-byte wrapping key from a password and the public IV.
pub fn stretch_password(password: &Password, public_iv: &[u8; 16]) -> SecretBytes<32> {
    let password_utf16le = utf16le_bytes(password.expose());

    let mut key = SecretBytes::<32>::zeroed();
    key.expose_mut()[..16].copy_from_slice(public_iv);

    let mut hasher = Sha256::new();
    for _ in 0..KEY_STRETCH_ROUNDS {
        hasher.update(key.expose());
        hasher.update(&password_utf16le);
        key.expose_mut().copy_from_slice(&hasher.finalize_reset());
    }

    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let password = Password::new("correct horse");
        let iv = [0x11u8; 16];
        let a = stretch_password(&password, &iv);
        let b = stretch_password(&password, &iv);
        assert_eq!(a.expose(), b.expose());
    }

    #[test]
    fn key_depends_on_iv_and_password() {
        let password = Password::new("pw");
        let base = stretch_password(&password, &[0u8; 16]);

        let other_iv = stretch_password(&password, &[1u8; 16]);
        assert_ne!(base.expose(), other_iv.expose());

        let other_pw = stretch_password(&Password::new("pW"), &[0u8; 16]);
        assert_ne!(base.expose(), other_pw.expose());
    }

    #[test]
    fn iv_seed_is_consumed_not_echoed() {
        // 8192 hash rounds must leave nothing of the seed in place.
        let key = stretch_password(&Password::new("x"), &[0xabu8; 16]);
        assert_ne!(&key.expose()[..16], &[0xabu8; 16]);
    }
}
