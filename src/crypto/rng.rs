//! Digest-randomized entropy for IVs and bulk keys.
//!
//! The file format's reference implementation never uses raw RNG output
//! directly: every IV and key is passed through a mixing pass that hashes the
//! seed together with repeated refills of fresh randomness. The public IV is
//! additionally seeded from the wall clock and a hardware identifier; it only
//! needs to be unpredictable, not secret.

use crate::consts::FALLBACK_HARDWARE_ID;
use crate::error::AescryptError;
use crate::secret::SecretBytes;
use rand::rngs::OsRng;
use rand::TryRngCore;
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

/// Mixing rounds for IV generation.
const IV_MIX_ROUNDS: u32 = 256;

/// Mixing rounds for bulk key generation.
const KEY_MIX_ROUNDS: u32 = 32;

fn fill_random(buf: &mut [u8]) -> Result<(), AescryptError> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| AescryptError::Crypto(format!("system rng failure: {e}")))
}

/// Replaces `buf` with `SHA256(buf || r_1 || ... || r_n)` truncated to the
/// buffer length, where each `r_i` is a fresh random refill of the buffer.
///
/// `buf` must be at most one SHA-256 output (32 bytes) long.
fn digest_random_bytes(buf: &mut [u8], rounds: u32) -> Result<(), AescryptError> {
    debug_assert!(buf.len() <= 32);

    let mut hasher = Sha256::new();
    hasher.update(&*buf);
    for _ in 0..rounds {
        fill_random(buf)?;
        hasher.update(&*buf);
    }

    let digest = hasher.finalize();
    let len = buf.len();
    buf.copy_from_slice(&digest[..len]);
    Ok(())
}

/// Generates the public IV (IV1) protecting the wrapped bulk key.
///
/// Seeded with wall-clock ticks and the hardware identifier, then mixed.
pub(crate) fn generate_public_iv() -> Result<[u8; 16], AescryptError> {
    let ticks = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);

    let mut iv = [0u8; 16];
    iv[..8].copy_from_slice(&ticks.to_le_bytes());
    iv[8..].copy_from_slice(&FALLBACK_HARDWARE_ID);
    digest_random_bytes(&mut iv, IV_MIX_ROUNDS)?;
    Ok(iv)
}

/// Generates the random bulk IV (IV2).
pub(crate) fn generate_bulk_iv() -> Result<SecretBytes<16>, AescryptError> {
    let mut iv = SecretBytes::<16>::zeroed();
    fill_random(iv.expose_mut())?;
    digest_random_bytes(iv.expose_mut(), IV_MIX_ROUNDS)?;
    Ok(iv)
}

/// Generates the random bulk key (Key2).
pub(crate) fn generate_bulk_key() -> Result<SecretBytes<32>, AescryptError> {
    let mut key = SecretBytes::<32>::zeroed();
    fill_random(key.expose_mut())?;
    digest_random_bytes(key.expose_mut(), KEY_MIX_ROUNDS)?;
    Ok(key)
}
