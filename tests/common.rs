//! tests/common.rs
//! Shared constants and helpers for the integration tests.

#![allow(dead_code)] // each test binary uses a subset

use aescrypt_stream::Password;

/// Standard test password used across test files.
pub const TEST_PASSWORD: &str = "Hello";

pub fn password() -> Password {
    Password::new(TEST_PASSWORD)
}

/// Deterministic pseudo-random payload of the requested length.
pub fn payload(len: usize) -> Vec<u8> {
    let mut state = 0x9e3779b97f4a7c15u64 ^ len as u64;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 24) as u8
        })
        .collect()
}

/// The payload lengths exercised by the round-trip and accounting tests:
/// zero, both sides of the block boundary, and both sides of a typical
/// buffer boundary.
pub const LENGTH_CASES: &[usize] = &[0, 1, 15, 16, 17, 4095, 4096, 4097, 70_001];
