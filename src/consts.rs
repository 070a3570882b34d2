//! # Constants
//!
//! Fixed quantities of the AES Crypt container format.

/// The three magic bytes opening every container.
pub(crate) const MAGIC: [u8; 3] = *b"AES";

/// The maximum container version this crate reads and writes.
pub const MAX_FILE_VERSION: u8 = 2;

/// The container version written when none is requested explicitly.
pub const DEFAULT_FILE_VERSION: u8 = 2;

/// AES block size in bytes; also the ciphertext alignment unit.
pub const BLOCK_SIZE: usize = 16;

/// Size of an initialization vector, identical to the block size for AES.
pub(crate) const IV_SIZE: usize = 16;

/// Size of an AES-256 key in bytes.
pub(crate) const KEY_SIZE: usize = 32;

/// Size of a SHA-256 / HMAC-SHA256 output in bytes.
pub(crate) const HASH_SIZE: usize = 32;

/// Hardware identifier mixed into the public IV seed.
///
/// The reference tool seeds the public IV with a network interface address
/// when one can be enumerated. The seed is only one input to a
/// digest-randomizing pass that folds in fresh OS randomness, so the fixed
/// fallback identifier is used unconditionally here.
pub(crate) const FALLBACK_HARDWARE_ID: [u8; 8] = [0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef];

/// Size of the empty-key placeholder extension the reference tool reserves
/// for future header edits.
pub(crate) const PLACEHOLDER_EXTENSION_LEN: usize = 127;
