//! Low-level crypto primitives.
//!
//! Sub-modules for the password stretch, the digest-randomized entropy
//! helpers, and the manual CBC block engine. HMAC types come straight from
//! `hmac` + `sha2`.

pub(crate) mod cbc;
pub mod kdf;
pub(crate) mod rng;

use hmac::Hmac;
use sha2::Sha256;

pub(crate) type HmacSha256 = Hmac<Sha256>;
