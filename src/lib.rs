//! # aescrypt-stream
//!
//! A streaming codec for the AES Crypt container format, versions 0 to 2,
//! byte-compatible with the reference tool. Payloads are ciphered with
//! AES-256-CBC under a random bulk key that is itself wrapped under a
//! password-derived key, and authenticated with HMAC-SHA256.
//!
//! The main entry points are the single-shot [`encrypt`]/[`decrypt`] pair and
//! their file wrappers; [`Encryptor`] and [`Decryptor`] are the underlying
//! `Write`/`Read` stream facades for callers that need incremental I/O or
//! control over the header's version and extension records.
//!
//! ```no_run
//! use aescrypt_stream::{decrypt, encrypt, Options, Password};
//! use std::io::Cursor;
//!
//! # fn main() -> Result<(), aescrypt_stream::AescryptError> {
//! let password = Password::new("correct horse battery staple");
//! let mut container = Vec::new();
//! encrypt(&password, Cursor::new(b"attack at dawn"), &mut container, &Options::default())?;
//!
//! let mut plaintext = Vec::new();
//! decrypt(&password, Cursor::new(&container), &mut plaintext)?;
//! assert_eq!(plaintext, b"attack at dawn");
//! # Ok(())
//! # }
//! ```

mod api;
pub mod consts;
pub mod crypto;
mod decryptor;
mod encryptor;
mod error;
pub mod header;
mod options;
mod secret;
mod setup;
mod utils;

pub use api::{decrypt, decrypt_file, encrypt, encrypt_file};
pub use decryptor::Decryptor;
pub use encryptor::{encrypt_v0, Encryptor};
pub use error::AescryptError;
pub use header::{read_version, Extension};
pub use options::{Options, CREATED_BY};
pub use secret::{Password, SecretBytes};
