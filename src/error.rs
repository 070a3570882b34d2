//! # Error Types
//!
//! All operations return [`Result<T, AescryptError>`](AescryptError).

use thiserror::Error;

/// The error type for all AES Crypt container operations.
///
/// The variants mirror the failure surface of the format: I/O failures from
/// the backing stream, structural violations of the container layout,
/// cryptographic verification failures, and API misuse.
#[derive(Error, Debug)]
pub enum AescryptError {
    /// I/O error propagated verbatim from the backing stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Structural violation of the container layout.
    ///
    /// Covers a bad magic marker, an unsupported version byte, an invalid
    /// reserved field, broken extension framing, a payload length that is not
    /// block aligned, and an unexpected end of input while reading a
    /// fixed-size field. Never retried, always fatal to the operation.
    #[error("Invalid file format: {0}")]
    Format(String),

    /// HMAC verification failure.
    ///
    /// Used both for the key-verification tag (wrong password or corrupted
    /// key block) and the payload tag (altered ciphertext). The messages are
    /// deliberately not distinguishable between the wrong-password and
    /// tampering cases.
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Misuse of the API: invalid constructor arguments, an unsupported
    /// version requested for writing, or mutation of version/extensions
    /// after the header has been emitted.
    #[error("Invalid argument: {0}")]
    Argument(String),
}

/// Adapter for the `std::io` trait impls; unwraps I/O errors instead of
/// double-wrapping them.
pub(crate) fn into_io_error(err: AescryptError) -> std::io::Error {
    match err {
        AescryptError::Io(io) => io,
        other => std::io::Error::other(other),
    }
}
