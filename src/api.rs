//! High-level single-shot operations.
//!
//! Stream-to-stream and file-to-file wrappers over the [`Encryptor`] and
//! [`Decryptor`] facades, for callers that just want the whole payload
//! processed in one call.

use crate::decryptor::Decryptor;
use crate::encryptor::{encrypt_v0, Encryptor};
use crate::error::AescryptError;
use crate::options::Options;
use crate::secret::Password;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use zeroize::Zeroizing;

const COPY_CHUNK: usize = 4096;

/// Encrypts everything from `input` into an AES Crypt container on `output`.
///
/// Version 0 output buffers the payload to learn its length (the legacy
/// header records the final-block length up front); versions 1 and 2 stream.
pub fn encrypt<R: Read, W: Write>(
    password: &Password,
    mut input: R,
    output: W,
    options: &Options,
) -> Result<(), AescryptError> {
    if options.version == 0 {
        let mut plaintext = Zeroizing::new(Vec::new());
        input.read_to_end(&mut plaintext)?;
        return encrypt_v0(password, &plaintext, output);
    }

    let mut encryptor = Encryptor::with_options(output, password, options)?;
    let mut buf = [0u8; COPY_CHUNK];
    loop {
        let n = input.read(&mut buf)?;
        if n == 0 {
            break;
        }
        encryptor.write_plaintext(&buf[..n])?;
    }
    encryptor.finish()
}

/// Decrypts an AES Crypt container from `input` into `output`.
///
/// Fails before writing any plaintext on a wrong password (versions 1 and
/// 2); payload integrity is verified when the container ends.
pub fn decrypt<R: Read, W: Write>(
    password: &Password,
    input: R,
    mut output: W,
) -> Result<(), AescryptError> {
    let mut decryptor = Decryptor::new(password, input)?;
    let mut buf = [0u8; COPY_CHUNK];
    loop {
        let n = decryptor.read_plaintext(&mut buf)?;
        if n == 0 {
            break;
        }
        output.write_all(&buf[..n])?;
    }
    output.flush()?;
    Ok(())
}

/// Encrypts `input` into a new file at `output`.
pub fn encrypt_file(
    password: &Password,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &Options,
) -> Result<(), AescryptError> {
    let reader = BufReader::new(File::open(input)?);
    let writer = BufWriter::new(File::create(output)?);
    encrypt(password, reader, writer, options)
}

/// Decrypts the container at `input` into a new file at `output`.
pub fn decrypt_file(
    password: &Password,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<(), AescryptError> {
    let reader = BufReader::new(File::open(input)?);
    let writer = BufWriter::new(File::create(output)?);
    decrypt(password, reader, writer)
}
