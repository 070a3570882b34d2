//! # Encrypting Stream Facade
//!
//! [`Encryptor`] wraps a writable backing stream and turns plaintext writes
//! into an AES Crypt container. The header is emitted lazily on the first
//! write (or on [`finish`](Encryptor::finish)), so the version and extension
//! list stay mutable until then. Each full plaintext block runs through an
//! explicit pipeline: CBC transform, HMAC update, backing-stream write.
//!
//! Finalization pads the last partial block with the pad-length byte pattern
//! (exact multiples get no padding block), then appends the trailer: the
//! final-block-length byte and the payload HMAC. `finish` is idempotent and
//! `Drop` forces it, so a dropped encryptor still produces a complete file;
//! key material is zeroed when the facade goes away.

use crate::consts::{BLOCK_SIZE, MAX_FILE_VERSION};
use crate::crypto::cbc::CbcEncryptor;
use crate::crypto::HmacSha256;
use crate::error::{into_io_error, AescryptError};
use crate::header::{self, Extension};
use crate::options::Options;
use crate::secret::Password;
use crate::setup::SetupHelper;
use hmac::Mac;
use std::io::Write;
use tracing::debug;

/// Cipher and integrity state, live from header emission to finalization.
struct Pipeline {
    cbc: CbcEncryptor,
    hmac: HmacSha256,
}

/// A `Write` adapter producing an AES Crypt container (versions 1 and 2).
///
/// Version 0 stores the final-block length in the header itself, which only
/// works with a seekable sink or a known payload length; use
/// [`encrypt_v0`] for that. The backing stream is borrowed, not owned: it is
/// flushed but never closed here.
pub struct Encryptor<W: Write> {
    inner: W,
    setup: SetupHelper,
    version: u8,
    extensions: Vec<Extension>,
    pipeline: Option<Pipeline>,
    partial: [u8; BLOCK_SIZE],
    partial_len: usize,
    finished: bool,
}

impl<W: Write> Encryptor<W> {
    /// Creates an encryptor with the default [`Options`].
    ///
    /// Key derivation runs here (it is deliberately slow); nothing is written
    /// to `inner` until the first plaintext write.
    pub fn new(inner: W, password: &Password) -> Result<Self, AescryptError> {
        Self::with_options(inner, password, &Options::default())
    }

    pub fn with_options(
        inner: W,
        password: &Password,
        options: &Options,
    ) -> Result<Self, AescryptError> {
        validate_stream_version(options.version)?;
        Ok(Self {
            inner,
            setup: SetupHelper::for_encryption(password)?,
            version: options.version,
            extensions: options.default_extensions(),
            pipeline: None,
            partial: [0u8; BLOCK_SIZE],
            partial_len: 0,
            finished: false,
        })
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    /// Changes the container version. Fails once the header is out.
    pub fn set_version(&mut self, version: u8) -> Result<(), AescryptError> {
        if self.pipeline.is_some() {
            return Err(AescryptError::Argument(
                "version cannot be changed after encryption has started".into(),
            ));
        }
        validate_stream_version(version)?;
        self.version = version;
        Ok(())
    }

    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    /// Mutable access to the extension list. Fails once the header is out.
    /// Extensions are only emitted for version 2 containers.
    pub fn extensions_mut(&mut self) -> Result<&mut Vec<Extension>, AescryptError> {
        if self.pipeline.is_some() {
            return Err(AescryptError::Argument(
                "extensions cannot be changed after encryption has started".into(),
            ));
        }
        Ok(&mut self.extensions)
    }

    /// Emits the header and arms the cipher/HMAC pipeline.
    ///
    /// Called lazily by the first write; calling it directly just pins the
    /// version and extensions early.
    pub fn write_header(&mut self) -> Result<(), AescryptError> {
        if self.pipeline.is_some() {
            return Ok(());
        }

        header::write_prelude(&mut self.inner, self.version, 0)?;
        if self.version >= 2 {
            header::write_extensions(&mut self.inner, &self.extensions)?;
        }
        self.inner.write_all(self.setup.public_iv())?;

        let wrapped = self.setup.wrap_bulk_keys();
        self.inner.write_all(&wrapped)?;
        self.inner.write_all(&self.setup.wrapped_keys_tag(&wrapped)?)?;

        self.pipeline = Some(Pipeline {
            cbc: self.setup.bulk_encryptor(),
            hmac: self.setup.bulk_hmac()?,
        });
        debug!(version = self.version, extensions = self.extensions.len(), "header written");
        Ok(())
    }

    fn emit_block(&mut self, block: &[u8; BLOCK_SIZE]) -> Result<(), AescryptError> {
        let Some(pipeline) = self.pipeline.as_mut() else {
            return Err(AescryptError::Argument(
                "internal: block emitted before header".into(),
            ));
        };
        let ciphertext = pipeline.cbc.encrypt_block(block);
        pipeline.hmac.update(&ciphertext);
        self.inner.write_all(&ciphertext)?;
        Ok(())
    }

    /// Feeds plaintext into the container. Partial blocks are buffered until
    /// a full block is available or the stream is finalized.
    pub fn write_plaintext(&mut self, mut buf: &[u8]) -> Result<(), AescryptError> {
        if self.finished {
            return Err(AescryptError::Argument(
                "stream is already finalized".into(),
            ));
        }
        self.write_header()?;

        // top up a pending partial block first
        if self.partial_len > 0 {
            let take = (BLOCK_SIZE - self.partial_len).min(buf.len());
            self.partial[self.partial_len..self.partial_len + take].copy_from_slice(&buf[..take]);
            self.partial_len += take;
            buf = &buf[take..];
            if self.partial_len == BLOCK_SIZE {
                let block = self.partial;
                self.emit_block(&block)?;
                self.partial_len = 0;
            }
        }

        let mut chunks = buf.chunks_exact(BLOCK_SIZE);
        for chunk in &mut chunks {
            let mut block = [0u8; BLOCK_SIZE];
            block.copy_from_slice(chunk);
            self.emit_block(&block)?;
        }

        let rest = chunks.remainder();
        if !rest.is_empty() {
            self.partial[..rest.len()].copy_from_slice(rest);
            self.partial_len = rest.len();
        }
        Ok(())
    }

    /// Pads and flushes the final block, then appends the trailer.
    ///
    /// Idempotent; a zero-length payload is valid and produces a
    /// header-plus-trailer-only container.
    pub fn finish(&mut self) -> Result<(), AescryptError> {
        if self.finished {
            return Ok(());
        }
        self.write_header()?;

        let last_len = self.partial_len as u8;
        if self.partial_len > 0 {
            let pad = (BLOCK_SIZE - self.partial_len) as u8;
            self.partial[self.partial_len..].fill(pad);
            let block = self.partial;
            self.emit_block(&block)?;
            self.partial = [0u8; BLOCK_SIZE];
            self.partial_len = 0;
        }

        // Trailer: final-block length, then the payload tag. The pipeline is
        // armed by write_header above.
        if let Some(pipeline) = self.pipeline.take() {
            self.inner.write_all(&[last_len])?;
            self.inner
                .write_all(&pipeline.hmac.finalize().into_bytes())?;
        }
        self.inner.flush()?;
        self.finished = true;
        debug!(final_block_len = last_len, "container finalized");
        Ok(())
    }

}

impl<W: Write> Write for Encryptor<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.write_plaintext(buf).map_err(into_io_error)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Write> Drop for Encryptor<W> {
    fn drop(&mut self) {
        // Best-effort: a dropped encryptor still writes its trailer. Errors
        // here have nowhere to go; callers wanting them use finish().
        let _ = self.finish();
    }
}

fn validate_stream_version(version: u8) -> Result<(), AescryptError> {
    if version > MAX_FILE_VERSION {
        return Err(AescryptError::Argument(format!(
            "the maximum allowed version is {MAX_FILE_VERSION}"
        )));
    }
    if version == 0 {
        return Err(AescryptError::Argument(
            "version 0 stores the final-block length in its header and needs \
             the payload length up front; use encrypt_v0"
                .into(),
        ));
    }
    Ok(())
}

/// Single-shot version 0 encryption for a known-length payload.
///
/// The legacy format records the final-block length in the header's reserved
/// byte, so the payload length must be known before the first byte goes out.
/// Version 0 has no wrapping step: the payload is ciphered directly under the
/// password-derived key, and the trailer is the bare payload HMAC.
pub fn encrypt_v0<W: Write>(
    password: &Password,
    plaintext: &[u8],
    mut output: W,
) -> Result<(), AescryptError> {
    let mut setup = SetupHelper::for_encryption(password)?;
    setup.alias_bulk_to_wrapping_key();

    let last_len = (plaintext.len() % BLOCK_SIZE) as u8;
    header::write_prelude(&mut output, 0, last_len)?;
    output.write_all(setup.public_iv())?;

    let mut cbc = setup.bulk_encryptor();
    let mut hmac = setup.bulk_hmac()?;
    let mut block = [0u8; BLOCK_SIZE];

    let mut chunks = plaintext.chunks_exact(BLOCK_SIZE);
    for chunk in &mut chunks {
        block.copy_from_slice(chunk);
        let ciphertext = cbc.encrypt_block(&block);
        hmac.update(&ciphertext);
        output.write_all(&ciphertext)?;
    }

    let rest = chunks.remainder();
    if !rest.is_empty() {
        let pad = (BLOCK_SIZE - rest.len()) as u8;
        block.fill(pad);
        block[..rest.len()].copy_from_slice(rest);
        let ciphertext = cbc.encrypt_block(&block);
        hmac.update(&ciphertext);
        output.write_all(&ciphertext)?;
    }

    output.write_all(&hmac.finalize().into_bytes())?;
    output.flush()?;
    Ok(())
}
