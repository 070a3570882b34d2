//! # Decrypting Stream Facade
//!
//! [`Decryptor`] wraps a readable backing stream holding an AES Crypt
//! container and exposes the plaintext through `Read`. Construction parses
//! the header, derives the wrapping key, and verifies the key tag, so a
//! wrong password fails before any payload is touched; the version and
//! extension list are read-only afterwards.
//!
//! The trailer sits at the end of the stream with no length prefix, so the
//! reader withholds a bounded lookahead (`trailer + one block`) from the
//! cipher. When the backing stream hits end of input, what is left must be
//! exactly the optional final block plus the trailer, the payload HMAC is
//! verified, and the final block is trimmed to its recorded length. Any
//! plaintext delivered before that point is unverified until the trailer
//! check passes; a failed check surfaces as
//! [`Crypto`](AescryptError::Crypto) and must discredit all prior output.

use crate::consts::{BLOCK_SIZE, HASH_SIZE};
use crate::crypto::cbc::CbcDecryptor;
use crate::crypto::HmacSha256;
use crate::error::{into_io_error, AescryptError};
use crate::header::{self, Extension};
use crate::secret::Password;
use crate::setup::SetupHelper;
use hmac::Mac;
use std::io::Read;
use subtle::ConstantTimeEq;
use tracing::debug;

const READ_CHUNK: usize = 4096;

/// A `Read` adapter decrypting an AES Crypt container (versions 0 to 2).
///
/// Works on plain readers; no seeking is required for any version. The
/// backing stream is borrowed, not owned, and is never closed here.
pub struct Decryptor<R: Read> {
    inner: R,
    version: u8,
    extensions: Vec<Extension>,
    _setup: SetupHelper,
    cbc: CbcDecryptor,
    hmac: Option<HmacSha256>,
    /// Raw bytes read but not yet released to the cipher; the last
    /// `trailer_len + BLOCK_SIZE` bytes are always withheld until EOF.
    tail: Vec<u8>,
    /// Decrypted plaintext not yet handed to the caller.
    pending: Vec<u8>,
    pending_pos: usize,
    trailer_len: usize,
    /// v0 keeps the final-block length in the header's reserved byte.
    legacy_final_len: u8,
    done: bool,
}

impl<R: Read> Decryptor<R> {
    /// Parses the header and unwraps the bulk keys.
    ///
    /// Fails with [`Format`](AescryptError::Format) on structural problems
    /// and with [`Crypto`](AescryptError::Crypto) when the key-verification
    /// tag does not match; the latter does not distinguish a wrong password
    /// from a corrupted key block.
    pub fn new(password: &Password, mut inner: R) -> Result<Self, AescryptError> {
        let (version, reserved) = header::read_prelude(&mut inner)?;
        let extensions = if version >= 2 {
            header::read_extensions(&mut inner)?
        } else {
            Vec::new()
        };

        let public_iv = header::read_exact_bytes::<16, _>(&mut inner)?;
        let mut setup = SetupHelper::for_decryption(password, &public_iv);

        if version >= 1 {
            let wrapped = header::read_exact_bytes::<48, _>(&mut inner)?;
            let computed = setup.unwrap_bulk_keys(&wrapped)?;
            let stored = header::read_exact_bytes::<32, _>(&mut inner)?;
            if !bool::from(computed.ct_eq(&stored)) {
                return Err(AescryptError::Crypto(
                    "invalid password or corrupted data".into(),
                ));
            }
        } else {
            setup.alias_bulk_to_wrapping_key();
        }

        let cbc = setup.bulk_decryptor();
        let hmac = setup.bulk_hmac()?;
        let trailer_len = if version == 0 {
            HASH_SIZE
        } else {
            HASH_SIZE + 1
        };
        debug!(version, extensions = extensions.len(), "header parsed");

        Ok(Self {
            inner,
            version,
            extensions,
            _setup: setup,
            cbc,
            hmac: Some(hmac),
            tail: Vec::new(),
            pending: Vec::new(),
            pending_pos: 0,
            trailer_len,
            legacy_final_len: reserved,
            done: false,
        })
    }

    /// The container version found in the header.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// The extension records found in the header, in file order.
    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    /// Reads decrypted plaintext into `buf`, returning the byte count;
    /// `Ok(0)` means the payload is complete and verified.
    pub fn read_plaintext(&mut self, buf: &mut [u8]) -> Result<usize, AescryptError> {
        loop {
            if self.pending_pos < self.pending.len() {
                let n = (self.pending.len() - self.pending_pos).min(buf.len());
                buf[..n].copy_from_slice(&self.pending[self.pending_pos..self.pending_pos + n]);
                self.pending_pos += n;
                if self.pending_pos == self.pending.len() {
                    self.pending.clear();
                    self.pending_pos = 0;
                }
                return Ok(n);
            }
            if self.done {
                return Ok(0);
            }
            if buf.is_empty() {
                return Ok(0);
            }
            self.refill()?;
        }
    }

    fn refill(&mut self) -> Result<(), AescryptError> {
        let mut chunk = [0u8; READ_CHUNK];
        let n = self.inner.read(&mut chunk)?;
        if n == 0 {
            self.finish_trailer()?;
            return Ok(());
        }
        self.tail.extend_from_slice(&chunk[..n]);
        self.drain_full_blocks()
    }

    /// Releases everything except the withheld lookahead to the cipher.
    fn drain_full_blocks(&mut self) -> Result<(), AescryptError> {
        let holdback = self.trailer_len + BLOCK_SIZE;
        let available = self.tail.len().saturating_sub(holdback);
        let consumable = available - available % BLOCK_SIZE;
        if consumable == 0 {
            return Ok(());
        }

        let Some(hmac) = self.hmac.as_mut() else {
            return Ok(());
        };
        let mut block = [0u8; BLOCK_SIZE];
        for ciphertext in self.tail[..consumable].chunks_exact(BLOCK_SIZE) {
            block.copy_from_slice(ciphertext);
            hmac.update(&block);
            self.pending.extend_from_slice(&self.cbc.decrypt_block(&block));
        }
        self.tail.drain(..consumable);
        Ok(())
    }

    /// Runs at end of input: validates the residue layout, trims the final
    /// block, and verifies the payload HMAC.
    fn finish_trailer(&mut self) -> Result<(), AescryptError> {
        if self.done {
            return Ok(());
        }

        if self.tail.len() < self.trailer_len {
            return Err(AescryptError::Format(
                "the stream was exhausted unexpectedly".into(),
            ));
        }
        // Ciphertext released so far is block aligned, so the residue decides
        // whether the whole payload was.
        let residue = self.tail.len() - self.trailer_len;
        if residue != 0 && residue != BLOCK_SIZE {
            return Err(AescryptError::Format("file length is invalid".into()));
        }

        let Some(mut hmac) = self.hmac.take() else {
            return Err(AescryptError::Format("trailer already consumed".into()));
        };

        let final_len = if self.version == 0 {
            self.legacy_final_len
        } else {
            let byte = self.tail[residue];
            if byte as usize > BLOCK_SIZE {
                return Err(AescryptError::Format("file length is invalid".into()));
            }
            byte
        };

        if residue == BLOCK_SIZE {
            let mut block = [0u8; BLOCK_SIZE];
            block.copy_from_slice(&self.tail[..BLOCK_SIZE]);
            hmac.update(&block);
            let plaintext = self.cbc.decrypt_block(&block);

            // 0 and 16 both mean the block is fully meaningful
            let keep = match final_len as usize {
                0 | BLOCK_SIZE => BLOCK_SIZE,
                len => len,
            };
            self.pending.extend_from_slice(&plaintext[..keep]);
        } else if final_len != 0 && final_len as usize != BLOCK_SIZE {
            // a trimmed final block was announced but no block exists
            return Err(AescryptError::Format("file length is invalid".into()));
        }

        let stored_start = residue + self.trailer_len - HASH_SIZE;
        let stored = &self.tail[stored_start..stored_start + HASH_SIZE];
        let computed = hmac.finalize().into_bytes();
        if !bool::from(computed.as_slice().ct_eq(stored)) {
            return Err(AescryptError::Crypto(if self.version == 0 {
                "invalid password or content has been altered".into()
            } else {
                "message has been altered, do not trust content".into()
            }));
        }

        self.tail.clear();
        self.done = true;
        debug!(version = self.version, "payload verified");
        Ok(())
    }
}

impl<R: Read> Read for Decryptor<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.read_plaintext(buf).map_err(into_io_error)
    }
}
