//! # Key Setup Helper
//!
//! Owns all four key-material buffers for the lifetime of one stream object:
//! the password-derived wrapping key/IV (Key1/IV1) and the bulk key/IV
//! (Key2/IV2) that actually cipher the payload. Buffers are zero-on-drop
//! [`SecretBytes`]; nothing here escapes except through the wrap/tag bytes
//! that belong in the container.

use crate::consts::{HASH_SIZE, IV_SIZE, KEY_SIZE};
use crate::crypto::cbc::{CbcDecryptor, CbcEncryptor};
use crate::crypto::kdf::stretch_password;
use crate::crypto::rng::{generate_bulk_iv, generate_bulk_key, generate_public_iv};
use crate::crypto::HmacSha256;
use crate::error::AescryptError;
use crate::secret::{Password, SecretBytes};
use hmac::Mac;

const WRAPPED_LEN: usize = IV_SIZE + KEY_SIZE;

pub(crate) struct SetupHelper {
    iv1: SecretBytes<16>,
    key1: SecretBytes<32>,
    iv2: SecretBytes<16>,
    key2: SecretBytes<32>,
}

impl SetupHelper {
    /// Prepares key material for encryption: fresh public IV, stretched
    /// wrapping key, and random bulk key/IV.
    pub(crate) fn for_encryption(password: &Password) -> Result<Self, AescryptError> {
        let iv1 = generate_public_iv()?;
        let key1 = stretch_password(password, &iv1);
        Ok(Self {
            iv1: SecretBytes::new(iv1),
            key1,
            iv2: generate_bulk_iv()?,
            key2: generate_bulk_key()?,
        })
    }

    /// Prepares key material for decryption from the public IV read out of
    /// the header. The bulk key/IV stay zero until
    /// [`unwrap_bulk_keys`](Self::unwrap_bulk_keys) or
    /// [`alias_bulk_to_wrapping_key`](Self::alias_bulk_to_wrapping_key) runs.
    pub(crate) fn for_decryption(password: &Password, public_iv: &[u8; 16]) -> Self {
        Self {
            key1: stretch_password(password, public_iv),
            iv1: SecretBytes::new(*public_iv),
            iv2: SecretBytes::zeroed(),
            key2: SecretBytes::zeroed(),
        }
    }

    pub(crate) fn public_iv(&self) -> &[u8; 16] {
        self.iv1.expose()
    }

    /// AES-CBC-encrypts `IV2 || Key2` under Key1/IV1, no padding.
    pub(crate) fn wrap_bulk_keys(&self) -> [u8; WRAPPED_LEN] {
        let mut cbc = CbcEncryptor::new(self.key1.expose(), self.iv1.expose());
        let mut wrapped = [0u8; WRAPPED_LEN];

        let iv_block = cbc.encrypt_block(self.iv2.expose());
        wrapped[..16].copy_from_slice(&iv_block);

        let mut key_block = [0u8; 16];
        for (i, chunk) in self.key2.expose().chunks_exact(16).enumerate() {
            key_block.copy_from_slice(chunk);
            let ct = cbc.encrypt_block(&key_block);
            wrapped[16 + i * 16..32 + i * 16].copy_from_slice(&ct);
        }
        wrapped
    }

    /// `HMAC-SHA256(Key1, wrapped)`, the key-verification tag stored after
    /// the wrapped block.
    pub(crate) fn wrapped_keys_tag(
        &self,
        wrapped: &[u8; WRAPPED_LEN],
    ) -> Result<[u8; HASH_SIZE], AescryptError> {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(self.key1.expose())
            .map_err(|e| AescryptError::Crypto(format!("hmac init failed: {e}")))?;
        mac.update(wrapped);
        Ok(mac.finalize().into_bytes().into())
    }

    /// Recovers IV2/Key2 from the wrapped block and returns the tag computed
    /// over the still-encrypted bytes for the caller to compare.
    pub(crate) fn unwrap_bulk_keys(
        &mut self,
        wrapped: &[u8; WRAPPED_LEN],
    ) -> Result<[u8; HASH_SIZE], AescryptError> {
        let mut cbc = CbcDecryptor::new(self.key1.expose(), self.iv1.expose());

        let mut block = [0u8; 16];
        block.copy_from_slice(&wrapped[..16]);
        *self.iv2.expose_mut() = cbc.decrypt_block(&block);

        for i in 0..2 {
            block.copy_from_slice(&wrapped[16 + i * 16..32 + i * 16]);
            let plain = cbc.decrypt_block(&block);
            self.key2.expose_mut()[i * 16..(i + 1) * 16].copy_from_slice(&plain);
        }

        self.wrapped_keys_tag(wrapped)
    }

    /// Version 0 has no wrapping step: the bulk key/IV are the
    /// password-derived key and public IV themselves.
    pub(crate) fn alias_bulk_to_wrapping_key(&mut self) {
        *self.iv2.expose_mut() = *self.iv1.expose();
        *self.key2.expose_mut() = *self.key1.expose();
    }

    /// A fresh payload HMAC keyed with the bulk key.
    pub(crate) fn bulk_hmac(&self) -> Result<HmacSha256, AescryptError> {
        <HmacSha256 as Mac>::new_from_slice(self.key2.expose())
            .map_err(|e| AescryptError::Crypto(format!("hmac init failed: {e}")))
    }

    pub(crate) fn bulk_encryptor(&self) -> CbcEncryptor {
        CbcEncryptor::new(self.key2.expose(), self.iv2.expose())
    }

    pub(crate) fn bulk_decryptor(&self) -> CbcDecryptor {
        CbcDecryptor::new(self.key2.expose(), self.iv2.expose())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_then_unwrap_recovers_bulk_keys() {
        let password = Password::new("round trip");
        let sender = SetupHelper::for_encryption(&password).unwrap();
        let wrapped = sender.wrap_bulk_keys();
        let tag = sender.wrapped_keys_tag(&wrapped).unwrap();

        let mut receiver = SetupHelper::for_decryption(&password, sender.public_iv());
        let computed = receiver.unwrap_bulk_keys(&wrapped).unwrap();

        assert_eq!(computed, tag);
        assert_eq!(receiver.iv2.expose(), sender.iv2.expose());
        assert_eq!(receiver.key2.expose(), sender.key2.expose());
    }

    #[test]
    fn wrong_password_yields_wrong_tag() {
        let sender = SetupHelper::for_encryption(&Password::new("right")).unwrap();
        let wrapped = sender.wrap_bulk_keys();
        let tag = sender.wrapped_keys_tag(&wrapped).unwrap();

        let mut receiver = SetupHelper::for_decryption(&Password::new("wrong"), sender.public_iv());
        let computed = receiver.unwrap_bulk_keys(&wrapped).unwrap();
        assert_ne!(computed, tag);
    }

    #[test]
    fn aliasing_copies_wrapping_material() {
        let password = Password::new("legacy");
        let mut helper = SetupHelper::for_encryption(&password).unwrap();
        helper.alias_bulk_to_wrapping_key();
        assert_eq!(helper.iv2.expose(), helper.iv1.expose());
        assert_eq!(helper.key2.expose(), helper.key1.expose());
    }
}
