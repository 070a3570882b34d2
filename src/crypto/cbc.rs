//! Manual AES-256-CBC block engine.
//!
//! The container pads only the final block, and only when the payload is not
//! block aligned, so the chaining is driven one block at a time with no
//! library-level padding. The engines here are plain CBC over `aes`; padding
//! policy belongs to the callers.

use crate::utils::xor_blocks;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes256Dec, Aes256Enc, Block};

pub(crate) struct CbcEncryptor {
    cipher: Aes256Enc,
    prev: [u8; 16],
}

impl CbcEncryptor {
    pub(crate) fn new(key: &[u8; 32], iv: &[u8; 16]) -> Self {
        Self {
            cipher: Aes256Enc::new(key.into()),
            prev: *iv,
        }
    }

    /// Encrypts one block, chaining it to the previous ciphertext block.
    pub(crate) fn encrypt_block(&mut self, plaintext: &[u8; 16]) -> [u8; 16] {
        let mut xored = [0u8; 16];
        xor_blocks(plaintext, &self.prev, &mut xored);

        let mut block = Block::from(xored);
        self.cipher.encrypt_block(&mut block);

        let mut ciphertext = [0u8; 16];
        ciphertext.copy_from_slice(block.as_slice());
        self.prev = ciphertext;
        ciphertext
    }
}

pub(crate) struct CbcDecryptor {
    cipher: Aes256Dec,
    prev: [u8; 16],
}

impl CbcDecryptor {
    pub(crate) fn new(key: &[u8; 32], iv: &[u8; 16]) -> Self {
        Self {
            cipher: Aes256Dec::new(key.into()),
            prev: *iv,
        }
    }

    /// Decrypts one block, chaining it to the previous ciphertext block.
    pub(crate) fn decrypt_block(&mut self, ciphertext: &[u8; 16]) -> [u8; 16] {
        let mut block = Block::from(*ciphertext);
        self.cipher.decrypt_block(&mut block);

        let mut decrypted = [0u8; 16];
        decrypted.copy_from_slice(block.as_slice());

        let mut plaintext = [0u8; 16];
        xor_blocks(&decrypted, &self.prev, &mut plaintext);
        self.prev = *ciphertext;
        plaintext
    }
}
