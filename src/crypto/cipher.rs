//! AES-256-CBC sealing with an HMAC-SHA256 tag.
//!
//! # Stored format
//!
//! - `iv`: 16 random bytes, stored separately
//! - `ciphertext`: `aes_cbc(plaintext) || hmac_sha256(iv || aes_cbc(plaintext))`

use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::error::{CryptoError, CryptoResult};
use super::key::EncryptionKey;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;
type HmacSha256 = Hmac<Sha256>;

/// Size of the CBC initialization vector in bytes.
pub const IV_SIZE: usize = 16;

/// Size of the HMAC-SHA256 tag in bytes.
pub const TAG_SIZE: usize = 32;

const BLOCK_SIZE: usize = 16;

/// A sealed secret as persisted by the credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedSecret {
    pub iv: Vec<u8>,
    pub ciphertext: Vec<u8>,
}

impl SealedSecret {
    #[must_use]
    pub fn iv_hex(&self) -> String {
        hex::encode(&self.iv)
    }

    #[must_use]
    pub fn ciphertext_hex(&self) -> String {
        hex::encode(&self.ciphertext)
    }
}

fn tag(key: &EncryptionKey, iv: &[u8], body: &[u8]) -> CryptoResult<HmacSha256> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key.mac_key())
        .map_err(|_| CryptoError::InvalidKeyLength)?;
    mac.update(iv);
    mac.update(body);
    Ok(mac)
}

/// Encrypts `plaintext` under a fresh random IV.
pub fn seal(key: &EncryptionKey, plaintext: &[u8]) -> CryptoResult<SealedSecret> {
    use rand::Rng;

    let iv: [u8; IV_SIZE] = rand::rng().random();

    let body = Aes256CbcEnc::new_from_slices(key.cipher_key(), &iv)
        .map_err(|_| CryptoError::InvalidKeyLength)?
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mac = tag(key, &iv, &body)?.finalize().into_bytes();

    let mut ciphertext = Vec::with_capacity(body.len() + TAG_SIZE);
    ciphertext.extend_from_slice(&body);
    ciphertext.extend_from_slice(&mac);

    Ok(SealedSecret {
        iv: iv.to_vec(),
        ciphertext,
    })
}

/// Verifies and decrypts a secret produced by [`seal`].
///
/// # Errors
///
/// - [`CryptoError::InvalidIvLength`] if `iv` is not 16 bytes
/// - [`CryptoError::CiphertextTooShort`] if there is no room for a block and a tag
/// - [`CryptoError::DecryptionFailed`] on tag mismatch, bad padding or non UTF-8 output
pub fn open(key: &EncryptionKey, iv: &[u8], ciphertext: &[u8]) -> CryptoResult<String> {
    if iv.len() != IV_SIZE {
        return Err(CryptoError::InvalidIvLength);
    }
    if ciphertext.len() < BLOCK_SIZE + TAG_SIZE {
        return Err(CryptoError::CiphertextTooShort);
    }

    let (body, mac) = ciphertext.split_at(ciphertext.len() - TAG_SIZE);
    tag(key, iv, body)?
        .verify_slice(mac)
        .map_err(|_| CryptoError::DecryptionFailed)?;

    let plaintext = Aes256CbcDec::new_from_slices(key.cipher_key(), iv)
        .map_err(|_| CryptoError::InvalidIvLength)?
        .decrypt_padded_vec_mut::<Pkcs7>(body)
        .map_err(|_| CryptoError::DecryptionFailed)?;

    String::from_utf8(plaintext).map_err(|_| CryptoError::DecryptionFailed)
}

/// Same as [`open`] for the hex-encoded columns stored in the database.
pub fn open_hex(key: &EncryptionKey, iv_hex: &str, ciphertext_hex: &str) -> CryptoResult<String> {
    let iv = hex::decode(iv_hex).map_err(|_| CryptoError::InvalidEncoding)?;
    let ciphertext = hex::decode(ciphertext_hex).map_err(|_| CryptoError::InvalidEncoding)?;
    open(key, &iv, &ciphertext)
}
