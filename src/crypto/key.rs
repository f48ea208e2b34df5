use sha2::{Digest, Sha256};
use std::fmt;

use super::error::{CryptoError, CryptoResult};

/// Size of the AES-256 key in bytes.
pub const KEY_SIZE: usize = 32;

const MAC_KEY_CONTEXT: &[u8] = b"flowhub.api-key.mac.v1";

/// Process-wide secret used to seal stored provider keys.
#[derive(Clone)]
pub struct EncryptionKey {
    cipher_key: [u8; KEY_SIZE],
    mac_key: [u8; KEY_SIZE],
}

impl EncryptionKey {
    /// Builds a key from the configured secret, which must be exactly 32 bytes.
    pub fn from_secret(secret: &str) -> CryptoResult<Self> {
        let bytes: [u8; KEY_SIZE] = secret
            .as_bytes()
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength)?;
        Ok(Self::from_bytes(bytes))
    }

    #[must_use]
    pub fn from_bytes(cipher_key: [u8; KEY_SIZE]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(MAC_KEY_CONTEXT);
        hasher.update(cipher_key);
        let mac_key: [u8; KEY_SIZE] = hasher.finalize().into();

        Self {
            cipher_key,
            mac_key,
        }
    }

    /// Random key, mostly useful in tests.
    #[must_use]
    pub fn generate() -> Self {
        use rand::Rng;

        let bytes: [u8; KEY_SIZE] = rand::rng().random();
        Self::from_bytes(bytes)
    }

    pub(super) const fn cipher_key(&self) -> &[u8; KEY_SIZE] {
        &self.cipher_key
    }

    pub(super) const fn mac_key(&self) -> &[u8; KEY_SIZE] {
        &self.mac_key
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionKey(..)")
    }
}
