//! Cryptographic error types.

use thiserror::Error;

/// Result type for cryptographic operations.
pub type CryptoResult<T> = std::result::Result<T, CryptoError>;

/// Errors that can occur while sealing or opening secrets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// The configured secret is not exactly 32 bytes.
    #[error("invalid key length: expected 32 bytes")]
    InvalidKeyLength,
    /// The IV is not 16 bytes.
    #[error("invalid initialization vector length: expected 16 bytes")]
    InvalidIvLength,
    /// The ciphertext is too short to contain a block and an authentication tag.
    #[error("ciphertext too short to contain a block and authentication tag")]
    CiphertextTooShort,
    /// A stored field was not valid hex.
    #[error("stored secret is not valid hex")]
    InvalidEncoding,
    /// Authentication, padding or UTF-8 validation failed.
    #[error("decryption failed: data may be corrupted or tampered with")]
    DecryptionFailed,
}
