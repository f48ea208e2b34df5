//! Encryption of secrets at rest.
//!
//! Provider API keys are sealed with AES-256-CBC (PKCS#7 padding, random 16-byte IV per
//! record) and an HMAC-SHA256 tag over `iv || ciphertext`. The tag makes a foreign IV or
//! a tampered ciphertext fail with [`CryptoError::DecryptionFailed`] rather than
//! silently producing a corrupted plaintext.
//!
//! ```rust,ignore
//! use flowhub::crypto::{EncryptionKey, seal, open};
//!
//! let key = EncryptionKey::generate();
//! let sealed = seal(&key, b"sk-live-123");
//! let plain = open(&key, &sealed.iv, &sealed.ciphertext)?;
//! ```

mod cipher;
mod error;
mod key;

pub use cipher::{IV_SIZE, SealedSecret, TAG_SIZE, open, open_hex, seal};
pub use error::{CryptoError, CryptoResult};
pub use key::{EncryptionKey, KEY_SIZE};
