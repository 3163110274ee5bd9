//! Value encryption capability for the settings store
//!
//! Values such as the directory bind password can be stored through a
//! [`Cipher`]. Only the identity [`NoopCipher`] exists today; a real
//! implementation can be handed to
//! [`SettingsStore::with_cipher`](super::SettingsStore::with_cipher) without
//! touching any call site.

use std::fmt;

/// Error raised by a cipher that failed to transform a value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct CipherError(pub String);

/// Reversible transform applied to stored setting values
pub trait Cipher: fmt::Debug {
    /// Encrypt a plain text value for storage
    fn encrypt(&self, plain_text: &str) -> Result<String, CipherError>;

    /// Decrypt a stored value
    fn decrypt(&self, cipher_text: &str) -> Result<String, CipherError>;
}

/// Identity cipher: values are stored and returned unchanged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoopCipher;

impl Cipher for NoopCipher {
    fn encrypt(&self, plain_text: &str) -> Result<String, CipherError> {
        Ok(plain_text.to_string())
    }

    fn decrypt(&self, cipher_text: &str) -> Result<String, CipherError> {
        Ok(cipher_text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_cipher_is_identity() {
        let cipher = NoopCipher;
        assert_eq!(cipher.encrypt("s3cret").unwrap(), "s3cret");
        assert_eq!(cipher.decrypt("s3cret").unwrap(), "s3cret");
    }
}
