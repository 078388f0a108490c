//! Cryptographic operations.
//!
//! Provides the value-level encryption abstraction and its implementations.
//!
//! ## Strategies
//!
//! - **symmetric**: Default, always available. AES-256-CBC + HMAC-SHA256 with
//!   keys derived from a passphrase.
//! - **asymmetric**, **keyring**: recognised names, not implemented.
//!
//! ## Adding a New Strategy
//!
//! 1. Implement the `Cipher` trait
//! 2. Add the implementation in a new file next to `symmetric.rs`
//! 3. Construct it from `Strategy::cipher`

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::{ConfigError, Result};

pub mod envelope;
pub mod kdf;
pub mod padding;
mod symmetric;

pub use envelope::Envelope;
pub use kdf::{HkdfSha256, KeyDerivation, KeyPair};
pub use symmetric::SymmetricCipher;

/// Encrypts and decrypts single string values.
///
/// Implementations hold their key material and no other state, so one
/// instance serves every value of a document.
pub trait Cipher {
    /// Encrypt `plaintext` into a printable envelope.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::EncryptionFailed` if the backend cannot encrypt.
    fn encrypt(&self, plaintext: &str) -> Result<String>;

    /// Decrypt an envelope produced by [`Cipher::encrypt`].
    ///
    /// # Errors
    ///
    /// Returns `CipherError::DecryptionFailed` for any malformed, tampered or
    /// foreign envelope, without saying which check failed.
    fn decrypt(&self, envelope: &str) -> Result<String>;

    /// Strategy name for display.
    fn name(&self) -> &'static str;
}

/// Encryption strategy selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Symmetric,
    Asymmetric,
    Keyring,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Symmetric => "symmetric",
            Self::Asymmetric => "asymmetric",
            Self::Keyring => "keyring",
        }
    }

    /// Whether [`Strategy::cipher`] can build this strategy.
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Symmetric)
    }

    /// Build the cipher for this strategy from a passphrase.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnsupportedStrategy` for anything but symmetric.
    pub fn cipher(&self, passphrase: &[u8]) -> Result<Box<dyn Cipher>> {
        match self {
            Self::Symmetric => {
                debug!("creating symmetric cipher");
                Ok(Box::new(SymmetricCipher::new(passphrase)?))
            }
            other => Err(ConfigError::UnsupportedStrategy(other.name().to_string()).into()),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "symmetric" => Ok(Self::Symmetric),
            "asymmetric" => Ok(Self::Asymmetric),
            "keyring" => Ok(Self::Keyring),
            _ => Err(ConfigError::UnsupportedStrategy(s.to_string())),
        }
    }
}
