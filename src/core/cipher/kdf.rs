//! Passphrase key derivation.

use std::fmt;

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::CipherError;

/// Size of each derived key in bytes.
pub const KEY_LEN: usize = 32;

const ENCRYPTION_INFO: &[u8] = b"confseal-v1-encryption";
const SIGNING_INFO: &[u8] = b"confseal-v1-signing";

/// An encryption key and an independent signing key.
///
/// Both are wiped from memory on drop.
pub struct KeyPair {
    encryption: Zeroizing<[u8; KEY_LEN]>,
    signing: Zeroizing<[u8; KEY_LEN]>,
}

impl KeyPair {
    /// Build a key pair from raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::InvalidKeyLength` unless both slices are 32 bytes.
    pub fn from_bytes(encryption: &[u8], signing: &[u8]) -> Result<Self, CipherError> {
        let encryption: [u8; KEY_LEN] = encryption
            .try_into()
            .map_err(|_| CipherError::InvalidKeyLength(encryption.len()))?;
        let signing: [u8; KEY_LEN] = signing
            .try_into()
            .map_err(|_| CipherError::InvalidKeyLength(signing.len()))?;

        Ok(Self {
            encryption: Zeroizing::new(encryption),
            signing: Zeroizing::new(signing),
        })
    }

    pub fn encryption_key(&self) -> &[u8; KEY_LEN] {
        &self.encryption
    }

    pub fn signing_key(&self) -> &[u8; KEY_LEN] {
        &self.signing
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("encryption", &"[REDACTED]")
            .field("signing", &"[REDACTED]")
            .finish()
    }
}

/// Turns a passphrase into a [`KeyPair`].
///
/// Implementations must be deterministic: the same passphrase always yields
/// the same keys, since nothing besides the passphrase is stored.
pub trait KeyDerivation {
    fn derive_keys(&self, passphrase: &[u8]) -> Result<KeyPair, CipherError>;
}

/// HKDF-SHA256 with no salt, expanded once per key under distinct labels.
#[derive(Debug, Default, Clone, Copy)]
pub struct HkdfSha256;

impl KeyDerivation for HkdfSha256 {
    fn derive_keys(&self, passphrase: &[u8]) -> Result<KeyPair, CipherError> {
        let hkdf = Hkdf::<Sha256>::new(None, passphrase);

        let mut encryption = Zeroizing::new([0u8; KEY_LEN]);
        let mut signing = Zeroizing::new([0u8; KEY_LEN]);
        hkdf.expand(ENCRYPTION_INFO, &mut encryption[..])
            .map_err(|_| CipherError::KeyDerivation)?;
        hkdf.expand(SIGNING_INFO, &mut signing[..])
            .map_err(|_| CipherError::KeyDerivation)?;

        Ok(KeyPair {
            encryption,
            signing,
        })
    }
}
