//! Passphrase-based symmetric cipher.
//!
//! AES-256-CBC with PKCS#7 padding, authenticated by HMAC-SHA256 over
//! `iv || ciphertext` (encrypt-then-MAC). The tag is checked before the
//! ciphertext is decrypted or unpadded.

use aes::Aes256;
use cbc::cipher::{block_padding::NoPadding, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use tracing::trace;

use super::envelope::{Envelope, IV_LEN, TAG_LEN};
use super::kdf::{HkdfSha256, KeyDerivation, KeyPair, KEY_LEN};
use super::{padding, Cipher};
use crate::error::{CipherError, Result};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;
type HmacSha256 = Hmac<Sha256>;

const BLOCK_LEN: usize = 16;

/// Symmetric cipher bound to one key pair.
#[derive(Debug)]
pub struct SymmetricCipher {
    keys: KeyPair,
}

impl SymmetricCipher {
    /// Derive keys from `passphrase` with [`HkdfSha256`].
    ///
    /// # Errors
    ///
    /// Returns `CipherError::KeyDerivation` if derivation fails.
    pub fn new(passphrase: &[u8]) -> Result<Self> {
        Self::with_derivation(passphrase, &HkdfSha256)
    }

    /// Derive keys from `passphrase` with a caller-chosen derivation.
    pub fn with_derivation(passphrase: &[u8], kdf: &dyn KeyDerivation) -> Result<Self> {
        let keys = kdf.derive_keys(passphrase)?;
        Ok(Self { keys })
    }

    /// Use an existing key pair as-is.
    pub fn from_keys(keys: KeyPair) -> Self {
        Self { keys }
    }

    fn mac(&self) -> std::result::Result<HmacSha256, CipherError> {
        <HmacSha256 as Mac>::new_from_slice(self.keys.signing_key())
            .map_err(|_| CipherError::InvalidKeyLength(KEY_LEN))
    }

    fn sign(
        &self,
        iv: &[u8; IV_LEN],
        ciphertext: &[u8],
    ) -> std::result::Result<[u8; TAG_LEN], CipherError> {
        let mut mac = self.mac()?;
        mac.update(&Envelope::signed_bytes(iv, ciphertext));

        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(&mac.finalize().into_bytes());
        Ok(tag)
    }

    fn verify(&self, envelope: &Envelope) -> std::result::Result<(), CipherError> {
        let mut mac = self.mac()?;
        mac.update(&Envelope::signed_bytes(&envelope.iv, &envelope.ciphertext));
        mac.verify_slice(&envelope.tag)
            .map_err(|_| CipherError::DecryptionFailed)
    }
}

impl Cipher for SymmetricCipher {
    fn name(&self) -> &'static str {
        "symmetric"
    }

    fn encrypt(&self, plaintext: &str) -> Result<String> {
        trace!(plaintext_len = plaintext.len(), "encrypting");

        let mut iv = [0u8; IV_LEN];
        OsRng
            .try_fill_bytes(&mut iv)
            .map_err(|e| CipherError::EncryptionFailed(format!("rng: {}", e)))?;

        let padded = padding::pad(plaintext.as_bytes(), BLOCK_LEN);
        let ciphertext = Aes256CbcEnc::new(self.keys.encryption_key().into(), &iv.into())
            .encrypt_padded_vec_mut::<NoPadding>(&padded);
        let tag = self.sign(&iv, &ciphertext)?;

        let sealed = Envelope {
            iv,
            ciphertext,
            tag,
        }
        .seal();

        trace!(envelope_len = sealed.len(), "encrypted");
        Ok(sealed)
    }

    fn decrypt(&self, envelope: &str) -> Result<String> {
        trace!(envelope_len = envelope.len(), "decrypting");

        let envelope = Envelope::open(envelope)?;
        self.verify(&envelope)?;

        let padded = Aes256CbcDec::new(self.keys.encryption_key().into(), &envelope.iv.into())
            .decrypt_padded_vec_mut::<NoPadding>(&envelope.ciphertext)
            .map_err(|_| CipherError::DecryptionFailed)?;
        let plaintext = padding::unpad(&padded, BLOCK_LEN)?;

        trace!(plaintext_len = plaintext.len(), "decrypted");

        String::from_utf8(plaintext.to_vec()).map_err(|_| CipherError::DecryptionFailed.into())
    }
}
