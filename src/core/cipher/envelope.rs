//! Ciphertext envelope.
//!
//! An envelope is the printable form of one encrypted value:
//!
//! ```text
//! hex( iv[16] || ciphertext[16 * n] || tag[32] )
//! ```
//!
//! It contains only `[0-9a-f]`, so it fits unquoted into JSON, YAML and
//! dotenv alike.

use crate::error::CipherError;

/// AES block and IV size.
pub const IV_LEN: usize = 16;

/// HMAC-SHA256 tag size.
pub const TAG_LEN: usize = 32;

const BLOCK_LEN: usize = 16;

/// Decoded envelope parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub iv: [u8; IV_LEN],
    pub ciphertext: Vec<u8>,
    pub tag: [u8; TAG_LEN],
}

impl Envelope {
    /// The bytes covered by the tag: `iv || ciphertext`.
    pub fn signed_bytes(iv: &[u8; IV_LEN], ciphertext: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(IV_LEN + ciphertext.len());
        bytes.extend_from_slice(iv);
        bytes.extend_from_slice(ciphertext);
        bytes
    }

    /// Encode to the lowercase hex wire form.
    pub fn seal(&self) -> String {
        let mut raw = Self::signed_bytes(&self.iv, &self.ciphertext);
        raw.extend_from_slice(&self.tag);
        hex::encode(raw)
    }

    /// Decode the hex wire form.
    ///
    /// Only the shape is checked here; the tag is verified by the cipher.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::DecryptionFailed` for anything but lowercase hex
    /// (no whitespace, no uppercase), or a payload too short or not
    /// block-aligned.
    pub fn open(encoded: &str) -> Result<Self, CipherError> {
        // hex::decode is case-insensitive; a case flip must not decode.
        if !encoded.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(CipherError::DecryptionFailed);
        }
        let raw = hex::decode(encoded).map_err(|_| CipherError::DecryptionFailed)?;

        if raw.len() < IV_LEN + BLOCK_LEN + TAG_LEN {
            return Err(CipherError::DecryptionFailed);
        }
        let ciphertext_len = raw.len() - IV_LEN - TAG_LEN;
        if ciphertext_len % BLOCK_LEN != 0 {
            return Err(CipherError::DecryptionFailed);
        }

        let (iv, rest) = raw.split_at(IV_LEN);
        let (ciphertext, tag) = rest.split_at(ciphertext_len);

        let mut envelope = Self {
            iv: [0u8; IV_LEN],
            ciphertext: ciphertext.to_vec(),
            tag: [0u8; TAG_LEN],
        };
        envelope.iv.copy_from_slice(iv);
        envelope.tag.copy_from_slice(tag);
        Ok(envelope)
    }
}
