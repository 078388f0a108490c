//! PKCS#7 block padding.

use crate::error::CipherError;

/// Pad `data` to a multiple of `block_size`.
///
/// Always adds between 1 and `block_size` bytes, each equal to the number
/// of bytes added, so a full block of padding follows block-aligned input.
pub fn pad(data: &[u8], block_size: usize) -> Vec<u8> {
    debug_assert!((1..=255).contains(&block_size));

    let pad_len = block_size - (data.len() % block_size);
    let mut padded = Vec::with_capacity(data.len() + pad_len);
    padded.extend_from_slice(data);
    padded.resize(data.len() + pad_len, pad_len as u8);
    padded
}

/// Strip PKCS#7 padding.
///
/// # Errors
///
/// Returns `CipherError::DecryptionFailed` if the input is not block-aligned,
/// the trailing length byte is out of range, or any pad byte disagrees with it.
pub fn unpad(data: &[u8], block_size: usize) -> Result<&[u8], CipherError> {
    if data.is_empty() || data.len() % block_size != 0 {
        return Err(CipherError::DecryptionFailed);
    }

    let pad_len = usize::from(data[data.len() - 1]);
    if pad_len == 0 || pad_len > block_size {
        return Err(CipherError::DecryptionFailed);
    }

    let (body, padding) = data.split_at(data.len() - pad_len);
    if padding.iter().any(|&b| usize::from(b) != pad_len) {
        return Err(CipherError::DecryptionFailed);
    }

    Ok(body)
}
