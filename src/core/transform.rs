//! Path-scoped document transformation.

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use crate::core::cipher::Cipher;
use crate::core::document::Node;
use crate::core::path::{self, SecurePath};
use crate::error::Result;

/// Which way values are transformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
        })
    }
}

/// Return a copy of `root` with every secure path encrypted or decrypted.
///
/// Paths are resolved up front; if any fails, nothing is transformed.
/// Values are processed in declaration order, and a leaf named by more than
/// one path is transformed once. Results are written back as strings.
///
/// # Errors
///
/// Returns `PathErrors` if any path fails to resolve, or the first cipher
/// error.
pub fn apply(
    root: &Node,
    paths: &[SecurePath],
    cipher: &dyn Cipher,
    direction: Direction,
) -> Result<Node> {
    let resolved = path::resolve(root, paths)?;
    let mut output = root.clone();
    let mut done = HashSet::with_capacity(resolved.len());

    for item in resolved {
        if !done.insert(item.locator.clone()) {
            debug!(path = %item.path, "skipping already transformed path");
            continue;
        }

        let transformed = match direction {
            Direction::Encrypt => cipher.encrypt(&item.value)?,
            Direction::Decrypt => cipher.decrypt(&item.value)?,
        };

        if let Some(slot) = item.locator.get_mut(&mut output) {
            *slot = Node::String(transformed);
        }
        debug!(path = %item.path, %direction, "transformed");
    }

    Ok(output)
}

/// [`apply`] with [`Direction::Encrypt`].
pub fn encrypt(root: &Node, paths: &[SecurePath], cipher: &dyn Cipher) -> Result<Node> {
    apply(root, paths, cipher, Direction::Encrypt)
}

/// [`apply`] with [`Direction::Decrypt`].
pub fn decrypt(root: &Node, paths: &[SecurePath], cipher: &dyn Cipher) -> Result<Node> {
    apply(root, paths, cipher, Direction::Decrypt)
}
