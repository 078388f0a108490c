//! Key files: newline-separated lists of secure paths.
//!
//! ```text
//! # database
//! db.password
//! items[0].token
//! ```
//!
//! Lines are trimmed. Blank lines and lines starting with `#` are skipped.

use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::core::constants::KEY_FILE_COMMENT;
use crate::core::path::SecurePath;
use crate::error::Result;

/// Read secure paths from a key file.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read, or
/// `ConfigError::InvalidPath` for the first malformed line.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<SecurePath>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let paths = read(file)?;
    debug!(path = %path.display(), count = paths.len(), "loaded key file");
    Ok(paths)
}

/// Read secure paths from any reader.
pub fn read<R: Read>(reader: R) -> Result<Vec<SecurePath>> {
    let mut paths = Vec::new();
    for line in BufReader::new(reader).lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with(KEY_FILE_COMMENT) {
            continue;
        }
        paths.push(line.parse::<SecurePath>()?);
    }
    Ok(paths)
}

/// Append `extra` to `paths`, skipping entries already present.
pub fn merge(paths: &mut Vec<SecurePath>, extra: Vec<SecurePath>) {
    for p in extra {
        if !paths.contains(&p) {
            paths.push(p);
        }
    }
}
