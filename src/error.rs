//! Error types.
//!
//! Each concern owns a `thiserror` enum; they all fold into [`Error`] so
//! callers can propagate with `?` and match on the kind when they need to.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::format::Format;

/// Top-level error for every fallible operation in the crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Path(#[from] PathErrors),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("editor failed: {0}")]
    Editor(String),
}

/// Invalid or contradictory invocation settings. Raised before any work starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("you must specify either --key or --key-file")]
    NoSecurePaths,

    #[error("unsupported format: {0} (expected json, yaml or dotenv)")]
    UnsupportedFormat(String),

    #[error("unsupported strategy: {0}")]
    UnsupportedStrategy(String),

    #[error("invalid secure path `{path}`: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    #[error("no passphrase given: pass --unsafe-passphrase, set PASSPHRASE, or run in a terminal")]
    NoPassphrase,

    #[error("passphrase must not be empty")]
    EmptyPassphrase,

    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Malformed input, or a tree the target format cannot express.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("dotenv error: line {line}: {reason}")]
    Dotenv { line: usize, reason: String },

    #[error("input is not valid utf-8")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("cannot write {format}: {reason}")]
    Unrepresentable { format: Format, reason: String },
}

/// Cipher failures.
///
/// Every decrypt-side check collapses into [`CipherError::DecryptionFailed`]
/// so callers cannot tell a bad signature from bad padding.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CipherError {
    #[error("decryption failed")]
    DecryptionFailed,

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("invalid key length: {0} (expected 32)")]
    InvalidKeyLength(usize),

    #[error("key derivation failed")]
    KeyDerivation,
}

/// One secure path that could not be resolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("unable to locate secure path `{path}`")]
    NotFound { path: String },

    #[error("unable to locate secure path `{path}`: index {index} out of range (length {len})")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },

    #[error("secure path `{path}` resolves to a {kind}, expected a scalar")]
    NotScalar { path: String, kind: &'static str },
}

impl PathError {
    /// The path text as declared.
    pub fn path(&self) -> &str {
        match self {
            Self::NotFound { path }
            | Self::IndexOutOfRange { path, .. }
            | Self::NotScalar { path, .. } => path,
        }
    }
}

/// All resolution failures of one operation, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathErrors(pub Vec<PathError>);

impl PathErrors {
    pub fn iter(&self) -> impl Iterator<Item = &PathError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PathErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut errors = self.0.iter();
        if let Some(first) = errors.next() {
            write!(f, "{}", first)?;
        }
        for e in errors {
            write!(f, "\n{}", e)?;
        }
        Ok(())
    }
}

impl std::error::Error for PathErrors {}

pub type Result<T> = std::result::Result<T, Error>;
