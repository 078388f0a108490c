//! Format adapters.
//!
//! Each supported syntax parses into a [`Document`] and serializes back out.
//! Only this module knows concrete syntax; everything downstream works on
//! [`Node`] trees.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::core::document::{Document, Node};
use crate::error::{ConfigError, FormatError};

pub mod dotenv;

/// A supported config file syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    #[value(alias = "yml")]
    #[serde(alias = "yml")]
    Yaml,
    #[value(alias = "env")]
    #[serde(alias = "env")]
    Dotenv,
}

impl Format {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Dotenv => "dotenv",
        }
    }

    /// Infer the format from a file name.
    ///
    /// - `*.yml`, `*.yaml` → yaml
    /// - `*.json` → json
    /// - `*.env`, `.env*`, or no extension → dotenv
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnsupportedFormat` for any other extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let format = if file_name.starts_with(".env") {
            Self::Dotenv
        } else {
            match path.extension() {
                None => Self::Dotenv,
                Some(ext) => ext.to_string_lossy().parse()?,
            }
        };

        debug!(path = %path.display(), format = %format, "inferred format");
        Ok(format)
    }

    /// Parse raw bytes into a document.
    ///
    /// # Errors
    ///
    /// Returns `FormatError` if the input is malformed for this format.
    pub fn parse(&self, bytes: &[u8]) -> Result<Document, FormatError> {
        let document = match self {
            Self::Json => Document::new(serde_json::from_slice::<Node>(bytes)?),
            Self::Yaml => Document::new(serde_yaml::from_slice::<Node>(bytes)?),
            Self::Dotenv => dotenv::parse(std::str::from_utf8(bytes)?)?,
        };

        debug!(format = %self, root = document.root().kind(), "parsed document");
        Ok(document)
    }

    /// Serialize a document in this format.
    ///
    /// Dotenv output reuses the document's source layout when it has one.
    ///
    /// # Errors
    ///
    /// Returns `FormatError` if the tree cannot be expressed in this format.
    pub fn serialize(&self, document: &Document) -> Result<Vec<u8>, FormatError> {
        match self {
            Self::Json => {
                let mut out = serde_json::to_vec_pretty(document.root())?;
                out.push(b'\n');
                Ok(out)
            }
            Self::Yaml => Ok(serde_yaml::to_string(document.root())?.into_bytes()),
            Self::Dotenv => dotenv::render(document.root(), document.layout()),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "dotenv" | "env" => Ok(Self::Dotenv),
            _ => Err(ConfigError::UnsupportedFormat(s.to_string())),
        }
    }
}
