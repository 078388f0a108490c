//! Project configuration.
//!
//! An optional `.confseal.toml` records the secure paths for files that are
//! sealed regularly, so they need not be repeated on every invocation:
//!
//! ```toml
//! strategy = "symmetric"
//!
//! [[files]]
//! path = "config/app.json"
//! keys = ["db.password"]
//! key_file = "config/app.keys"
//! ```
//!
//! Relative paths inside the file are resolved against its directory.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::core::cipher::Strategy;
use crate::core::constants;
use crate::core::format::Format;
use crate::core::keys;
use crate::core::path::{self, SecurePath};
use crate::error::{ConfigError, Result};

/// Contents of `.confseal.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Default strategy when `--strategy` is not given.
    #[serde(default)]
    pub strategy: Option<Strategy>,
    /// Per-file settings.
    #[serde(default)]
    pub files: Vec<FileEntry>,
    /// Directory the config was loaded from.
    #[serde(skip)]
    base_dir: PathBuf,
}

/// Settings for one input file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileEntry {
    pub path: PathBuf,
    #[serde(default)]
    pub format: Option<Format>,
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub key_file: Option<PathBuf>,
}

impl Config {
    /// Default location in the current directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from(constants::CONFIG_FILE)
    }

    /// Load the project configuration.
    ///
    /// With `explicit`, that file must exist. Without it, `.confseal.toml` in
    /// the current directory is read if present and an empty config is
    /// returned otherwise.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` for a missing explicit file,
    /// `ConfigError::ReadFile` or `ConfigError::Parse` if it cannot be read,
    /// or `ConfigError::InvalidPath` if validation fails.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()).into());
                }
                Self::from_file(path)
            }
            None => {
                let path = Self::default_path();
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    debug!("no config file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Read and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");

        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config = Self::parse(&contents)?;
        config.base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        debug!(files = config.files.len(), "config loaded");
        Ok(config)
    }

    /// Parse and validate config text. Relative paths resolve against `.`.
    pub fn parse(contents: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(contents).map_err(ConfigError::Parse)?;
        config.base_dir = PathBuf::from(".");
        config.validate()?;
        Ok(config)
    }

    /// Check that every entry's keys are valid secure paths.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError::InvalidPath`.
    pub fn validate(&self) -> Result<()> {
        for entry in &self.files {
            path::parse_all(&entry.keys)?;
        }
        Ok(())
    }

    /// The entry whose `path` names the same file as `input`.
    pub fn entry_for(&self, input: &Path) -> Option<&FileEntry> {
        let entry = self
            .files
            .iter()
            .find(|e| same_path(&self.base_dir.join(&e.path), input));
        debug!(input = %input.display(), found = entry.is_some(), "config entry lookup");
        entry
    }

    /// Secure paths listed for an entry: `keys`, then `key_file`.
    ///
    /// # Errors
    ///
    /// Returns an error if a key is malformed or the key file cannot be read.
    pub fn secure_paths(&self, entry: &FileEntry) -> Result<Vec<SecurePath>> {
        let mut paths = path::parse_all(&entry.keys)?;
        if let Some(key_file) = &entry.key_file {
            keys::merge(&mut paths, keys::load(self.base_dir.join(key_file))?);
        }
        Ok(paths)
    }
}

fn same_path(a: &Path, b: &Path) -> bool {
    let strip = |p: &Path| p.components().filter(|c| c.as_os_str() != ".").collect::<PathBuf>();
    if strip(a) == strip(b) {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
