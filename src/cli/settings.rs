//! Merge command-line flags with `.confseal.toml`.

use std::path::Path;

use tracing::debug;

use crate::cli::{CipherArgs, KeyArgs};
use crate::core::cipher::{Cipher, Strategy};
use crate::core::config::Config;
use crate::core::format::Format;
use crate::core::keys;
use crate::core::path::{self, SecurePath};
use crate::error::{ConfigError, Result};

/// Settings for one input file after applying precedence.
#[derive(Debug)]
pub struct Settings {
    pub format: Format,
    pub strategy: Strategy,
    pub secure_paths: Vec<SecurePath>,
}

impl Settings {
    /// Resolve settings for `input`.
    ///
    /// Secure paths: `--key`, then `--key-file`, then the config entry.
    /// Format: `--format`, then the entry, then the file name.
    /// Strategy: `--strategy`, then the config, then symmetric.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoSecurePaths` if no source names any path,
    /// `ConfigError::UnsupportedFormat` if the format cannot be inferred, or
    /// `ConfigError::UnsupportedStrategy` for a strategy with no cipher.
    pub fn resolve(
        input: &Path,
        format: Option<Format>,
        key_args: &KeyArgs,
        cipher_args: &CipherArgs,
        config: &Config,
    ) -> Result<Self> {
        let entry = config.entry_for(input);

        let secure_paths = if !key_args.keys.is_empty() {
            path::parse_all(&key_args.keys)?
        } else if let Some(key_file) = &key_args.key_file {
            keys::load(key_file)?
        } else if let Some(entry) = entry {
            config.secure_paths(entry)?
        } else {
            return Err(ConfigError::NoSecurePaths.into());
        };
        if secure_paths.is_empty() {
            return Err(ConfigError::NoSecurePaths.into());
        }

        let format = match format.or_else(|| entry.and_then(|e| e.format)) {
            Some(f) => f,
            None => Format::from_path(input)?,
        };

        let strategy = strategy(cipher_args, config)?;

        debug!(
            %format,
            %strategy,
            paths = secure_paths.len(),
            "resolved settings"
        );

        Ok(Self {
            format,
            strategy,
            secure_paths,
        })
    }
}

/// Pick the strategy and reject unsupported ones before any prompt.
pub fn strategy(cipher_args: &CipherArgs, config: &Config) -> Result<Strategy> {
    let strategy = cipher_args
        .strategy
        .or(config.strategy)
        .unwrap_or_default();
    if !strategy.is_supported() {
        return Err(ConfigError::UnsupportedStrategy(strategy.name().to_string()).into());
    }
    Ok(strategy)
}

/// Build a cipher from an already resolved passphrase.
pub fn cipher(strategy: Strategy, passphrase: &str) -> Result<Box<dyn Cipher>> {
    strategy.cipher(passphrase.as_bytes())
}
