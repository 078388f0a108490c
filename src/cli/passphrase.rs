//! Passphrase acquisition.
//!
//! Order: `--unsafe-passphrase` (or `PASSPHRASE`, filled in by clap), then a
//! masked prompt when stderr is a terminal.

use console::Term;
use dialoguer::Password;
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::{ConfigError, Result};

/// Resolve the passphrase, prompting if needed.
///
/// `confirm` asks for the passphrase twice, used when encrypting.
///
/// # Errors
///
/// Returns `ConfigError::NoPassphrase` when there is nothing to prompt on,
/// or `ConfigError::EmptyPassphrase` for an empty value.
pub fn resolve(given: Option<String>, confirm: bool) -> Result<Zeroizing<String>> {
    let passphrase = match given {
        Some(p) => {
            debug!("using passphrase from flag or environment");
            Zeroizing::new(p)
        }
        None => prompt(confirm)?,
    };

    if passphrase.is_empty() {
        return Err(ConfigError::EmptyPassphrase.into());
    }
    Ok(passphrase)
}

fn prompt(confirm: bool) -> Result<Zeroizing<String>> {
    let term = Term::stderr();
    if !term.is_term() {
        return Err(ConfigError::NoPassphrase.into());
    }

    debug!(confirm, "prompting for passphrase");
    let mut input = Password::new().with_prompt("Passphrase");
    if confirm {
        input = input.with_confirmation("Confirm passphrase", "passphrases do not match");
    }

    let passphrase = input
        .interact_on(&term)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    Ok(Zeroizing::new(passphrase))
}
