//! Confseal - encrypt selected values inside config files.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use confseal::cli::output;
use confseal::cli::{execute, Cli};
use confseal::core::constants::LOG_ENV;
use confseal::error::{CipherError, ConfigError, Error};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.directive()));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute(cli) {
        let suggestion = match &e {
            Error::Config(ConfigError::NoSecurePaths) => {
                Some("pass --key, --key-file, or list the file in .confseal.toml")
            }
            Error::Config(ConfigError::NoPassphrase) => {
                Some("set PASSPHRASE or pass --unsafe-passphrase")
            }
            Error::Cipher(CipherError::DecryptionFailed) => {
                Some("check the passphrase and that the value was encrypted by confseal")
            }
            Error::Path(_) => Some("check the secure paths against the document"),
            Error::Io(io) if io.kind() == std::io::ErrorKind::AlreadyExists => {
                Some("choose another --out, or pass the input path to rewrite it in place")
            }
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
