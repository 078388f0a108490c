//! Whole-file encryption.
//!
//! `encrypt-file` seals the entire input as one envelope, for files that are
//! not structured config at all (certificates, key material, notes).

use std::path::Path;

use tracing::info;

use crate::cli::{output, passphrase, settings, FileArgs};
use crate::core::config::Config;
use crate::core::env_file::{self, OpenMode, Target};
use crate::core::transform::Direction;
use crate::error::{FormatError, Result};

/// Encrypt or decrypt a whole file.
pub fn execute(args: FileArgs, config: Option<&Path>, direction: Direction) -> Result<()> {
    let config = Config::load(config)?;
    let strategy = settings::strategy(&args.cipher, &config)?;

    let bytes = std::fs::read(&args.input)?;
    let text = std::str::from_utf8(&bytes).map_err(FormatError::from)?;

    let passphrase = passphrase::resolve(args.cipher.passphrase, direction == Direction::Encrypt)?;
    let cipher = settings::cipher(strategy, &passphrase)?;

    let result = match direction {
        Direction::Encrypt => {
            let mut envelope = cipher.encrypt(text)?;
            envelope.push('\n');
            envelope
        }
        Direction::Decrypt => cipher.decrypt(text.trim())?,
    };

    let target = Target::from_path(&args.output);
    let mode = OpenMode::for_paths(&args.input, &args.output);
    env_file::write_output(&target, result.as_bytes(), mode)?;
    info!(input = %args.input.display(), %direction, bytes = result.len(), "file done");

    if let Target::File(out) = target {
        output::success(&format!(
            "{} {} → {}",
            match direction {
                Direction::Encrypt => "encrypted",
                Direction::Decrypt => "decrypted",
            },
            args.input.display(),
            output::path(&out.display().to_string())
        ));
    }

    Ok(())
}
