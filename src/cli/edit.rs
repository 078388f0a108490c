//! Edit command.
//!
//! Decrypts the secure paths into a private temporary file, opens it in the
//! user's editor, and re-encrypts the result back into the input file.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::cli::settings::{self, Settings};
use crate::cli::{output, passphrase, EditArgs};
use crate::core::config::Config;
use crate::core::constants::DEFAULT_EDITOR;
use crate::core::env_file::{EnvFile, EnvOptions, OpenMode};
use crate::core::format::Format;
use crate::error::{Error, Result};

/// Decrypt, edit, re-encrypt.
pub fn execute(args: EditArgs, config: Option<&Path>) -> Result<()> {
    let config = Config::load(config)?;
    let settings = Settings::resolve(
        &args.input,
        args.format,
        &args.keys,
        &args.cipher,
        &config,
    )?;
    let (editor, editor_args) = editor()?;

    let reader = File::open(&args.input)?;
    let passphrase = passphrase::resolve(args.cipher.passphrase, false)?;

    let mut file = EnvFile::load(EnvOptions {
        format: settings.format,
        reader,
        cipher: settings::cipher(settings.strategy, &passphrase)?,
        secure_paths: settings.secure_paths.clone(),
    })?;
    file.decrypt()?;
    let plain = file.export(settings.format)?;

    // Removed on drop unless kept after a failed re-encryption.
    let mut tmp = tempfile::Builder::new()
        .prefix(".confseal-")
        .suffix(suffix(settings.format))
        .tempfile()?;
    tmp.write_all(&plain)?;
    tmp.as_file().sync_all()?;
    debug!(path = %tmp.path().display(), editor = %editor.display(), "opening editor");

    let status = Command::new(&editor)
        .args(&editor_args)
        .arg(tmp.path())
        .status()?;
    if !status.success() {
        return Err(Error::Editor(format!(
            "{} exited with {}",
            editor.display(),
            status
        )));
    }

    let edited = std::fs::read(tmp.path())?;
    if edited == plain {
        output::success("no changes");
        return Ok(());
    }

    if let Err(e) = reencrypt(&edited, &settings, &passphrase, &args.input) {
        // Keep the edited plaintext so the changes can be recovered.
        if let Ok((_, kept)) = tmp.keep() {
            output::warn(&format!(
                "edits kept in {}",
                output::path(&kept.display().to_string())
            ));
            output::hint("the kept file holds plaintext; delete it once the edits are recovered");
        }
        return Err(e);
    }

    output::success(&format!(
        "updated {}",
        output::path(&args.input.display().to_string())
    ));
    Ok(())
}

fn reencrypt(edited: &[u8], settings: &Settings, passphrase: &str, input: &Path) -> Result<()> {
    let mut file = EnvFile::load(EnvOptions {
        format: settings.format,
        reader: edited,
        cipher: settings::cipher(settings.strategy, passphrase)?,
        secure_paths: settings.secure_paths.clone(),
    })?;
    file.encrypt()?;
    file.export_file(settings.format, input, OpenMode::Truncate)
}

/// Resolve `$VISUAL`, then `$EDITOR`, then `vi` to an executable and its
/// leading arguments, e.g. `code --wait`.
fn editor() -> Result<(PathBuf, Vec<String>)> {
    let command = ["VISUAL", "EDITOR"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string());

    let mut words = command.split_whitespace().map(str::to_string);
    let program = words
        .next()
        .ok_or_else(|| Error::Editor("no editor configured".to_string()))?;
    let path = which::which(&program)
        .map_err(|_| Error::Editor(format!("{} not found in PATH", program)))?;

    Ok((path, words.collect()))
}

fn suffix(format: Format) -> &'static str {
    match format {
        Format::Json => ".json",
        Format::Yaml => ".yaml",
        Format::Dotenv => ".env",
    }
}
