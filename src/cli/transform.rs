//! Encrypt and decrypt commands.

use std::fs::File;
use std::path::Path;

use tracing::info;

use crate::cli::settings::{self, Settings};
use crate::cli::{output, passphrase, TransformArgs};
use crate::core::config::Config;
use crate::core::env_file::{EnvFile, EnvOptions, OpenMode, Target};
use crate::core::transform::Direction;
use crate::error::Result;

/// Transform the secure paths of `--in` and write the result to `--out`.
///
/// The output is replaced when it names the input file and created
/// exclusively otherwise.
pub fn execute(args: TransformArgs, config: Option<&Path>, direction: Direction) -> Result<()> {
    let config = Config::load(config)?;
    let settings = Settings::resolve(
        &args.input,
        args.format,
        &args.keys,
        &args.cipher,
        &config,
    )?;

    let reader = File::open(&args.input)?;
    let passphrase = passphrase::resolve(args.cipher.passphrase, direction == Direction::Encrypt)?;
    let cipher = settings::cipher(settings.strategy, &passphrase)?;

    let count = settings.secure_paths.len();
    let mut file = EnvFile::load(EnvOptions {
        format: settings.format,
        reader,
        cipher,
        secure_paths: settings.secure_paths,
    })?;
    file.apply(direction)?;

    let mode = OpenMode::for_paths(&args.input, &args.output);
    file.export_file(settings.format, &args.output, mode)?;
    info!(input = %args.input.display(), output = %args.output.display(), %direction, "done");

    if let Target::File(out) = Target::from_path(&args.output) {
        let verb = match direction {
            Direction::Encrypt => "encrypted",
            Direction::Decrypt => "decrypted",
        };
        output::success(&format!(
            "{} {} {} → {}",
            verb,
            count,
            if count == 1 { "value" } else { "values" },
            output::path(&out.display().to_string())
        ));
    }

    Ok(())
}
