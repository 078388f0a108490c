//! Command-line interface.

pub mod completions;
pub mod edit;
pub mod file;
pub mod output;
pub mod passphrase;
pub mod settings;
pub mod transform;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::core::cipher::Strategy;
use crate::core::constants::PASSPHRASE_ENV;
use crate::core::format::Format;
use crate::core::transform::Direction;

/// Confseal - encrypt selected values inside config files.
#[derive(Parser)]
#[command(
    name = "confseal",
    about = "Encrypt selected values inside JSON, YAML and dotenv config files",
    version
)]
pub struct Cli {
    /// Logging verbosity (overridden by CONFSEAL_LOG)
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::None)]
    pub log_level: LogLevel,

    /// Path to the project config file [default: .confseal.toml]
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Logging verbosity.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogLevel {
    #[default]
    None,
    Info,
    Debug,
}

impl LogLevel {
    /// Tracing filter directive for this level.
    pub fn directive(&self) -> &'static str {
        match self {
            Self::None => "confseal=off",
            Self::Info => "confseal=info",
            Self::Debug => "confseal=debug",
        }
    }
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Encrypt values in a given file
    #[command(visible_alias = "enc")]
    Encrypt(TransformArgs),

    /// Decrypt values in a given file
    #[command(visible_alias = "dec")]
    Decrypt(TransformArgs),

    /// Encrypt an entire file as a single value
    EncryptFile(FileArgs),

    /// Decrypt a file produced by encrypt-file
    DecryptFile(FileArgs),

    /// Decrypt a file, open it in $EDITOR, and re-encrypt it
    Edit(EditArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Which values to transform.
#[derive(Args, Debug, Clone, Default)]
pub struct KeyArgs {
    /// Secure path of a value to transform (repeatable)
    #[arg(short = 'k', long = "key", value_name = "PATH")]
    pub keys: Vec<String>,

    /// Load secure paths from a newline-delimited file
    #[arg(long, value_name = "FILE")]
    pub key_file: Option<PathBuf>,
}

/// How to build the cipher.
#[derive(Args, Debug, Clone, Default)]
pub struct CipherArgs {
    /// Encryption strategy [default: symmetric]
    #[arg(short, long, value_enum)]
    pub strategy: Option<Strategy>,

    /// Passphrase for symmetric encryption (visible to other processes)
    #[arg(long = "unsafe-passphrase", env = PASSPHRASE_ENV, hide_env_values = true)]
    pub passphrase: Option<String>,
}

/// Arguments for encrypt and decrypt.
#[derive(Args, Debug, Clone)]
pub struct TransformArgs {
    /// Path to the input file
    #[arg(short = 'i', long = "in", value_name = "PATH")]
    pub input: PathBuf,

    /// Path to the output file (`-` for stdout)
    #[arg(short = 'o', long = "out", value_name = "PATH")]
    pub output: PathBuf,

    /// Format of the input and output files [default: inferred]
    #[arg(short, long, value_enum)]
    pub format: Option<Format>,

    #[command(flatten)]
    pub keys: KeyArgs,

    #[command(flatten)]
    pub cipher: CipherArgs,
}

/// Arguments for encrypt-file and decrypt-file.
#[derive(Args, Debug, Clone)]
pub struct FileArgs {
    /// Path to the input file
    #[arg(short = 'i', long = "in", value_name = "PATH")]
    pub input: PathBuf,

    /// Path to the output file (`-` for stdout)
    #[arg(short = 'o', long = "out", value_name = "PATH")]
    pub output: PathBuf,

    #[command(flatten)]
    pub cipher: CipherArgs,
}

/// Arguments for edit.
#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    /// Path to the encrypted file, rewritten in place
    #[arg(short = 'i', long = "in", value_name = "PATH")]
    pub input: PathBuf,

    /// Format of the file [default: inferred]
    #[arg(short, long, value_enum)]
    pub format: Option<Format>,

    #[command(flatten)]
    pub keys: KeyArgs,

    #[command(flatten)]
    pub cipher: CipherArgs,
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Execute a command.
pub fn execute(cli: Cli) -> crate::error::Result<()> {
    use Command::*;

    let config = cli.config.as_deref();
    match cli.command {
        Encrypt(args) => transform::execute(args, config, Direction::Encrypt),
        Decrypt(args) => transform::execute(args, config, Direction::Decrypt),
        EncryptFile(args) => file::execute(args, config, Direction::Encrypt),
        DecryptFile(args) => file::execute(args, config, Direction::Decrypt),
        Edit(args) => edit::execute(args, config),
        Completions { shell } => completions::execute(shell),
    }
}
