//! Confseal - encrypt selected values inside JSON, YAML and dotenv files.
//!
//! A config file is parsed into a generic tree, the values named by a list
//! of secure paths (`db.password`, `items[0].token`) are replaced with
//! authenticated ciphertext, and the file is written back in its own format.
//! Everything else stays readable and diffable.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── transform     # encrypt / decrypt
//! │   ├── file          # encrypt-file / decrypt-file
//! │   ├── edit          # decrypt, edit, re-encrypt
//! │   ├── passphrase    # flag, env or prompt
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── cipher/       # Cipher trait, AES-256-CBC + HMAC-SHA256
//!     ├── document      # Format-neutral tree
//!     ├── format/       # json, yaml, dotenv adapters
//!     ├── path          # Secure path parsing and resolution
//!     ├── transform     # Path-scoped encrypt / decrypt
//!     ├── env_file      # Load, transform, export
//!     ├── keys          # Key files
//!     └── config        # .confseal.toml
//! ```
//!
//! # Example
//!
//! ```no_run
//! use confseal::core::cipher::SymmetricCipher;
//! use confseal::core::env_file::{EnvFile, EnvOptions, OpenMode};
//! use confseal::core::format::Format;
//! use confseal::core::path;
//!
//! # fn main() -> confseal::error::Result<()> {
//! let mut file = EnvFile::load(EnvOptions {
//!     format: Format::Json,
//!     reader: std::fs::File::open("config.json")?,
//!     cipher: Box::new(SymmetricCipher::new(b"passphrase")?),
//!     secure_paths: path::parse_all(&["db.password"])?,
//! })?;
//! file.encrypt()?;
//! file.export_file(Format::Json, "config.enc.json", OpenMode::CreateNew)?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod core;
pub mod error;
