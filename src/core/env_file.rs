//! Config file handle.
//!
//! An [`EnvFile`] owns one parsed document together with the cipher and
//! secure paths of a single invocation, and writes the result out.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::cipher::Cipher;
use crate::core::constants::{STDERR_PATH, STDOUT_PATH};
use crate::core::document::Document;
use crate::core::format::Format;
use crate::core::path::SecurePath;
use crate::core::transform::{self, Direction};
use crate::error::{ConfigError, Result};

/// How [`EnvFile::export_file`] opens its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Fail if the destination already exists.
    CreateNew,
    /// Replace the destination if it exists.
    Truncate,
}

impl OpenMode {
    /// Replace in place when reading and writing the same file, refuse to
    /// clobber anything else.
    pub fn for_paths(input: &Path, output: &Path) -> Self {
        if same_file(input, output) {
            Self::Truncate
        } else {
            Self::CreateNew
        }
    }
}

/// Where exported bytes go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Stdout,
    Stderr,
    File(PathBuf),
}

impl Target {
    /// Map `-`, `/dev/stdout` and `/dev/stderr` to the standard streams.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match path.to_str() {
            Some("-") | Some(STDOUT_PATH) => Self::Stdout,
            Some(STDERR_PATH) => Self::Stderr,
            _ => Self::File(path.to_path_buf()),
        }
    }
}

/// Inputs for [`EnvFile::load`].
pub struct EnvOptions<R> {
    pub format: Format,
    pub reader: R,
    pub cipher: Box<dyn Cipher>,
    pub secure_paths: Vec<SecurePath>,
}

/// A parsed config file bound to a cipher and a set of secure paths.
pub struct EnvFile {
    document: Document,
    format: Format,
    cipher: Box<dyn Cipher>,
    secure_paths: Vec<SecurePath>,
}

impl EnvFile {
    /// Read and parse the input.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoSecurePaths` if no paths were given, an I/O
    /// error if reading fails, or `FormatError` if the input is malformed.
    pub fn load<R: Read>(options: EnvOptions<R>) -> Result<Self> {
        let EnvOptions {
            format,
            mut reader,
            cipher,
            secure_paths,
        } = options;

        if secure_paths.is_empty() {
            return Err(ConfigError::NoSecurePaths.into());
        }

        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        debug!(bytes = bytes.len(), %format, "read input");

        let document = format.parse(&bytes)?;

        Ok(Self {
            document,
            format,
            cipher,
            secure_paths,
        })
    }

    /// Encrypt every secure path in place.
    pub fn encrypt(&mut self) -> Result<()> {
        self.apply(Direction::Encrypt)
    }

    /// Decrypt every secure path in place.
    pub fn decrypt(&mut self) -> Result<()> {
        self.apply(Direction::Decrypt)
    }

    /// Transform every secure path in the given direction.
    ///
    /// On error the document is left as it was.
    pub fn apply(&mut self, direction: Direction) -> Result<()> {
        debug!(
            %direction,
            paths = self.secure_paths.len(),
            cipher = self.cipher.name(),
            "transforming document"
        );
        let root = transform::apply(
            self.document.root(),
            &self.secure_paths,
            self.cipher.as_ref(),
            direction,
        )?;
        *self.document.root_mut() = root;
        Ok(())
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Format the input was parsed as.
    pub fn format(&self) -> Format {
        self.format
    }

    pub fn secure_paths(&self) -> &[SecurePath] {
        &self.secure_paths
    }

    /// Serialize the current document.
    pub fn export(&self, format: Format) -> Result<Vec<u8>> {
        Ok(format.serialize(&self.document)?)
    }

    /// Serialize the current document and write it to `path`.
    ///
    /// The document is fully serialized before anything is opened. Files are
    /// written to a temporary sibling and renamed into place, so the
    /// destination is never left half-written.
    ///
    /// # Errors
    ///
    /// Returns `FormatError` if serialization fails, or an I/O error
    /// (`AlreadyExists` under [`OpenMode::CreateNew`]) if the write fails.
    pub fn export_file(&self, format: Format, path: impl AsRef<Path>, mode: OpenMode) -> Result<()> {
        let bytes = self.export(format)?;
        write_output(&Target::from_path(path), &bytes, mode)
    }
}

/// Write bytes to a target.
///
/// # Errors
///
/// Returns an I/O error if the write or rename fails.
pub fn write_output(target: &Target, bytes: &[u8], mode: OpenMode) -> Result<()> {
    match target {
        Target::Stdout => {
            let mut out = std::io::stdout().lock();
            out.write_all(bytes)?;
            out.flush()?;
        }
        Target::Stderr => {
            let mut err = std::io::stderr().lock();
            err.write_all(bytes)?;
            err.flush()?;
        }
        Target::File(path) => write_atomic(path, bytes, mode)?,
    }
    Ok(())
}

fn write_atomic(path: &Path, bytes: &[u8], mode: OpenMode) -> std::io::Result<()> {
    if mode == OpenMode::CreateNew && path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("{} already exists", path.display()),
        ));
    }

    // In-place rewrites go to the symlink target so the link survives.
    let dest = match mode {
        OpenMode::Truncate => path.canonicalize().unwrap_or_else(|_| path.to_path_buf()),
        OpenMode::CreateNew => path.to_path_buf(),
    };
    let dir = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    // tempfile creates the file with mode 0600 on unix; an existing file
    // keeps its own permissions.
    let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
    if mode == OpenMode::Truncate {
        if let Ok(meta) = std::fs::metadata(&dest) {
            tmp.as_file().set_permissions(meta.permissions())?;
        }
    }
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;

    match mode {
        OpenMode::CreateNew => tmp.persist_noclobber(&dest).map_err(|e| e.error)?,
        OpenMode::Truncate => tmp.persist(&dest).map_err(|e| e.error)?,
    };

    debug!(path = %dest.display(), bytes = bytes.len(), ?mode, "wrote output");
    Ok(())
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
