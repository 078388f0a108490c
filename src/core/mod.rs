//! Core library components.
//!
//! Everything here is independent of the command line: parsing config files
//! into a tree, resolving secure paths, and sealing the values they name.

pub mod cipher;
pub mod config;
pub mod constants;
pub mod document;
pub mod env_file;
pub mod format;
pub mod keys;
pub mod path;
pub mod transform;
