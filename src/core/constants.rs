//! Constants used throughout confseal.

/// Project configuration file name (.confseal.toml).
pub const CONFIG_FILE: &str = ".confseal.toml";

/// Environment variable holding a tracing filter, e.g. `confseal=debug`.
pub const LOG_ENV: &str = "CONFSEAL_LOG";

/// Environment variable read when `--unsafe-passphrase` is not given.
pub const PASSPHRASE_ENV: &str = "PASSPHRASE";

/// Output path that means standard output.
pub const STDOUT_PATH: &str = "/dev/stdout";

/// Output path that means standard error.
pub const STDERR_PATH: &str = "/dev/stderr";

/// Editor used when neither `$VISUAL` nor `$EDITOR` is set.
pub const DEFAULT_EDITOR: &str = "vi";

/// Comment marker in key files.
pub const KEY_FILE_COMMENT: char = '#';
