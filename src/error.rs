//! Error types for configuration resolution

use crate::domain::ScalarKind;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for configuration resolution
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while resolving an experiment configuration.
///
/// None of these are recovered locally; they abort the run at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file content is not valid structured data
    #[error("Failed to parse config file {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    /// A config path that must exist does not
    #[error("Config file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// `--exp_config` names a file that does not exist
    #[error("Experiment config file not found: {}", path.display())]
    ConfigFileNotFound { path: PathBuf },

    /// Leftover command-line tokens that no declared flag consumes
    #[error("Unrecognized arguments: {0}")]
    UnrecognizedArgument(String),

    /// A key is a mapping in one layer and a plain value in another
    #[error("Conflicting config layers at '{key}': mapping merged with a non-mapping value")]
    MergeConflict { key: String },

    /// A dotted prefix is used both as a value and as a mapping path
    #[error("Config key collision at '{key}': used both as a value and as a mapping")]
    KeyCollision { key: String },

    /// A sequence mixes scalar kinds
    #[error("Mixed-type sequence at '{key}' in {}: expected {expected}, found {found}", path.display())]
    TypeMismatch { path: PathBuf, key: String, expected: ScalarKind, found: ScalarKind },

    /// A config key would shadow a built-in argument
    #[error("Config key '{0}' is reserved and cannot be declared as a flag")]
    ReservedKey(String),

    /// A config key that cannot be spelled as a long flag
    #[error("Config key '{0}' cannot be used as a flag name")]
    InvalidFlagName(String),

    /// I/O error
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Command-line parsing error (bad value, help display, missing command)
    #[error(transparent)]
    Cli(#[from] clap::Error),
}
