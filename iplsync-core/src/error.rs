//! Error types for iplsync-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while assembling the run configuration.
///
/// All of these are detected before any network activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting was not supplied by flag, environment or config file.
    #[error("required setting '{0}' is missing")]
    Missing(&'static str),

    /// Underlying I/O failure while reading a config file.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file exists but is not valid YAML for [`crate::FileConfig`].
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// An explicitly requested config file does not exist.
    #[error("config file not found at {path}")]
    NotFound { path: PathBuf },

    /// A value was present but unusable (e.g. unknown cloud instance).
    #[error("invalid value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}
