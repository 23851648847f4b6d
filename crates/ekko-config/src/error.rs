//! Preset loading and saving errors.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File operation that failed on a preset path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOp {
    /// Reading a preset file
    Read,
    /// Writing a preset file
    Write,
    /// Creating a preset directory
    CreateDir,
}

impl fmt::Display for FileOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FileOp::Read => "read",
            FileOp::Write => "write",
            FileOp::CreateDir => "create directory",
        })
    }
}

/// Errors from loading, saving or resolving presets.
///
/// Out-of-range control values are not errors: they are clamped when a
/// preset is turned into controls and reported by
/// [`validate_preset`](crate::validate_preset).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A preset file or directory could not be accessed
    #[error("could not {op} '{}': {source}", path.display())]
    Io {
        /// What was being attempted.
        op: FileOp,
        /// Path the operation targeted.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Preset text is not valid TOML or has mistyped fields
    #[error("invalid preset TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// Preset could not be encoded as TOML
    #[error("could not encode preset: {0}")]
    Encode(#[from] toml::ser::Error),

    /// No factory preset, user preset or file matched the name
    #[error("no preset named '{0}'")]
    PresetNotFound(String),
}

impl ConfigError {
    /// Wraps an I/O failure of `op` on `path`.
    pub fn io(op: FileOp, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Path involved in the failure, for I/O errors.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigError::Io { path, .. } => Some(path),
            _ => None,
        }
    }
}
