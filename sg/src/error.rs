//! Skin generation error types

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while generating skins
#[derive(Debug, Error)]
pub enum SkinError {
    #[error("Failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unterminated placeholder at line {line} (byte {offset}): missing '}}'")]
    UnterminatedToken { offset: usize, line: usize },

    #[error("Scaling {token} by {multiplier} does not produce a finite number")]
    NonFiniteValue { token: String, multiplier: f64 },

    #[error("Unknown value in placeholder {token}")]
    UnknownValue { token: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SkinError {
    /// Check if this error comes from the template text rather than the filesystem
    pub fn is_template_error(&self) -> bool {
        matches!(
            self,
            SkinError::UnterminatedToken { .. } | SkinError::NonFiniteValue { .. } | SkinError::UnknownValue { .. }
        )
    }
}
