//! Error types for lsfg-vk configuration operations.

use thiserror::Error;

/// Primary error type for configuration and profile operations.
#[derive(Error, Debug)]
pub enum LsfgError {
    // Profile errors
    #[error("Profile not found: {name}")]
    ProfileNotFound { name: String },

    #[error("Profile already exists: {name}")]
    ProfileExists { name: String },

    #[error("Invalid profile name '{name}': {reason}")]
    InvalidProfileName { name: String, reason: String },

    #[error("The default profile '{name}' cannot be removed or renamed")]
    DefaultProfileProtected { name: String },

    // Field errors
    #[error("Unknown configuration field: {field}")]
    UnknownField { field: String },

    #[error("Invalid value '{value}' for field '{field}' (expected {expected})")]
    InvalidFieldValue {
        field: String,
        value: String,
        expected: String,
    },

    // Filesystem errors
    #[error("Failed to write config file '{path}': {reason}")]
    ConfigWrite { path: String, reason: String },

    #[error("Failed to write launch script '{path}': {reason}")]
    ScriptWrite { path: String, reason: String },

    #[error("Could not determine home directory")]
    NoHomeDir,

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl LsfgError {
    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ProfileNotFound { .. }
                | Self::ProfileExists { .. }
                | Self::InvalidProfileName { .. }
                | Self::DefaultProfileProtected { .. }
                | Self::UnknownField { .. }
                | Self::InvalidFieldValue { .. }
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::ProfileNotFound { .. } => Some("Run: lsfgctl profile list"),
            Self::ProfileExists { .. } => Some("Pick a different name or delete the profile first"),
            Self::InvalidProfileName { .. } => Some("Use letters, digits, '-', '_' and '.' only"),
            Self::DefaultProfileProtected { .. } => {
                Some("Create a new profile instead: lsfgctl profile create <name>")
            }
            Self::UnknownField { .. } => Some("Run: lsfgctl status to see available fields"),
            Self::ConfigWrite { .. } | Self::ScriptWrite { .. } => {
                Some("Check directory permissions and free disk space")
            }
            _ => None,
        }
    }
}

/// Convenience type alias for Results using LsfgError.
pub type Result<T> = std::result::Result<T, LsfgError>;
