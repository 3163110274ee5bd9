//! Error types and handling
//!
//! This module folds the errors of every collaborator into the single error
//! type surfaced to the operator at the end of a batch.

use crate::credentials::GenerationError;
use crate::directory::DirectoryError;
use crate::printer::TransportError;
use crate::settings::SettingsError;
use crate::types::{BatchRequestError, ConfigValidationError};
use thiserror::Error;

/// Errors that can occur while provisioning guest passes
#[derive(Debug, Error)]
pub enum GuestPassError {
    /// The settings file could not be loaded, read or written
    #[error("Configuration error: {0}")]
    Configuration(#[from] SettingsError),

    /// A resolved setting is unusable
    #[error("Configuration validation failed: {0}")]
    InvalidConfiguration(#[from] ConfigValidationError),

    /// The batch parameters are out of range
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] BatchRequestError),

    /// A directory lookup, creation or commit failed
    #[error("Provisioning failed: {0}")]
    Directory(#[from] DirectoryError),

    /// No unused username could be found
    #[error("Provisioning failed: {0}")]
    Generation(#[from] GenerationError),

    /// The printer could not be opened or written
    #[error("Printer error: {0}")]
    Transport(#[from] TransportError),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl GuestPassError {
    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            GuestPassError::Configuration(_) | GuestPassError::InvalidConfiguration(_) => {
                "Configuration"
            }
            GuestPassError::InvalidRequest(_) => "Request",
            GuestPassError::Directory(_) | GuestPassError::Generation(_) => "Provisioning",
            GuestPassError::Transport(_) => "Transport",
            GuestPassError::IoError(_) => "IO",
            GuestPassError::SerializationError(_) => "Serialization",
        }
    }

    /// Whether the error prevents the tool from starting at all
    pub fn is_startup_fatal(&self) -> bool {
        matches!(self, GuestPassError::Configuration(_) | GuestPassError::InvalidConfiguration(_))
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        if self.is_startup_fatal() {
            2
        } else {
            1
        }
    }
}

/// Result type for provisioning operations
pub type GuestPassResult<T> = Result<T, GuestPassError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_categories() {
        let error: GuestPassError = SettingsError::SettingMissing("SSID".to_string()).into();
        assert_eq!(error.category(), "Configuration");
        assert!(error.is_startup_fatal());
        assert_eq!(error.exit_code(), 2);

        let error: GuestPassError = DirectoryError::GroupNotFound("Guests".to_string()).into();
        assert_eq!(error.category(), "Provisioning");
        assert!(!error.is_startup_fatal());
        assert_eq!(error.exit_code(), 1);

        let error: GuestPassError = TransportError::NotOpen.into();
        assert_eq!(error.category(), "Transport");

        let error: GuestPassError =
            GenerationError::UsernameSpaceExhausted { attempts: 3 }.into();
        assert_eq!(error.category(), "Provisioning");
    }

    #[test]
    fn test_error_message_carries_cause() {
        let error: GuestPassError = DirectoryError::Create {
            username: "guest-0001".to_string(),
            reason: "constraint violation".to_string(),
        }
        .into();
        assert_eq!(
            error.to_string(),
            "Provisioning failed: Cannot create account guest-0001: constraint violation"
        );
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: GuestPassError = io_error.into();
        assert!(matches!(error, GuestPassError::IoError(_)));
        assert_eq!(error.category(), "IO");
    }
}
