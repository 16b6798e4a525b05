//! Error types for the critique-core library

use thiserror::Error;

/// Result type alias for critique-core operations
pub type Result<T> = std::result::Result<T, AssessError>;

/// Error kinds surfaced by the assessment engine.
///
/// Single-channel inputs are not an error: color metrics degrade to a
/// "not applicable" result instead (see `Tier::NotApplicable`).
#[derive(Error, Debug)]
pub enum AssessError {
    /// Input raster is empty, malformed, or inconsistent with its dimensions
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Image file could not be read or decoded into a raster
    #[error("Failed to decode {path}: {message}")]
    Decode { path: String, message: String },

    /// Threshold/weight configuration is unusable; fatal at initialization
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl AssessError {
    /// Create an invalid-input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a decode error with the offending path
    pub fn decode(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
