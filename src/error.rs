//! Error types and handling for `TravelMagic`

use thiserror::Error;

/// Main error type for the `TravelMagic` application
#[derive(Error, Debug)]
pub enum TravelMagicError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// API communication errors (weather, geocoding, language model)
    #[error("API error: {message}")]
    Api { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Persistent store errors
    #[error("Store error: {message}")]
    Store { message: String },

    /// Requested record does not exist
    #[error("Not found: {message}")]
    NotFound { message: String },
}

impl TravelMagicError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new store error
    pub fn store<S: Into<String>>(message: S) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TravelMagicError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            TravelMagicError::Api { .. } => {
                "Unable to connect to external services. Please check your internet connection."
                    .to_string()
            }
            TravelMagicError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            TravelMagicError::Store { .. } => {
                "Could not access saved itineraries. Check the storage directory.".to_string()
            }
            TravelMagicError::NotFound { message } => format!("Not found: {message}"),
        }
    }
}
