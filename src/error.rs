//! Error types and handling for the METAR monitor

use thiserror::Error;

/// Main error type for the METAR monitor
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// An API request failed after exhausting all retries.
    ///
    /// This is the only error the retry client is allowed to surface;
    /// every layer above it degrades to an empty result instead.
    #[error("API request failed after {attempts} attempts: {message}")]
    RequestFailed { attempts: u32, message: String },

    /// Response data did not have the expected shape
    #[error("Invalid response data: {message}")]
    DataShape { message: String },

}

impl MonitorError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new request-failed error
    pub fn request_failed<S: Into<String>>(attempts: u32, message: S) -> Self {
        Self::RequestFailed {
            attempts,
            message: message.into(),
        }
    }

    /// Create a new data-shape error
    pub fn data_shape<S: Into<String>>(message: S) -> Self {
        Self::DataShape {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            MonitorError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            MonitorError::RequestFailed { .. } => {
                "Unable to reach the aviation weather service. Please check your internet connection."
                    .to_string()
            }
            MonitorError::DataShape { message } => {
                format!("Unexpected data from the weather service: {message}")
            }
        }
    }
}
