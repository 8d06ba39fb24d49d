//! Error types for txcast
//!
//! Transport, configuration and front-end failures share one enum so the
//! binaries can report them uniformly.

use thiserror::Error;

/// Main error type for txcast operations
#[derive(Error, Debug)]
pub enum TxCastError {
    /// Connection refused, DNS failure, timeout, body read failure...
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("Request failed with status code {0}")]
    Status(u16),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read config file '{0}': {1}")]
    ConfigRead(String, std::io::Error),

    #[error("Failed to parse config file '{0}': {1}")]
    ConfigParse(String, toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to write log file: {0}")]
    Logging(String),

    #[error("GUI error: {0}")]
    Gui(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

/// Result type alias for txcast operations
pub type Result<T> = std::result::Result<T, TxCastError>;

impl TxCastError {
    /// Whether this error came from talking to the broadcast endpoint
    pub fn is_transport(&self) -> bool {
        matches!(self, TxCastError::Http(_) | TxCastError::Status(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_reads_like_a_failed_request() {
        let err = TxCastError::Status(502);
        assert_eq!(err.to_string(), "Request failed with status code 502");
        assert!(err.is_transport());
    }

    #[test]
    fn config_errors_are_not_transport_errors() {
        let err = TxCastError::InvalidConfig("endpoint is empty".to_string());
        assert!(!err.is_transport());
        assert_eq!(err.to_string(), "Invalid configuration: endpoint is empty");
    }
}
