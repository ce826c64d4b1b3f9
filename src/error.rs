/// Error types shared by both windows
///
/// Every error here is `Clone` because results travel inside iced
/// messages. Nothing in this module is fatal: the controllers turn each
/// error into a transient banner and the user may always retry.
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Failure talking to the spreadsheet script API or the image host
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    /// Transport failure (DNS, TLS, connection reset, ...)
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// The endpoint answered with a non-success HTTP status
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// The response was not well-formed JSON or lacked the success marker
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Network(Arc::new(err))
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Protocol(err.to_string())
    }
}

/// Errors surfaced at the controller boundary
#[derive(Error, Debug, Clone)]
pub enum AppError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Required form fields are missing
    #[error("validation error: {0}")]
    Validation(String),

    /// The shared password was rejected
    #[error("wrong password")]
    Auth,

    /// A privileged action targeted an item that is no longer listed
    #[error("item not found: {0}")]
    NotFound(String),

    /// Local file access (upload source, preview decoding)
    #[error("local file error: {0}")]
    Io(String),
}

impl AppError {
    /// True for transport-level failures, as opposed to a bad response
    pub fn is_network(&self) -> bool {
        matches!(self, AppError::Gateway(GatewayError::Network(_)))
    }
}

/// Failure loading the JSON configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_converts_into_app_error() {
        let err: AppError = GatewayError::Protocol("missing status".into()).into();
        assert!(matches!(err, AppError::Gateway(GatewayError::Protocol(_))));
        assert!(!err.is_network());
        assert_eq!(err.to_string(), "protocol error: missing status");
    }

    #[test]
    fn test_json_error_is_protocol_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err: GatewayError = json_err.into();
        assert!(matches!(err, GatewayError::Protocol(_)));
    }
}
