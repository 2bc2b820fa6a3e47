// Error handling module for the claimlink server
//
// This module defines error types and utility functions for error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::result;
use thiserror::Error;
use tracing::{debug, error};

/// Result type for claimlink operations
pub type Result<T> = result::Result<T, ClaimLinkError>;

/// Error type for claimlink operations
#[derive(Debug, Error, Clone)]
pub enum ClaimLinkError {
    /// Unknown policy, claim, or alias token
    #[error("Not found: {0}")]
    NotFound(String),

    /// Claim attempt against a policy whose claim limit is reached
    #[error("Claim limit exhausted: {0}")]
    LimitExhausted(String),

    /// Outbound fetch of a true location failed
    #[error("Proxy error: {0}")]
    Proxy(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization-related errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Implement IntoResponse for ClaimLinkError so it can be returned directly from handlers
///
/// Rejections caused by unknown or exhausted identifiers all surface as a 403 with
/// a short plain-text diagnostic; the variants stay distinct internally for logging
/// but the wire response does not tell the causes apart. Upstream fetch failures
/// map to 502 without echoing the upstream detail, since that detail can contain
/// the true location.
impl IntoResponse for ClaimLinkError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ClaimLinkError::NotFound(msg) | ClaimLinkError::LimitExhausted(msg) => {
                debug!("Rejecting request: {}", msg);
                (StatusCode::FORBIDDEN, msg)
            }
            ClaimLinkError::Proxy(msg) => {
                debug!("Upstream fetch failed: {}", msg);
                (StatusCode::BAD_GATEWAY, "Bad Gateway".to_string())
            }
            ClaimLinkError::Config(msg) => {
                error!("Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ClaimLinkError::Serialization(msg) => {
                error!("Serialization error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, body).into_response()
    }
}

// Implement conversion from reqwest error to ClaimLinkError
impl From<reqwest::Error> for ClaimLinkError {
    fn from(err: reqwest::Error) -> Self {
        ClaimLinkError::Proxy(err.to_string())
    }
}

// Implement conversion from config error to ClaimLinkError
impl From<config::ConfigError> for ClaimLinkError {
    fn from(err: config::ConfigError) -> Self {
        ClaimLinkError::Config(err.to_string())
    }
}

// Implement conversion from toml serialization error to ClaimLinkError
impl From<toml::ser::Error> for ClaimLinkError {
    fn from(err: toml::ser::Error) -> Self {
        ClaimLinkError::Serialization(err.to_string())
    }
}
