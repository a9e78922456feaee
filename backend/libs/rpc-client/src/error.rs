//! Error types for remote procedure calls
//!
//! Procedure failures keep the server's classification (`BAD_REQUEST`,
//! `UNAUTHORIZED`, ...) and, for input validation failures, the per-field
//! messages so callers can show them next to the offending field.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for RPC calls
pub type Result<T> = std::result::Result<T, RpcError>;

/// Flattened input validation failure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationErrors {
    #[serde(default)]
    pub form_errors: Vec<String>,
    #[serde(default)]
    pub field_errors: HashMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message for `field`
    pub fn with_field_error(mut self, field: &str, message: impl Into<String>) -> Self {
        self.field_errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
        self
    }

    /// Messages reported for `field`
    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.field_errors.get(field).map(Vec::as_slice)
    }
}

/// Error returned by [`crate::RpcClient`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RpcError {
    /// The procedure ran and rejected the call
    #[error("{message}")]
    Procedure {
        path: String,
        code: String,
        http_status: u16,
        message: String,
        validation: Option<ValidationErrors>,
    },

    /// Request never produced a procedure response
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request exceeded the client timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Response could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl RpcError {
    /// Build an input validation failure
    pub fn validation(path: &str, validation: ValidationErrors) -> Self {
        RpcError::Procedure {
            path: path.to_string(),
            code: "BAD_REQUEST".to_string(),
            http_status: 400,
            message: "Input validation failed".to_string(),
            validation: Some(validation),
        }
    }

    /// Validation messages for `field`, if the server reported any
    pub fn field_errors(&self, field: &str) -> Option<&[String]> {
        match self {
            RpcError::Procedure {
                validation: Some(validation),
                ..
            } => validation.field(field),
            _ => None,
        }
    }

    /// First validation message for `field`
    pub fn first_field_error(&self, field: &str) -> Option<&str> {
        self.field_errors(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Procedure { http_status, .. } => *http_status,
            Self::Transport(_) => 502,
            Self::Timeout(_) => 504,
            Self::InvalidResponse(_) => 500,
        }
    }

    /// Check if this is a retryable error
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout(_) => true,
            Self::Procedure { http_status, .. } => *http_status >= 500,
            Self::InvalidResponse(_) => false,
        }
    }
}

impl From<reqwest::Error> for RpcError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RpcError::Timeout(err.to_string())
        } else if err.is_decode() {
            RpcError::InvalidResponse(err.to_string())
        } else {
            RpcError::Transport(err.to_string())
        }
    }
}
