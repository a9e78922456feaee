//! Wire envelopes for tRPC-style HTTP procedures
//!
//! Inputs and outputs travel wrapped in `{"json": ...}` when the server uses
//! a data transformer; plain payloads are accepted as well.

use crate::error::{RpcError, ValidationErrors};
use serde::{Deserialize, Serialize};

// ============================================================================
// REQUEST
// ============================================================================

/// Request body / `input` query parameter
#[derive(Debug, Serialize)]
pub struct RequestEnvelope<'a, T: ?Sized> {
    pub json: &'a T,
}

impl<'a, T: Serialize + ?Sized> RequestEnvelope<'a, T> {
    pub fn new(json: &'a T) -> Self {
        Self { json }
    }
}

// ============================================================================
// RESPONSE
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Payload<T> {
    Transformed { json: T },
    Plain(T),
}

impl<T> Payload<T> {
    fn into_inner(self) -> T {
        match self {
            Payload::Transformed { json } => json,
            Payload::Plain(value) => value,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ResultBody<T> {
    data: Payload<T>,
}

/// Successful procedure response
#[derive(Debug, Deserialize)]
pub struct ResponseEnvelope<T> {
    result: ResultBody<T>,
}

impl<T> ResponseEnvelope<T> {
    pub fn into_data(self) -> T {
        self.result.data.into_inner()
    }
}

/// Server-side error classification
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorData {
    pub code: String,
    pub http_status: Option<u16>,
    pub path: Option<String>,
    #[serde(default)]
    pub zod_error: Option<ValidationErrors>,
}

/// Error body as formatted by the server
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorShape {
    pub message: String,
    pub code: i32,
    #[serde(default)]
    pub data: Option<ErrorData>,
}

/// Failed procedure response
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    error: Payload<ErrorShape>,
}

impl ErrorEnvelope {
    /// Convert into [`RpcError::Procedure`]
    ///
    /// `path` and `status` fill in whatever the server left out.
    pub fn into_error(self, path: &str, status: u16) -> RpcError {
        let shape = self.error.into_inner();
        let data = shape.data;

        RpcError::Procedure {
            path: data
                .as_ref()
                .and_then(|d| d.path.clone())
                .unwrap_or_else(|| path.to_string()),
            code: data
                .as_ref()
                .map(|d| d.code.clone())
                .unwrap_or_else(|| json_rpc_code_name(shape.code).to_string()),
            http_status: data.as_ref().and_then(|d| d.http_status).unwrap_or(status),
            message: shape.message,
            validation: data.and_then(|d| d.zod_error),
        }
    }
}

/// Map JSON-RPC error numbers to tRPC code names
fn json_rpc_code_name(code: i32) -> &'static str {
    match code {
        -32700 => "PARSE_ERROR",
        -32600 => "BAD_REQUEST",
        -32603 => "INTERNAL_SERVER_ERROR",
        -32001 => "UNAUTHORIZED",
        -32003 => "FORBIDDEN",
        -32004 => "NOT_FOUND",
        -32008 => "TIMEOUT",
        -32029 => "TOO_MANY_REQUESTS",
        _ => "UNKNOWN",
    }
}
