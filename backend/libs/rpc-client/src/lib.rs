//! Typed client for tRPC-style HTTP procedures
//!
//! Speaks the wire format of a tRPC backend with a JSON data transformer:
//! inputs and outputs are wrapped in `{"json": ...}` and failures carry a
//! structured error shape, including per-field input validation messages.

pub mod client;
pub mod envelope;
pub mod error;

pub use client::{RpcClient, RpcClientConfig, REQUEST_ID_HEADER};
pub use error::{Result, RpcError, ValidationErrors};
