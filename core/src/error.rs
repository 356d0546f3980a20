//! Error types for the userboard client.
//!
//! # Design
//! Every failure the page can observe is one `ApiError` variant. Transport
//! and decoding failures are converted at the `ApiClient` boundary, so view
//! code only ever matches on values and never sees a panic or a foreign
//! error type.

use thiserror::Error;

/// Errors returned by `ApiClient`, the renderer and the signup flow.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (refused, DNS, aborted, or the
    /// body could not be read).
    #[error("network error: {0}")]
    Network(String),

    /// The server answered outside the success range for the call.
    #[error("HTTP {0} {1}")]
    HttpStatus(u16, String),

    /// A render target or form field was not present in the document.
    #[error("element not found: {0}")]
    MissingElement(String),

    /// The response body was not valid JSON or did not match the expected shape.
    #[error("parse failed: {0}")]
    Parse(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Status code carried by `HttpStatus`, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpStatus(code, _) => Some(*code),
            _ => None,
        }
    }
}
