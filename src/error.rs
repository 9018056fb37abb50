//! Boundary error for path parsing
//!
//! Every failure inside option parsing is folded into one of these before it
//! leaves the crate. The internal message goes to logs; callers answering a
//! client should only ever send `public_message()` with `to_http_status()`.

use std::fmt;

use crate::constants::{FORBIDDEN_PUBLIC_MESSAGE, INVALID_URL_PUBLIC_MESSAGE};
use crate::options::OptionError;

/// Errors returned by [`crate::parser::PathParser`]
#[derive(Debug, Clone, PartialEq)]
pub enum RequestError {
    /// Path is empty or only a slash
    EmptyPath { path: String },
    /// A directive, preset or the source URL failed to parse
    InvalidOptions(OptionError),
    /// Signature segment missing, malformed or not matching any key
    InvalidSignature { message: String },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::EmptyPath { path } => write!(f, "Invalid path: {}", path),
            RequestError::InvalidOptions(err) => write!(f, "{}", err),
            RequestError::InvalidSignature { message } => {
                write!(f, "Invalid signature: {}", message)
            }
        }
    }
}

impl std::error::Error for RequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RequestError::InvalidOptions(err) => Some(err),
            _ => None,
        }
    }
}

impl From<OptionError> for RequestError {
    fn from(err: OptionError) -> Self {
        RequestError::InvalidOptions(err)
    }
}

impl RequestError {
    /// Maps request errors to HTTP status codes
    ///
    /// Status mapping:
    /// - EmptyPath, InvalidOptions → 404 (Not Found)
    /// - InvalidSignature → 403 (Forbidden)
    pub fn to_http_status(&self) -> u16 {
        match self {
            RequestError::EmptyPath { .. } | RequestError::InvalidOptions(_) => 404,
            RequestError::InvalidSignature { .. } => 403,
        }
    }

    /// Internal diagnostic message, safe for logs only
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Sanitized message for the response body
    pub fn public_message(&self) -> &'static str {
        match self {
            RequestError::EmptyPath { .. } | RequestError::InvalidOptions(_) => {
                INVALID_URL_PUBLIC_MESSAGE
            }
            RequestError::InvalidSignature { .. } => FORBIDDEN_PUBLIC_MESSAGE,
        }
    }

    /// True when an `expires` directive rejected the request
    pub fn is_expired(&self) -> bool {
        matches!(self, RequestError::InvalidOptions(err) if err.is_expired())
    }

    pub fn empty_path(path: impl Into<String>) -> Self {
        RequestError::EmptyPath { path: path.into() }
    }

    pub fn invalid_signature(message: impl Into<String>) -> Self {
        RequestError::InvalidSignature {
            message: message.into(),
        }
    }
}
