//! Error types for the Eventful client.
//!
//! # Design
//! Transport and API failures travel the same channel (`CallError`) because
//! the upstream protocol reports both through the same call path; the variant
//! keeps the kind inspectable. `ApiFailure` is the flattened code/message
//! pair recorded in the diagnostic snapshot — transport and parse failures
//! use the fixed codes `transport` and `parse` there, since the wire gives
//! them none.

use std::fmt;

/// Error code and message pair kept in the diagnostic snapshot.
///
/// Codes are rendered as strings even when the wire carries a number (the
/// JSON `error` field); rest-format codes are strings already.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub code: String,
    pub message: String,
}

/// Errors returned by `EventfulClient` call methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    /// The HTTP exchange itself failed (connection, DNS, timeout).
    Transport { message: String },

    /// The exchange succeeded but the API reported an application-level
    /// error in the response body.
    Api { code: String, message: String },

    /// The response body could not be parsed in the requested format.
    Parse { message: String },
}

impl CallError {
    /// Flatten into the code/message pair kept in the snapshot.
    pub(crate) fn failure(&self) -> ApiFailure {
        match self {
            CallError::Transport { message } => ApiFailure {
                code: "transport".to_string(),
                message: message.clone(),
            },
            CallError::Api { code, message } => ApiFailure {
                code: code.clone(),
                message: message.clone(),
            },
            CallError::Parse { message } => ApiFailure {
                code: "parse".to_string(),
                message: message.clone(),
            },
        }
    }
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallError::Transport { message } => write!(f, "transport error: {message}"),
            CallError::Api { code, message } => write!(f, "API error {code}: {message}"),
            CallError::Parse { message } => write!(f, "parse error: {message}"),
        }
    }
}

impl std::error::Error for CallError {}
