//! Client configuration profiles.
//!
//! # Design
//! Two historical variants of the upstream client (API root, default output
//! format, default-key casing, transport-error handling) are expressed as one
//! component parameterized at construction. `current()` matches the revision
//! this crate tracks; `legacy()` matches the older one.

use serde::{Deserialize, Serialize};

use crate::format::{DefaultKeys, OutputFormat, CAMEL_KEYS, SNAKE_KEYS};

/// API root of the current upstream revision.
pub const DEFAULT_API_ROOT: &str = "https://api.eventful.com";

/// API root used by the legacy client variant, plain HTTP.
pub const LEGACY_API_ROOT: &str = "http://api.eventful.com";

/// Naming policy for the default authentication parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStyle {
    /// Follow the output format's convention: snake_case for JSON
    /// (`app_key`/`user_key`), camelCase for rest (`appKey`/`userKey`).
    Format,
    /// Always snake_case, regardless of format.
    SnakeCase,
    /// Always camelCase, regardless of format.
    CamelCase,
}

impl KeyStyle {
    pub(crate) fn keys_for(self, format: OutputFormat) -> DefaultKeys {
        match self {
            KeyStyle::Format => format.conventional_keys(),
            KeyStyle::SnakeCase => SNAKE_KEYS,
            KeyStyle::CamelCase => CAMEL_KEYS,
        }
    }
}

/// What to do when the HTTP exchange itself fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorPolicy {
    /// Record the transport error and fail without touching the body.
    ShortCircuit,
    /// Run the (empty) body through the format parser anyway, surfacing a
    /// parse failure instead. Matches the legacy client variant.
    ParseResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api_root: String,
    pub default_format: OutputFormat,
    pub key_style: KeyStyle,
    pub transport_errors: TransportErrorPolicy,
}

impl ClientConfig {
    /// Profile of the current upstream client: HTTPS root, JSON default,
    /// format-conventional key names, transport failures short-circuit.
    pub fn current() -> Self {
        Self {
            api_root: DEFAULT_API_ROOT.to_string(),
            default_format: OutputFormat::Json,
            key_style: KeyStyle::Format,
            transport_errors: TransportErrorPolicy::ShortCircuit,
        }
    }

    /// Profile of the older client variant: plain-HTTP root, rest default,
    /// camelCase keys, transport failures fall through to the parser.
    pub fn legacy() -> Self {
        Self {
            api_root: LEGACY_API_ROOT.to_string(),
            default_format: OutputFormat::Rest,
            key_style: KeyStyle::CamelCase,
            transport_errors: TransportErrorPolicy::ParseResponse,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::current()
    }
}
