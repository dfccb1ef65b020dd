//! Output formats and response parsing.
//!
//! # Design
//! The upstream client branched on a string flag; here the two formats are a
//! closed enum, each variant carrying its URL segment, its conventional
//! default-parameter key names, and its body parsing with error detection.
//! Detection is body-based: the API reports failures inside a 200 response,
//! so HTTP status plays no part.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use xmltree::Element;

use crate::error::CallError;

/// Response serialization for an API endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Json,
    /// XML-based format, named `rest` in endpoint URLs.
    Rest,
}

/// Names of the default authentication parameters attached to every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultKeys {
    pub app_key: &'static str,
    pub user: &'static str,
    pub user_key: &'static str,
}

pub(crate) const SNAKE_KEYS: DefaultKeys = DefaultKeys {
    app_key: "app_key",
    user: "user",
    user_key: "user_key",
};

pub(crate) const CAMEL_KEYS: DefaultKeys = DefaultKeys {
    app_key: "appKey",
    user: "user",
    user_key: "userKey",
};

impl OutputFormat {
    /// URL path segment selecting this format on the server.
    pub fn path_segment(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Rest => "rest",
        }
    }

    /// Conventional default-key casing for this format: JSON endpoints take
    /// snake_case names, rest endpoints camelCase.
    pub fn conventional_keys(self) -> DefaultKeys {
        match self {
            OutputFormat::Json => SNAKE_KEYS,
            OutputFormat::Rest => CAMEL_KEYS,
        }
    }

    /// Parse a response body, detecting the format's API error envelope.
    pub fn parse(self, body: &str) -> Result<ApiResponse, CallError> {
        match self {
            OutputFormat::Json => parse_json(body),
            OutputFormat::Rest => parse_rest(body),
        }
    }
}

/// A successfully parsed response body.
#[derive(Debug, Clone)]
pub enum ApiResponse {
    Json(Value),
    Xml(Element),
}

impl ApiResponse {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ApiResponse::Json(value) => Some(value),
            ApiResponse::Xml(_) => None,
        }
    }

    pub fn as_xml(&self) -> Option<&Element> {
        match self {
            ApiResponse::Json(_) => None,
            ApiResponse::Xml(element) => Some(element),
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            ApiResponse::Json(value) => Some(value),
            ApiResponse::Xml(_) => None,
        }
    }

    pub fn into_xml(self) -> Option<Element> {
        match self {
            ApiResponse::Json(_) => None,
            ApiResponse::Xml(element) => Some(element),
        }
    }
}

fn parse_json(body: &str) -> Result<ApiResponse, CallError> {
    let value: Value = serde_json::from_str(body).map_err(|e| CallError::Parse {
        message: e.to_string(),
    })?;
    if let Some(code) = value.get("error") {
        let status = value.get("status").and_then(Value::as_str).unwrap_or_default();
        let description = value
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default();
        return Err(CallError::Api {
            code: render_code(code),
            message: format!("{status}: {description}"),
        });
    }
    Ok(ApiResponse::Json(value))
}

/// JSON error codes may be numbers or strings on the wire; the snapshot
/// stores them as strings either way.
fn render_code(code: &Value) -> String {
    match code {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse_rest(body: &str) -> Result<ApiResponse, CallError> {
    let root = Element::parse(body.as_bytes()).map_err(|e| CallError::Parse {
        message: e.to_string(),
    })?;
    if root.name == "error" {
        let code = root
            .attributes
            .get("string")
            .cloned()
            .unwrap_or_default();
        let description = root
            .get_child("description")
            .and_then(|child| child.get_text())
            .map(|text| text.into_owned())
            .unwrap_or_default();
        return Err(CallError::Api {
            message: format!("{code}: {description}"),
            code,
        });
    }
    Ok(ApiResponse::Xml(root))
}
