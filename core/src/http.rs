//! Plain-data HTTP exchange types.
//!
//! # Design
//! Every API request is a `POST` with a URL-encoded form body, so the request
//! type carries no method field. `params` keeps the merged parameter list
//! readable for diagnostics; `body` is its encoded form. The response status
//! is recorded for diagnostics only — the upstream API signals errors inside
//! the body, usually alongside HTTP 200.

/// An API request described as plain data.
///
/// Built by `EventfulClient::build_call` without touching the network;
/// executed by the blocking transport as a form-encoded `POST`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub params: Vec<(String, String)>,
    pub body: String,
}

/// An HTTP response described as plain data, ready for format dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}
