//! Blocking HTTP executor for built requests.
//!
//! # Design
//! Thin adapter between the plain-data exchange types and `ureq`. The agent
//! disables status-code-as-error behavior so non-2xx responses come back as
//! data; error detection belongs to the format layer. One attempt per call,
//! no retries.

use crate::http::{HttpRequest, HttpResponse};

pub(crate) fn agent() -> ureq::Agent {
    ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent()
}

/// Execute a request, returning the raw response or a transport-level error
/// message (connection, DNS, timeout, unreadable body).
pub(crate) fn execute(agent: &ureq::Agent, request: &HttpRequest) -> Result<HttpResponse, String> {
    let mut response = agent
        .post(&request.url)
        .content_type("application/x-www-form-urlencoded")
        .send(request.body.as_bytes())
        .map_err(|e| e.to_string())?;

    let status = response.status().as_u16();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| e.to_string())?;

    Ok(HttpResponse { status, body })
}
