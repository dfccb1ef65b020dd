//! Stateful Eventful client: session, call dispatch, diagnostics.
//!
//! # Design
//! `EventfulClient` splits each call into a pure `build_call` (URL and
//! parameter assembly) and a pure `parse_response` (format dispatch), with
//! `call`/`call_as` wiring the blocking round-trip between them and
//! maintaining the diagnostic snapshot. `login` composes two calls into the
//! challenge-response handshake. The snapshot is overwritten by every call,
//! so one instance is not meant for concurrent use; independent instances
//! share nothing.

use std::fmt;

use crate::auth::{login_hash, LoginChallenge, LoginGrant};
use crate::config::{ClientConfig, TransportErrorPolicy};
use crate::error::{ApiFailure, CallError};
use crate::format::{ApiResponse, OutputFormat};
use crate::http::{HttpRequest, HttpResponse};
use crate::params::Params;
use crate::transport;

/// Diagnostic snapshot of the most recent exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub request_url: Option<String>,
    pub request_params: Option<Vec<(String, String)>>,
    pub response_body: Option<String>,
    pub error: Option<ApiFailure>,
}

/// Blocking client for the Eventful API.
#[derive(Clone)]
pub struct EventfulClient {
    config: ClientConfig,
    agent: ureq::Agent,
    app_key: String,
    username: Option<String>,
    user_key: Option<String>,
    snapshot: Snapshot,
}

impl EventfulClient {
    /// Create a client with the `current` profile.
    pub fn new(app_key: &str) -> Self {
        Self::with_config(app_key, ClientConfig::current())
    }

    pub fn with_config(app_key: &str, config: ClientConfig) -> Self {
        Self {
            agent: transport::agent(),
            config,
            app_key: app_key.to_string(),
            username: None,
            user_key: None,
            snapshot: Snapshot::default(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn app_key(&self) -> &str {
        &self.app_key
    }

    /// Username of the last login attempt, successful or not.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Session key from the last successful login.
    pub fn user_key(&self) -> Option<&str> {
        self.user_key.as_deref()
    }

    pub fn last_request_url(&self) -> Option<&str> {
        self.snapshot.request_url.as_deref()
    }

    pub fn last_request_params(&self) -> Option<&[(String, String)]> {
        self.snapshot.request_params.as_deref()
    }

    pub fn last_response_body(&self) -> Option<&str> {
        self.snapshot.response_body.as_deref()
    }

    pub fn last_error(&self) -> Option<&ApiFailure> {
        self.snapshot.error.as_ref()
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Build the request for an API call without performing any I/O.
    ///
    /// `method` is trimmed of surrounding slashes and spaces; caller args are
    /// flattened, then the default authentication parameters are merged on
    /// top so they win key collisions. The username is attached once a login
    /// has been attempted, the session key once one has succeeded.
    pub fn build_call(&self, method: &str, args: &Params, format: OutputFormat) -> HttpRequest {
        let method = method.trim_matches(|c| c == '/' || c == ' ');
        let url = format!(
            "{}/{}/{}",
            self.config.api_root,
            format.path_segment(),
            method
        );

        let mut params = args.flatten();
        let keys = self.config.key_style.keys_for(format);
        params.insert(keys.app_key, &self.app_key);
        if let Some(username) = self.username.as_deref() {
            params.insert(keys.user, username);
        }
        if let Some(user_key) = self.user_key.as_deref() {
            params.insert(keys.user_key, user_key);
        }

        let body = params.encode();
        HttpRequest {
            url,
            params: params.into_pairs(),
            body,
        }
    }

    /// Parse a raw response in the given format. Pure; the snapshot is not
    /// touched.
    pub fn parse_response(
        &self,
        format: OutputFormat,
        response: &HttpResponse,
    ) -> Result<ApiResponse, CallError> {
        format.parse(&response.body)
    }

    /// Call an API method using the profile's default output format.
    pub fn call(&mut self, method: &str, args: &Params) -> Result<ApiResponse, CallError> {
        self.call_as(method, args, self.config.default_format)
    }

    /// Call an API method with an explicit output format.
    ///
    /// Builds the request, performs one blocking `POST`, parses the body,
    /// and records the whole exchange in the diagnostic snapshot.
    pub fn call_as(
        &mut self,
        method: &str,
        args: &Params,
        format: OutputFormat,
    ) -> Result<ApiResponse, CallError> {
        let request = self.build_call(method, args, format);
        log::debug!("POST {}", request.url);
        self.snapshot = Snapshot {
            request_url: Some(request.url.clone()),
            request_params: Some(request.params.clone()),
            response_body: None,
            error: None,
        };

        let response = match transport::execute(&self.agent, &request) {
            Ok(response) => response,
            Err(message) => match self.config.transport_errors {
                TransportErrorPolicy::ShortCircuit => {
                    let err = CallError::Transport { message };
                    log::warn!("{}: {err}", request.url);
                    self.snapshot.error = Some(err.failure());
                    return Err(err);
                }
                // Legacy variant: hand the parser whatever arrived, which
                // after a transport failure is nothing.
                TransportErrorPolicy::ParseResponse => {
                    log::warn!("{}: transport failure ignored: {message}", request.url);
                    HttpResponse {
                        status: 0,
                        body: String::new(),
                    }
                }
            },
        };

        self.snapshot.response_body = Some(response.body.clone());
        log::debug!(
            "{} -> HTTP {} ({} bytes)",
            request.url,
            response.status,
            response.body.len()
        );

        match format.parse(&response.body) {
            Ok(parsed) => Ok(parsed),
            Err(err) => {
                log::warn!("{}: {err}", request.url);
                self.snapshot.error = Some(err.failure());
                Err(err)
            }
        }
    }

    /// Two-step challenge-response login against `users/login`.
    ///
    /// Returns false on every failure path — missing challenge, rejected
    /// response, transport trouble — with detail left in the snapshot; no
    /// second request is made when the challenge reply carries no nonce. A
    /// session key from an earlier successful login survives a failed
    /// attempt.
    pub fn login(&mut self, username: &str, password: &str) -> bool {
        self.username = Some(username.to_string());

        let Ok(reply) = self.call_as("users/login", &Params::new(), OutputFormat::Json) else {
            return false;
        };
        let Some(challenge) = read_reply::<LoginChallenge>(&reply) else {
            return false;
        };

        let args = Params::new()
            .set("nonce", challenge.nonce.as_str())
            .set("response", login_hash(&challenge.nonce, password));
        let Ok(reply) = self.call_as("users/login", &args, OutputFormat::Json) else {
            return false;
        };
        let Some(grant) = read_reply::<LoginGrant>(&reply) else {
            return false;
        };

        log::debug!("login succeeded for {username}");
        self.user_key = Some(grant.user_key);
        true
    }
}

impl fmt::Debug for EventfulClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventfulClient")
            .field("config", &self.config)
            .field("username", &self.username)
            .field("has_user_key", &self.user_key.is_some())
            .field("snapshot", &self.snapshot)
            .finish_non_exhaustive()
    }
}

/// Read a typed payload out of a JSON reply; `None` when the expected fields
/// are absent (e.g. the server declined to issue a challenge).
fn read_reply<T: serde::de::DeserializeOwned>(reply: &ApiResponse) -> Option<T> {
    let value = reply.as_json()?;
    serde_json::from_value(value.clone()).ok()
}
