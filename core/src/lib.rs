//! Synchronous client for the Eventful event-search API.
//!
//! # Overview
//! Authenticates through the `users/login` challenge-response handshake, then
//! issues parameterized `POST` calls against `{root}/{format}/{method}`
//! endpoints, parsing JSON or XML-based "rest" bodies and surfacing API-level
//! error envelopes distinctly from transport failures.
//!
//! # Design
//! - `EventfulClient` separates pure request building (`build_call`) and
//!   response parsing (`parse_response`) from the blocking round-trip
//!   (`call`, `call_as`, `login`), so every wire rule is testable without a
//!   network.
//! - The two output formats form a closed enum, each variant carrying its own
//!   URL segment, default-parameter key names, and body error detection.
//! - Every call overwrites a diagnostic snapshot (last URL, parameters, raw
//!   body, error), mirroring the accessor surface of the upstream client.
//! - The two historical client variants are construction-time profiles
//!   (`ClientConfig::current`, `ClientConfig::legacy`).

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod http;
pub mod params;
mod transport;

pub use auth::login_hash;
pub use client::{EventfulClient, Snapshot};
pub use config::{ClientConfig, KeyStyle, TransportErrorPolicy};
pub use error::{ApiFailure, CallError};
pub use format::{ApiResponse, DefaultKeys, OutputFormat};
pub use http::{HttpRequest, HttpResponse};
pub use params::{ParamValue, Params};
