//! In-memory Eventful API stand-in for integration tests.
//!
//! Implements the slice of the API the client exercises: nonce issuance and
//! challenge verification on `users/login`, an `events/search` endpoint that
//! echoes the parameters it received, and the JSON/XML error envelopes.
//! Errors are reported in the body alongside HTTP 200, as the real API does.
//!
//! Two magic usernames exist as test hooks: `no-nonce` makes the challenge
//! step reply without a nonce, and `no-grant` makes the verification step
//! reply without a user key, letting clients exercise both declined-handshake
//! paths.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum::{
    extract::{Form, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use md5::{Digest, Md5};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// App key accepted by [`app`].
pub const APP_KEY: &str = "test-app-key";

/// Username accepted by [`app`].
pub const USERNAME: &str = "dev";

/// Password matching [`USERNAME`].
pub const PASSWORD: &str = "hunter2";

/// Credentials a mock instance accepts.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub app_key: String,
    pub username: String,
    pub password: String,
}

/// One canned search result, echoed by `events/search`.
#[derive(Debug, Clone, Serialize)]
pub struct MockEvent {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Default)]
struct Sessions {
    nonces: HashSet<String>,
    user_keys: HashSet<String>,
}

#[derive(Clone)]
struct AppState {
    credentials: Credentials,
    sessions: Arc<RwLock<Sessions>>,
}

#[derive(Clone, Copy)]
enum Wire {
    Json,
    Rest,
}

impl Wire {
    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "json" => Some(Wire::Json),
            "rest" => Some(Wire::Rest),
            _ => None,
        }
    }

    fn ok(self, json: Value, xml: String) -> Response {
        match self {
            Wire::Json => (
                [(header::CONTENT_TYPE, "application/json")],
                json.to_string(),
            )
                .into_response(),
            Wire::Rest => ([(header::CONTENT_TYPE, "application/xml")], xml).into_response(),
        }
    }

    fn error(self, json_code: u32, rest_code: &str, status: &str, description: &str) -> Response {
        self.ok(
            json_error(json_code, status, description),
            rest_error(rest_code, description),
        )
    }
}

/// JSON error envelope: numeric `error` code with `status`/`description`.
fn json_error(code: u32, status: &str, description: &str) -> Value {
    json!({ "error": code, "status": status, "description": description })
}

/// Rest error envelope: `error` root with a `string` attribute and a
/// `description` child.
fn rest_error(code: &str, description: &str) -> String {
    format!(r#"<error string="{code}"><description>{description}</description></error>"#)
}

/// Same computation the client answers challenges with.
fn login_hash(nonce: &str, password: &str) -> String {
    let password_digest = format!("{:x}", Md5::digest(password.as_bytes()));
    format!(
        "{:x}",
        Md5::digest(format!("{nonce}:{password_digest}").as_bytes())
    )
}

pub fn app() -> Router {
    app_with(Credentials {
        app_key: APP_KEY.to_string(),
        username: USERNAME.to_string(),
        password: PASSWORD.to_string(),
    })
}

pub fn app_with(credentials: Credentials) -> Router {
    let state = AppState {
        credentials,
        sessions: Arc::new(RwLock::new(Sessions::default())),
    };
    Router::new()
        .route("/{format}/{*method}", post(dispatch))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn dispatch(
    State(state): State<AppState>,
    Path((format, method)): Path<(String, String)>,
    Form(params): Form<HashMap<String, String>>,
) -> Response {
    let Some(wire) = Wire::from_segment(&format) else {
        return (StatusCode::NOT_FOUND, "unknown format").into_response();
    };
    log::debug!("{format}/{method}: {} params", params.len());
    match method.as_str() {
        "users/login" => users_login(state, wire, params).await,
        "events/search" => events_search(state, wire, params).await,
        _ => wire.error(45, "Not_found", "Not found", "Unknown method"),
    }
}

async fn users_login(state: AppState, wire: Wire, params: HashMap<String, String>) -> Response {
    let user = params.get("user").map(String::as_str).unwrap_or_default();
    match (params.get("nonce"), params.get("response")) {
        (Some(nonce), Some(response)) => {
            if user == "no-grant" {
                return wire.ok(json!({}), "<login/>".to_string());
            }
            let mut sessions = state.sessions.write().await;
            let nonce_known = sessions.nonces.remove(nonce.as_str());
            let expected = login_hash(nonce, &state.credentials.password);
            if nonce_known && user == state.credentials.username && *response == expected {
                let user_key = Uuid::new_v4().simple().to_string();
                sessions.user_keys.insert(user_key.clone());
                log::debug!("granted user key to {user}");
                wire.ok(
                    json!({ "userKey": user_key }),
                    format!("<login><userKey>{user_key}</userKey></login>"),
                )
            } else {
                wire.error(
                    48,
                    "Digest_mismatch",
                    "Digest mismatch",
                    "The supplied response hash was not valid for this nonce",
                )
            }
        }
        _ => {
            if user == "no-nonce" {
                return wire.ok(json!({}), "<login/>".to_string());
            }
            let nonce = Uuid::new_v4().simple().to_string();
            state.sessions.write().await.nonces.insert(nonce.clone());
            wire.ok(
                json!({ "nonce": nonce }),
                format!("<login><nonce>{nonce}</nonce></login>"),
            )
        }
    }
}

async fn events_search(state: AppState, wire: Wire, params: HashMap<String, String>) -> Response {
    let app_key = params.get("app_key").or_else(|| params.get("appKey"));
    if app_key.map(String::as_str) != Some(state.credentials.app_key.as_str()) {
        return wire.error(
            1,
            "Invalid_app_key",
            "Invalid app key",
            "The supplied app key was not recognized",
        );
    }

    let user_key = params.get("user_key").or_else(|| params.get("userKey"));
    if let Some(key) = user_key {
        if !state.sessions.read().await.user_keys.contains(key.as_str()) {
            return wire.error(
                2,
                "Invalid_user_key",
                "Invalid user key",
                "The supplied user key was not issued by this server",
            );
        }
    }

    let location = params.get("location").cloned().unwrap_or_default();
    let user = params.get("user").cloned().unwrap_or_default();
    let events = vec![MockEvent {
        id: "E0-001".to_string(),
        title: "Mock showcase".to_string(),
    }];
    let total = events.len();

    let xml = format!(
        "<search><total_items>{total}</total_items><location>{location}</location>\
         <events><event id=\"E0-001\"><title>Mock showcase</title></event></events></search>"
    );
    let json = json!({
        "total_items": total,
        "search": {
            "location": location,
            "user": user,
            "user_key": user_key.cloned().unwrap_or_default(),
        },
        "events": events,
    });
    wire.ok(json, xml)
}
