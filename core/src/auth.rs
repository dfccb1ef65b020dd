//! Challenge-response login primitives.
//!
//! # Design
//! The raw password never crosses the wire: the server issues a one-time
//! nonce and the client answers with `md5(nonce + ":" + md5(password))`,
//! binding the hash to a single handshake attempt. The handshake replies are
//! deserialized into small DTOs; a missing field means the server declined,
//! which is a failed login rather than an error.

use md5::{Digest, Md5};
use serde::Deserialize;

/// First `users/login` reply: the server-issued one-time challenge.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LoginChallenge {
    pub nonce: String,
}

/// Second `users/login` reply: the granted session key.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LoginGrant {
    #[serde(rename = "userKey")]
    pub user_key: String,
}

/// Hash answering a login challenge: `md5(nonce + ":" + md5(password))`,
/// both digests as lowercase hex.
pub fn login_hash(nonce: &str, password: &str) -> String {
    let password_digest = format!("{:x}", Md5::digest(password.as_bytes()));
    format!(
        "{:x}",
        Md5::digest(format!("{nonce}:{password_digest}").as_bytes())
    )
}
