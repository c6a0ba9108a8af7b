//! Bearer-session identity resolution and password hashing.
//!
//! Every request resolves to an explicit [`Requester`] before any policy
//! check runs: a valid session token means `User(author_id)`, anything else
//! means `Anonymous`. Authorization failures are never produced here — the
//! policy layer decides what an anonymous or mismatched requester gets.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use sha2::{Digest, Sha256};

use super::AppState;
use crate::policy::Requester;

/// Field error message for a signup with an existing username.
pub const USERNAME_TAKEN: &str = "This username is already taken";

/// Field error message for a failed login.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Extract the bearer token from the Authorization header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Salted SHA-256 password hash, hex-encoded.
pub fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

impl FromRequestParts<AppState> for Requester {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            return Ok(Requester::Anonymous);
        };

        match state.db.get_session_author(token) {
            Ok(Some(author_id)) => Ok(Requester::User(author_id)),
            Ok(None) => {
                tracing::warn!("Unknown session token presented");
                Ok(Requester::Anonymous)
            }
            Err(e) => {
                tracing::error!("Session lookup failed: {}", e);
                Ok(Requester::Anonymous)
            }
        }
    }
}
