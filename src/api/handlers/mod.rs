pub mod account;
pub mod news;
pub mod notes;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::policy::{self, Access, FieldError, Requester};

// ============================================================
// Error Handling
// ============================================================

/// Log an internal error and return a sanitized response to the client.
/// The full error is logged server-side for debugging, but clients only
/// see a generic message to avoid leaking internal details.
fn internal_error(e: impl std::fmt::Display) -> (StatusCode, String) {
    tracing::error!("Internal error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

/// 302 to the given location. Both successful writes and anonymous write
/// attempts answer with this, matching browser form flows.
fn found(location: &str) -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, location.to_string())],
    )
        .into_response()
}

/// Map a policy refusal to its response; `None` means access was granted.
fn refusal(access: Access) -> Option<Response> {
    match access {
        Access::Granted => None,
        Access::NotFound => Some(StatusCode::NOT_FOUND.into_response()),
        Access::LoginRedirect(to) => Some(found(&to)),
    }
}

/// Resolve the acting author id, or produce the login redirect for `path`.
/// Handler-side binding of [`policy::require_login`].
fn require_author(requester: &Requester, path: &str) -> Result<Uuid, Response> {
    match requester.user_id() {
        Some(id) => Ok(id),
        None => Err(found(&policy::login_url(path))),
    }
}

/// Render a validation failure as `{"errors": {field: [message]}}`.
/// Always 200: the client re-renders the form, nothing was persisted.
fn form_errors(err: &FieldError) -> Response {
    let mut fields = serde_json::Map::new();
    fields.insert(
        err.field.to_string(),
        serde_json::json!([err.message.clone()]),
    );
    Json(serde_json::json!({ "errors": fields })).into_response()
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
