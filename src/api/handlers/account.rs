//! Signup, login, and logout. These pages are public: they answer 200 for
//! everyone, and failed credential checks come back as field errors on the
//! form, not as auth errors.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use super::{form_errors, internal_error};
use crate::api::auth::{bearer_token, hash_password, INVALID_CREDENTIALS, USERNAME_TAKEN};
use crate::api::AppState;
use crate::models::{LoginForm, SignupForm};
use crate::policy::FieldError;

pub async fn login_page() -> impl IntoResponse {
    Json(serde_json::json!({
        "form": { "username": "", "password": "" }
    }))
}

pub async fn signup_page() -> impl IntoResponse {
    Json(serde_json::json!({
        "form": { "username": "", "password": "" }
    }))
}

pub async fn logout_page() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn signup(
    State(state): State<AppState>,
    Json(form): Json<SignupForm>,
) -> Result<Response, (StatusCode, String)> {
    if state
        .db
        .username_exists(&form.username)
        .map_err(internal_error)?
    {
        return Ok(form_errors(&FieldError::new("username", USERNAME_TAKEN)));
    }

    let salt = Uuid::new_v4().simple().to_string();
    let hash = hash_password(&salt, &form.password);
    let author = state
        .db
        .create_author(&form.username, &hash, &salt)
        .map_err(internal_error)?;
    let session = state.db.create_session(author.id).map_err(internal_error)?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "token": session.token, "author": author })),
    )
        .into_response())
}

pub async fn login(
    State(state): State<AppState>,
    Json(form): Json<LoginForm>,
) -> Result<Response, (StatusCode, String)> {
    let Some(creds) = state
        .db
        .get_author_credentials(&form.username)
        .map_err(internal_error)?
    else {
        tracing::warn!("Login attempt for unknown username");
        return Ok(form_errors(&FieldError::new("password", INVALID_CREDENTIALS)));
    };

    if hash_password(&creds.salt, &form.password) != creds.password_hash {
        tracing::warn!("Failed login for {}", creds.author.username);
        return Ok(form_errors(&FieldError::new("password", INVALID_CREDENTIALS)));
    }

    let session = state
        .db
        .create_session(creds.author.id)
        .map_err(internal_error)?;

    Ok(Json(serde_json::json!({ "token": session.token, "author": creds.author })).into_response())
}

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, (StatusCode, String)> {
    if let Some(token) = bearer_token(&headers) {
        state.db.delete_session(token).map_err(internal_error)?;
    }
    Ok(Json(serde_json::json!({ "status": "ok" })).into_response())
}
