//! Handlers for the news app: public listing and detail, author-gated
//! comment mutations.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use super::{form_errors, found, internal_error, refusal, require_author};
use crate::api::AppState;
use crate::models::{Comment, CommentForm, NewsDetail, NewsItem};
use crate::policy::{self, Requester};

fn detail_anchor(news_id: Uuid) -> String {
    format!("/news/{news_id}/#comments")
}

/// Home listing: newest first, one page.
pub async fn home(
    State(state): State<AppState>,
) -> Result<Json<Vec<NewsItem>>, (StatusCode, String)> {
    state
        .db
        .list_news(state.config.news_page_size)
        .map(Json)
        .map_err(internal_error)
}

/// Detail page: the item, its comments oldest-first, and a comment form
/// only when the requester is logged in.
pub async fn news_detail(
    State(state): State<AppState>,
    requester: Requester,
    Path(id): Path<Uuid>,
) -> Result<Response, (StatusCode, String)> {
    let Some(news) = state.db.get_news(id).map_err(internal_error)? else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };
    let comments = state.db.get_comments_for_news(id).map_err(internal_error)?;

    let form = (!requester.is_anonymous()).then(|| CommentForm {
        text: String::new(),
    });

    Ok(Json(NewsDetail {
        news,
        comments,
        form,
    })
    .into_response())
}

pub async fn create_comment(
    State(state): State<AppState>,
    requester: Requester,
    Path(id): Path<Uuid>,
    Json(form): Json<CommentForm>,
) -> Result<Response, (StatusCode, String)> {
    let path = format!("/news/{id}/comments/");
    let author_id = match require_author(&requester, &path) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    if state.db.get_news(id).map_err(internal_error)?.is_none() {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    if let Err(err) = policy::validate_comment_text(&form.text) {
        return Ok(form_errors(&err));
    }

    state
        .db
        .create_comment(id, author_id, &form.text)
        .map_err(internal_error)?;

    Ok(found(&detail_anchor(id)))
}

/// Look up a comment for its owner, or answer with the policy refusal.
/// Anonymous requesters are redirected before the lookup happens.
fn owned_comment(
    state: &AppState,
    requester: &Requester,
    id: Uuid,
    path: &str,
) -> Result<Result<Comment, Response>, (StatusCode, String)> {
    if let Some(resp) = refusal(policy::require_login(requester, path)) {
        return Ok(Err(resp));
    }
    let Some(comment) = state.db.get_comment(id).map_err(internal_error)? else {
        return Ok(Err(StatusCode::NOT_FOUND.into_response()));
    };
    if let Some(resp) = refusal(policy::authorize(requester, comment.author_id, path)) {
        return Ok(Err(resp));
    }
    Ok(Ok(comment))
}

pub async fn edit_comment_form(
    State(state): State<AppState>,
    requester: Requester,
    Path(id): Path<Uuid>,
) -> Result<Response, (StatusCode, String)> {
    let path = format!("/comments/{id}/edit/");
    let comment = match owned_comment(&state, &requester, id, &path)? {
        Ok(comment) => comment,
        Err(resp) => return Ok(resp),
    };

    let form = CommentForm { text: comment.text };
    Ok(Json(serde_json::json!({ "form": form })).into_response())
}

pub async fn update_comment(
    State(state): State<AppState>,
    requester: Requester,
    Path(id): Path<Uuid>,
    Json(form): Json<CommentForm>,
) -> Result<Response, (StatusCode, String)> {
    let path = format!("/comments/{id}/edit/");
    let comment = match owned_comment(&state, &requester, id, &path)? {
        Ok(comment) => comment,
        Err(resp) => return Ok(resp),
    };

    if let Err(err) = policy::validate_comment_text(&form.text) {
        return Ok(form_errors(&err));
    }

    state
        .db
        .update_comment(id, &form.text)
        .map_err(internal_error)?;

    Ok(found(&detail_anchor(comment.news_id)))
}

/// Delete confirmation page: shows the comment about to be removed.
pub async fn delete_comment_form(
    State(state): State<AppState>,
    requester: Requester,
    Path(id): Path<Uuid>,
) -> Result<Response, (StatusCode, String)> {
    let path = format!("/comments/{id}/delete/");
    let comment = match owned_comment(&state, &requester, id, &path)? {
        Ok(comment) => comment,
        Err(resp) => return Ok(resp),
    };

    Ok(Json(serde_json::json!({ "comment": comment })).into_response())
}

pub async fn delete_comment(
    State(state): State<AppState>,
    requester: Requester,
    Path(id): Path<Uuid>,
) -> Result<Response, (StatusCode, String)> {
    let path = format!("/comments/{id}/delete/");
    let comment = match owned_comment(&state, &requester, id, &path)? {
        Ok(comment) => comment,
        Err(resp) => return Ok(resp),
    };

    state.db.delete_comment(id).map_err(internal_error)?;

    Ok(found(&detail_anchor(comment.news_id)))
}
