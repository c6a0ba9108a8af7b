//! Handlers for the notes app. Every page here is owner-only: listings show
//! the requester's own notes, and direct-object URLs 404 for anyone but the
//! note's author.

use std::cell::RefCell;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::{form_errors, found, internal_error, refusal, require_author};
use crate::api::AppState;
use crate::models::{Note, NoteForm};
use crate::policy::{self, Requester};

const SUCCESS_URL: &str = "/notes/success/";

pub async fn list_notes(
    State(state): State<AppState>,
    requester: Requester,
) -> Result<Response, (StatusCode, String)> {
    let author_id = match require_author(&requester, "/notes/") {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    let notes = state
        .db
        .get_notes_by_author(author_id)
        .map_err(internal_error)?;
    Ok(Json(notes).into_response())
}

pub async fn add_note_form(requester: Requester) -> Response {
    if let Some(resp) = refusal(policy::require_login(&requester, "/notes/add/")) {
        return resp;
    }

    let form = NoteForm {
        title: String::new(),
        text: String::new(),
        slug: None,
    };
    Json(serde_json::json!({ "form": form })).into_response()
}

pub async fn create_note(
    State(state): State<AppState>,
    requester: Requester,
    Json(form): Json<NoteForm>,
) -> Result<Response, (StatusCode, String)> {
    let author_id = match require_author(&requester, "/notes/add/") {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    let lookup_failed = RefCell::new(None);
    let taken = |s: &str| match state.db.slug_exists(s) {
        Ok(taken) => taken,
        Err(e) => {
            *lookup_failed.borrow_mut() = Some(e);
            false
        }
    };
    let assigned = policy::assign_slug(form.slug.as_deref(), &form.title, &taken);
    if let Some(e) = lookup_failed.into_inner() {
        return Err(internal_error(e));
    }
    let slug = match assigned {
        Ok(slug) => slug,
        Err(err) => return Ok(form_errors(&err)),
    };

    state
        .db
        .create_note(author_id, &form.title, &form.text, &slug)
        .map_err(internal_error)?;

    Ok(found(SUCCESS_URL))
}

pub async fn success_page(requester: Requester) -> Response {
    if let Some(resp) = refusal(policy::require_login(&requester, SUCCESS_URL)) {
        return resp;
    }
    Json(serde_json::json!({ "status": "ok" })).into_response()
}

/// Look up a note for its owner, or answer with the policy refusal.
/// Anonymous requesters are redirected before the lookup happens.
fn owned_note(
    state: &AppState,
    requester: &Requester,
    slug: &str,
    path: &str,
) -> Result<Result<Note, Response>, (StatusCode, String)> {
    if let Some(resp) = refusal(policy::require_login(requester, path)) {
        return Ok(Err(resp));
    }
    let Some(note) = state.db.get_note_by_slug(slug).map_err(internal_error)? else {
        return Ok(Err(StatusCode::NOT_FOUND.into_response()));
    };
    if let Some(resp) = refusal(policy::authorize(requester, note.author_id, path)) {
        return Ok(Err(resp));
    }
    Ok(Ok(note))
}

pub async fn note_detail(
    State(state): State<AppState>,
    requester: Requester,
    Path(slug): Path<String>,
) -> Result<Response, (StatusCode, String)> {
    let path = format!("/notes/{slug}/");
    let note = match owned_note(&state, &requester, &slug, &path)? {
        Ok(note) => note,
        Err(resp) => return Ok(resp),
    };

    Ok(Json(note).into_response())
}

pub async fn edit_note_form(
    State(state): State<AppState>,
    requester: Requester,
    Path(slug): Path<String>,
) -> Result<Response, (StatusCode, String)> {
    let path = format!("/notes/{slug}/edit/");
    let note = match owned_note(&state, &requester, &slug, &path)? {
        Ok(note) => note,
        Err(resp) => return Ok(resp),
    };

    let form = NoteForm {
        title: note.title,
        text: note.text,
        slug: Some(note.slug),
    };
    Ok(Json(serde_json::json!({ "form": form })).into_response())
}

pub async fn update_note(
    State(state): State<AppState>,
    requester: Requester,
    Path(slug): Path<String>,
    Json(form): Json<NoteForm>,
) -> Result<Response, (StatusCode, String)> {
    let path = format!("/notes/{slug}/edit/");
    let note = match owned_note(&state, &requester, &slug, &path)? {
        Ok(note) => note,
        Err(resp) => return Ok(resp),
    };

    // The note's current slug is not a collision with itself.
    let lookup_failed = RefCell::new(None);
    let taken = |s: &str| {
        if s == note.slug {
            return false;
        }
        match state.db.slug_exists(s) {
            Ok(taken) => taken,
            Err(e) => {
                *lookup_failed.borrow_mut() = Some(e);
                false
            }
        }
    };
    let assigned = policy::assign_slug(form.slug.as_deref(), &form.title, &taken);
    if let Some(e) = lookup_failed.into_inner() {
        return Err(internal_error(e));
    }
    let new_slug = match assigned {
        Ok(slug) => slug,
        Err(err) => return Ok(form_errors(&err)),
    };

    state
        .db
        .update_note(note.id, &form.title, &form.text, &new_slug)
        .map_err(internal_error)?;

    Ok(found(SUCCESS_URL))
}

/// Delete confirmation page: shows the note about to be removed.
pub async fn delete_note_form(
    State(state): State<AppState>,
    requester: Requester,
    Path(slug): Path<String>,
) -> Result<Response, (StatusCode, String)> {
    let path = format!("/notes/{slug}/delete/");
    let note = match owned_note(&state, &requester, &slug, &path)? {
        Ok(note) => note,
        Err(resp) => return Ok(resp),
    };

    Ok(Json(serde_json::json!({ "note": note })).into_response())
}

pub async fn delete_note(
    State(state): State<AppState>,
    requester: Requester,
    Path(slug): Path<String>,
) -> Result<Response, (StatusCode, String)> {
    let path = format!("/notes/{slug}/delete/");
    let note = match owned_note(&state, &requester, &slug, &path)? {
        Ok(note) => note,
        Err(resp) => return Ok(resp),
    };

    state.db.delete_note(note.id).map_err(internal_error)?;

    Ok(found(SUCCESS_URL))
}
