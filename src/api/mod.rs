mod auth;
mod handlers;

pub use auth::{bearer_token, hash_password, INVALID_CREDENTIALS, USERNAME_TAKEN};

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::db::Database;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: AppConfig,
}

pub fn create_router(db: Database, config: AppConfig) -> Router {
    let state = AppState { db, config };

    Router::new()
        // News
        .route("/news/", get(handlers::news::home))
        .route("/news/{id}/", get(handlers::news::news_detail))
        .route("/news/{id}/comments/", post(handlers::news::create_comment))
        .route(
            "/comments/{id}/edit/",
            get(handlers::news::edit_comment_form).post(handlers::news::update_comment),
        )
        .route(
            "/comments/{id}/delete/",
            get(handlers::news::delete_comment_form).post(handlers::news::delete_comment),
        )
        // Notes
        .route("/notes/", get(handlers::notes::list_notes))
        .route(
            "/notes/add/",
            get(handlers::notes::add_note_form).post(handlers::notes::create_note),
        )
        .route("/notes/success/", get(handlers::notes::success_page))
        .route("/notes/{slug}/", get(handlers::notes::note_detail))
        .route(
            "/notes/{slug}/edit/",
            get(handlers::notes::edit_note_form).post(handlers::notes::update_note),
        )
        .route(
            "/notes/{slug}/delete/",
            get(handlers::notes::delete_note_form).post(handlers::notes::delete_note),
        )
        // Accounts
        .route(
            "/auth/login/",
            get(handlers::account::login_page).post(handlers::account::login),
        )
        .route(
            "/auth/logout/",
            get(handlers::account::logout_page).post(handlers::account::logout),
        )
        .route(
            "/auth/signup/",
            get(handlers::account::signup_page).post(handlers::account::signup),
        )
        // Health
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
