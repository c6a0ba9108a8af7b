use axum::http::StatusCode;
use axum_test::TestServer;
use gazette::api::{create_router, INVALID_CREDENTIALS, USERNAME_TAKEN};
use gazette::config::AppConfig;
use gazette::db::Database;
use serde_json::{json, Value};

fn setup() -> TestServer {
    let db = Database::open_memory().expect("Failed to create database");
    db.migrate().expect("Failed to migrate");
    TestServer::new(create_router(db, AppConfig::for_tests()))
        .expect("Failed to create test server")
}

async fn signup(server: &TestServer, username: &str, password: &str) -> String {
    let response = server
        .post("/auth/signup/")
        .json(&json!({ "username": username, "password": password }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    body["token"].as_str().expect("token in body").to_string()
}

#[tokio::test]
async fn auth_pages_available_to_everyone() {
    let server = setup();

    for url in ["/auth/login/", "/auth/logout/", "/auth/signup/"] {
        server.get(url).await.assert_status_ok();
    }
}

#[tokio::test]
async fn login_and_signup_pages_contain_form() {
    let server = setup();

    for url in ["/auth/login/", "/auth/signup/"] {
        let body: Value = server.get(url).await.json();
        assert!(body.get("form").is_some());
    }
}

#[tokio::test]
async fn signup_returns_token_and_author() {
    let server = setup();

    let response = server
        .post("/auth/signup/")
        .json(&json!({ "username": "carol", "password": "secret" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["author"]["username"], "carol");
}

#[tokio::test]
async fn signup_token_grants_access() {
    let server = setup();
    let token = signup(&server, "carol", "secret").await;

    server
        .get("/notes/")
        .authorization_bearer(&token)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn duplicate_username_rejected_with_field_error() {
    let server = setup();
    signup(&server, "carol", "secret").await;

    let response = server
        .post("/auth/signup/")
        .json(&json!({ "username": "carol", "password": "other" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["errors"]["username"], json!([USERNAME_TAKEN]));
}

#[tokio::test]
async fn login_issues_a_working_token() {
    let server = setup();
    signup(&server, "carol", "secret").await;

    let response = server
        .post("/auth/login/")
        .json(&json!({ "username": "carol", "password": "secret" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let token = body["token"].as_str().expect("token in body");

    server
        .get("/notes/")
        .authorization_bearer(token)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn wrong_password_rejected() {
    let server = setup();
    signup(&server, "carol", "secret").await;

    let response = server
        .post("/auth/login/")
        .json(&json!({ "username": "carol", "password": "wrong" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["errors"]["password"], json!([INVALID_CREDENTIALS]));
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn unknown_username_rejected_like_wrong_password() {
    let server = setup();

    let response = server
        .post("/auth/login/")
        .json(&json!({ "username": "nobody", "password": "secret" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["errors"]["password"], json!([INVALID_CREDENTIALS]));
}

#[tokio::test]
async fn logout_revokes_the_session() {
    let server = setup();
    let token = signup(&server, "carol", "secret").await;

    server
        .post("/auth/logout/")
        .authorization_bearer(&token)
        .await
        .assert_status_ok();

    // The revoked token now acts as anonymous
    let response = server.get("/notes/").authorization_bearer(&token).await;
    response.assert_status(StatusCode::FOUND);
    assert_eq!(
        response.header("location").to_str().unwrap(),
        "/auth/login/?next=/notes/"
    );
}

#[tokio::test]
async fn garbage_token_is_treated_as_anonymous() {
    let server = setup();

    let response = server
        .get("/notes/")
        .authorization_bearer("not-a-real-token")
        .await;
    response.assert_status(StatusCode::FOUND);
}
