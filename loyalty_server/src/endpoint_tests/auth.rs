use actix_web::{http::StatusCode, web, web::ServiceConfig};
use log::*;
use loyalty_engine::{traits::AuthApiError, AuthApi};
use serde_json::json;

use super::{
    helpers::{post_json, send_request},
    mocks::MockLedgerBackend,
};
use crate::routes::{LoginRoute, RegisterRoute};

#[actix_web::test]
async fn register_redirects_to_login() {
    let _ = env_logger::try_init().ok();
    let req = post_json("/register", None, json!({"login": "alice", "password": "hunter2"}));
    let (status, headers, body) = send_request(req, configure(Ok(()))).await;
    info!("Response body: {body}");
    assert_eq!(status, StatusCode::PERMANENT_REDIRECT);
    assert_eq!(headers.get("Location").unwrap().to_str().unwrap(), "/api/user/login");
}

#[actix_web::test]
async fn register_with_taken_login() {
    let req = post_json("/register", None, json!({"login": "alice", "password": "hunter2"}));
    let (status, _, body) = send_request(req, configure(Err(AuthApiError::DuplicateLogin))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, r#"{"error":"This login is already taken."}"#);
}

#[actix_web::test]
async fn register_with_empty_login() {
    let req = post_json("/register", None, json!({"login": "  ", "password": "hunter2"}));
    let (status, _, body) = send_request(req, configure(Ok(()))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("login and password must not be empty"), "was: {body}");
}

#[actix_web::test]
async fn register_with_malformed_body() {
    let req = post_json("/register", None, json!({"login": "alice"}));
    let (status, _, _) = send_request(req, configure(Ok(()))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn login_issues_a_bearer_token() {
    let req = post_json("/login", None, json!({"login": "alice", "password": "hunter2"}));
    let (status, headers, body) = send_request(req, configure_login_for("alice", "hunter2")).await;
    assert_eq!(status, StatusCode::OK, "was: {body}");
    let auth_header = headers.get("Authorization").expect("No Authorization header").to_str().unwrap();
    let token = auth_header.strip_prefix("Bearer ").expect("Header did not carry a bearer token");
    let claims = crate::auth::TokenIssuer::new(&super::helpers::test_auth_config()).validate_token(token).unwrap();
    assert_eq!(claims.sub, "alice");
}

#[actix_web::test]
async fn login_with_wrong_password() {
    let req = post_json("/login", None, json!({"login": "alice", "password": "hunter3"}));
    let (status, _, body) = send_request(req, configure_login_for("alice", "hunter2")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"Authentication Error. Login or password is incorrect."}"#);
}

#[actix_web::test]
async fn login_with_unknown_user() {
    // An unknown login takes the same path as a wrong password
    let req = post_json("/login", None, json!({"login": "mallory", "password": "hunter2"}));
    let (status, _, body) = send_request(req, configure_login_unknown_user()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"Authentication Error. Login or password is incorrect."}"#);
}

#[actix_web::test]
async fn login_with_empty_password() {
    let req = post_json("/login", None, json!({"login": "alice", "password": ""}));
    let (status, _, _) = send_request(req, configure_login_unknown_user()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

fn configure(create_result: Result<(), AuthApiError>) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let mut backend = MockLedgerBackend::new();
        backend.expect_create_user().return_once(move |_, _| create_result);
        let auth_api = AuthApi::new(backend);
        cfg.app_data(web::Data::new(auth_api))
            .service(RegisterRoute::<MockLedgerBackend>::new())
            .service(LoginRoute::<MockLedgerBackend>::new());
    }
}

/// Backs the login route with a single stored user whose password is hashed for real.
fn configure_login_for(login: &str, password: &str) -> impl FnOnce(&mut ServiceConfig) {
    use argon2::{
        password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
        Argon2,
    };
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt).unwrap().to_string();
    let user = loyalty_engine::db_types::User {
        login: login.to_string(),
        password_hash: hash,
        created_at: chrono::Utc::now(),
    };
    move |cfg| {
        let mut backend = MockLedgerBackend::new();
        backend.expect_fetch_user().returning(move |_| Ok(Some(user.clone())));
        let auth_api = AuthApi::new(backend);
        cfg.app_data(web::Data::new(auth_api)).service(LoginRoute::<MockLedgerBackend>::new());
    }
}

fn configure_login_unknown_user() -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let mut backend = MockLedgerBackend::new();
        backend.expect_fetch_user().returning(|_| Ok(None));
        let auth_api = AuthApi::new(backend);
        cfg.app_data(web::Data::new(auth_api)).service(LoginRoute::<MockLedgerBackend>::new());
    }
}
