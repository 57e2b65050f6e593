use actix_web::{
    body::MessageBody,
    http::{header::HeaderMap, StatusCode},
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use chrono::Duration;
use lpg_common::Secret;

use crate::{auth::TokenIssuer, config::AuthConfig};

// Creates a test `AuthConfig` for issuing tokens. DO NOT re-use this secret anywhere.
pub fn test_auth_config() -> AuthConfig {
    AuthConfig { jwt_secret: Secret::new("endpoint-test-secret".to_string()), token_expiry: Duration::hours(1) }
}

pub fn issue_token(login: &str) -> String {
    TokenIssuer::new(&test_auth_config()).issue_token(login).expect("Failed to sign token")
}

/// A structurally valid token that expired two hours ago.
pub fn expired_token(login: &str) -> String {
    let config = AuthConfig { token_expiry: Duration::hours(-2), ..test_auth_config() };
    TokenIssuer::new(&config).issue_token(login).expect("Failed to sign token")
}

/// Builds the app with the shared `TokenIssuer`, applies `configure` and runs the request.
pub async fn send_request(
    req: TestRequest,
    configure: impl FnOnce(&mut ServiceConfig),
) -> (StatusCode, HeaderMap, String) {
    let issuer = TokenIssuer::new(&test_auth_config());
    let app = App::new().app_data(web::Data::new(issuer)).configure(configure);
    let service = test::init_service(app).await;
    let res = test::call_service(&service, req.to_request()).await;
    let (_, res) = res.into_parts();
    let status = res.status();
    let headers = res.headers().clone();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, headers, body)
}

pub fn get(path: &str, token: Option<&str>) -> TestRequest {
    let req = TestRequest::get().uri(path);
    match token {
        Some(t) => req.insert_header(("Authorization", format!("Bearer {t}"))),
        None => req,
    }
}

pub fn post_text(path: &str, token: Option<&str>, body: &str) -> TestRequest {
    let req = TestRequest::post().uri(path).insert_header(("Content-Type", "text/plain")).set_payload(body.to_string());
    match token {
        Some(t) => req.insert_header(("Authorization", format!("Bearer {t}"))),
        None => req,
    }
}

pub fn post_json(path: &str, token: Option<&str>, body: serde_json::Value) -> TestRequest {
    let req = TestRequest::post().uri(path).set_json(body);
    match token {
        Some(t) => req.insert_header(("Authorization", format!("Bearer {t}"))),
        None => req,
    }
}
