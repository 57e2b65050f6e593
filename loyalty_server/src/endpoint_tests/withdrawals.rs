use actix_web::{http::StatusCode, web, web::ServiceConfig};
use log::*;
use loyalty_engine::{
    db_types::{Balance, Withdrawal},
    traits::LedgerError,
    AccountApi,
};
use lpg_common::Points;
use serde_json::json;

use super::{
    helpers::{get, issue_token, post_json, send_request},
    mocks::{withdrawal, MockLedgerBackend},
};
use crate::{
    data_objects::WithdrawFailure,
    routes::{MyBalanceRoute, MyWithdrawalsRoute, WithdrawRoute},
};

#[actix_web::test]
async fn balance_reports_the_derived_pair() {
    let _ = env_logger::try_init().ok();
    let token = issue_token("alice");
    let balance = Balance { accrued: Points::from_points(600), withdrawn: Points::from_points(42) };
    let req = get("/balance", Some(&token));
    let (status, _, body) = send_request(req, configure_balance(balance)).await;
    assert_eq!(status, StatusCode::OK);
    info!("Response body: {body}");
    let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(parsed["current"], 558.0);
    assert_eq!(parsed["withdrawn"], 42.0);
}

#[actix_web::test]
async fn withdrawal_success() {
    let token = issue_token("alice");
    let req = post_json("/balance/withdraw", Some(&token), json!({"order": "2377225624", "sum": 60.0}));
    let (status, _, body) = send_request(req, configure_withdraw(Ok(()))).await;
    assert_eq!(status, StatusCode::OK, "was: {body}");
}

#[actix_web::test]
async fn withdrawal_with_insufficient_funds() {
    let token = issue_token("alice");
    let req = post_json("/balance/withdraw", Some(&token), json!({"order": "2377225624", "sum": 61.0}));
    let (status, _, body) = send_request(req, configure_withdraw(Err(LedgerError::InsufficientFunds))).await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    let failure: WithdrawFailure = serde_json::from_str(&body).unwrap();
    assert_eq!(failure.message, "The account does not hold enough points for this withdrawal.");
    assert_eq!(failure.status, 402);
}

#[actix_web::test]
async fn withdrawal_failures_in_the_store_use_the_same_envelope() {
    let token = issue_token("alice");
    let req = post_json("/balance/withdraw", Some(&token), json!({"order": "2377225624", "sum": 10.0}));
    let store_error = LedgerError::OrderNotFound("2377225624".into());
    let (status, _, body) = send_request(req, configure_withdraw(Err(store_error))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let failure: WithdrawFailure = serde_json::from_str(&body).unwrap();
    assert_eq!(failure.status, 500);
}

#[actix_web::test]
async fn withdrawal_with_a_bad_order_reference() {
    let token = issue_token("alice");
    let req = post_json("/balance/withdraw", Some(&token), json!({"order": "12345678902", "sum": 10.0}));
    let (status, _, body) = send_request(req, configure_withdraw_untouched()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("checksum"), "was: {body}");
}

#[actix_web::test]
async fn withdrawal_of_a_non_positive_amount() {
    let token = issue_token("alice");
    let req = post_json("/balance/withdraw", Some(&token), json!({"order": "2377225624", "sum": -5.0}));
    let (status, _, body) = send_request(req, configure_withdraw_untouched()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("positive"), "was: {body}");
}

#[actix_web::test]
async fn withdrawal_with_a_malformed_body() {
    let token = issue_token("alice");
    let req = post_json("/balance/withdraw", Some(&token), json!({"order": "2377225624"}));
    let (status, _, _) = send_request(req, configure_withdraw_untouched()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn withdrawal_without_a_token() {
    let req = post_json("/balance/withdraw", None, json!({"order": "2377225624", "sum": 10.0}));
    let (status, _, _) = send_request(req, configure_withdraw_untouched()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn empty_withdrawal_history_is_a_204() {
    let token = issue_token("alice");
    let req = get("/withdrawals", Some(&token));
    let (status, _, body) = send_request(req, configure_history(Vec::new())).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
}

#[actix_web::test]
async fn withdrawal_history_serializes_the_ledger_view() {
    let token = issue_token("alice");
    let withdrawals = vec![
        withdrawal("alice", "2377225624", Points::from_points(40)),
        withdrawal("alice", "79927398713", Points::from_points(60)),
    ];
    let req = get("/withdrawals", Some(&token));
    let (status, _, body) = send_request(req, configure_history(withdrawals)).await;
    assert_eq!(status, StatusCode::OK);
    let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
    let list = parsed.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["order"], "2377225624");
    assert_eq!(list[0]["sum"], 40.0);
    assert!(list[0]["processed_at"].is_string());
    assert_eq!(list[1]["order"], "79927398713");
}

fn configure_balance(balance: Balance) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let mut backend = MockLedgerBackend::new();
        backend.expect_balance_for_user().return_once(move |_| Ok(balance));
        let accounts_api = AccountApi::new(backend);
        cfg.app_data(web::Data::new(accounts_api)).service(MyBalanceRoute::<MockLedgerBackend>::new());
    }
}

fn configure_withdraw(result: Result<(), LedgerError>) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let mut backend = MockLedgerBackend::new();
        backend.expect_record_withdrawal().return_once(move |w| match result {
            Ok(()) => Ok(Withdrawal {
                login: w.login,
                order_ref: w.order_ref,
                amount: w.amount,
                processed_at: chrono::Utc::now(),
            }),
            Err(e) => Err(e),
        });
        let accounts_api = AccountApi::new(backend);
        cfg.app_data(web::Data::new(accounts_api)).service(WithdrawRoute::<MockLedgerBackend>::new());
    }
}

/// No expectations are set, so any call into the store fails the test.
fn configure_withdraw_untouched() -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let backend = MockLedgerBackend::new();
        let accounts_api = AccountApi::new(backend);
        cfg.app_data(web::Data::new(accounts_api)).service(WithdrawRoute::<MockLedgerBackend>::new());
    }
}

fn configure_history(withdrawals: Vec<Withdrawal>) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let mut backend = MockLedgerBackend::new();
        backend.expect_withdrawals_for_user().return_once(move |_| Ok(withdrawals));
        let accounts_api = AccountApi::new(backend);
        cfg.app_data(web::Data::new(accounts_api)).service(MyWithdrawalsRoute::<MockLedgerBackend>::new());
    }
}
