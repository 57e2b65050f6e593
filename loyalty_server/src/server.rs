use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use loyalty_engine::{AccountApi, AuthApi, OrderFlowApi, SqliteDatabase};
use tokio::sync::watch;

use crate::{
    accrual_worker::run_accrual_worker,
    auth::TokenIssuer,
    config::ServerConfig,
    errors::ServerError,
    integrations::accrual::AccrualClient,
    routes::{
        health,
        LoginRoute,
        MyBalanceRoute,
        MyOrdersRoute,
        MyWithdrawalsRoute,
        RegisterRoute,
        SubmitOrderRoute,
        WithdrawRoute,
    },
};

/// How long the reconciliation worker gets to wind down after the HTTP server stops.
const WORKER_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let accrual_client = AccrualClient::new(&config.accrual_url, config.accrual_timeout)
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let worker =
        tokio::spawn(run_accrual_worker(accrual_client, OrderFlowApi::new(db.clone()), config.poll_interval, shutdown_rx));
    let srv = create_server_instance(config, db)?;
    let result = srv.await.map_err(|e| ServerError::Unspecified(e.to_string()));
    let _ = shutdown_tx.send(true);
    if tokio::time::timeout(WORKER_SHUTDOWN_GRACE, worker).await.is_err() {
        warn!("⏲️ The accrual worker did not stop within the shutdown grace period");
    }
    result
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        let orders_api = OrderFlowApi::new(db.clone());
        let auth_api = AuthApi::new(db.clone());
        let accounts_api = AccountApi::new(db.clone());
        let jwt_signer = TokenIssuer::new(&config.auth);
        let user_scope = web::scope("/api/user")
            .service(RegisterRoute::<SqliteDatabase>::new())
            .service(LoginRoute::<SqliteDatabase>::new())
            .service(SubmitOrderRoute::<SqliteDatabase>::new())
            .service(MyOrdersRoute::<SqliteDatabase>::new())
            .service(MyBalanceRoute::<SqliteDatabase>::new())
            .service(WithdrawRoute::<SqliteDatabase>::new())
            .service(MyWithdrawalsRoute::<SqliteDatabase>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("lpg::access_log"))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(accounts_api))
            .app_data(web::Data::new(auth_api))
            .app_data(web::Data::new(jwt_signer))
            .service(health)
            .service(user_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
