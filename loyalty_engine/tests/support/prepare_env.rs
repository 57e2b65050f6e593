use log::*;
use loyalty_engine::{
    db_types::OrderStatus,
    order_objects::AccrualUpdate,
    AccountApi,
    AuthApi,
    OrderAdmission,
    OrderFlowApi,
    SqliteDatabase,
};
use lpg_common::Points;
use tempfile::TempDir;

/// Creates a fresh file-backed SQLite database in a temp directory and runs the migrations.
/// The `TempDir` must be kept alive for the duration of the test.
pub async fn prepare_test_db() -> (SqliteDatabase, TempDir) {
    let _ = env_logger::try_init();
    let dir = tempfile::tempdir().expect("Error creating temp dir");
    let url = format!("sqlite://{}/test.db", dir.path().display());
    let db = SqliteDatabase::new_with_url(&url, 8).await.expect("Error creating test database");
    debug!("🚀 Created test database at {url}");
    (db, dir)
}

pub async fn register_user(db: &SqliteDatabase, login: &str) {
    AuthApi::new(db.clone()).register_user(login, "correct horse battery staple").await.expect("Error registering user");
}

/// Registers `login` and credits them with a single processed order worth `points` whole points.
pub async fn seed_user_with_points(db: &SqliteDatabase, login: &str, number: &str, points: i64) {
    register_user(db, login).await;
    let orders = OrderFlowApi::new(db.clone());
    match orders.submit_order(login, number).await.expect("Error submitting order") {
        OrderAdmission::Accepted(_) => {},
        other => panic!("Expected order {number} to be accepted, got {other:?}"),
    }
    let update = AccrualUpdate {
        number: number.into(),
        status: OrderStatus::Processed,
        accrual: Some(Points::from_points(points)),
    };
    orders.apply_accrual(update).await.expect("Error crediting accrual").expect("Accrual update was a no-op");
}

#[allow(dead_code)]
pub fn account_api(db: &SqliteDatabase) -> AccountApi<SqliteDatabase> {
    AccountApi::new(db.clone())
}
