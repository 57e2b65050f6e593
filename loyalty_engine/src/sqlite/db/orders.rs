use log::{debug, trace};
use lpg_common::Points;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewOrder, Order, OrderNumber, OrderStatus},
    traits::{InsertOrderResult, LedgerError},
};

/// Inserts the order with status `NEW`, or returns the existing record if the number has been
/// seen before. The duplicate check is part of the insert statement itself (insert-if-absent on
/// the primary key), never a separate exists-check, so two concurrent submissions of the same
/// number cannot both insert.
pub async fn insert_if_absent(order: NewOrder, conn: &mut SqliteConnection) -> Result<InsertOrderResult, LedgerError> {
    let result = sqlx::query("INSERT INTO orders (number, login, status) VALUES ($1, $2, $3) ON CONFLICT (number) DO NOTHING")
        .bind(order.number.as_str())
        .bind(&order.login)
        .bind(OrderStatus::New)
        .execute(&mut *conn)
        .await?;
    let existing = fetch_order_by_number(&order.number, conn)
        .await?
        .ok_or_else(|| LedgerError::OrderNotFound(order.number.clone()))?;
    if result.rows_affected() == 0 {
        trace!("📝️ Order {} already exists, owned by [{}]", existing.number, existing.login);
        Ok(InsertOrderResult::AlreadyExists(existing))
    } else {
        debug!("📝️ Order {} inserted for [{}]", existing.number, existing.login);
        Ok(InsertOrderResult::Inserted(existing))
    }
}

pub async fn fetch_order_by_number(
    number: &OrderNumber,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE number = $1").bind(number.as_str()).fetch_optional(conn).await?;
    Ok(order)
}

/// All orders uploaded by `login`, newest first.
pub async fn fetch_orders_for_user(login: &str, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let orders = sqlx::query_as("SELECT * FROM orders WHERE login = $1 ORDER BY uploaded_at DESC, number DESC")
        .bind(login)
        .fetch_all(conn)
        .await?;
    Ok(orders)
}

/// Orders the reconciliation worker still has to chase: anything in a non-terminal status.
pub async fn fetch_pending_orders(conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let orders = sqlx::query_as(
        "SELECT * FROM orders WHERE status IN ($1, $2, $3) ORDER BY uploaded_at ASC",
    )
    .bind(OrderStatus::New)
    .bind(OrderStatus::Registered)
    .bind(OrderStatus::Processing)
    .fetch_all(conn)
    .await?;
    Ok(orders)
}

/// Sets status and (optionally) accrual in one statement. The WHERE clause carries the state
/// machine's guard rails: the stored rank must be strictly below the new one, so a terminal
/// order is never moved, an unchanged status is a no-op, and a stale late-arriving verdict
/// cannot walk an order backwards. The no-op cases return `None` and leave the row byte-for-byte
/// intact.
pub(crate) async fn update_order_status(
    number: &OrderNumber,
    status: OrderStatus,
    accrual: Option<Points>,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, LedgerError> {
    let result: Option<Order> = sqlx::query_as(
        r#"
        UPDATE orders
           SET status = $1, accrual = COALESCE($2, accrual), updated_at = CURRENT_TIMESTAMP
         WHERE number = $3
           AND CASE status WHEN 'NEW' THEN 0 WHEN 'REGISTERED' THEN 1 WHEN 'PROCESSING' THEN 2 ELSE 3 END < $4
        RETURNING *
        "#,
    )
    .bind(status)
    .bind(accrual)
    .bind(number.as_str())
    .bind(status.rank())
    .fetch_optional(conn)
    .await?;
    if let Some(order) = &result {
        debug!("📝️ Order {} moved to {}", order.number, order.status);
    }
    Ok(result)
}
