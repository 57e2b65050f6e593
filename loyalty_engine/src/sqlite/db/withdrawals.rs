use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{Balance, NewWithdrawal, Withdrawal},
    traits::LedgerError,
};

/// Records the withdrawal if, and only if, the user's accrued total covers all existing
/// withdrawals plus this one. The sufficiency predicate is evaluated inside the INSERT
/// statement, so the check and the insert are a single atomic step: of two concurrent
/// withdrawals that individually fit but jointly overdraw, exactly one sees a predicate that
/// still holds.
pub async fn guarded_insert(
    withdrawal: NewWithdrawal,
    conn: &mut SqliteConnection,
) -> Result<Withdrawal, LedgerError> {
    let amount = withdrawal.amount.value();
    let result: Option<Withdrawal> = sqlx::query_as(
        r#"
        INSERT INTO withdrawals (login, order_ref, amount)
        SELECT $1, $2, $3
         WHERE COALESCE((SELECT SUM(accrual) FROM orders WHERE login = $1), 0)
            >= COALESCE((SELECT SUM(amount) FROM withdrawals WHERE login = $1), 0) + $3
        RETURNING *
        "#,
    )
    .bind(&withdrawal.login)
    .bind(withdrawal.order_ref.as_str())
    .bind(amount)
    .fetch_optional(conn)
    .await?;
    match result {
        Some(w) => {
            debug!("🗃️ Withdrawal of {} against {} recorded for [{}]", w.amount, w.order_ref, w.login);
            Ok(w)
        },
        None => Err(LedgerError::InsufficientFunds),
    }
}

/// All withdrawals for the user, oldest first.
pub async fn fetch_withdrawals_for_user(login: &str, conn: &mut SqliteConnection) -> Result<Vec<Withdrawal>, sqlx::Error> {
    let withdrawals = sqlx::query_as("SELECT * FROM withdrawals WHERE login = $1 ORDER BY processed_at ASC, rowid ASC")
        .bind(login)
        .fetch_all(conn)
        .await?;
    Ok(withdrawals)
}

/// The (accrued, withdrawn) totals for the user, with missing rows counting as zero.
pub async fn fetch_balance_for_user(login: &str, conn: &mut SqliteConnection) -> Result<Balance, LedgerError> {
    let (accrued, withdrawn): (i64, i64) = sqlx::query_as(
        r#"
        SELECT COALESCE((SELECT SUM(accrual) FROM orders WHERE login = $1), 0),
               COALESCE((SELECT SUM(amount) FROM withdrawals WHERE login = $1), 0)
        "#,
    )
    .bind(login)
    .fetch_one(conn)
    .await?;
    Ok(Balance { accrued: accrued.into(), withdrawn: withdrawn.into() })
}
