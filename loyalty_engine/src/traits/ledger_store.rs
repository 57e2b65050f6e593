use lpg_common::Points;
use thiserror::Error;

use crate::db_types::{Balance, NewOrder, NewWithdrawal, Order, OrderNumber, OrderStatus, Withdrawal};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Order {0} does not exist")]
    OrderNotFound(OrderNumber),
    #[error("The account does not hold enough points for this withdrawal")]
    InsufficientFunds,
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// The outcome of an insert-if-absent on the orders table.
#[derive(Debug, Clone)]
pub enum InsertOrderResult {
    /// The order was new and has been stored with status `NEW`.
    Inserted(Order),
    /// An order with this number already existed. The stored record is returned untouched so the
    /// caller can resolve ownership; the store never overwrites it.
    AlreadyExists(Order),
}

/// The ledger proper: orders, withdrawals and the derived balance.
///
/// Every operation is all-or-nothing; mutations are durable before the call returns. The two
/// invariants of the ledger live here, not in application code:
/// * an order number exists at most once, ever (single-statement insert-if-absent);
/// * a withdrawal is only recorded if, at the instant of recording, the user's accrued total
///   covers all existing withdrawals plus this one (single guarded insert, so concurrent
///   withdrawals serialize against the same predicate).
#[allow(async_fn_in_trait)]
pub trait LedgerStore {
    async fn insert_order(&self, order: NewOrder) -> Result<InsertOrderResult, LedgerError>;

    async fn fetch_order(&self, number: &OrderNumber) -> Result<Option<Order>, LedgerError>;

    /// All orders for the user, newest first by upload time. Empty is not an error.
    async fn orders_for_user(&self, login: &str) -> Result<Vec<Order>, LedgerError>;

    /// Orders in a non-terminal status (`NEW`, `REGISTERED`, `PROCESSING`), oldest first.
    async fn pending_orders(&self) -> Result<Vec<Order>, LedgerError>;

    /// Set status (and accrual, when given) atomically. Returns `None` without touching the row
    /// when the order is missing, already terminal, or already in the requested status.
    async fn update_order_status(
        &self,
        number: &OrderNumber,
        status: OrderStatus,
        accrual: Option<Points>,
    ) -> Result<Option<Order>, LedgerError>;

    /// The atomic check-and-insert described above. `InsufficientFunds` when the guard fails.
    async fn record_withdrawal(&self, withdrawal: NewWithdrawal) -> Result<Withdrawal, LedgerError>;

    /// All withdrawals for the user, oldest first by processed time.
    async fn withdrawals_for_user(&self, login: &str) -> Result<Vec<Withdrawal>, LedgerError>;

    /// The (accrued_total, withdrawn_total) pair for the user. Missing rows count as zero.
    async fn balance_for_user(&self, login: &str) -> Result<Balance, LedgerError>;
}
