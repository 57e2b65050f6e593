use chrono::{DateTime, Utc};
use lpg_common::Points;
use serde::{Deserialize, Serialize};

use crate::db_types::{Balance, Order, OrderNumber, OrderStatus, Withdrawal};

//--------------------------------------  AccrualUpdate  -------------------------------------------------------------
/// One verdict from the external accrual engine, ready to be applied to the ledger.
///
/// `accrual` is only ever `Some` together with [`OrderStatus::Processed`]; the client that builds
/// these from wire responses enforces that pairing.
#[derive(Debug, Clone, PartialEq)]
pub struct AccrualUpdate {
    pub number: OrderNumber,
    pub status: OrderStatus,
    pub accrual: Option<Points>,
}

//--------------------------------------  OrderSummary  --------------------------------------------------------------
/// The user-facing view of an order, as returned by `GET /api/user/orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSummary {
    pub number: OrderNumber,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accrual: Option<Points>,
    pub uploaded_at: DateTime<Utc>,
}

impl From<Order> for OrderSummary {
    fn from(order: Order) -> Self {
        Self { number: order.number, status: order.status, accrual: order.accrual, uploaded_at: order.uploaded_at }
    }
}

//------------------------------------  WithdrawalSummary  -----------------------------------------------------------
/// The user-facing view of a withdrawal, as returned by `GET /api/user/withdrawals`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalSummary {
    pub order: OrderNumber,
    pub sum: Points,
    pub processed_at: DateTime<Utc>,
}

impl From<Withdrawal> for WithdrawalSummary {
    fn from(w: Withdrawal) -> Self {
        Self { order: w.order_ref, sum: w.amount, processed_at: w.processed_at }
    }
}

//--------------------------------------  BalanceSummary  ------------------------------------------------------------
/// The user-facing balance pair: what is spendable now, and what has been spent over the account
/// lifetime.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub current: Points,
    pub withdrawn: Points,
}

impl From<Balance> for BalanceSummary {
    fn from(balance: Balance) -> Self {
        Self { current: balance.current(), withdrawn: balance.withdrawn }
    }
}
