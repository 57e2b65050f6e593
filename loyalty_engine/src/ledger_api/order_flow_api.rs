use log::*;

use crate::{
    db_types::{NewOrder, Order},
    helpers::is_valid_order_number,
    ledger_api::{errors::OrderFlowError, order_objects::AccrualUpdate},
    traits::{InsertOrderResult, LedgerStore},
};

/// The outcome of submitting an order number for accrual.
#[derive(Debug, Clone)]
pub enum OrderAdmission {
    /// The number was new and is now queued for reconciliation.
    Accepted(Order),
    /// The same user already submitted this number. Idempotent success, no new row.
    AlreadyUploaded(Order),
    /// The number belongs to a different user. Ownership never changes.
    OwnedByAnotherUser,
}

/// `OrderFlowApi` is the order admission and reconciliation surface of the engine: it feeds new
/// order numbers into the ledger and applies accrual-engine verdicts back onto them.
pub struct OrderFlowApi<B> {
    db: B,
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> OrderFlowApi<B>
where B: LedgerStore
{
    /// Admit an order number for the given user.
    ///
    /// The number must pass the Luhn checksum. Duplicate submissions are resolved by ownership
    /// only: the stored order is never modified, regardless of who resubmits it.
    pub async fn submit_order(&self, login: &str, number: &str) -> Result<OrderAdmission, OrderFlowError> {
        if !is_valid_order_number(number) {
            debug!("🔄️📦️ Rejecting order number {number:?} from [{login}]: bad checksum");
            return Err(OrderFlowError::InvalidOrderNumber(number.to_string()));
        }
        let order = NewOrder::new(number, login);
        let admission = match self.db.insert_order(order).await? {
            InsertOrderResult::Inserted(order) => {
                info!("🔄️📦️ Order {} accepted for processing", order.number);
                OrderAdmission::Accepted(order)
            },
            InsertOrderResult::AlreadyExists(order) if order.login == login => {
                debug!("🔄️📦️ Order {} was already uploaded by [{login}]", order.number);
                OrderAdmission::AlreadyUploaded(order)
            },
            InsertOrderResult::AlreadyExists(order) => {
                debug!("🔄️📦️ Order {} belongs to another user", order.number);
                OrderAdmission::OwnedByAnotherUser
            },
        };
        Ok(admission)
    }

    /// All orders for the user, newest first.
    pub async fn orders_for_user(&self, login: &str) -> Result<Vec<Order>, OrderFlowError> {
        let orders = self.db.orders_for_user(login).await?;
        Ok(orders)
    }

    /// Orders still awaiting a terminal verdict from the accrual engine.
    pub async fn pending_orders(&self) -> Result<Vec<Order>, OrderFlowError> {
        let orders = self.db.pending_orders().await?;
        Ok(orders)
    }

    /// Apply one accrual-engine verdict to the ledger.
    ///
    /// Returns the updated order, or `None` when the update was a no-op (status unchanged, order
    /// already terminal, or unknown number). Terminal orders are guarded at the storage layer,
    /// so a stale verdict arriving after `PROCESSED`/`INVALID` can never move an order again.
    pub async fn apply_accrual(&self, update: AccrualUpdate) -> Result<Option<Order>, OrderFlowError> {
        let AccrualUpdate { number, status, accrual } = update;
        let updated = self.db.update_order_status(&number, status, accrual).await?;
        match &updated {
            Some(order) => info!("🔄️📦️ Order {} reconciled to {} (accrual: {:?})", order.number, order.status, order.accrual),
            None => trace!("🔄️📦️ Accrual update for {number} was a no-op"),
        }
        Ok(updated)
    }
}
