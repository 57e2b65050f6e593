use log::*;
use lpg_common::Points;

use crate::{
    db_types::{Balance, NewWithdrawal, Withdrawal},
    helpers::is_valid_order_number,
    ledger_api::errors::WithdrawalError,
    traits::LedgerStore,
};

/// `AccountApi` covers the money-facing side of a user's account: the derived balance and the
/// withdrawal protocol.
pub struct AccountApi<B> {
    db: B,
}

impl<B> AccountApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> AccountApi<B>
where B: LedgerStore
{
    /// The current balance pair for the user. Pure read, no side effects.
    pub async fn balance(&self, login: &str) -> Result<Balance, WithdrawalError> {
        let balance = self.db.balance_for_user(login).await?;
        Ok(balance)
    }

    /// Withdraw `amount` points against the caller-supplied `order_ref`.
    ///
    /// The reference must pass the Luhn checksum but is otherwise an opaque label; it is not
    /// required to match a stored order. Sufficiency of funds is decided atomically inside the
    /// store, never here.
    pub async fn withdraw(&self, login: &str, order_ref: &str, amount: Points) -> Result<Withdrawal, WithdrawalError> {
        if !amount.is_positive() {
            return Err(WithdrawalError::InvalidAmount);
        }
        if !is_valid_order_number(order_ref) {
            debug!("💰️ Rejecting withdrawal reference {order_ref:?} from [{login}]: bad checksum");
            return Err(WithdrawalError::InvalidOrderReference(order_ref.to_string()));
        }
        let withdrawal = NewWithdrawal { login: login.to_string(), order_ref: order_ref.into(), amount };
        let recorded = self.db.record_withdrawal(withdrawal).await?;
        info!("💰️ [{login}] withdrew {} points against {}", recorded.amount, recorded.order_ref);
        Ok(recorded)
    }

    /// All withdrawals for the user, oldest first.
    pub async fn withdrawals(&self, login: &str) -> Result<Vec<Withdrawal>, WithdrawalError> {
        let withdrawals = self.db.withdrawals_for_user(login).await?;
        Ok(withdrawals)
    }
}
