use chrono::Utc;
use lpg_common::Points;
use loyalty_engine::{
    db_types::{Balance, NewOrder, NewWithdrawal, Order, OrderNumber, OrderStatus, User, Withdrawal},
    traits::{AuthApiError, AuthManagement, InsertOrderResult, LedgerError, LedgerStore},
};
use mockall::mock;

mock! {
    pub LedgerBackend {}
    impl AuthManagement for LedgerBackend {
        async fn create_user(&self, login: &str, password_hash: &str) -> Result<(), AuthApiError>;
        async fn fetch_user(&self, login: &str) -> Result<Option<User>, AuthApiError>;
    }
    impl LedgerStore for LedgerBackend {
        async fn insert_order(&self, order: NewOrder) -> Result<InsertOrderResult, LedgerError>;
        async fn fetch_order(&self, number: &OrderNumber) -> Result<Option<Order>, LedgerError>;
        async fn orders_for_user(&self, login: &str) -> Result<Vec<Order>, LedgerError>;
        async fn pending_orders(&self) -> Result<Vec<Order>, LedgerError>;
        async fn update_order_status(&self, number: &OrderNumber, status: OrderStatus, accrual: Option<Points>) -> Result<Option<Order>, LedgerError>;
        async fn record_withdrawal(&self, withdrawal: NewWithdrawal) -> Result<Withdrawal, LedgerError>;
        async fn withdrawals_for_user(&self, login: &str) -> Result<Vec<Withdrawal>, LedgerError>;
        async fn balance_for_user(&self, login: &str) -> Result<Balance, LedgerError>;
    }
}

/// A stored order as the mocks hand it back.
pub fn order(number: &str, login: &str, status: OrderStatus, accrual: Option<Points>) -> Order {
    let now = Utc::now();
    Order { number: number.into(), login: login.to_string(), status, accrual, uploaded_at: now, updated_at: now }
}

pub fn withdrawal(login: &str, order_ref: &str, amount: Points) -> Withdrawal {
    Withdrawal { login: login.to_string(), order_ref: order_ref.into(), amount, processed_at: Utc::now() }
}
