//! `SqliteDatabase` is the concrete storage backend of the loyalty engine.
//!
//! It implements the [`AuthManagement`] and [`LedgerStore`] traits over a sqlx connection pool.
//! Connections are acquired transiently per operation and never held across a suspension point
//! outside a single statement, so the pool is the only shared resource in the system.
use std::fmt::Debug;

use lpg_common::Points;
use sqlx::SqlitePool;

use super::db::{new_pool, orders, run_migrations, users, withdrawals};
use crate::{
    db_types::{Balance, NewOrder, NewWithdrawal, Order, OrderNumber, OrderStatus, User, Withdrawal},
    traits::{AuthApiError, AuthManagement, InsertOrderResult, LedgerError, LedgerStore},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Connect to the database at `url`, creating the file and running any outstanding
    /// migrations if necessary.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, LedgerError> {
        let pool = new_pool(url, max_connections).await?;
        run_migrations(&pool).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl AuthManagement for SqliteDatabase {
    async fn create_user(&self, login: &str, password_hash: &str) -> Result<(), AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        users::insert_user(login, password_hash, &mut conn).await
    }

    async fn fetch_user(&self, login: &str) -> Result<Option<User>, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        let user = users::fetch_user_by_login(login, &mut conn).await?;
        Ok(user)
    }
}

impl LedgerStore for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<InsertOrderResult, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        orders::insert_if_absent(order, &mut conn).await
    }

    async fn fetch_order(&self, number: &OrderNumber) -> Result<Option<Order>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_number(number, &mut conn).await?;
        Ok(order)
    }

    async fn orders_for_user(&self, login: &str) -> Result<Vec<Order>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_orders_for_user(login, &mut conn).await?;
        Ok(orders)
    }

    async fn pending_orders(&self) -> Result<Vec<Order>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_pending_orders(&mut conn).await?;
        Ok(orders)
    }

    async fn update_order_status(
        &self,
        number: &OrderNumber,
        status: OrderStatus,
        accrual: Option<Points>,
    ) -> Result<Option<Order>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        orders::update_order_status(number, status, accrual, &mut conn).await
    }

    async fn record_withdrawal(&self, withdrawal: NewWithdrawal) -> Result<Withdrawal, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        withdrawals::guarded_insert(withdrawal, &mut conn).await
    }

    async fn withdrawals_for_user(&self, login: &str) -> Result<Vec<Withdrawal>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let withdrawals = withdrawals::fetch_withdrawals_for_user(login, &mut conn).await?;
        Ok(withdrawals)
    }

    async fn balance_for_user(&self, login: &str) -> Result<Balance, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        withdrawals::fetch_balance_for_user(login, &mut conn).await
    }
}
