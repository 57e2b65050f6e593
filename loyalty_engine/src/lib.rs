//! Loyalty Engine
//!
//! The loyalty engine is the core of the points gateway: it owns the durable ledger of users,
//! purchase orders and withdrawals, and enforces the consistency rules relating them. The HTTP
//! server and the accrual reconciliation worker are thin layers over the APIs in this crate.
//!
//! The crate is divided into three main sections:
//! 1. Storage ([`mod@sqlite`] and the contracts in [`mod@traits`]). SQLite is the supported
//!    backend. You should never need to touch the database directly; the low-level functions are
//!    only public within the crate and all uniqueness and sufficiency invariants are enforced at
//!    the storage boundary, not in application code.
//! 2. The public API ([`AuthApi`], [`OrderFlowApi`], [`AccountApi`]). These wrap a storage
//!    backend and implement order admission, accrual reconciliation updates, balance reporting
//!    and the withdrawal protocol.
//! 3. The data types ([`mod@db_types`] and the wire DTOs in [`mod@order_objects`]).

pub mod db_types;
pub mod helpers;
mod ledger_api;
pub mod sqlite;
pub mod traits;

pub use ledger_api::{
    account_api::AccountApi,
    auth_api::AuthApi,
    errors::{OrderFlowError, WithdrawalError},
    order_flow_api::{OrderAdmission, OrderFlowApi},
    order_objects,
};
pub use sqlite::SqliteDatabase;
