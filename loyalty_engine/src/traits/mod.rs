//! Contracts that a storage backend must satisfy to drive the loyalty engine.
//!
//! Two traits cover the two concerns of the ledger:
//! * [`AuthManagement`] — user records and credential storage.
//! * [`LedgerStore`] — orders, withdrawals and the derived balance, with the uniqueness and
//!   funds-sufficiency invariants enforced inside each operation (a backend must never implement
//!   `record_withdrawal` as a read-then-write).
//!
//! The concrete SQLite backend lives in [`crate::sqlite`]; the server's endpoint tests mock these
//! traits instead.

mod auth_management;
mod ledger_store;

pub use auth_management::{AuthApiError, AuthManagement};
pub use ledger_store::{InsertOrderResult, LedgerError, LedgerStore};
