//! # Loyalty points gateway server
//! This crate hosts the HTTP surface of the loyalty points gateway. It is responsible for:
//! * user registration and JWT-based login,
//! * accepting purchase order numbers for accrual,
//! * reporting order history, the points balance and the withdrawal history,
//! * processing withdrawals against the accumulated balance,
//! * the background worker that reconciles orders against the external accrual engine.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! All user-facing routes live under `/api/user`. A `/health` route returns a 200 OK response.

pub mod accrual_worker;
pub mod auth;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
