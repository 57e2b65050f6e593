//! The public-facing API of the loyalty engine.
//!
//! Each API struct wraps a storage backend (anything implementing the relevant trait from
//! [`crate::traits`]) and layers the business rules on top: checksum validation and ownership
//! resolution in [`order_flow_api`], credential hashing in [`auth_api`], the withdrawal protocol
//! and balance reporting in [`account_api`].

pub mod account_api;
pub mod auth_api;
pub mod errors;
pub mod order_flow_api;
pub mod order_objects;
