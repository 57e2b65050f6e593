use std::fmt::Display;

use lpg_common::Points;
use serde::{Deserialize, Serialize};

/// Body of the `/register` and `/login` endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCredentials {
    pub login: String,
    pub password: String,
}

/// Body of the `/balance/withdraw` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawRequest {
    /// Caller-supplied order reference to charge the withdrawal against. Must pass the checksum
    /// but need not match an uploaded order.
    pub order: String,
    pub sum: Points,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

/// Failure body for the withdrawal endpoint. Withdrawals report insufficient funds and backend
/// failures with this `{message, status}` envelope; the other endpoints use `{"error": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawFailure {
    pub message: String,
    pub status: u16,
}

impl WithdrawFailure {
    pub fn new<S: Display>(message: S, status: u16) -> Self {
        Self { message: message.to_string(), status }
    }
}
