use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use lpg_common::Points;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------   OrderStatus     -----------------------------------------------------------
/// The lifecycle of an order in the ledger.
///
/// `New → Registered → Processing → {Processed | Invalid}`. `New` is the only status the order
/// admission path ever writes; every other transition is driven by the reconciliation worker from
/// accrual engine responses. `Processed` and `Invalid` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    /// The order has been uploaded but the accrual engine has not seen it yet
    New,
    /// The accrual engine has accepted the order, no points have been computed
    Registered,
    /// The accrual computation is in progress
    Processing,
    /// Terminal. Points have been credited
    Processed,
    /// Terminal. The accrual engine rejected the order; no points will ever accrue
    Invalid,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Processed | OrderStatus::Invalid)
    }

    /// Position of this status in the forward-only progression. The two terminal statuses share
    /// the top rank, so neither can displace the other.
    pub fn rank(&self) -> i64 {
        match self {
            OrderStatus::New => 0,
            OrderStatus::Registered => 1,
            OrderStatus::Processing => 2,
            OrderStatus::Processed | OrderStatus::Invalid => 3,
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::New => write!(f, "NEW"),
            OrderStatus::Registered => write!(f, "REGISTERED"),
            OrderStatus::Processing => write!(f, "PROCESSING"),
            OrderStatus::Processed => write!(f, "PROCESSED"),
            OrderStatus::Invalid => write!(f, "INVALID"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct ConversionError(String);

impl FromStr for OrderStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(Self::New),
            "REGISTERED" => Ok(Self::Registered),
            "PROCESSING" => Ok(Self::Processing),
            "PROCESSED" => Ok(Self::Processed),
            "INVALID" => Ok(Self::Invalid),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

//--------------------------------------   OrderNumber     -----------------------------------------------------------
/// A lightweight wrapper around the digit string identifying an order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct OrderNumber(pub String);

impl<S: Into<String>> From<S> for OrderNumber {
    fn from(value: S) -> Self {
        Self(value.into())
    }
}

impl Display for OrderNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl OrderNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------      User         -----------------------------------------------------------
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub login: String,
    /// PHC-format argon2 hash. Never the plaintext password.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------      Order        -----------------------------------------------------------
#[derive(Debug, Clone, FromRow)]
pub struct Order {
    pub number: OrderNumber,
    /// The owning user. Set at admission, immutable thereafter.
    pub login: String,
    pub status: OrderStatus,
    /// Points credited for this order. Only ever set alongside the `Processed` status.
    pub accrual: Option<Points>,
    pub uploaded_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------     NewOrder      -----------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub number: OrderNumber,
    pub login: String,
}

impl NewOrder {
    pub fn new<N: Into<OrderNumber>, L: Into<String>>(number: N, login: L) -> Self {
        Self { number: number.into(), login: login.into() }
    }
}

//--------------------------------------    Withdrawal     -----------------------------------------------------------
#[derive(Debug, Clone, FromRow)]
pub struct Withdrawal {
    pub login: String,
    /// Caller-supplied order reference. Checksummed, but not required to exist as an order.
    pub order_ref: OrderNumber,
    pub amount: Points,
    pub processed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewWithdrawal {
    pub login: String,
    pub order_ref: OrderNumber,
    pub amount: Points,
}

//--------------------------------------      Balance      -----------------------------------------------------------
/// The derived (never stored) balance pair for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Balance {
    pub accrued: Points,
    pub withdrawn: Points,
}

impl Balance {
    /// `accrued − withdrawn`. Never negative as long as the withdrawal invariant holds.
    pub fn current(&self) -> Points {
        self.accrued - self.withdrawn
    }
}
