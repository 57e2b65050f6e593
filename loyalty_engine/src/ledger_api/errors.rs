use thiserror::Error;

use crate::traits::LedgerError;

#[derive(Debug, Error)]
pub enum OrderFlowError {
    #[error("Order number failed checksum validation: {0}")]
    InvalidOrderNumber(String),
    #[error("Ledger error: {0}")]
    LedgerError(#[from] LedgerError),
}

#[derive(Debug, Error)]
pub enum WithdrawalError {
    #[error("Withdrawal amounts must be positive")]
    InvalidAmount,
    #[error("Order reference failed checksum validation: {0}")]
    InvalidOrderReference(String),
    #[error("The account does not hold enough points for this withdrawal")]
    InsufficientFunds,
    #[error("Ledger error: {0}")]
    LedgerError(LedgerError),
}

impl From<LedgerError> for WithdrawalError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::InsufficientFunds => Self::InsufficientFunds,
            other => Self::LedgerError(other),
        }
    }
}
