use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use loyalty_engine::{traits::AuthApiError, OrderFlowError, WithdrawalError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("This login is already taken.")]
    DuplicateLogin,
    #[error("Order number failed checksum validation: {0}")]
    UnprocessableOrderNumber(String),
    #[error("Withdrawal request is not valid. {0}")]
    UnprocessableWithdrawal(String),
    #[error("This order was already uploaded by another user.")]
    OrderOwnedByAnotherUser,
    #[error("The account does not hold enough points for this withdrawal.")]
    InsufficientFunds,
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            Self::DuplicateLogin => StatusCode::CONFLICT,
            Self::OrderOwnedByAnotherUser => StatusCode::CONFLICT,
            Self::UnprocessableOrderNumber(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::UnprocessableWithdrawal(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InsufficientFunds => StatusCode::PAYMENT_REQUIRED,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No access token was provided.")]
    MissingToken,
    #[error("Access token is not in the correct format. {0}")]
    PoorlyFormattedToken(String),
    #[error("Access token signature is invalid. {0}")]
    ValidationError(String),
    #[error("Login or password is incorrect.")]
    InvalidCredentials,
    #[error("Could not serialize access token. {0}")]
    CouldNotSerializeToken(String),
}

impl From<AuthApiError> for ServerError {
    fn from(e: AuthApiError) -> Self {
        match e {
            AuthApiError::DuplicateLogin => Self::DuplicateLogin,
            AuthApiError::InvalidCredentials => Self::AuthenticationError(AuthError::InvalidCredentials),
            AuthApiError::PasswordHash(e) => Self::BackendError(format!("Password hashing error: {e}")),
            AuthApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<OrderFlowError> for ServerError {
    fn from(e: OrderFlowError) -> Self {
        match e {
            OrderFlowError::InvalidOrderNumber(n) => Self::UnprocessableOrderNumber(n),
            OrderFlowError::LedgerError(e) => Self::BackendError(format!("Ledger error: {e}")),
        }
    }
}

impl From<WithdrawalError> for ServerError {
    fn from(e: WithdrawalError) -> Self {
        match e {
            WithdrawalError::InvalidAmount => Self::UnprocessableWithdrawal(e.to_string()),
            WithdrawalError::InvalidOrderReference(_) => Self::UnprocessableWithdrawal(e.to_string()),
            WithdrawalError::InsufficientFunds => Self::InsufficientFunds,
            WithdrawalError::LedgerError(e) => Self::BackendError(format!("Ledger error: {e}")),
        }
    }
}
