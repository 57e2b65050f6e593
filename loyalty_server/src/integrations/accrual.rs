//! The client for the external accrual engine.
//!
//! The engine exposes a single endpoint, `GET /api/orders/{number}`, which returns the current
//! verdict for an order. The reconciliation worker drives this client; everything here is mapping
//! wire responses into [`AccrualUpdate`]s and rate-limit pauses.

use std::time::Duration;

use log::*;
use loyalty_engine::{db_types::OrderStatus, order_objects::AccrualUpdate};
use lpg_common::Points;
use reqwest::{header::RETRY_AFTER, Client, StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;

/// The pause applied when the engine rate-limits us without saying for how long.
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum AccrualClientError {
    #[error("Invalid accrual engine URL: {0}")]
    InvalidUrl(String),
    #[error("Could not build the accrual engine client: {0}")]
    ClientBuild(String),
    #[error("Accrual engine request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Accrual engine returned an unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// One poll outcome for a single order.
#[derive(Debug, Clone, PartialEq)]
pub enum AccrualPollResult {
    /// The engine has a verdict (which may still be non-terminal).
    Update(AccrualUpdate),
    /// The engine has not registered this order yet. Try again next cycle.
    NotYetKnown,
    /// The engine asked us to back off for the given duration.
    RateLimited(Duration),
}

/// A source of accrual verdicts. The worker is generic over this so tests can drive it without a
/// live engine.
#[allow(async_fn_in_trait)]
pub trait AccrualSource {
    async fn poll_order(&self, number: &str) -> Result<AccrualPollResult, AccrualClientError>;
}

//--------------------------------------  Wire format  ---------------------------------------------------------------
/// The response body of `GET /api/orders/{number}`.
#[derive(Debug, Clone, Deserialize)]
struct AccrualEngineResponse {
    order: String,
    status: AccrualEngineStatus,
    accrual: Option<Points>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
enum AccrualEngineStatus {
    Registered,
    Processing,
    Processed,
    Invalid,
}

impl From<AccrualEngineStatus> for OrderStatus {
    fn from(status: AccrualEngineStatus) -> Self {
        match status {
            AccrualEngineStatus::Registered => OrderStatus::Registered,
            AccrualEngineStatus::Processing => OrderStatus::Processing,
            AccrualEngineStatus::Processed => OrderStatus::Processed,
            AccrualEngineStatus::Invalid => OrderStatus::Invalid,
        }
    }
}

impl From<AccrualEngineResponse> for AccrualUpdate {
    fn from(resp: AccrualEngineResponse) -> Self {
        let status = OrderStatus::from(resp.status);
        // An accrued amount only makes sense on the terminal PROCESSED verdict. Anything the
        // engine attaches to other statuses is dropped rather than written to the ledger.
        let accrual = if status == OrderStatus::Processed { resp.accrual } else { None };
        Self { number: resp.order.into(), status, accrual }
    }
}

fn retry_after_duration(header: Option<&str>) -> Duration {
    header.and_then(|v| v.trim().parse::<u64>().ok()).map(Duration::from_secs).unwrap_or(DEFAULT_RETRY_AFTER)
}

//--------------------------------------  AccrualClient  -------------------------------------------------------------
#[derive(Debug, Clone)]
pub struct AccrualClient {
    client: Client,
    base_url: Url,
}

impl AccrualClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AccrualClientError> {
        let base_url = Url::parse(base_url).map_err(|e| AccrualClientError::InvalidUrl(e.to_string()))?;
        let client =
            Client::builder().timeout(timeout).build().map_err(|e| AccrualClientError::ClientBuild(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    fn order_url(&self, number: &str) -> Result<Url, AccrualClientError> {
        self.base_url
            .join(&format!("api/orders/{number}"))
            .map_err(|e| AccrualClientError::InvalidUrl(e.to_string()))
    }
}

impl AccrualSource for AccrualClient {
    async fn poll_order(&self, number: &str) -> Result<AccrualPollResult, AccrualClientError> {
        let url = self.order_url(number)?;
        let response = self.client.get(url).send().await?;
        match response.status() {
            StatusCode::OK => {
                let body = response.json::<AccrualEngineResponse>().await?;
                if body.order != number {
                    return Err(AccrualClientError::UnexpectedResponse(format!(
                        "asked about order {number} but the engine answered for {}",
                        body.order
                    )));
                }
                trace!("🧮️ Accrual engine verdict for {number}: {:?}", body.status);
                Ok(AccrualPollResult::Update(body.into()))
            },
            StatusCode::NO_CONTENT | StatusCode::NOT_FOUND => Ok(AccrualPollResult::NotYetKnown),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response.headers().get(RETRY_AFTER).and_then(|v| v.to_str().ok());
                let pause = retry_after_duration(retry_after);
                debug!("🧮️ Accrual engine rate limited us for {}s", pause.as_secs());
                Ok(AccrualPollResult::RateLimited(pause))
            },
            other => Err(AccrualClientError::UnexpectedResponse(format!("HTTP {other} for order {number}"))),
        }
    }
}
