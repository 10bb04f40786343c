//! Oracle price module
//!
//! Fetches reference prices from the chain's oracle module. No caching and
//! no retries: every call runs a fresh query.

mod parse;

pub use parse::parse_exchange_rate;

use crate::chain::ChainClient;
use crate::error::BotError;
use crate::telemetry::{record_latency, LatencyMetric};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A reference price for one denomination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Oracle denomination (e.g., "uatom")
    pub denom: String,
    /// Reference price, always positive when produced by the oracle client
    pub price: Decimal,
    /// Local time the quote was fetched
    pub fetched_at: DateTime<Utc>,
}

impl Quote {
    /// Quote stamped with the current time
    pub fn new(denom: impl Into<String>, price: Decimal) -> Self {
        Self {
            denom: denom.into(),
            price,
            fetched_at: Utc::now(),
        }
    }
}

/// Client for oracle exchange rates
pub struct OracleClient {
    client: Arc<dyn ChainClient>,
    deadline: Duration,
}

impl OracleClient {
    /// Create an oracle client with the given per-query deadline
    pub fn new(client: Arc<dyn ChainClient>, deadline: Duration) -> Self {
        Self { client, deadline }
    }

    /// Fetch the current reference price for `denom`
    pub async fn get_price(&self, denom: &str) -> Result<Quote, BotError> {
        let started = Instant::now();

        let output = tokio::time::timeout(self.deadline, self.client.execute_oracle_query())
            .await
            .map_err(|_| {
                BotError::OracleUnavailable(format!("query timed out after {:?}", self.deadline))
            })?
            .map_err(|e| BotError::OracleUnavailable(e.to_string()))?;

        record_latency(LatencyMetric::OracleQuery, started.elapsed());

        if !output.is_success() {
            return Err(BotError::OracleUnavailable(format!(
                "exit code {:?}: {}",
                output.code,
                output.summary()
            )));
        }

        let price = parse_exchange_rate(&output.stdout, denom)?;
        tracing::debug!(denom, %price, "Fetched oracle price");

        Ok(Quote::new(denom, price))
    }
}
