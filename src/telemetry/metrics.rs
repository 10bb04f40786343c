//! Order and latency metrics
//!
//! Recorded through the `metrics` facade; exported only when a Prometheus
//! listener is installed at startup.

use crate::order::Side;
use std::time::Duration;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// Oracle exchange-rate query
    OracleQuery,
    /// Order broadcast
    OrderSubmission,
}

impl LatencyMetric {
    fn name(self) -> &'static str {
        match self {
            LatencyMetric::OracleQuery => "liquidity_bot_oracle_query_latency_ms",
            LatencyMetric::OrderSubmission => "liquidity_bot_order_submission_latency_ms",
        }
    }
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    let value_ms = duration.as_secs_f64() * 1_000.0;
    metrics::histogram!(metric.name()).record(value_ms);
    tracing::debug!(metric = metric.name(), value_ms, "Recording latency");
}

/// Count one order attempt by side and outcome
pub fn record_order(side: Side, outcome: &'static str) {
    metrics::counter!(
        "liquidity_bot_orders_total",
        "side" => side.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Count one funding attempt by outcome
pub fn record_funding(outcome: &'static str) {
    metrics::counter!("liquidity_bot_fundings_total", "outcome" => outcome).increment(1);
}
