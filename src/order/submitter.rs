//! Order submission through the chain client

use super::OrderRequest;
use crate::chain::{ChainClient, CommandOutput};
use crate::error::BotError;
use crate::telemetry::{record_latency, LatencyMetric};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Outcome of an accepted submission
#[derive(Debug, Clone)]
pub struct SubmissionResult {
    /// Local order identifier
    pub order_id: Uuid,
    /// Raw client output
    pub output: CommandOutput,
    /// Wall time spent in the client
    pub elapsed: Duration,
}

impl SubmissionResult {
    /// Transaction hash reported by the client, if any
    pub fn txhash(&self) -> Option<&str> {
        self.output.txhash()
    }
}

/// Sends orders to the chain, enforcing a deadline per call
pub struct OrderSubmitter {
    client: Arc<dyn ChainClient>,
    deadline: Duration,
}

impl OrderSubmitter {
    /// Create a submitter with the given per-call deadline
    pub fn new(client: Arc<dyn ChainClient>, deadline: Duration) -> Self {
        Self { client, deadline }
    }

    /// Submit one order. No retries: the caller moves on after a failure.
    pub async fn submit(&self, order: &OrderRequest) -> Result<SubmissionResult, BotError> {
        let started = Instant::now();

        let output = match tokio::time::timeout(
            self.deadline,
            self.client.execute_order_submission(order),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                // The child was killed mid-broadcast; the tx may still land
                tracing::warn!(
                    order_id = %order.id,
                    account = %order.account,
                    deadline_secs = self.deadline.as_secs_f64(),
                    "Submission deadline exceeded, transaction state unknown"
                );
                return Err(BotError::SubmissionTimeout(self.deadline));
            }
        };

        let elapsed = started.elapsed();
        record_latency(LatencyMetric::OrderSubmission, elapsed);

        if !output.is_success() {
            return Err(BotError::SubmissionRejected {
                code: output.code,
                output,
            });
        }

        if let Some(code) = output.tx_code().filter(|c| *c != 0) {
            return Err(BotError::SubmissionRejected {
                code: i32::try_from(code).ok(),
                output,
            });
        }

        Ok(SubmissionResult {
            order_id: order.id,
            output,
            elapsed,
        })
    }
}
