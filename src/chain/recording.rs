//! In-process chain client that records calls instead of broadcasting
//!
//! Backs the `--dry-run` mode and stands in for `seid` in tests.

use super::{ChainClient, CommandOutput};
use crate::account::FundTransfer;
use crate::error::BotError;
use crate::order::OrderRequest;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// A call received by [`RecordingClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainCall {
    OracleQuery,
    PlaceOrder(OrderRequest),
    FundTransfer(FundTransfer),
}

/// Chain client answering with canned outputs
#[derive(Debug)]
pub struct RecordingClient {
    oracle_reply: CommandOutput,
    order_reply: CommandOutput,
    fund_reply: CommandOutput,
    order_delay: Duration,
    calls: Mutex<Vec<ChainCall>>,
}

impl RecordingClient {
    /// Client whose oracle reports `price` for `denom` and accepts all txs
    pub fn with_oracle_price(denom: &str, price: Decimal) -> Self {
        let rates = format!(
            "denom_oracle_exchange_rate_pairs:\n- denom: {}\n  oracle_exchange_rate:\n    exchange_rate: \"{}\"\n",
            denom, price
        );
        Self {
            oracle_reply: CommandOutput::success(rates),
            order_reply: CommandOutput::success("code: 0\ntxhash: DRYRUN\n"),
            fund_reply: CommandOutput::success("code: 0\ntxhash: DRYRUN\n"),
            order_delay: Duration::ZERO,
            calls: Mutex::new(vec![]),
        }
    }

    pub fn with_oracle_reply(mut self, reply: CommandOutput) -> Self {
        self.oracle_reply = reply;
        self
    }

    pub fn with_order_reply(mut self, reply: CommandOutput) -> Self {
        self.order_reply = reply;
        self
    }

    pub fn with_fund_reply(mut self, reply: CommandOutput) -> Self {
        self.fund_reply = reply;
        self
    }

    /// Delay every order reply, to exercise deadlines
    pub fn with_order_delay(mut self, delay: Duration) -> Self {
        self.order_delay = delay;
        self
    }

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<ChainCall> {
        self.lock().clone()
    }

    /// Orders received so far
    pub fn orders(&self) -> Vec<OrderRequest> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                ChainCall::PlaceOrder(order) => Some(order.clone()),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ChainCall>> {
        // Recording is append-only, a poisoned guard is still consistent
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ChainClient for RecordingClient {
    async fn execute_oracle_query(&self) -> Result<CommandOutput, BotError> {
        self.lock().push(ChainCall::OracleQuery);
        Ok(self.oracle_reply.clone())
    }

    async fn execute_order_submission(
        &self,
        order: &OrderRequest,
    ) -> Result<CommandOutput, BotError> {
        tracing::info!(
            order_id = %order.id,
            order = %order.order_string()?,
            "Dry run order"
        );
        self.lock().push(ChainCall::PlaceOrder(order.clone()));
        if !self.order_delay.is_zero() {
            tokio::time::sleep(self.order_delay).await;
        }
        Ok(self.order_reply.clone())
    }

    async fn execute_fund_transfer(
        &self,
        transfer: &FundTransfer,
    ) -> Result<CommandOutput, BotError> {
        self.lock().push(ChainCall::FundTransfer(transfer.clone()));
        Ok(self.fund_reply.clone())
    }
}
