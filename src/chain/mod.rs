//! Chain client module
//!
//! The node CLI is an external collaborator. Everything the bot needs from it
//! goes through the [`ChainClient`] trait so the process-backed client can be
//! swapped for RPC calls or test doubles.

mod output;
mod recording;
mod seid;

pub use output::CommandOutput;
pub use recording::{ChainCall, RecordingClient};
pub use seid::{default_binary_path, SeidClient};

use crate::account::FundTransfer;
use crate::error::BotError;
use crate::order::OrderRequest;
use async_trait::async_trait;

/// Trait for chain client implementations
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Query the oracle module for all exchange rates
    async fn execute_oracle_query(&self) -> Result<CommandOutput, BotError>;
    /// Broadcast a place-orders transaction
    async fn execute_order_submission(
        &self,
        order: &OrderRequest,
    ) -> Result<CommandOutput, BotError>;
    /// Broadcast a bank send transaction
    async fn execute_fund_transfer(
        &self,
        transfer: &FundTransfer,
    ) -> Result<CommandOutput, BotError>;
}
