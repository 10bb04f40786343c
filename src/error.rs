//! Error types for the liquidity bot

use crate::chain::CommandOutput;
use rust_decimal::Decimal;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while pricing, building, or submitting orders
#[derive(Debug, Error)]
pub enum BotError {
    /// Oracle query failed (non-zero exit, spawn failure, or deadline)
    #[error("Oracle unavailable: {0}")]
    OracleUnavailable(String),
    /// Oracle answered but no usable price could be extracted
    #[error("Oracle price malformed for {denom}: {reason}")]
    OraclePriceMalformed { denom: String, reason: String },
    /// Reference price cannot produce a positive limit price
    #[error("Invalid reference price: {0}")]
    InvalidReferencePrice(Decimal),
    /// Chain client exited non-zero on order placement
    #[error("Submission rejected (exit code {code:?}): {}", .output.summary())]
    SubmissionRejected {
        code: Option<i32>,
        output: CommandOutput,
    },
    /// Chain client did not return before the deadline
    #[error("Submission timed out after {0:?}")]
    SubmissionTimeout(Duration),
    /// No accounts to trade with
    #[error("No accounts configured")]
    NoAccountsConfigured,
    /// Account name not usable as a key name
    #[error("Invalid account {0:?}")]
    InvalidAccount(String),
    /// Order violates a request invariant
    #[error("Invalid order: {0}")]
    InvalidOrder(String),
    /// Configuration value out of range
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    /// Chain client binary missing or not executable
    #[error("Chain client unavailable: {0}")]
    ChainClientUnavailable(String),
    /// Underlying I/O failure
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BotError {
    /// Short machine-friendly label, used for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            BotError::OracleUnavailable(_) => "oracle_unavailable",
            BotError::OraclePriceMalformed { .. } => "oracle_price_malformed",
            BotError::InvalidReferencePrice(_) => "invalid_reference_price",
            BotError::SubmissionRejected { .. } => "submission_rejected",
            BotError::SubmissionTimeout(_) => "submission_timeout",
            BotError::NoAccountsConfigured => "no_accounts_configured",
            BotError::InvalidAccount(_) => "invalid_account",
            BotError::InvalidOrder(_) => "invalid_order",
            BotError::InvalidConfig(_) => "invalid_config",
            BotError::ChainClientUnavailable(_) => "chain_client_unavailable",
            BotError::Io(_) => "io",
        }
    }
}
