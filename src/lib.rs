//! liquidity-bot: randomized limit orders around an oracle price on a Sei dex
//!
//! This library provides the core components for:
//! - Driving the `seid` node CLI as a chain client
//! - Oracle price lookup and parsing
//! - Random side, offset, and quantity selection
//! - Order string construction and submission with deadlines
//! - Account rotation and one-time funding
//! - Structured logging and order metrics

pub mod account;
pub mod chain;
pub mod cli;
pub mod config;
pub mod error;
pub mod oracle;
pub mod order;
pub mod pricing;
pub mod scheduler;
pub mod telemetry;

pub use error::BotError;
