//! Order module
//!
//! Structured order requests, their wire formatting, and submission

mod submitter;
mod types;

pub use submitter::{OrderSubmitter, SubmissionResult};
pub use types::{
    BroadcastMode, OrderMetadata, OrderRequest, OrderTemplate, PositionEffect, Side, TxParams,
    FIELD_SEPARATOR, ORDER_TYPE_LIMIT,
};
