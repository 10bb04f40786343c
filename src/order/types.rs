//! Order types and wire formatting

use crate::account::Account;
use crate::error::BotError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use uuid::Uuid;

/// Field separator understood by the dex contract's order parser
pub const FIELD_SEPARATOR: &str = "?";

/// Order type sent with every order
pub const ORDER_TYPE_LIMIT: &str = "LIMIT";

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy, priced below the reference
    Long,
    /// Sell, priced above the reference
    Short,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Long => "LONG",
            Side::Short => "SHORT",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Side {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LONG" | "BUY" => Ok(Side::Long),
            "SHORT" | "SELL" => Ok(Side::Short),
            other => Err(BotError::InvalidOrder(format!("unknown side {:?}", other))),
        }
    }
}

/// Whether an order opens or closes a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PositionEffect {
    #[default]
    Open,
    Close,
}

/// Metadata embedded as the last field of the order string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderMetadata {
    #[serde(default)]
    pub position_effect: PositionEffect,
    #[serde(default = "default_leverage")]
    pub leverage: String,
}

fn default_leverage() -> String {
    "1".to_string()
}

impl Default for OrderMetadata {
    fn default() -> Self {
        Self {
            position_effect: PositionEffect::Open,
            leverage: default_leverage(),
        }
    }
}

impl OrderMetadata {
    /// Serialize as JSON with `", "` and `": "` separators, the layout the
    /// deployed contract was fed historically.
    pub fn to_json(&self) -> Result<String, BotError> {
        let mut ser = serde_json::Serializer::with_formatter(Vec::new(), SpacedFormatter);
        self.serialize(&mut ser)
            .map_err(|e| BotError::InvalidOrder(format!("metadata: {}", e)))?;
        String::from_utf8(ser.into_inner())
            .map_err(|e| BotError::InvalidOrder(format!("metadata: {}", e)))
    }

    /// Leverage must be a number of at least one
    fn validate(&self) -> Result<(), BotError> {
        let leverage: Decimal = self
            .leverage
            .parse()
            .map_err(|_| BotError::InvalidOrder(format!("leverage {:?}", self.leverage)))?;
        if leverage < Decimal::ONE {
            return Err(BotError::InvalidOrder(format!(
                "leverage {} below 1",
                leverage
            )));
        }
        Ok(())
    }
}

/// Compact JSON with a space after `,` and `:`
struct SpacedFormatter;

impl serde_json::ser::Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Broadcast mode for transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BroadcastMode {
    /// Wait for block inclusion
    #[default]
    Block,
    Sync,
    Async,
}

impl BroadcastMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BroadcastMode::Block => "block",
            BroadcastMode::Sync => "sync",
            BroadcastMode::Async => "async",
        }
    }
}

/// Transaction parameters appended to every order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxParams {
    /// Funds attached to the order
    #[serde(default = "default_amount")]
    pub amount: u64,
    #[serde(default = "default_amount_denom")]
    pub amount_denom: String,
    #[serde(default = "default_fees")]
    pub fees: u64,
    #[serde(default = "default_fee_denom")]
    pub fee_denom: String,
    /// Gas limit
    #[serde(default = "default_gas")]
    pub gas: u64,
    #[serde(default)]
    pub broadcast_mode: BroadcastMode,
}

fn default_amount() -> u64 {
    100_000_000
}
fn default_amount_denom() -> String {
    "uusdc".to_string()
}
fn default_fees() -> u64 {
    1_000_000
}
fn default_fee_denom() -> String {
    "usei".to_string()
}
fn default_gas() -> u64 {
    50_000_000
}

impl Default for TxParams {
    fn default() -> Self {
        Self {
            amount: default_amount(),
            amount_denom: default_amount_denom(),
            fees: default_fees(),
            fee_denom: default_fee_denom(),
            gas: default_gas(),
            broadcast_mode: BroadcastMode::Block,
        }
    }
}

/// Static parts of every order, fixed for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTemplate {
    pub contract: String,
    pub chain_id: String,
    pub price_denom: String,
    pub asset_denom: String,
    pub metadata: OrderMetadata,
    pub tx: TxParams,
}

impl OrderTemplate {
    /// Check that every static field is safe to embed in the order string
    pub fn validate(&self) -> Result<(), BotError> {
        let fields = [
            ("contract", &self.contract),
            ("chain_id", &self.chain_id),
            ("price_denom", &self.price_denom),
            ("asset_denom", &self.asset_denom),
        ];
        for (name, value) in fields {
            if value.is_empty() {
                return Err(BotError::InvalidConfig(format!("{} is empty", name)));
            }
            if value.contains(FIELD_SEPARATOR) || value.chars().any(char::is_whitespace) {
                return Err(BotError::InvalidConfig(format!(
                    "{} {:?} contains a separator or whitespace",
                    name, value
                )));
            }
        }
        if self.contract.starts_with('-') {
            return Err(BotError::InvalidConfig(format!(
                "contract {:?} looks like a flag",
                self.contract
            )));
        }
        self.metadata.validate()
    }

    /// Build a concrete order for one account and side
    pub fn build(
        &self,
        account: &Account,
        side: Side,
        price: Decimal,
        quantity: Decimal,
    ) -> Result<OrderRequest, BotError> {
        if price <= Decimal::ZERO {
            return Err(BotError::InvalidOrder(format!("price {} not positive", price)));
        }
        if quantity <= Decimal::ZERO {
            return Err(BotError::InvalidOrder(format!(
                "quantity {} not positive",
                quantity
            )));
        }
        self.metadata.validate()?;

        Ok(OrderRequest {
            id: Uuid::new_v4(),
            contract: self.contract.clone(),
            side,
            price,
            quantity,
            price_denom: self.price_denom.clone(),
            asset_denom: self.asset_denom.clone(),
            metadata: self.metadata.clone(),
            account: account.clone(),
            chain_id: self.chain_id.clone(),
            tx: self.tx.clone(),
        })
    }
}

/// A single order placement, created per attempt and never persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    /// Local identifier for log correlation
    pub id: Uuid,
    pub contract: String,
    pub side: Side,
    pub price: Decimal,
    pub quantity: Decimal,
    pub price_denom: String,
    pub asset_denom: String,
    pub metadata: OrderMetadata,
    /// Submitting key
    pub account: Account,
    pub chain_id: String,
    pub tx: TxParams,
}

impl OrderRequest {
    /// `SIDE?price?quantity?price_denom?asset_denom?LIMIT?metadata`
    pub fn order_string(&self) -> Result<String, BotError> {
        let fields = [
            self.side.to_string(),
            self.price.to_string(),
            self.quantity.to_string(),
            self.price_denom.clone(),
            self.asset_denom.clone(),
            ORDER_TYPE_LIMIT.to_string(),
            self.metadata.to_json()?,
        ];
        Ok(fields.join(FIELD_SEPARATOR))
    }

    /// Full argv for `tx dex place-orders`
    pub fn to_args(&self) -> Result<Vec<String>, BotError> {
        Ok(vec![
            "tx".to_string(),
            "dex".to_string(),
            "place-orders".to_string(),
            self.contract.clone(),
            self.order_string()?,
            format!("--amount={}{}", self.tx.amount, self.tx.amount_denom),
            "-y".to_string(),
            format!("--from={}", self.account),
            format!("--chain-id={}", self.chain_id),
            format!("--fees={}{}", self.tx.fees, self.tx.fee_denom),
            format!("--gas={}", self.tx.gas),
            format!("--broadcast-mode={}", self.tx.broadcast_mode.as_str()),
        ])
    }
}
