//! Configuration types for liquidity-bot

use crate::account::{Account, AccountRotator, FundingConfig, RotationMode};
use crate::chain::default_binary_path;
use crate::error::BotError;
use crate::order::{OrderMetadata, OrderTemplate, TxParams};
use crate::pricing::PricingConfig;
use crate::scheduler::SchedulerConfig;
use crate::telemetry::LogFormat;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub market: MarketConfig,
    #[serde(default)]
    pub order: OrderMetadata,
    #[serde(default)]
    pub transaction: TxParams,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub accounts: AccountsConfig,
    #[serde(default)]
    pub funding: FundingConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Chain client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Path to the `seid` binary
    #[serde(default = "default_binary_path")]
    pub binary: PathBuf,

    #[serde(default = "default_chain_id")]
    pub chain_id: String,

    /// Dex contract receiving the orders
    #[serde(default)]
    pub contract: String,

    /// Deadline for any single chain client call (seconds)
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
}

fn default_chain_id() -> String {
    "sei-chain".to_string()
}
fn default_command_timeout_secs() -> u64 {
    90
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            binary: default_binary_path(),
            chain_id: default_chain_id(),
            contract: String::new(),
            command_timeout_secs: default_command_timeout_secs(),
        }
    }
}

impl ChainConfig {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}

/// Trading pair configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Quote denomination in the order string
    #[serde(default = "default_price_denom")]
    pub price_denom: String,

    /// Base denomination in the order string
    #[serde(default = "default_asset_denom")]
    pub asset_denom: String,

    /// Denomination looked up in the oracle
    #[serde(default = "default_oracle_denom")]
    pub oracle_denom: String,
}

fn default_price_denom() -> String {
    "USDC".to_string()
}
fn default_asset_denom() -> String {
    "ATOM".to_string()
}
fn default_oracle_denom() -> String {
    "uatom".to_string()
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            price_denom: default_price_denom(),
            asset_denom: default_asset_denom(),
            oracle_denom: default_oracle_denom(),
        }
    }
}

/// Where trading accounts come from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountsConfig {
    /// Single wallet key name
    #[serde(default)]
    pub key: Option<String>,

    /// File with one key name per line; takes precedence over `key`
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Telemetry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Serve Prometheus metrics on this port when set
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Load configuration, returning `None` only when the file does not exist
    pub fn load_optional(path: impl AsRef<Path>) -> anyhow::Result<Option<Self>> {
        let path = path.as_ref();
        if let Err(e) = std::fs::metadata(path) {
            if e.kind() == ErrorKind::NotFound {
                return Ok(None);
            }
        }
        Self::load(path).map(Some)
    }

    /// Static order fields for this run
    pub fn order_template(&self) -> OrderTemplate {
        OrderTemplate {
            contract: self.chain.contract.clone(),
            chain_id: self.chain.chain_id.clone(),
            price_denom: self.market.price_denom.clone(),
            asset_denom: self.market.asset_denom.clone(),
            metadata: self.order.clone(),
            tx: self.transaction.clone(),
        }
    }

    /// Build the account rotator from `accounts.file` or `accounts.key`
    pub fn account_rotator(&self) -> Result<AccountRotator, BotError> {
        let mode = self.scheduler.rotation;
        match (&self.accounts.file, &self.accounts.key) {
            (Some(path), _) => AccountRotator::from_file(path, mode),
            (None, Some(key)) => AccountRotator::new(vec![Account::new(key.clone())?], mode),
            (None, None) => Err(BotError::NoAccountsConfigured),
        }
    }

    /// Check everything that can be checked without the chain
    pub fn validate(&self) -> Result<(), BotError> {
        self.order_template().validate()?;
        self.pricing.validate()?;
        if self.chain.command_timeout_secs == 0 {
            return Err(BotError::InvalidConfig(
                "command_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Rotation mode in effect
    pub fn rotation(&self) -> RotationMode {
        self.scheduler.rotation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            [chain]
            binary = "/usr/local/bin/seid"
            chain_id = "atlantic-2"
            contract = "sei1contract"
            command_timeout_secs = 30

            [market]
            price_denom = "USDC"
            asset_denom = "SEI"
            oracle_denom = "usei"

            [order]
            position_effect = "Close"
            leverage = "2"

            [transaction]
            gas = 4000000

            [pricing]
            quantity_ceiling = 2.5
            offset_ceiling = 0.2
            offset_precision = 3

            [scheduler]
            interval_secs = 5
            rotation = "drain"
            seed = 42

            [accounts]
            key = "mm"

            [funding]
            enabled = true

            [telemetry]
            log_level = "debug"
            log_format = "json"
            metrics_port = 9090
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.chain.chain_id, "atlantic-2");
        assert_eq!(config.market.oracle_denom, "usei");
        assert_eq!(config.order.leverage, "2");
        assert_eq!(config.transaction.gas, 4_000_000);
        assert_eq!(config.transaction.fee_denom, "usei");
        assert_eq!(config.pricing.quantity_ceiling, dec!(2.5));
        assert_eq!(config.scheduler.rotation, RotationMode::Drain);
        assert_eq!(config.scheduler.seed, Some(42));
        assert!(config.funding.enabled);
        assert_eq!(config.funding.funder, "admin");
        assert_eq!(config.telemetry.log_format, LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.chain.chain_id, "sei-chain");
        assert!(config.chain.binary.ends_with("go/bin/seid"));
        assert_eq!(config.scheduler.interval_secs, 30);
        assert_eq!(config.scheduler.rotation, RotationMode::Cycle);
        assert_eq!(config.market.asset_denom, "ATOM");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_validate_requires_contract() {
        let config = Config::default();
        assert!(matches!(config.validate(), Err(BotError::InvalidConfig(_))));
    }

    #[test]
    fn test_order_template_from_config() {
        let mut config = Config::default();
        config.chain.contract = "sei1contract".to_string();
        let template = config.order_template();
        assert_eq!(template.contract, "sei1contract");
        assert_eq!(template.price_denom, "USDC");
        assert_eq!(template.tx.gas, 50_000_000);
    }

    #[test]
    fn test_account_rotator_sources() {
        let config = Config::default();
        assert!(matches!(
            config.account_rotator(),
            Err(BotError::NoAccountsConfigured)
        ));

        let mut config = Config::default();
        config.accounts.key = Some("mm".to_string());
        let rotator = config.account_rotator().unwrap();
        assert_eq!(rotator.accounts()[0].name(), "mm");

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "a1\na2\na3").unwrap();
        config.accounts.file = Some(file.path().to_path_buf());
        config.scheduler.rotation = RotationMode::Drain;
        let rotator = config.account_rotator().unwrap();
        assert_eq!(rotator.accounts().len(), 3);
        assert_eq!(rotator.mode(), RotationMode::Drain);
    }

    #[test]
    fn test_config_load_nonexistent() {
        let result = Config::load("/nonexistent/path/config.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_optional_missing_file() {
        let result = Config::load_optional("/nonexistent/path/config.toml").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_load_optional_malformed_file_errors() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[chain]\nchain_id = \"atlantic-2\"\n\n[transaction]\nfees = \"lots\"").unwrap();

        let err = Config::load_optional(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_load_optional_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[chain]\nchain_id = \"atlantic-2\"").unwrap();

        let config = Config::load_optional(file.path()).unwrap().unwrap();
        assert_eq!(config.chain.chain_id, "atlantic-2");
    }
}
