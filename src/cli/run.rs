//! Run command implementation

use crate::chain::{ChainClient, RecordingClient, SeidClient};
use crate::config::Config;
use crate::account::RotationMode;
use crate::scheduler::Scheduler;
use anyhow::Context;
use clap::Args;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Wallet key name to trade with
    #[arg(long)]
    pub key: Option<String>,

    /// Keychain password, fed to the chain client on stdin
    #[arg(
        long,
        env = "LIQUIDITY_BOT_PASSWORD",
        hide_env_values = true,
        required_unless_present = "dry_run"
    )]
    pub password: Option<String>,

    /// Dex contract address
    #[arg(long)]
    pub contract: Option<String>,

    /// Chain id
    #[arg(long)]
    pub chain_id: Option<String>,

    /// Path to the seid binary
    #[arg(long)]
    pub binary: Option<PathBuf>,

    /// File with one account key name per line
    #[arg(long)]
    pub accounts_file: Option<PathBuf>,

    /// Use each account once, then exit
    #[arg(long)]
    pub once: bool,

    /// Fund each account from the funder key before its first order
    #[arg(long)]
    pub fund: bool,

    /// Seconds to sleep between ticks
    #[arg(long)]
    pub interval: Option<u64>,

    /// Stop after this many ticks
    #[arg(long)]
    pub max_ticks: Option<u64>,

    /// Seed for reproducible prices and sides
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log orders instead of broadcasting them, with the oracle pinned to PRICE
    #[arg(long, value_name = "PRICE")]
    pub dry_run: Option<Decimal>,
}

impl RunArgs {
    /// Apply command-line overrides on top of the file configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(key) = &self.key {
            config.accounts.key = Some(key.clone());
        }
        if let Some(contract) = &self.contract {
            config.chain.contract = contract.clone();
        }
        if let Some(chain_id) = &self.chain_id {
            config.chain.chain_id = chain_id.clone();
        }
        if let Some(binary) = &self.binary {
            config.chain.binary = binary.clone();
        }
        if let Some(file) = &self.accounts_file {
            config.accounts.file = Some(file.clone());
        }
        if self.once {
            config.scheduler.rotation = RotationMode::Drain;
        }
        if self.fund {
            config.funding.enabled = true;
        }
        if let Some(interval) = self.interval {
            config.scheduler.interval_secs = interval;
        }
        if self.max_ticks.is_some() {
            config.scheduler.max_ticks = self.max_ticks;
        }
        if self.seed.is_some() {
            config.scheduler.seed = self.seed;
        }
    }

    pub async fn execute(&self, mut config: Config) -> anyhow::Result<()> {
        self.apply(&mut config);
        config.validate().context("Invalid configuration")?;

        let rotator = config
            .account_rotator()
            .context("Failed to load trading accounts")?;

        let client: Arc<dyn ChainClient> = match self.dry_run {
            Some(price) => {
                tracing::warn!(%price, "Dry run: orders are logged, not broadcast");
                Arc::new(RecordingClient::with_oracle_price(
                    &config.market.oracle_denom,
                    price,
                ))
            }
            None => Arc::new(
                SeidClient::new(
                    &config.chain.binary,
                    self.password.clone().unwrap_or_default(),
                )
                .context("Chain client unavailable")?,
            ),
        };

        let mut scheduler = Scheduler::from_config(client, rotator, &config)?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Ctrl+C received, stopping after the current tick");
                    let _ = shutdown_tx.send(true);
                }
                Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl+C"),
            }
        });

        scheduler.run(shutdown_rx).await;
        Ok(())
    }
}
