//! Price command implementation

use crate::chain::SeidClient;
use crate::config::Config;
use crate::oracle::OracleClient;
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct PriceArgs {
    /// Oracle denomination (defaults to market.oracle_denom)
    #[arg(long)]
    pub denom: Option<String>,

    /// Path to the seid binary
    #[arg(long)]
    pub binary: Option<PathBuf>,

    /// Keychain password, fed to the chain client on stdin
    #[arg(long, env = "LIQUIDITY_BOT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

impl PriceArgs {
    pub async fn execute(&self, config: Config) -> anyhow::Result<()> {
        let deadline = config.chain.command_timeout();
        let binary = self.binary.clone().unwrap_or(config.chain.binary);
        let denom = self.denom.clone().unwrap_or(config.market.oracle_denom);

        let client = SeidClient::new(binary, self.password.clone().unwrap_or_default())
            .context("Chain client unavailable")?;
        let oracle = OracleClient::new(Arc::new(client), deadline);

        let quote = oracle.get_price(&denom).await?;
        println!("{} {} (fetched {})", quote.denom, quote.price, quote.fetched_at);
        Ok(())
    }
}
