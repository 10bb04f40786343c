//! CLI interface for liquidity-bot
//!
//! Provides subcommands for:
//! - `run`: Start the order loop
//! - `price`: Query the oracle once
//! - `order-string`: Print the order string for given values
//! - `config`: Show the effective configuration

mod order_string;
mod price;
mod run;

pub use order_string::OrderStringArgs;
pub use price::PriceArgs;
pub use run::RunArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "liquidity-bot")]
#[command(about = "Places randomized limit orders around the oracle price on a Sei dex contract")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the order loop
    Run(RunArgs),
    /// Query the oracle price once
    Price(PriceArgs),
    /// Print the order string for a side, price, and quantity
    OrderString(OrderStringArgs),
    /// Show the effective configuration
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::Side;
    use clap::CommandFactory;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from([
            "liquidity-bot",
            "run",
            "--key",
            "mm",
            "--password",
            "pw",
            "--contract",
            "sei1contract",
            "--once",
            "--max-ticks",
            "3",
        ])
        .unwrap();

        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.key.as_deref(), Some("mm"));
        assert!(args.once);
        assert_eq!(args.max_ticks, Some(3));
        assert_eq!(cli.config, "config.toml");
    }

    #[test]
    fn test_run_requires_password_unless_dry_run() {
        // Without the env fallback the result cannot depend on the caller's environment
        let command = Cli::command().mut_subcommand("run", |run| {
            run.mut_arg("password", |arg| arg.env(None::<&'static str>))
        });
        assert!(command
            .try_get_matches_from(["liquidity-bot", "run", "--key", "mm"])
            .is_err());

        let cli = Cli::try_parse_from(["liquidity-bot", "run", "--key", "mm", "--dry-run", "10.5"])
            .unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.dry_run, Some(dec!(10.5)));
    }

    #[test]
    fn test_parse_order_string() {
        let cli = Cli::try_parse_from([
            "liquidity-bot",
            "-c",
            "bot.toml",
            "order-string",
            "long",
            "9.5",
            "3.0",
        ])
        .unwrap();

        let Commands::OrderString(args) = cli.command else {
            panic!("expected order-string");
        };
        assert_eq!(args.side, Side::Long);
        assert_eq!(args.price, dec!(9.5));
        assert_eq!(cli.config, "bot.toml");
    }
}
