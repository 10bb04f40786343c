use clap::Parser;
use liquidity_bot::cli::{Cli, Commands};
use liquidity_bot::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load_optional(&cli.config)? {
        Some(config) => config,
        None => {
            eprintln!("Warning: No config file at {}", cli.config);
            eprintln!("Using default configuration");
            Config::default()
        }
    };

    // Initialize telemetry
    liquidity_bot::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!("Starting liquidity bot");
            args.execute(config).await?;
        }
        Commands::Price(args) => {
            args.execute(config).await?;
        }
        Commands::OrderString(args) => {
            args.execute(&config)?;
        }
        Commands::Config => {
            println!("# Effective configuration");
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
