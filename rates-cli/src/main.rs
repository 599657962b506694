//! Rates CLI
//!
//! Command-line interface for the Rates API.

use anyhow::Result;
use clap::{Parser, Subcommand};

use rates_client::RatesClient;

#[derive(Parser)]
#[command(name = "rates")]
#[command(author, version, about = "Rates API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the Rates API
    #[arg(long, env = "RATES_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve today's rate for a currency
    Rate {
        /// Currency abbreviation, e.g. USD
        abbreviation: String,
    },
    /// Currency directory operations
    Currency {
        #[command(subcommand)]
        action: CurrencyCommands,
    },
    /// Refresh the server's currency directory from the National Bank
    Sync,
    /// Check API health
    Health,
}

#[derive(Subcommand)]
enum CurrencyCommands {
    /// List all currencies
    List,
    /// Get currency details
    Get {
        /// Currency abbreviation
        abbreviation: String,
    },
    /// List stored rates of a currency, newest first
    Rates {
        /// Currency abbreviation
        abbreviation: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let client = RatesClient::new(&cli.api_url);

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
                std::process::exit(1);
            }
        }

        Commands::Rate { abbreviation } => {
            let rate = client.get_rate(&abbreviation).await?;
            println!("{}", serde_json::to_string_pretty(&rate)?);
        }

        Commands::Currency { action } => match action {
            CurrencyCommands::List => {
                let currencies = client.list_currencies().await?;
                println!("{}", serde_json::to_string_pretty(&currencies)?);
            }
            CurrencyCommands::Get { abbreviation } => {
                let currency = client.get_currency(&abbreviation).await?;
                println!("{}", serde_json::to_string_pretty(&currency)?);
            }
            CurrencyCommands::Rates { abbreviation } => {
                let rates = client.list_rates(&abbreviation).await?;
                println!("{}", serde_json::to_string_pretty(&rates)?);
            }
        },

        Commands::Sync => {
            let result = client.sync_currencies().await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
