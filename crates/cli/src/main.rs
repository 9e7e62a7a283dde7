mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use output::{render, OutputFormat, ValidationReport, WalletReport};
use wallet_analyzer_core::errors::CoreError;
use wallet_analyzer_core::models::address::WalletAddress;
use wallet_analyzer_core::models::settings::Settings;
use wallet_analyzer_core::WalletAnalyzer;

#[derive(Parser)]
#[command(
    name = "wallet-analyzer",
    about = "Wallet Analyzer: reputation, token holdings and NFT activity for a wallet address.",
    version,
    propagate_version = true
)]
struct Cli {
    #[arg(long, short = 'o', global = true, default_value = "table")]
    output: CliOutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Table,
    Json,
    JsonPretty,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> OutputFormat {
        match f {
            CliOutputFormat::Table => OutputFormat::Table,
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and display the full analysis for a wallet.
    Analyze {
        /// Wallet address (0x + 40 hex characters).
        address: String,

        /// Chain name for balance, NFT and price queries.
        #[arg(long)]
        chain: Option<String>,

        /// Maximum price requests in flight.
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// Check an address without contacting the API.
    Validate {
        address: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format: OutputFormat = cli.output.into();

    match cli.command {
        Commands::Analyze {
            address,
            chain,
            concurrency,
        } => {
            let mut settings = Settings::from_env()?;
            if let Some(chain) = chain {
                settings.blockchain = chain;
            }
            if let Some(n) = concurrency {
                settings.price_concurrency = n;
            }
            analyze(&settings, &address, format).await
        }
        Commands::Validate { address } => {
            let report = match WalletAddress::parse(&address) {
                Ok(_) => ValidationReport {
                    input: address,
                    valid: true,
                    error: None,
                },
                Err(e) => ValidationReport {
                    input: address,
                    valid: false,
                    error: Some(e.to_string()),
                },
            };
            render(format, &report)?;
            if report.valid {
                Ok(())
            } else {
                std::process::exit(2);
            }
        }
    }
}

async fn analyze(settings: &Settings, address: &str, format: OutputFormat) -> Result<()> {
    // Validate first so a bad address never needs an API key.
    WalletAddress::parse(address)?;

    let analyzer = match WalletAnalyzer::from_settings(settings) {
        Ok(a) => a,
        Err(CoreError::MissingApiKey) => {
            anyhow::bail!("API key not found. Set UNLEASH_API_KEY in the environment or a .env file.")
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(address, "analyzing wallet");
    let snapshot = analyzer
        .search(address)
        .await
        .with_context(|| format!("Failed to analyze {address}"))?;

    render(format, &WalletReport(&snapshot))
}
