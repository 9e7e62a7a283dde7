//! JSON or human-readable table rendering for CLI results.

use anyhow::Result;
use serde::Serialize;

use wallet_analyzer_core::fmt::{format_balance, format_count, format_pct, format_usd};
use wallet_analyzer_core::models::portfolio::PortfolioSnapshot;
use wallet_analyzer_core::models::snapshot::WalletSnapshot;
use wallet_analyzer_core::models::status::StepOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
}

/// Types that know how to print themselves as a table.
pub trait TableDisplay {
    fn print_table(&self);
}

pub fn render<T: Serialize + TableDisplay>(format: OutputFormat, data: &T) -> Result<()> {
    match format {
        OutputFormat::Table => {
            data.print_table();
            Ok(())
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(data)?);
            Ok(())
        }
        OutputFormat::JsonPretty => {
            println!("{}", serde_json::to_string_pretty(data)?);
            Ok(())
        }
    }
}

/// Full wallet report: reputation, holdings, distribution, NFT activity.
#[derive(Serialize)]
#[serde(transparent)]
pub struct WalletReport<'a>(pub &'a WalletSnapshot);

impl TableDisplay for WalletReport<'_> {
    fn print_table(&self) {
        let s = self.0;
        println!("Wallet      {}", s.address);
        println!("Reputation  {}", s.reputation);
        println!();

        println!("Token Holdings");
        println!("{:<32} {:>16} {:>14} {:>16}", "Token", "Balance", "Price", "Value");
        for entry in &s.portfolio.entries {
            let label = format!("{} ({})", entry.name, entry.symbol);
            println!(
                "{:<32} {:>16} {:>14} {:>16}",
                truncate(&label, 32),
                format_balance(entry.balance),
                format_usd(entry.price),
                format_usd(entry.value),
            );
        }
        println!("{:>63} {:>16}", "Estimated Net Worth:", format_usd(s.total_value()));
        println!();

        println!("Portfolio Distribution");
        for (entry, pct) in s.portfolio.allocations() {
            println!("  {:<32} {:>8}", truncate(&format!("{} ({})", entry.name, entry.symbol), 32), format_pct(pct));
        }
        if s.portfolio.is_empty() {
            println!("  (no tokens)");
        }
        println!();

        let nft = s.nft_counters();
        println!("NFT Analytics");
        println!("  Total Transactions  {}", format_count(nft.transactions));
        println!("  Total Transfers     {}", format_count(nft.transfers));
        println!(
            "  Bought {}  Sold {}  Minted {}  Burned {}",
            format_count(nft.bought),
            format_count(nft.sold),
            format_count(nft.minted),
            format_count(nft.burned),
        );

        let predictions = prediction_lines(&s.portfolio);
        if !predictions.is_empty() {
            println!();
            println!("Price Predictions");
            for line in &predictions {
                println!("  {line}");
            }
            if s.portfolio.entries.iter().any(|e| e.predictions.placeholder) {
                println!("  (placeholder data, not a forecast)");
            }
        }

        if !s.status.is_complete() {
            println!();
            println!("Partial data:");
            for failure in s.status.failures() {
                println!("  - {failure}");
            }
        } else if s.status.balances == StepOutcome::Empty {
            println!();
            println!("No token balances found for this wallet.");
        }
    }
}

/// One line per held token: symbol followed by each `date price` point.
fn prediction_lines(portfolio: &PortfolioSnapshot) -> Vec<String> {
    portfolio
        .entries
        .iter()
        .filter(|e| !e.predictions.points.is_empty())
        .map(|e| {
            let points: Vec<String> = e
                .predictions
                .points
                .iter()
                .map(|p| format!("{} {}", p.date, format_usd(p.price)))
                .collect();
            format!("{:<8} {}", truncate(&e.symbol, 8), points.join("  "))
        })
        .collect()
}

/// Result of `validate`.
#[derive(Serialize)]
pub struct ValidationReport {
    pub input: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TableDisplay for ValidationReport {
    fn print_table(&self) {
        match &self.error {
            None => println!("{} is a valid wallet address", self.input),
            Some(e) => println!("{e}"),
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
