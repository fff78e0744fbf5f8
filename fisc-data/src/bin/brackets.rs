use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fisc_data::BracketLoader;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

/// Validate a quotient-familial bracket CSV and print the resulting table.
///
/// The CSV file should have the following columns:
/// - lower_bound: where the bracket starts (the first must be 0)
/// - upper_bound: where it ends (empty for the top bracket)
/// - rate: the marginal rate as a decimal (e.g., 0.11)
#[derive(Parser, Debug)]
#[command(name = "fisc-brackets")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing the bracket table
    #[arg(short, long)]
    file: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let table = BracketLoader::load_table(file)
        .with_context(|| format!("Invalid bracket table: {}", args.file.display()))?;

    println!("{:>12}  {:>12}  {:>7}", "from", "to", "rate");
    for bracket in table.brackets() {
        let upper = bracket
            .upper_bound
            .map(|u| u.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>12}  {:>12}  {:>6}%",
            bracket.lower_bound,
            upper,
            (bracket.rate * Decimal::ONE_HUNDRED).normalize()
        );
    }
    println!("{} brackets, table is valid.", table.len());

    Ok(())
}
