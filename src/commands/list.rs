//! List command implementation

use anyhow::{Context, Result};
use tracing::info;

use trade_journal::Config;

use super::build_controller;

pub async fn run(config_path: &str) -> Result<()> {
    let config = Config::from_file_or_default(config_path)?;
    let mut controller = build_controller(&config)?;

    controller
        .refresh()
        .await
        .context("Failed to fetch trades")?;

    let trades = controller.trades();
    info!("Fetched {} trades", trades.len());

    println!(
        "{:<6} {:<10} {:<5} {:<10} {:>5} {:>12} {:>4} {:<10} {:>5} {:>12} {:>12} {:>9}",
        "ID",
        "SYMBOL",
        "SIDE",
        "ENTRY DATE",
        "TIME",
        "ENTRY AMT",
        "LEV",
        "EXIT DATE",
        "TIME",
        "EXIT AMT",
        "P/L",
        "P/L %",
    );
    for trade in trades {
        let side = trade
            .position
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<6} {:<10} {:<5} {:<10} {:>5} {:>12} {:>4} {:<10} {:>5} {:>12} {:>12} {:>9}",
            trade.id.as_deref().unwrap_or("-"),
            trade.symbol,
            side,
            trade.entry_date,
            trade.entry_time,
            trade.entry_amount,
            trade.leverage,
            trade.exit_date,
            trade.exit_time,
            trade.exit_amount,
            trade.pl_amount,
            trade.pl_rate,
        );
        if !trade.info.is_empty() {
            println!("       note: {}", trade.info);
        }
    }

    Ok(())
}
