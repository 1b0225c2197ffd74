//! Export command implementation

use anyhow::{Context, Result};
use tracing::info;

use trade_journal::export::export_to_file;
use trade_journal::Config;

use super::build_controller;

pub async fn run(config_path: &str, output: String) -> Result<()> {
    let config = Config::from_file_or_default(config_path)?;
    let mut controller = build_controller(&config)?;

    controller
        .refresh()
        .await
        .context("Failed to fetch trades")?;

    export_to_file(controller.trades(), &output)?;
    info!("Exported {} trades to {output}", controller.trades().len());
    println!("Exported {} trades to {output}", controller.trades().len());

    Ok(())
}
