//! Add command implementation

use anyhow::{Context, Result};
use tracing::info;

use trade_journal::types::DraftField;
use trade_journal::Config;

use super::{apply_fields, build_controller, TradeFieldArgs};

pub async fn run(config_path: &str, symbol: String, fields: TradeFieldArgs) -> Result<()> {
    let config = Config::from_file_or_default(config_path)?;
    let mut controller = build_controller(&config)?;

    controller.begin_create();
    controller.set_field(DraftField::Symbol, &symbol);
    apply_fields(&mut controller, &fields)?;

    let outcome = controller.save().await.context("Failed to save trade")?;
    info!("Recorded trade {symbol}: id={}", outcome.id());
    println!("Recorded trade {} (id {})", symbol, outcome.id());

    Ok(())
}
