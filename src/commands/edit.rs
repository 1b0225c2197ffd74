//! Edit command implementation

use anyhow::{bail, Context, Result};
use tracing::info;

use trade_journal::types::DraftField;
use trade_journal::Config;

use super::{apply_fields, build_controller, TradeFieldArgs};

pub async fn run(
    config_path: &str,
    id: String,
    symbol: Option<String>,
    fields: TradeFieldArgs,
) -> Result<()> {
    let config = Config::from_file_or_default(config_path)?;
    let mut controller = build_controller(&config)?;

    controller
        .refresh()
        .await
        .context("Failed to fetch trades")?;

    let Some(record) = controller
        .trades()
        .iter()
        .find(|r| r.id.as_deref() == Some(id.as_str()))
        .cloned()
    else {
        bail!("no trade with id {id}");
    };

    controller.begin_edit(&record);
    if let Some(symbol) = &symbol {
        controller.set_field(DraftField::Symbol, symbol);
    }
    apply_fields(&mut controller, &fields)?;

    let outcome = controller.save().await.context("Failed to save trade")?;
    info!("Amended trade: id={}", outcome.id());
    println!("Amended trade {}", outcome.id());

    Ok(())
}
