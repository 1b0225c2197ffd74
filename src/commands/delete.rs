//! Delete command implementation

use anyhow::{Context, Result};
use tracing::info;

use trade_journal::Config;

use super::build_controller;

pub async fn run(config_path: &str, id: String) -> Result<()> {
    let config = Config::from_file_or_default(config_path)?;
    let mut controller = build_controller(&config)?;

    controller
        .delete(&id)
        .await
        .with_context(|| format!("Failed to delete trade {id}"))?;

    info!("Deleted trade: id={id}");
    println!("Deleted trade {id}");
    Ok(())
}
