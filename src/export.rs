//! CSV export of the journal

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use crate::types::TradeRecord;

const HEADERS: [&str; 16] = [
    "id",
    "symbol",
    "entry_date",
    "entry_time",
    "entry_price",
    "entry_amount",
    "leverage",
    "position",
    "exit_date",
    "exit_time",
    "exit_price",
    "exit_amount",
    "pl_amount",
    "pl_rate",
    "info",
    "owner",
];

/// Write the records as CSV, one row per record, normalized strings as
/// stored. Unset optional fields become empty cells.
pub fn write_csv<W: Write>(records: &[TradeRecord], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADERS)?;

    for record in records {
        let position = record.position.map(|p| p.to_string()).unwrap_or_default();
        csv_writer.write_record([
            record.id.as_deref().unwrap_or(""),
            record.symbol.as_str(),
            record.entry_date.as_str(),
            record.entry_time.as_str(),
            record.entry_price.as_str(),
            record.entry_amount.as_str(),
            record.leverage.as_str(),
            position.as_str(),
            record.exit_date.as_str(),
            record.exit_time.as_str(),
            record.exit_price.as_str(),
            record.exit_amount.as_str(),
            record.pl_amount.as_str(),
            record.pl_rate.as_str(),
            record.info.as_str(),
            record.owner.as_deref().unwrap_or(""),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write the records to a CSV file at `path`.
pub fn export_to_file(records: &[TradeRecord], path: impl AsRef<Path>) -> Result<()> {
    let file = std::fs::File::create(path.as_ref())
        .with_context(|| format!("Failed to create {}", path.as_ref().display()))?;
    write_csv(records, file)
}
