//! Core data types for the trade journal

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stored date format (`2024-03-15`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Stored time-of-day format (`09:30`)
pub const TIME_FORMAT: &str = "%H:%M";

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionSide {
    Long,
    Short,
}

impl fmt::Display for PositionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionSide::Long => write!(f, "Long"),
            PositionSide::Short => write!(f, "Short"),
        }
    }
}

impl FromStr for PositionSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long" => Ok(PositionSide::Long),
            "short" => Ok(PositionSide::Short),
            other => Err(format!("unknown position side: {other}")),
        }
    }
}

/// A persisted trade entry.
///
/// All monetary fields are kept as the user's raw text; the store never
/// re-interprets them. `pl_amount`/`pl_rate` are derived from the two
/// amount fields and are never directly user-entered. Wire field names
/// are camelCase to match the stored documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    /// Store-assigned identifier; `Some` iff the record has been persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub entry_date: String,
    #[serde(default)]
    pub entry_time: String,
    #[serde(default)]
    pub entry_price: String,
    #[serde(default)]
    pub entry_amount: String,
    #[serde(default)]
    pub leverage: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<PositionSide>,
    #[serde(default)]
    pub exit_date: String,
    #[serde(default)]
    pub exit_time: String,
    #[serde(default)]
    pub exit_price: String,
    #[serde(default)]
    pub exit_amount: String,
    #[serde(default)]
    pub pl_amount: String,
    #[serde(default)]
    pub pl_rate: String,
    #[serde(default)]
    pub info: String,
    /// Session identity that owns this record, when scoping is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

/// The in-progress trade being created or edited.
///
/// Dates and times are held as typed values while editing and only
/// flattened to their fixed string formats at save time. A field that
/// failed to parse when loading a stored record is `None`, which
/// renders as an empty input rather than blocking the editor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeDraft {
    pub symbol: String,
    pub entry_date: Option<NaiveDate>,
    pub entry_time: Option<NaiveTime>,
    pub entry_price: String,
    pub entry_amount: String,
    pub leverage: String,
    pub position: Option<PositionSide>,
    pub exit_date: Option<NaiveDate>,
    pub exit_time: Option<NaiveTime>,
    pub exit_price: String,
    pub exit_amount: String,
    pub pl_amount: String,
    pub pl_rate: String,
    pub info: String,
    /// When set, saving overwrites this identifier instead of inserting.
    pub editing_id: Option<String>,
}

/// Text fields of the draft addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Symbol,
    EntryPrice,
    EntryAmount,
    Leverage,
    Position,
    ExitPrice,
    ExitAmount,
    Info,
}

impl TradeDraft {
    /// Populate a draft wholesale from a stored record.
    ///
    /// Stored date/time strings are parsed against the fixed formats;
    /// malformed values degrade to `None` instead of failing.
    pub fn from_record(record: &TradeRecord) -> Self {
        TradeDraft {
            symbol: record.symbol.clone(),
            entry_date: parse_date(&record.entry_date),
            entry_time: parse_time(&record.entry_time),
            entry_price: record.entry_price.clone(),
            entry_amount: record.entry_amount.clone(),
            leverage: record.leverage.clone(),
            position: record.position,
            exit_date: parse_date(&record.exit_date),
            exit_time: parse_time(&record.exit_time),
            exit_price: record.exit_price.clone(),
            exit_amount: record.exit_amount.clone(),
            pl_amount: record.pl_amount.clone(),
            pl_rate: record.pl_rate.clone(),
            info: record.info.clone(),
            editing_id: record.id.clone(),
        }
    }

    /// Flatten the draft into a record ready for persistence.
    ///
    /// Date/time fields normalize to their fixed string formats; a
    /// `None` value normalizes to the empty string. The result carries
    /// no `id` (the store supplies one on insert, and updates address
    /// the id separately).
    pub fn to_record(&self, owner: Option<&str>) -> TradeRecord {
        TradeRecord {
            id: None,
            symbol: self.symbol.clone(),
            entry_date: format_date(self.entry_date),
            entry_time: format_time(self.entry_time),
            entry_price: self.entry_price.clone(),
            entry_amount: self.entry_amount.clone(),
            leverage: self.leverage.clone(),
            position: self.position,
            exit_date: format_date(self.exit_date),
            exit_time: format_time(self.exit_time),
            exit_price: self.exit_price.clone(),
            exit_amount: self.exit_amount.clone(),
            pl_amount: self.pl_amount.clone(),
            pl_rate: self.pl_rate.clone(),
            info: self.info.clone(),
            owner: owner.map(str::to_owned),
        }
    }
}

/// Parse a stored `YYYY-MM-DD` string, `None` on empty or malformed input.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Parse a stored `HH:mm` string, `None` on empty or malformed input.
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), TIME_FORMAT).ok()
}

/// Format a date for storage; `None` formats to the empty string.
pub fn format_date(d: Option<NaiveDate>) -> String {
    d.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Format a time-of-day for storage; `None` formats to the empty string.
pub fn format_time(t: Option<NaiveTime>) -> String {
    t.map(|t| t.format(TIME_FORMAT).to_string())
        .unwrap_or_default()
}

/// Compute the derived P/L fields from the raw amount texts.
///
/// Returns `(pl_amount, pl_rate)` formatted to two decimal places, or
/// `None` when either amount fails to parse or the entry amount is
/// zero. Decimal arithmetic avoids the float drift that creeps into
/// repeated P/L math; rounding is half-away-from-zero to match how the
/// stored values were historically formatted.
pub fn compute_pl(entry_amount: &str, exit_amount: &str) -> Option<(String, String)> {
    let entry = Decimal::from_str(entry_amount.trim()).ok()?;
    let exit = Decimal::from_str(exit_amount.trim()).ok()?;
    if entry.is_zero() {
        return None;
    }

    let diff = exit - entry;
    let rate = diff / entry * Decimal::ONE_HUNDRED;

    Some((round2(diff), round2(rate)))
}

fn round2(d: Decimal) -> String {
    format!(
        "{:.2}",
        d.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
    )
}
