//! CLI command implementations

use anyhow::{bail, Result};
use clap::Args;

use trade_journal::config::Config;
use trade_journal::controller::TradeLogController;
use trade_journal::session::Session;
use trade_journal::store::TradeStore;
use trade_journal::types::{parse_date, parse_time, DraftField, PositionSide};

pub mod add;
pub mod delete;
pub mod edit;
pub mod export;
pub mod list;

/// Trade fields shared by `add` and `edit`. Every field is optional;
/// anything not supplied stays at its current (or empty) value.
#[derive(Args, Debug, Default)]
pub struct TradeFieldArgs {
    /// Entry date (YYYY-MM-DD)
    #[arg(long)]
    pub entry_date: Option<String>,

    /// Entry time of day (HH:mm)
    #[arg(long)]
    pub entry_time: Option<String>,

    /// Entry price
    #[arg(long)]
    pub entry_price: Option<String>,

    /// Entry amount (drives P/L)
    #[arg(long)]
    pub entry_amount: Option<String>,

    /// Leverage multiplier
    #[arg(long)]
    pub leverage: Option<String>,

    /// Position direction: long or short
    #[arg(long)]
    pub position: Option<String>,

    /// Exit date (YYYY-MM-DD)
    #[arg(long)]
    pub exit_date: Option<String>,

    /// Exit time of day (HH:mm)
    #[arg(long)]
    pub exit_time: Option<String>,

    /// Exit price
    #[arg(long)]
    pub exit_price: Option<String>,

    /// Exit amount (drives P/L)
    #[arg(long)]
    pub exit_amount: Option<String>,

    /// Free-text note
    #[arg(long)]
    pub info: Option<String>,
}

/// Build the controller from config: configured backend plus the
/// session identity for record scoping.
///
/// The CLI signs in once from config; an interactive surface would
/// hold the [`Session`] for its lifetime and subscribe to changes.
pub fn build_controller(config: &Config) -> Result<TradeLogController<Box<dyn TradeStore>>> {
    let store = config.store.build()?;
    let session = Session::new();
    session.set_identity(config.session.identity.clone());
    Ok(TradeLogController::with_owner(store, session.identity()))
}

/// Push the supplied field values into the controller's draft.
///
/// Date, time, and position values are validated here — the command
/// line plays the role the form widgets played, only handing the
/// controller values it could also have produced.
pub fn apply_fields<S: TradeStore>(
    controller: &mut TradeLogController<S>,
    fields: &TradeFieldArgs,
) -> Result<()> {
    if let Some(value) = &fields.entry_date {
        let Some(date) = parse_date(value) else {
            bail!("invalid --entry-date {value:?}, expected YYYY-MM-DD");
        };
        controller.set_entry_date(Some(date));
    }
    if let Some(value) = &fields.entry_time {
        let Some(time) = parse_time(value) else {
            bail!("invalid --entry-time {value:?}, expected HH:mm");
        };
        controller.set_entry_time(Some(time));
    }
    if let Some(value) = &fields.exit_date {
        let Some(date) = parse_date(value) else {
            bail!("invalid --exit-date {value:?}, expected YYYY-MM-DD");
        };
        controller.set_exit_date(Some(date));
    }
    if let Some(value) = &fields.exit_time {
        let Some(time) = parse_time(value) else {
            bail!("invalid --exit-time {value:?}, expected HH:mm");
        };
        controller.set_exit_time(Some(time));
    }
    if let Some(value) = &fields.position {
        if value.parse::<PositionSide>().is_err() {
            bail!("invalid --position {value:?}, expected long or short");
        }
        controller.set_field(DraftField::Position, value);
    }

    if let Some(value) = &fields.entry_price {
        controller.set_field(DraftField::EntryPrice, value);
    }
    if let Some(value) = &fields.entry_amount {
        controller.set_field(DraftField::EntryAmount, value);
    }
    if let Some(value) = &fields.leverage {
        controller.set_field(DraftField::Leverage, value);
    }
    if let Some(value) = &fields.exit_price {
        controller.set_field(DraftField::ExitPrice, value);
    }
    if let Some(value) = &fields.exit_amount {
        controller.set_field(DraftField::ExitAmount, value);
    }
    if let Some(value) = &fields.info {
        controller.set_field(DraftField::Info, value);
    }

    Ok(())
}
