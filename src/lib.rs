//! Trade Journal
//!
//! A personal trading journal: create, edit, list, and delete trade
//! records with derived profit/loss figures, persisted in a pluggable
//! document store (remote HTTP or local SQLite).

pub mod config;
pub mod controller;
pub mod export;
pub mod session;
pub mod store;
pub mod types;

pub use config::Config;
pub use controller::{SaveOutcome, TradeLogController};
pub use session::Session;
pub use store::{StoreError, TradeStore};
pub use types::*;
