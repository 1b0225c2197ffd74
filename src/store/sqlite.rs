//! Local SQLite trade store
//!
//! Keeps the journal usable without a remote store. One `trades` table,
//! all journal fields as TEXT; the integer rowid is rendered as the
//! opaque string id the rest of the system expects.

use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use async_trait::async_trait;

use super::{StoreError, StoreResult, TradeStore};
use crate::types::{PositionSide, TradeRecord};

pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(db_path: P) -> StoreResult<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Database(e.to_string()))?;
        }

        let conn = Connection::open(db_path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.create_tables()?;
        info!("SQLite trade store opened: {}", db_path.display());
        Ok(store)
    }

    /// Private in-memory database, used by tests.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.create_tables()?;
        Ok(store)
    }

    fn create_tables(&self) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "CREATE TABLE IF NOT EXISTS trades (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                symbol TEXT NOT NULL DEFAULT '',
                entry_date TEXT NOT NULL DEFAULT '',
                entry_time TEXT NOT NULL DEFAULT '',
                entry_price TEXT NOT NULL DEFAULT '',
                entry_amount TEXT NOT NULL DEFAULT '',
                leverage TEXT NOT NULL DEFAULT '',
                position TEXT,
                exit_date TEXT NOT NULL DEFAULT '',
                exit_time TEXT NOT NULL DEFAULT '',
                exit_price TEXT NOT NULL DEFAULT '',
                exit_amount TEXT NOT NULL DEFAULT '',
                pl_amount TEXT NOT NULL DEFAULT '',
                pl_rate TEXT NOT NULL DEFAULT '',
                info TEXT NOT NULL DEFAULT '',
                owner TEXT,
                created_at TEXT DEFAULT CURRENT_TIMESTAMP,
                updated_at TEXT DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_trades_owner ON trades(owner)",
            [],
        )?;
        debug!("Trade table schema created/verified");
        Ok(())
    }

    /// Rowids are the wire ids; a string that is not a rowid cannot
    /// name any record.
    fn parse_id(id: &str) -> StoreResult<i64> {
        id.parse::<i64>()
            .map_err(|_| StoreError::NotFound(id.to_string()))
    }

    fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<TradeRecord> {
        let position: Option<String> = row.get(7)?;
        Ok(TradeRecord {
            id: Some(row.get::<_, i64>(0)?.to_string()),
            symbol: row.get(1)?,
            entry_date: row.get(2)?,
            entry_time: row.get(3)?,
            entry_price: row.get(4)?,
            entry_amount: row.get(5)?,
            leverage: row.get(6)?,
            // Unknown stored side degrades to no selection, same as a
            // malformed stored date.
            position: position.and_then(|p| p.parse::<PositionSide>().ok()),
            exit_date: row.get(8)?,
            exit_time: row.get(9)?,
            exit_price: row.get(10)?,
            exit_amount: row.get(11)?,
            pl_amount: row.get(12)?,
            pl_rate: row.get(13)?,
            info: row.get(14)?,
            owner: row.get(15)?,
        })
    }
}

impl SqliteStore {
    /// Run one blocking unit of connection work on the blocking pool,
    /// keeping the async runtime threads free.
    async fn with_conn<T, F>(&self, work: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || work(&conn.lock().unwrap()))
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?
    }
}

#[async_trait]
impl TradeStore for SqliteStore {
    async fn list_all(&self) -> StoreResult<Vec<TradeRecord>> {
        let records = self
            .with_conn(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, symbol, entry_date, entry_time, entry_price, entry_amount,
                            leverage, position, exit_date, exit_time, exit_price, exit_amount,
                            pl_amount, pl_rate, info, owner
                     FROM trades ORDER BY id",
                )?;
                let records = stmt
                    .query_map([], Self::row_to_record)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(records)
            })
            .await?;
        debug!("Loaded {} trades from SQLite", records.len());
        Ok(records)
    }

    async fn insert(&self, record: &TradeRecord) -> StoreResult<String> {
        let record = record.clone();
        let id = self
            .with_conn(move |conn| {
                conn.execute(
                    "INSERT INTO trades
                     (symbol, entry_date, entry_time, entry_price, entry_amount, leverage,
                      position, exit_date, exit_time, exit_price, exit_amount, pl_amount,
                      pl_rate, info, owner)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                    params![
                        record.symbol,
                        record.entry_date,
                        record.entry_time,
                        record.entry_price,
                        record.entry_amount,
                        record.leverage,
                        record.position.map(|p| p.to_string()),
                        record.exit_date,
                        record.exit_time,
                        record.exit_price,
                        record.exit_amount,
                        record.pl_amount,
                        record.pl_rate,
                        record.info,
                        record.owner,
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;
        debug!("Trade inserted: id={}", id);
        Ok(id.to_string())
    }

    async fn update(&self, id: &str, record: &TradeRecord) -> StoreResult<()> {
        let rowid = Self::parse_id(id)?;
        let record = record.clone();
        let changed = self
            .with_conn(move |conn| {
                let changed = conn.execute(
                    "UPDATE trades SET
                        symbol = ?1, entry_date = ?2, entry_time = ?3, entry_price = ?4,
                        entry_amount = ?5, leverage = ?6, position = ?7, exit_date = ?8,
                        exit_time = ?9, exit_price = ?10, exit_amount = ?11, pl_amount = ?12,
                        pl_rate = ?13, info = ?14, owner = ?15, updated_at = CURRENT_TIMESTAMP
                     WHERE id = ?16",
                    params![
                        record.symbol,
                        record.entry_date,
                        record.entry_time,
                        record.entry_price,
                        record.entry_amount,
                        record.leverage,
                        record.position.map(|p| p.to_string()),
                        record.exit_date,
                        record.exit_time,
                        record.exit_price,
                        record.exit_amount,
                        record.pl_amount,
                        record.pl_rate,
                        record.info,
                        record.owner,
                        rowid,
                    ],
                )?;
                Ok(changed)
            })
            .await?;
        if changed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        debug!("Trade updated: id={}", id);
        Ok(())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let rowid = Self::parse_id(id)?;
        let changed = self
            .with_conn(move |conn| {
                Ok(conn.execute("DELETE FROM trades WHERE id = ?1", params![rowid])?)
            })
            .await?;
        if changed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        debug!("Trade deleted: id={}", id);
        Ok(())
    }
}
