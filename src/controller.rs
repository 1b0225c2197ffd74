//! Trade record form/list controller
//!
//! Owns one editable draft, the list of persisted records, and the
//! CRUD orchestration against the backing [`TradeStore`]. The list is
//! the sole read path and is re-fetched in full after every mutation;
//! there is no patch-in-place. Store failures come back as typed
//! errors so a UI layer can decide what to show, and are logged here
//! as well.
//!
//! Every mutating operation takes `&mut self`, so mutations on one
//! controller instance are serialized by construction; two refreshes
//! cannot race each other. Across instances it is still last writer
//! wins.

use tracing::{debug, info, warn};

use crate::store::{StoreResult, TradeStore};
use crate::types::{compute_pl, DraftField, TradeDraft, TradeRecord};
use chrono::{NaiveDate, NaiveTime};

/// What a successful save did, with the affected identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(String),
    Updated(String),
}

impl SaveOutcome {
    pub fn id(&self) -> &str {
        match self {
            SaveOutcome::Created(id) | SaveOutcome::Updated(id) => id,
        }
    }
}

pub struct TradeLogController<S: TradeStore> {
    store: S,
    /// Session identity used to stamp and filter records; `None` falls
    /// back to the unscoped shared collection.
    owner: Option<String>,
    trades: Vec<TradeRecord>,
    draft: TradeDraft,
    editor_open: bool,
}

impl<S: TradeStore> TradeLogController<S> {
    pub fn new(store: S) -> Self {
        Self::with_owner(store, None)
    }

    pub fn with_owner(store: S, owner: Option<String>) -> Self {
        TradeLogController {
            store,
            owner,
            trades: Vec::new(),
            draft: TradeDraft::default(),
            editor_open: false,
        }
    }

    // =========================================================================
    // Read surface
    // =========================================================================

    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    pub fn draft(&self) -> &TradeDraft {
        &self.draft
    }

    pub fn is_editor_open(&self) -> bool {
        self.editor_open
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.draft.editing_id.as_deref()
    }

    // =========================================================================
    // List
    // =========================================================================

    /// Fetch every record in scope and replace the in-memory list.
    ///
    /// On failure the previous list is kept; stale data beats a blank
    /// screen. The error is still returned for the caller to surface.
    pub async fn refresh(&mut self) -> StoreResult<()> {
        match self.store.list_all().await {
            Ok(mut records) => {
                if let Some(owner) = &self.owner {
                    records.retain(|r| r.owner.as_deref() == Some(owner.as_str()));
                }
                debug!("Refreshed trade list: {} records", records.len());
                self.trades = records;
                Ok(())
            }
            Err(e) => {
                warn!("Failed to fetch trades: {e}");
                Err(e)
            }
        }
    }

    // =========================================================================
    // Draft editing
    // =========================================================================

    /// Set one text field of the draft by name.
    ///
    /// Updating either amount field runs the derived-field pass right
    /// after the assignment, so the P/L always reflects the
    /// post-update draft.
    pub fn set_field(&mut self, field: DraftField, value: &str) {
        match field {
            DraftField::Symbol => self.draft.symbol = value.to_string(),
            DraftField::EntryPrice => self.draft.entry_price = value.to_string(),
            DraftField::EntryAmount => self.draft.entry_amount = value.to_string(),
            DraftField::Leverage => self.draft.leverage = value.to_string(),
            DraftField::Position => self.draft.position = value.parse().ok(),
            DraftField::ExitPrice => self.draft.exit_price = value.to_string(),
            DraftField::ExitAmount => self.draft.exit_amount = value.to_string(),
            DraftField::Info => self.draft.info = value.to_string(),
        }
        if matches!(field, DraftField::EntryAmount | DraftField::ExitAmount) {
            self.recompute_derived();
        }
    }

    /// Recompute `pl_amount`/`pl_rate` from the amount texts.
    ///
    /// If either amount fails to parse, or the entry amount is zero,
    /// the derived fields are left at their prior values. That no-op
    /// is deliberate: half-typed input should not wipe the last good
    /// figures.
    pub fn recompute_derived(&mut self) {
        if let Some((pl_amount, pl_rate)) =
            compute_pl(&self.draft.entry_amount, &self.draft.exit_amount)
        {
            self.draft.pl_amount = pl_amount;
            self.draft.pl_rate = pl_rate;
        }
    }

    pub fn set_entry_date(&mut self, date: Option<NaiveDate>) {
        self.draft.entry_date = date;
    }

    pub fn set_entry_time(&mut self, time: Option<NaiveTime>) {
        self.draft.entry_time = time;
    }

    pub fn set_exit_date(&mut self, date: Option<NaiveDate>) {
        self.draft.exit_date = date;
    }

    pub fn set_exit_time(&mut self, time: Option<NaiveTime>) {
        self.draft.exit_time = time;
    }

    // =========================================================================
    // Edit surface state machine
    // =========================================================================

    /// Load an existing record into the draft and open the editor.
    ///
    /// Malformed stored date/time strings degrade to empty inputs;
    /// they never block opening the editor.
    pub fn begin_edit(&mut self, record: &TradeRecord) {
        self.draft = TradeDraft::from_record(record);
        self.editor_open = true;
        debug!(
            "Editing trade id={:?} symbol={}",
            self.draft.editing_id, self.draft.symbol
        );
    }

    /// Reset the draft for a brand new record and open the editor.
    pub fn begin_create(&mut self) {
        self.draft = TradeDraft::default();
        self.editor_open = true;
    }

    /// Close the editor and discard the draft.
    pub fn cancel(&mut self) {
        self.draft = TradeDraft::default();
        self.editor_open = false;
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Persist the draft: update in place when an editing id is set,
    /// insert otherwise.
    ///
    /// Success closes the editor, resets the draft, and refreshes the
    /// list. Failure leaves the editor open with the draft intact so
    /// no input is lost.
    pub async fn save(&mut self) -> StoreResult<SaveOutcome> {
        let normalized = self.draft.to_record(self.owner.as_deref());

        let outcome = match self.draft.editing_id.clone() {
            Some(id) => {
                self.store.update(&id, &normalized).await.inspect_err(|e| {
                    warn!("Failed to update trade {id}: {e}");
                })?;
                SaveOutcome::Updated(id)
            }
            None => {
                let id = self.store.insert(&normalized).await.inspect_err(|e| {
                    warn!("Failed to insert trade: {e}");
                })?;
                SaveOutcome::Created(id)
            }
        };

        info!("Trade saved: {:?}", outcome);
        self.draft = TradeDraft::default();
        self.editor_open = false;

        // The save already succeeded; a failed refresh just leaves the
        // previous list visible.
        if let Err(e) = self.refresh().await {
            warn!("Trade list refresh after save failed: {e}");
        }

        Ok(outcome)
    }

    /// Remove one record, then refresh the list.
    pub async fn delete(&mut self, id: &str) -> StoreResult<()> {
        self.store.delete(id).await.inspect_err(|e| {
            warn!("Failed to delete trade {id}: {e}");
        })?;
        info!("Trade deleted: id={id}");

        if let Err(e) = self.refresh().await {
            warn!("Trade list refresh after delete failed: {e}");
        }
        Ok(())
    }
}
