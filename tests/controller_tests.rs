//! Integration tests for the trade journal controller
//!
//! These exercise the controller against the in-memory store, plus a
//! fault-injecting wrapper for the failure paths.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

use trade_journal::controller::{SaveOutcome, TradeLogController};
use trade_journal::store::{MemoryStore, StoreError, StoreResult, TradeStore};
use trade_journal::types::{DraftField, PositionSide, TradeRecord};

// =============================================================================
// Test Utilities
// =============================================================================

/// Store wrapper that can be told to fail reads or writes.
struct FlakyStore {
    inner: MemoryStore,
    fail_writes: AtomicBool,
    fail_lists: AtomicBool,
}

impl FlakyStore {
    fn new() -> Self {
        FlakyStore {
            inner: MemoryStore::new(),
            fail_writes: AtomicBool::new(false),
            fail_lists: AtomicBool::new(false),
        }
    }

    fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn set_fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    fn injected() -> StoreError {
        StoreError::Network("injected failure".to_string())
    }
}

#[async_trait]
impl TradeStore for FlakyStore {
    async fn list_all(&self) -> StoreResult<Vec<TradeRecord>> {
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(Self::injected());
        }
        self.inner.list_all().await
    }

    async fn insert(&self, record: &TradeRecord) -> StoreResult<String> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::injected());
        }
        self.inner.insert(record).await
    }

    async fn update(&self, id: &str, record: &TradeRecord) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::injected());
        }
        self.inner.update(id, record).await
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::injected());
        }
        self.inner.delete(id).await
    }
}

fn controller() -> TradeLogController<Arc<MemoryStore>> {
    TradeLogController::new(Arc::new(MemoryStore::new()))
}

/// Create one trade through the controller and return its id.
async fn seed_trade<S: TradeStore>(
    controller: &mut TradeLogController<S>,
    symbol: &str,
) -> String {
    controller.begin_create();
    controller.set_field(DraftField::Symbol, symbol);
    controller.set_entry_date(NaiveDate::from_ymd_opt(2024, 3, 15));
    controller.set_entry_time(NaiveTime::from_hms_opt(9, 30, 0));
    controller.set_exit_date(NaiveDate::from_ymd_opt(2024, 3, 16));
    controller.set_exit_time(NaiveTime::from_hms_opt(15, 0, 0));
    controller.set_field(DraftField::Position, "Long");
    controller.set_field(DraftField::EntryAmount, "100");
    controller.set_field(DraftField::ExitAmount, "150");
    match controller.save().await.unwrap() {
        SaveOutcome::Created(id) => id,
        other => panic!("expected Created, got {other:?}"),
    }
}

// =============================================================================
// Derived fields
// =============================================================================

#[tokio::test]
async fn test_derived_fields_from_amounts() {
    let mut c = controller();
    c.begin_create();
    c.set_field(DraftField::EntryAmount, "100");
    c.set_field(DraftField::ExitAmount, "150");
    assert_eq!(c.draft().pl_amount, "50.00");
    assert_eq!(c.draft().pl_rate, "50.00");

    c.set_field(DraftField::ExitAmount, "90.5");
    assert_eq!(c.draft().pl_amount, "-9.50");
    assert_eq!(c.draft().pl_rate, "-9.50");
}

#[tokio::test]
async fn test_derived_fields_noop_on_bad_input() {
    let mut c = controller();
    c.begin_create();
    c.set_field(DraftField::EntryAmount, "100");
    c.set_field(DraftField::ExitAmount, "150");

    // Non-numeric exit keeps the prior values
    c.set_field(DraftField::ExitAmount, "oops");
    assert_eq!(c.draft().pl_amount, "50.00");

    // Zero entry keeps the prior values
    c.set_field(DraftField::ExitAmount, "150");
    c.set_field(DraftField::EntryAmount, "0");
    assert_eq!(c.draft().pl_amount, "50.00");
    assert_eq!(c.draft().pl_rate, "50.00");
}

#[tokio::test]
async fn test_back_to_back_amount_updates_settle() {
    let mut c = controller();
    c.begin_create();
    c.set_field(DraftField::EntryAmount, "100");
    c.set_field(DraftField::ExitAmount, "150");
    // Derived values reflect the settled draft, not a stale
    // intermediate state.
    assert_eq!(c.draft().pl_amount, "50.00");
}

// =============================================================================
// Create / edit / delete paths
// =============================================================================

#[tokio::test]
async fn test_create_appends_one_record_with_fresh_id() {
    let store = Arc::new(MemoryStore::new());
    let mut c = TradeLogController::new(Arc::clone(&store));

    let first = seed_trade(&mut c, "BTCUSDT").await;
    let second = seed_trade(&mut c, "ETHUSDT").await;

    assert_ne!(first, second);
    assert_eq!(store.len(), 2);
    assert_eq!(c.trades().len(), 2);
    assert!(!c.is_editor_open());
    assert_eq!(c.draft().symbol, "");
}

#[tokio::test]
async fn test_save_normalizes_dates_and_round_trips() {
    let mut c = controller();
    let id = seed_trade(&mut c, "BTCUSDT").await;

    let record = c.trades()[0].clone();
    assert_eq!(record.id.as_deref(), Some(id.as_str()));
    assert_eq!(record.entry_date, "2024-03-15");
    assert_eq!(record.entry_time, "09:30");
    assert_eq!(record.exit_date, "2024-03-16");
    assert_eq!(record.exit_time, "15:00");
    assert_eq!(record.pl_amount, "50.00");
    assert_eq!(record.position, Some(PositionSide::Long));

    // Loading the saved record reconstructs the same date values
    c.begin_edit(&record);
    assert_eq!(c.draft().entry_date, NaiveDate::from_ymd_opt(2024, 3, 15));
    assert_eq!(c.draft().entry_time, NaiveTime::from_hms_opt(9, 30, 0));
}

#[tokio::test]
async fn test_unset_dates_normalize_to_empty_strings() {
    let mut c = controller();
    c.begin_create();
    c.set_field(DraftField::Symbol, "BTCUSDT");
    c.save().await.unwrap();

    let record = &c.trades()[0];
    assert_eq!(record.entry_date, "");
    assert_eq!(record.entry_time, "");
    assert_eq!(record.exit_date, "");
    assert_eq!(record.exit_time, "");
}

#[tokio::test]
async fn test_edit_preserves_identity() {
    let mut c = controller();
    let id = seed_trade(&mut c, "BTCUSDT").await;

    let record = c.trades()[0].clone();
    c.begin_edit(&record);
    assert_eq!(c.editing_id(), Some(id.as_str()));

    // Save with no changes updates in place, never inserts
    let outcome = c.save().await.unwrap();
    assert_eq!(outcome, SaveOutcome::Updated(id.clone()));

    let matching: Vec<_> = c
        .trades()
        .iter()
        .filter(|r| r.id.as_deref() == Some(id.as_str()))
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(c.trades().len(), 1);
}

#[tokio::test]
async fn test_edit_changes_are_persisted() {
    let mut c = controller();
    seed_trade(&mut c, "BTCUSDT").await;

    let record = c.trades()[0].clone();
    c.begin_edit(&record);
    c.set_field(DraftField::ExitAmount, "200");
    c.set_field(DraftField::Info, "doubled down");
    c.save().await.unwrap();

    let updated = &c.trades()[0];
    assert_eq!(updated.exit_amount, "200");
    assert_eq!(updated.pl_amount, "100.00");
    assert_eq!(updated.pl_rate, "100.00");
    assert_eq!(updated.info, "doubled down");
}

#[tokio::test]
async fn test_delete_removes_record() {
    let mut c = controller();
    let id = seed_trade(&mut c, "BTCUSDT").await;
    seed_trade(&mut c, "ETHUSDT").await;

    c.delete(&id).await.unwrap();
    assert_eq!(c.trades().len(), 1);
    assert!(c.trades().iter().all(|r| r.id.as_deref() != Some(id.as_str())));
}

#[tokio::test]
async fn test_delete_missing_id_leaves_list_intact() {
    let mut c = controller();
    seed_trade(&mut c, "BTCUSDT").await;

    let err = c.delete("does-not-exist").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
    assert_eq!(c.trades().len(), 1);
}

// =============================================================================
// Malformed stored data
// =============================================================================

#[tokio::test]
async fn test_malformed_stored_date_loads_as_none() {
    let mut c = controller();
    let record = TradeRecord {
        id: Some("abc".to_string()),
        symbol: "BTCUSDT".to_string(),
        entry_date: "not-a-date".to_string(),
        entry_time: "99:99".to_string(),
        exit_date: "2024-03-16".to_string(),
        exit_time: "15:00".to_string(),
        ..Default::default()
    };

    c.begin_edit(&record);
    assert!(c.is_editor_open());
    assert_eq!(c.draft().entry_date, None);
    assert_eq!(c.draft().entry_time, None);
    assert_eq!(c.draft().exit_date, NaiveDate::from_ymd_opt(2024, 3, 16));
}

// =============================================================================
// Failure paths
// =============================================================================

#[tokio::test]
async fn test_save_failure_keeps_editor_open_and_draft_intact() {
    let store = Arc::new(FlakyStore::new());
    let mut c = TradeLogController::new(Arc::clone(&store));

    c.begin_create();
    c.set_field(DraftField::Symbol, "BTCUSDT");
    c.set_field(DraftField::EntryAmount, "100");

    store.set_fail_writes(true);
    assert!(c.save().await.is_err());

    // No input lost: the editor is still open with the draft untouched
    assert!(c.is_editor_open());
    assert_eq!(c.draft().symbol, "BTCUSDT");
    assert_eq!(c.draft().entry_amount, "100");

    // Retrying once the store recovers succeeds and closes the editor
    store.set_fail_writes(false);
    let outcome = c.save().await.unwrap();
    assert!(matches!(outcome, SaveOutcome::Created(_)));
    assert!(!c.is_editor_open());
}

#[tokio::test]
async fn test_refresh_failure_keeps_previous_list() {
    let store = Arc::new(FlakyStore::new());
    let mut c = TradeLogController::new(Arc::clone(&store));
    seed_trade(&mut c, "BTCUSDT").await;
    assert_eq!(c.trades().len(), 1);

    store.set_fail_lists(true);
    assert!(c.refresh().await.is_err());

    // Existing data is not cleared on fetch failure
    assert_eq!(c.trades().len(), 1);
    assert_eq!(c.trades()[0].symbol, "BTCUSDT");
}

#[tokio::test]
async fn test_delete_failure_is_surfaced_and_list_kept() {
    let store = Arc::new(FlakyStore::new());
    let mut c = TradeLogController::new(Arc::clone(&store));
    let id = seed_trade(&mut c, "BTCUSDT").await;

    store.set_fail_writes(true);
    assert!(c.delete(&id).await.is_err());
    assert_eq!(c.trades().len(), 1);
}

// =============================================================================
// Owner scoping
// =============================================================================

#[tokio::test]
async fn test_list_filters_by_session_identity() {
    let store = Arc::new(MemoryStore::new());

    let mut alice =
        TradeLogController::with_owner(Arc::clone(&store), Some("alice".to_string()));
    let mut bob = TradeLogController::with_owner(Arc::clone(&store), Some("bob".to_string()));

    seed_trade(&mut alice, "BTCUSDT").await;
    seed_trade(&mut bob, "ETHUSDT").await;

    alice.refresh().await.unwrap();
    bob.refresh().await.unwrap();

    assert_eq!(alice.trades().len(), 1);
    assert_eq!(alice.trades()[0].symbol, "BTCUSDT");
    assert_eq!(bob.trades().len(), 1);
    assert_eq!(bob.trades()[0].symbol, "ETHUSDT");

    // An unscoped controller still sees the whole collection
    let mut unscoped = TradeLogController::new(Arc::clone(&store));
    unscoped.refresh().await.unwrap();
    assert_eq!(unscoped.trades().len(), 2);
}
