//! Explicit refresh of the tracking list
//!
//! Looks up every stored entry, one at a time, and records the results.
//! This only ever runs when the user asks for it.

use crate::courier::Tracker;
use crate::record::TrackingRecord;
use crate::store::{Storage, StoreResult, TrackingStore};
use chrono::Utc;
use std::collections::BTreeMap;

/// Result of one refresh entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A lookup ran; the record may carry an error
    Looked(TrackingRecord),

    /// Already delivered and not forced; no request was sent
    Skipped,
}

/// Refreshes every entry of the tracking list
///
/// # Refresh Rules
///
/// | Entry | Action |
/// |-------|--------|
/// | Delivered, not forced | Skipped, no request |
/// | Lookup succeeds | Status, check time and summary updated |
/// | Lookup fails | Entry untouched, error record returned |
///
/// Lookups run sequentially. The list is saved once at the end.
///
/// # Returns
///
/// The outcome per tracking number, in list order.
pub async fn refresh_all<S: Storage>(
    store: &mut TrackingStore<S>,
    tracker: &Tracker,
    force: bool,
) -> StoreResult<BTreeMap<String, RefreshOutcome>> {
    let targets: Vec<(String, String, bool)> = store
        .list()
        .iter()
        .map(|(id, entry)| (id.clone(), entry.courier.clone(), entry.is_delivered()))
        .collect();

    let mut outcomes = BTreeMap::new();
    let mut updated = 0usize;

    for (tracking_number, courier, delivered) in targets {
        if delivered && !force {
            tracing::debug!("Skipping delivered {}", tracking_number);
            outcomes.insert(tracking_number, RefreshOutcome::Skipped);
            continue;
        }

        let record = tracker.route(&courier, &tracking_number).await;
        if store.apply_lookup(&tracking_number, &record, Utc::now()) {
            updated += 1;
        }
        outcomes.insert(tracking_number, RefreshOutcome::Looked(record));
    }

    store.save()?;
    tracing::info!(
        "Refreshed {} of {} tracked shipments",
        updated,
        outcomes.len()
    );

    Ok(outcomes)
}
