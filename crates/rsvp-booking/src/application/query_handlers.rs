//! Query handlers for the booking context.
//!
//! Both queries read the table fresh on every call and never fail: a store
//! error degrades to a default (zero counts, sequence number 1) and is logged.

use std::collections::BTreeMap;

use rsvp_core::store::{Row, SheetStore};
use tracing::warn;

use crate::application::settings::TableLayout;
use crate::domain::record::{SEQUENCE_COLUMN, TIMESLOT_COLUMN};
use crate::domain::timeslot::TimeslotCatalog;

/// Per-slot occupancy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCountsView {
    /// Number of stored records per recognized timeslot.
    pub counts: BTreeMap<String, u32>,
    /// `true` when the store could not be read and `counts` are defaults.
    pub degraded: bool,
}

impl SlotCountsView {
    /// Count for `label`, zero for unknown labels.
    #[must_use]
    pub fn count(&self, label: &str) -> u32 {
        self.counts.get(label).copied().unwrap_or(0)
    }
}

fn data_rows(rows: &[Row]) -> &[Row] {
    rows.get(1..).unwrap_or_default()
}

/// Counts rows per recognized timeslot. The first row is the header.
#[must_use]
pub fn count_slots(rows: &[Row], catalog: &TimeslotCatalog) -> BTreeMap<String, u32> {
    let mut counts: BTreeMap<String, u32> =
        catalog.iter().map(|s| (s.label.clone(), 0)).collect();
    for row in data_rows(rows) {
        if let Some(count) = row
            .get(TIMESLOT_COLUMN)
            .and_then(|slot| counts.get_mut(slot.as_str()))
        {
            *count += 1;
        }
    }
    counts
}

/// Highest numeric sequence value plus one; `1` for a table with no data.
/// Cells that do not parse as an integer count as zero.
#[must_use]
pub fn next_number_from(rows: &[Row]) -> u64 {
    data_rows(rows)
        .iter()
        .map(|row| {
            row.get(SEQUENCE_COLUMN)
                .and_then(|cell| cell.trim().parse::<u64>().ok())
                .unwrap_or(0)
        })
        .max()
        .unwrap_or(0)
        + 1
}

/// Reads the table and counts records per timeslot.
pub async fn get_slot_counts(
    store: &dyn SheetStore,
    layout: &TableLayout,
    catalog: &TimeslotCatalog,
) -> SlotCountsView {
    match store.read_range(&layout.records_range()).await {
        Ok(rows) => SlotCountsView {
            counts: count_slots(&rows, catalog),
            degraded: false,
        },
        Err(e) => {
            warn!(error = %e, "slot count read failed; reporting zero counts");
            SlotCountsView {
                counts: count_slots(&[], catalog),
                degraded: true,
            }
        }
    }
}

/// Reads the sequence column and returns the next number.
///
/// A failed read yields `1`, which duplicates an existing number if the
/// table already has records.
pub async fn next_sequence_number(store: &dyn SheetStore, layout: &TableLayout) -> u64 {
    match store.read_range(&layout.sequence_range()).await {
        Ok(rows) => next_number_from(&rows),
        Err(e) => {
            warn!(error = %e, "sequence read failed; assigning 1");
            1
        }
    }
}
