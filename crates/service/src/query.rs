//! Name filter + due-date ordering for the list view.

use models::CustomerRecord;
use serde::Serialize;
use tracing::debug;

use crate::store::{RecordId, StoredRecord};

/// One row of a query result, still addressable back into the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct QueryHit<'a> {
    /// Position in store order at the time of the query.
    pub original_index: usize,
    pub id: RecordId,
    pub record: &'a CustomerRecord,
}

/// Filter by case-insensitive name substring, then stable-sort by due date.
///
/// The needle is used as typed; only the empty string matches everything. The input slice is never reordered; ties
/// on the due date keep store order.
pub fn query<'a>(entries: &'a [StoredRecord], needle: &str) -> Vec<QueryHit<'a>> {
    let needle = needle.to_lowercase();
    let mut hits: Vec<QueryHit<'a>> = entries
        .iter()
        .enumerate()
        .map(|(original_index, e)| QueryHit { original_index, id: e.id, record: &e.record })
        .filter(|hit| needle.is_empty() || hit.record.name.to_lowercase().contains(&needle))
        .collect();
    hits.sort_by_key(|hit| hit.record.due_date);
    debug!(needle = %needle, total = entries.len(), matched = hits.len(), "query evaluated");
    hits
}
