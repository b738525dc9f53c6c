use arc_swap::ArcSwap;
use std::sync::Arc;

use crate::entities::EventRecord;

/// Read-side copy of the stored records, swapped whole by the ingest loop.
pub struct RecordSnapshot {
    records: ArcSwap<Vec<EventRecord>>,
}

impl RecordSnapshot {
    pub fn new() -> Self {
        Self {
            records: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Publish a new set of records, ordered by `last_updated` descending.
    pub fn replace(&self, mut records: Vec<EventRecord>) {
        records.sort_by(|a, b| b.last_updated.cmp(&a.last_updated).then_with(|| a.id.cmp(&b.id)));
        self.records.store(Arc::new(records));
    }

    pub fn load(&self) -> Arc<Vec<EventRecord>> {
        self.records.load_full()
    }

    pub fn len(&self) -> usize {
        self.records.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RecordSnapshot {
    fn default() -> Self {
        Self::new()
    }
}
