use async_trait::async_trait;
use dashmap::{DashMap, mapref::entry::Entry};

use super::{CreateOutcome, EventStore, StoreError};
use crate::entities::EventRecord;

/// In-process event store for local runs and tests.
#[derive(Default)]
pub struct MemoryEventStore {
    records: DashMap<String, EventRecord>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<EventRecord> for MemoryEventStore {
    fn from_iter<I: IntoIterator<Item = EventRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().map(|r| (r.id.clone(), r)).collect(),
        }
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn get(&self, id: &str) -> Result<Option<EventRecord>, StoreError> {
        Ok(self.records.get(id).map(|r| r.value().clone()))
    }

    async fn create_if_absent(&self, record: &EventRecord) -> Result<CreateOutcome, StoreError> {
        match self.records.entry(record.id.clone()) {
            Entry::Occupied(_) => Ok(CreateOutcome::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(CreateOutcome::Created)
            }
        }
    }

    async fn update(&self, record: &EventRecord) -> Result<(), StoreError> {
        let mut stored = self
            .records
            .get_mut(&record.id)
            .ok_or_else(|| StoreError::NotFound(record.id.clone()))?;
        let last_updated = stored.last_updated.max(record.last_updated);
        *stored = EventRecord {
            last_updated,
            ..record.clone()
        };
        Ok(())
    }

    async fn list(&self) -> Result<Vec<EventRecord>, StoreError> {
        let mut records: Vec<EventRecord> = self.records.iter().map(|r| r.value().clone()).collect();
        records.sort_by(|a, b| b.last_updated.cmp(&a.last_updated).then_with(|| a.id.cmp(&b.id)));
        Ok(records)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
