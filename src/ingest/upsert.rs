use std::sync::Arc;
use tracing::{debug, info};

use super::timing::Clock;
use crate::entities::EventDraft;
use crate::repositories::{CreateOutcome, EventStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
    /// The id was absent on read but another writer created it first; the
    /// record was then updated in place.
    UpdatedAfterRace,
}

/// Insert-or-merge of event records keyed by fingerprint.
///
/// At most one create ever succeeds per id. Every other write is a full
/// overwrite, so the last writer wins.
pub struct UpsertEngine {
    store: Arc<dyn EventStore>,
    clock: Arc<dyn Clock>,
}

impl UpsertEngine {
    pub fn new(store: Arc<dyn EventStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn upsert(&self, id: &str, draft: &EventDraft) -> Result<UpsertOutcome, StoreError> {
        let record = draft.clone().into_record(id.to_string(), self.clock.now());

        if self.store.get(id).await?.is_none() {
            match self.store.create_if_absent(&record).await? {
                CreateOutcome::Created => {
                    info!(id, "Created event");
                    return Ok(UpsertOutcome::Created);
                }
                CreateOutcome::AlreadyExists => {
                    debug!(id, "Lost create race, updating instead");
                    self.store.update(&record).await?;
                    return Ok(UpsertOutcome::UpdatedAfterRace);
                }
            }
        }

        self.store.update(&record).await?;
        info!(id, "Updated event");
        Ok(UpsertOutcome::Updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::EventRecord;
    use crate::ingest::SystemClock;
    use crate::repositories::MockEventStore;
    use chrono::{TimeZone, Utc};
    use mockall::Sequence;

    fn draft() -> EventDraft {
        EventDraft {
            injured: 1,
            deaths: 0,
            magnitude: 4.7,
            location: "Reno, Nevada".to_string(),
            date: "2024-06-03".to_string(),
            ref_url: "https://x/1".to_string(),
        }
    }

    fn existing() -> EventRecord {
        draft().into_record(
            "abc".to_string(),
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn absent_id_is_created_without_update() {
        let mut store = MockEventStore::new();
        store.expect_get().withf(|id| id == "abc").times(1).returning(|_| Ok(None));
        store
            .expect_create_if_absent()
            .withf(|r| r.id == "abc" && r.ref_url == "https://x/1")
            .times(1)
            .returning(|_| Ok(CreateOutcome::Created));
        store.expect_update().never();

        let engine = UpsertEngine::new(Arc::new(store), Arc::new(SystemClock));
        assert_eq!(engine.upsert("abc", &draft()).await.unwrap(), UpsertOutcome::Created);
    }

    #[tokio::test]
    async fn present_id_is_updated_without_create() {
        let mut store = MockEventStore::new();
        store.expect_get().times(1).returning(|_| Ok(Some(existing())));
        store.expect_create_if_absent().never();
        store.expect_update().times(1).returning(|_| Ok(()));

        let engine = UpsertEngine::new(Arc::new(store), Arc::new(SystemClock));
        assert_eq!(engine.upsert("abc", &draft()).await.unwrap(), UpsertOutcome::Updated);
    }

    #[tokio::test]
    async fn lost_create_race_falls_through_to_update() {
        let mut seq = Sequence::new();
        let mut store = MockEventStore::new();
        store
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        store
            .expect_create_if_absent()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(CreateOutcome::AlreadyExists));
        store
            .expect_update()
            .withf(|r| r.id == "abc")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let engine = UpsertEngine::new(Arc::new(store), Arc::new(SystemClock));
        assert_eq!(
            engine.upsert("abc", &draft()).await.unwrap(),
            UpsertOutcome::UpdatedAfterRace
        );
    }

    #[tokio::test]
    async fn create_failure_is_surfaced() {
        let mut store = MockEventStore::new();
        store.expect_get().returning(|_| Ok(None));
        store
            .expect_create_if_absent()
            .returning(|_| Err(StoreError::Database(sqlx::Error::PoolTimedOut)));
        store.expect_update().never();

        let engine = UpsertEngine::new(Arc::new(store), Arc::new(SystemClock));
        assert!(matches!(
            engine.upsert("abc", &draft()).await,
            Err(StoreError::Database(_))
        ));
    }

    #[tokio::test]
    async fn read_failure_writes_nothing() {
        let mut store = MockEventStore::new();
        store.expect_get().returning(|_| Err(StoreError::Database(sqlx::Error::PoolClosed)));
        store.expect_create_if_absent().never();
        store.expect_update().never();

        let engine = UpsertEngine::new(Arc::new(store), Arc::new(SystemClock));
        assert!(engine.upsert("abc", &draft()).await.is_err());
    }
}
