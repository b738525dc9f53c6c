pub mod events;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::entities::EventRecord;

pub use events::PgEventStore;
pub use memory::MemoryEventStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("event {0} not found")]
    NotFound(String),

    #[error("store call timed out")]
    Timeout,
}

/// Result of a conditional create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    /// A record with the same id was already present; nothing was written.
    AlreadyExists,
}

/// Keyed storage for event records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<EventRecord>, StoreError>;

    /// Insert `record` only if no record with its id exists.
    async fn create_if_absent(&self, record: &EventRecord) -> Result<CreateOutcome, StoreError>;

    /// Overwrite every field of an existing record.
    ///
    /// `last_updated` never moves backwards: the stored value becomes the later
    /// of the current and the supplied timestamp. Fails with
    /// [`StoreError::NotFound`] when the id is absent.
    async fn update(&self, record: &EventRecord) -> Result<(), StoreError>;

    /// Every record, most recently updated first.
    async fn list(&self) -> Result<Vec<EventRecord>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
