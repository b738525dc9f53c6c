use async_trait::async_trait;
use sqlx::PgPool;

use super::{CreateOutcome, EventStore, StoreError};
use crate::entities::EventRecord;

/// Postgres-backed event store.
#[derive(Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn get(&self, id: &str) -> Result<Option<EventRecord>, StoreError> {
        let record = sqlx::query_as::<_, EventRecord>(
            r#"
            SELECT id, last_updated, injured, deaths, magnitude, location, event_date, ref_url
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn create_if_absent(&self, record: &EventRecord) -> Result<CreateOutcome, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO events
                  (id, last_updated, injured, deaths, magnitude, location, event_date, ref_url)
            VALUES ($1, $2,          $3,      $4,     $5,        $6,       $7,         $8)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&record.id)
        .bind(record.last_updated)
        .bind(i64::from(record.injured))
        .bind(i64::from(record.deaths))
        .bind(record.magnitude)
        .bind(&record.location)
        .bind(&record.date)
        .bind(&record.ref_url)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            Ok(CreateOutcome::Created)
        } else {
            Ok(CreateOutcome::AlreadyExists)
        }
    }

    async fn update(&self, record: &EventRecord) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE events
               SET last_updated = GREATEST(last_updated, $2),
                   injured      = $3,
                   deaths       = $4,
                   magnitude    = $5,
                   location     = $6,
                   event_date   = $7,
                   ref_url      = $8
             WHERE id = $1
            "#,
        )
        .bind(&record.id)
        .bind(record.last_updated)
        .bind(i64::from(record.injured))
        .bind(i64::from(record.deaths))
        .bind(record.magnitude)
        .bind(&record.location)
        .bind(&record.date)
        .bind(&record.ref_url)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(record.id.clone()));
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<EventRecord>, StoreError> {
        let records = sqlx::query_as::<_, EventRecord>(
            r#"
            SELECT id, last_updated, injured, deaths, magnitude, location, event_date, ref_url
            FROM events
            ORDER BY last_updated DESC, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
