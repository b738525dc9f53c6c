use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Sentinel the classifier uses for a location or date it could not extract.
pub const UNKNOWN: &str = "unknown";

// --- Tables ---

/// One earthquake event, keyed by its fingerprint.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub id: String,
    pub last_updated: DateTime<Utc>,
    #[sqlx(try_from = "i64")]
    pub injured: u32,
    #[sqlx(try_from = "i64")]
    pub deaths: u32,
    pub magnitude: f64,
    pub location: String,
    #[sqlx(rename = "event_date")]
    pub date: String,
    pub ref_url: String,
}

/// A validated classification that is ready to be fingerprinted and stored.
///
/// Only the upsert engine turns a draft into an [`EventRecord`], since it owns
/// `id` and `last_updated`.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub injured: u32,
    pub deaths: u32,
    pub magnitude: f64,
    pub location: String,
    pub date: String,
    pub ref_url: String,
}

impl EventDraft {
    pub fn into_record(self, id: String, last_updated: DateTime<Utc>) -> EventRecord {
        EventRecord {
            id,
            last_updated,
            injured: self.injured,
            deaths: self.deaths,
            magnitude: self.magnitude,
            location: self.location,
            date: self.date,
            ref_url: self.ref_url,
        }
    }
}
