//! The ingest pipeline: visited-URL tracking, upserts and the polling loop.

pub mod orchestrator;
pub mod timing;
pub mod upsert;
pub mod visited;

pub use orchestrator::{IngestSettings, Ingestor, PageOutcome, PassReport};
pub use timing::{Clock, Sleeper, SystemClock, TokioSleeper};
pub use upsert::{UpsertEngine, UpsertOutcome};
pub use visited::VisitedSet;
