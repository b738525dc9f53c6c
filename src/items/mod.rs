pub mod handlers;
pub mod snapshot;

pub use snapshot::RecordSnapshot;
