use std::sync::Arc;

use crate::items::RecordSnapshot;
use crate::repositories::EventStore;

#[derive(Clone)]
pub struct AppState {
    pub snapshot: Arc<RecordSnapshot>,
    pub store: Arc<dyn EventStore>,
}

impl AppState {
    pub fn new(snapshot: Arc<RecordSnapshot>, store: Arc<dyn EventStore>) -> Self {
        Self { snapshot, store }
    }
}
