use std::sync::Arc;
use types::TimetablePayload;

/// Published once after the startup solve and never mutated; request
/// handlers share the `Arc` without locking.
#[derive(Clone)]
pub struct AppState {
    pub payload: Arc<TimetablePayload>,
    pub source: &'static str,
}

impl AppState {
    pub fn new(payload: TimetablePayload, source: &'static str) -> Self {
        Self {
            payload: Arc::new(payload),
            source,
        }
    }
}
