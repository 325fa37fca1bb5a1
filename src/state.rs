use crate::store::ActivityStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ActivityStore>,
}

impl AppState {
    pub fn new(store: ActivityStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}
