use crate::shared::data_source::DataStore;

/// Shared state of the HTTP handlers
pub struct AppState {
    pub store: DataStore,
}

impl AppState {
    pub fn new(store: DataStore) -> Self {
        Self { store }
    }
}
