//! Shared application state for all routes.

use crate::store::{SchemaStatus, Store};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    /// Result of the startup table-creation step.
    pub schema: SchemaStatus,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, schema: SchemaStatus) -> Self {
        Self { store, schema }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}
