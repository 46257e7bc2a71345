//! Shared service state.
//!
//! The model and scaler are loaded once at startup and only read afterward,
//! so concurrent handlers share them freely. The store connection is a
//! single SQLite handle behind a mutex; queries are short and hold no lock
//! across await points.

use std::sync::{Arc, Mutex};

use diesel::SqliteConnection;
use price_sync::store::SqliteStore;

use crate::{model::SequenceModel, scaler::MinMaxScaler};

pub struct AppState {
    pub model: Arc<dyn SequenceModel>,
    pub scaler: MinMaxScaler,
    pub store: SqliteStore,
    pub conn: Mutex<SqliteConnection>,
}

impl AppState {
    pub fn new(
        model: impl SequenceModel + 'static,
        scaler: MinMaxScaler,
        conn: SqliteConnection,
    ) -> Arc<Self> {
        Arc::new(Self {
            model: Arc::new(model),
            scaler,
            store: SqliteStore::new(),
            conn: Mutex::new(conn),
        })
    }
}
