//! Application state container shared across Axum route handlers.
//!
//! Holds the database connection together with the model handle loaded once
//! during startup. The model is immutable for the life of the process; a
//! retrain takes effect by restarting the server, never by mutation.

use model::Regressor;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    model: Option<Arc<Regressor>>,
}

impl AppState {
    /// `model` is `None` when no artifact existed at startup; predict
    /// requests then answer 503 until a trained model is available.
    pub fn new(db: DatabaseConnection, model: Option<Regressor>) -> Self {
        Self {
            db,
            model: model.map(Arc::new),
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn model(&self) -> Option<&Regressor> {
        self.model.as_deref()
    }
}
