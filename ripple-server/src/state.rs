use crate::db::Database;
use crate::seed::GenerationConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    /// Defaults for the bulk generation endpoint, from settings
    pub seed: GenerationConfig,
}

impl AppState {
    pub fn new(db: Database, seed: GenerationConfig) -> Self {
        Self { db, seed }
    }
}
