use db::DbService;

pub mod error;
pub mod middleware;
pub mod routes;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    db: DbService,
}

impl AppState {
    pub fn new(db: DbService) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DbService {
        &self.db
    }
}
