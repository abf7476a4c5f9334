use axum::{Router, routing::get};

use crate::AppState;

pub mod boards;
pub mod cards;
pub mod health;
pub mod labels;
pub mod lists;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health::health_check))
        .route("/search", get(cards::search_cards))
        .merge(boards::router(&state))
        .merge(lists::router(&state))
        .merge(cards::router(&state))
        .merge(labels::router(&state));

    Router::new().nest("/api", api).with_state(state)
}
