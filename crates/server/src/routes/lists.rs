use axum::{
    Extension, Json, Router,
    extract::{Query, State},
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{get, patch},
};
use db::models::{
    card::{Card, CreateCard},
    list::{List, MoveList, UpdateList},
};
use serde::Deserialize;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError, middleware::load_list_middleware};

#[derive(Deserialize)]
pub struct ListCardsQuery {
    /// Include archived cards in the result.
    #[serde(default)]
    pub archived: bool,
}

/// GET /api/lists/{list_id} - Get a list by ID
pub async fn get_list(
    Extension(list): Extension<List>,
) -> Result<ResponseJson<ApiResponse<List>>, ApiError> {
    Ok(ResponseJson(ApiResponse::success(list)))
}

/// PUT /api/lists/{list_id} - Update a list
pub async fn update_list(
    Extension(list): Extension<List>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateList>,
) -> Result<ResponseJson<ApiResponse<List>>, ApiError> {
    if payload.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(ApiError::Validation("list name is required".to_string()));
    }
    let updated = List::update(&state.db().pool, list.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(updated)))
}

/// PATCH /api/lists/{list_id}/move - Reorder a list within its board
///
/// The payload position is where the caller's drag landed; the stored
/// neighbors around that value are re-derived server-side and the list is
/// written to their midpoint.
pub async fn move_list(
    Extension(list): Extension<List>,
    State(state): State<AppState>,
    Json(payload): Json<MoveList>,
) -> Result<ResponseJson<ApiResponse<List>>, ApiError> {
    let moved = List::move_to_position(&state.db().pool, list.id, payload.position).await?;
    Ok(ResponseJson(ApiResponse::success(moved)))
}

/// DELETE /api/lists/{list_id} - Delete a list and its cards
pub async fn delete_list(
    Extension(list): Extension<List>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows_affected = List::delete(&state.db().pool, list.id).await?;
    if rows_affected == 0 {
        Err(ApiError::NotFound("list"))
    } else {
        Ok(ResponseJson(ApiResponse::success(())))
    }
}

/// GET /api/lists/{list_id}/cards - Cards on a list, in display order
pub async fn get_list_cards(
    Extension(list): Extension<List>,
    State(state): State<AppState>,
    Query(query): Query<ListCardsQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Card>>>, ApiError> {
    let cards = Card::find_by_list_id(&state.db().pool, list.id, query.archived).await?;
    Ok(ResponseJson(ApiResponse::success(cards)))
}

/// POST /api/lists/{list_id}/cards - Create a card on a list
pub async fn create_card(
    Extension(list): Extension<List>,
    State(state): State<AppState>,
    Json(payload): Json<CreateCard>,
) -> Result<ResponseJson<ApiResponse<Card>>, ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::Validation("card title is required".to_string()));
    }
    let card = Card::create(&state.db().pool, list.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(card)))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let list_router = Router::new()
        .route("/", get(get_list).put(update_list).delete(delete_list))
        .route("/move", patch(move_list))
        .route("/cards", get(get_list_cards).post(create_card))
        .layer(from_fn_with_state(state.clone(), load_list_middleware));

    let inner = Router::new().nest("/{list_id}", list_router);

    Router::new().nest("/lists", inner)
}
