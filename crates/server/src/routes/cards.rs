use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{get, patch, post},
};
use db::models::{
    board::Board,
    card::{Card, CardDetails, CreateCard, MoveCard, SearchCards, UpdateCard},
    comment::{Comment, CreateComment},
    label::Label,
    list::List,
};
use serde::Deserialize;
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::load_card_middleware};

#[derive(Deserialize)]
pub struct CardLabelPath {
    label_id: Uuid,
}

/// GET /api/cards + /api/search - Search cards with AND-composed filters
pub async fn search_cards(
    State(state): State<AppState>,
    Query(filters): Query<SearchCards>,
) -> Result<ResponseJson<ApiResponse<Vec<Card>>>, ApiError> {
    let cards = Card::search(&state.db().pool, &filters).await?;
    Ok(ResponseJson(ApiResponse::success(cards)))
}

/// GET /api/cards/{card_id} - Get a card with comments and labels attached
pub async fn get_card(
    Extension(card): Extension<Card>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<CardDetails>>, ApiError> {
    let details = Card::find_details(&state.db().pool, card.id)
        .await?
        .ok_or(ApiError::NotFound("card"))?;
    Ok(ResponseJson(ApiResponse::success(details)))
}

/// PUT /api/cards/{card_id} - Update a card's own fields
pub async fn update_card(
    Extension(card): Extension<Card>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateCard>,
) -> Result<ResponseJson<ApiResponse<Card>>, ApiError> {
    if payload.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(ApiError::Validation("card title is required".to_string()));
    }
    let updated = Card::update(&state.db().pool, card.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(updated)))
}

/// PATCH /api/cards/{card_id}/move - Move a card, possibly across lists
///
/// The target list is validated first so a move against a missing container
/// fails before anything is written; the caller-computed position is then
/// persisted verbatim together with the new list reference.
pub async fn move_card(
    Extension(card): Extension<Card>,
    State(state): State<AppState>,
    Json(payload): Json<MoveCard>,
) -> Result<ResponseJson<ApiResponse<Card>>, ApiError> {
    let pool = &state.db().pool;
    List::find_by_id(pool, payload.list_id)
        .await?
        .ok_or(ApiError::InvalidReference("target list"))?;

    let moved = Card::move_to_list(pool, card.id, payload.list_id, payload.position).await?;
    Ok(ResponseJson(ApiResponse::success(moved)))
}

/// POST /api/cards/{card_id}/archive - Archive a card in place
pub async fn archive_card(
    Extension(card): Extension<Card>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Card>>, ApiError> {
    let archived = Card::set_archived(&state.db().pool, card.id, true).await?;
    Ok(ResponseJson(ApiResponse::success(archived)))
}

/// POST /api/cards/{card_id}/unarchive - Restore a card to its slot
pub async fn unarchive_card(
    Extension(card): Extension<Card>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Card>>, ApiError> {
    let restored = Card::set_archived(&state.db().pool, card.id, false).await?;
    Ok(ResponseJson(ApiResponse::success(restored)))
}

/// DELETE /api/cards/{card_id} - Delete a card and its comments
pub async fn delete_card(
    Extension(card): Extension<Card>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows_affected = Card::delete(&state.db().pool, card.id).await?;
    if rows_affected == 0 {
        Err(ApiError::NotFound("card"))
    } else {
        Ok(ResponseJson(ApiResponse::success(())))
    }
}

/// GET /api/cards/{card_id}/comments - Comments, newest first
pub async fn get_comments(
    Extension(card): Extension<Card>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Comment>>>, ApiError> {
    let comments = Comment::find_by_card_id(&state.db().pool, card.id).await?;
    Ok(ResponseJson(ApiResponse::success(comments)))
}

/// POST /api/cards/{card_id}/comments - Add a comment
pub async fn add_comment(
    Extension(card): Extension<Card>,
    State(state): State<AppState>,
    Json(payload): Json<CreateComment>,
) -> Result<ResponseJson<ApiResponse<Comment>>, ApiError> {
    if payload.content.trim().is_empty() {
        return Err(ApiError::Validation(
            "comment content is required".to_string(),
        ));
    }
    let comment = Comment::create(&state.db().pool, card.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(comment)))
}

/// GET /api/cards/{card_id}/labels - Labels attached to a card
pub async fn get_card_labels(
    Extension(card): Extension<Card>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Label>>>, ApiError> {
    let labels = Label::find_by_card_id(&state.db().pool, card.id).await?;
    Ok(ResponseJson(ApiResponse::success(labels)))
}

/// POST /api/cards/{card_id}/labels/{label_id} - Attach a label (idempotent)
pub async fn assign_label(
    Extension(card): Extension<Card>,
    State(state): State<AppState>,
    Path(CardLabelPath { label_id }): Path<CardLabelPath>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &state.db().pool;
    Label::find_by_id(pool, label_id)
        .await?
        .ok_or(ApiError::NotFound("label"))?;

    Label::assign_to_card(pool, card.id, label_id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

/// DELETE /api/cards/{card_id}/labels/{label_id} - Detach a label
pub async fn remove_label(
    Extension(card): Extension<Card>,
    State(state): State<AppState>,
    Path(CardLabelPath { label_id }): Path<CardLabelPath>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows_affected = Label::remove_from_card(&state.db().pool, card.id, label_id).await?;
    if rows_affected == 0 {
        Err(ApiError::NotFound("label assignment"))
    } else {
        Ok(ResponseJson(ApiResponse::success(())))
    }
}

/// Create a card by board/list name instead of ids, for bots and quick
/// capture. Falls back to the first board and first list when the named
/// ones are missing.
#[derive(Debug, Deserialize, TS)]
pub struct QuickCreateCard {
    pub board_name: Option<String>,
    pub list_name: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: String,
}

/// POST /api/cards/quick - Quick card creation
pub async fn quick_create_card(
    State(state): State<AppState>,
    Json(payload): Json<QuickCreateCard>,
) -> Result<ResponseJson<ApiResponse<Card>>, ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::Validation("card title is required".to_string()));
    }

    let pool = &state.db().pool;
    let board_name = payload.board_name.as_deref().unwrap_or("Main Board");
    let list_name = payload.list_name.as_deref().unwrap_or("Backlog");

    let board = match Board::find_by_name(pool, board_name).await? {
        Some(board) => board,
        None => Board::find_all(pool)
            .await?
            .into_iter()
            .next()
            .ok_or(ApiError::NotFound("board"))?,
    };

    let list = match List::find_by_board_and_name(pool, board.id, list_name).await? {
        Some(list) => list,
        None => List::find_by_board_id(pool, board.id)
            .await?
            .into_iter()
            .next()
            .ok_or(ApiError::NotFound("list"))?,
    };

    let card = Card::create(
        pool,
        list.id,
        &CreateCard {
            title: payload.title,
            description: payload.description,
            color: payload.color,
            due_date: None,
            position: None,
        },
    )
    .await?;

    Ok(ResponseJson(ApiResponse::success(card)))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let card_router = Router::new()
        .route("/", get(get_card).put(update_card).delete(delete_card))
        .route("/move", patch(move_card))
        .route("/archive", post(archive_card))
        .route("/unarchive", post(unarchive_card))
        .route("/comments", get(get_comments).post(add_comment))
        .route("/labels", get(get_card_labels))
        .route("/labels/{label_id}", post(assign_label).delete(remove_label))
        .layer(from_fn_with_state(state.clone(), load_card_middleware));

    let inner = Router::new()
        .route("/", get(search_cards))
        .route("/quick", post(quick_create_card))
        .nest("/{card_id}", card_router);

    Router::new().nest("/cards", inner)
}
