use axum::{
    Extension, Json, Router,
    extract::State,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::{
    board::{Board, CreateBoard, UpdateBoard},
    list::{CreateList, List},
};
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError, middleware::load_board_middleware};

/// GET /api/boards - List all boards, newest first
pub async fn get_boards(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Board>>>, ApiError> {
    let boards = Board::find_all(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(boards)))
}

/// POST /api/boards - Create a new board
pub async fn create_board(
    State(state): State<AppState>,
    Json(payload): Json<CreateBoard>,
) -> Result<ResponseJson<ApiResponse<Board>>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation("board name is required".to_string()));
    }
    let board = Board::create(&state.db().pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(board)))
}

/// GET /api/boards/{board_id} - Get a board by ID
pub async fn get_board(
    Extension(board): Extension<Board>,
) -> Result<ResponseJson<ApiResponse<Board>>, ApiError> {
    Ok(ResponseJson(ApiResponse::success(board)))
}

/// PUT /api/boards/{board_id} - Update a board
pub async fn update_board(
    Extension(board): Extension<Board>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateBoard>,
) -> Result<ResponseJson<ApiResponse<Board>>, ApiError> {
    if payload.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(ApiError::Validation("board name is required".to_string()));
    }
    let updated = Board::update(&state.db().pool, board.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(updated)))
}

/// DELETE /api/boards/{board_id} - Delete a board and everything on it
pub async fn delete_board(
    Extension(board): Extension<Board>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows_affected = Board::delete(&state.db().pool, board.id).await?;
    if rows_affected == 0 {
        Err(ApiError::NotFound("board"))
    } else {
        Ok(ResponseJson(ApiResponse::success(())))
    }
}

/// GET /api/boards/{board_id}/lists - Lists on a board, in display order
pub async fn get_board_lists(
    Extension(board): Extension<Board>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<List>>>, ApiError> {
    let lists = List::find_by_board_id(&state.db().pool, board.id).await?;
    Ok(ResponseJson(ApiResponse::success(lists)))
}

/// POST /api/boards/{board_id}/lists - Create a list on a board
pub async fn create_list(
    Extension(board): Extension<Board>,
    State(state): State<AppState>,
    Json(payload): Json<CreateList>,
) -> Result<ResponseJson<ApiResponse<List>>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation("list name is required".to_string()));
    }
    let list = List::create(&state.db().pool, board.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(list)))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let board_router = Router::new()
        .route("/", get(get_board).put(update_board).delete(delete_board))
        .route("/lists", get(get_board_lists).post(create_list))
        .layer(from_fn_with_state(state.clone(), load_board_middleware));

    let inner = Router::new()
        .route("/", get(get_boards).post(create_board))
        .nest("/{board_id}", board_router);

    Router::new().nest("/boards", inner)
}
