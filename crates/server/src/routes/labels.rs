use axum::{
    Extension, Json, Router,
    extract::State,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::label::{CreateLabel, Label, UpdateLabel};
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError, middleware::load_label_middleware};

/// GET /api/labels - List all labels, ordered by name
pub async fn get_labels(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Label>>>, ApiError> {
    let labels = Label::find_all(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(labels)))
}

/// POST /api/labels - Create a new label
pub async fn create_label(
    State(state): State<AppState>,
    Json(payload): Json<CreateLabel>,
) -> Result<ResponseJson<ApiResponse<Label>>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation("label name is required".to_string()));
    }
    if payload.color.trim().is_empty() {
        return Err(ApiError::Validation("label color is required".to_string()));
    }
    let label = Label::create(&state.db().pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(label)))
}

/// GET /api/labels/{label_id} - Get a label by ID
pub async fn get_label(
    Extension(label): Extension<Label>,
) -> Result<ResponseJson<ApiResponse<Label>>, ApiError> {
    Ok(ResponseJson(ApiResponse::success(label)))
}

/// PUT /api/labels/{label_id} - Update a label
pub async fn update_label(
    Extension(label): Extension<Label>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateLabel>,
) -> Result<ResponseJson<ApiResponse<Label>>, ApiError> {
    if payload.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(ApiError::Validation("label name is required".to_string()));
    }
    let updated = Label::update(&state.db().pool, label.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(updated)))
}

/// DELETE /api/labels/{label_id} - Delete a label, detaching it everywhere
pub async fn delete_label(
    Extension(label): Extension<Label>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows_affected = Label::delete(&state.db().pool, label.id).await?;
    if rows_affected == 0 {
        Err(ApiError::NotFound("label"))
    } else {
        Ok(ResponseJson(ApiResponse::success(())))
    }
}

pub fn router(state: &AppState) -> Router<AppState> {
    let label_router = Router::new()
        .route("/", get(get_label).put(update_label).delete(delete_label))
        .layer(from_fn_with_state(state.clone(), load_label_middleware));

    let inner = Router::new()
        .route("/", get(get_labels).post(create_label))
        .nest("/{label_id}", label_router);

    Router::new().nest("/labels", inner)
}
