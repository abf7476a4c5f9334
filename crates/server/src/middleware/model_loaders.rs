//! Middleware that resolves `{id}` path segments into loaded models.
//!
//! Each loader fetches the entity named in the path and inserts it into the
//! request extensions, so handlers downstream take an `Extension<T>` instead
//! of repeating the lookup-and-404 dance.

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use db::models::{board::Board, card::Card, label::Label, list::List};
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;

#[derive(Deserialize)]
pub struct BoardPath {
    board_id: Uuid,
}

#[derive(Deserialize)]
pub struct ListPath {
    list_id: Uuid,
}

#[derive(Deserialize)]
pub struct CardPath {
    card_id: Uuid,
}

#[derive(Deserialize)]
pub struct LabelPath {
    label_id: Uuid,
}

pub async fn load_board_middleware(
    State(state): State<AppState>,
    Path(BoardPath { board_id }): Path<BoardPath>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let board = match Board::find_by_id(&state.db().pool, board_id).await {
        Ok(Some(board)) => board,
        Ok(None) => {
            tracing::warn!("Board {} not found", board_id);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(e) => {
            tracing::error!("Failed to fetch board {}: {}", board_id, e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    request.extensions_mut().insert(board);
    Ok(next.run(request).await)
}

pub async fn load_list_middleware(
    State(state): State<AppState>,
    Path(ListPath { list_id }): Path<ListPath>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let list = match List::find_by_id(&state.db().pool, list_id).await {
        Ok(Some(list)) => list,
        Ok(None) => {
            tracing::warn!("List {} not found", list_id);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(e) => {
            tracing::error!("Failed to fetch list {}: {}", list_id, e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    request.extensions_mut().insert(list);
    Ok(next.run(request).await)
}

pub async fn load_card_middleware(
    State(state): State<AppState>,
    Path(CardPath { card_id }): Path<CardPath>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let card = match Card::find_by_id(&state.db().pool, card_id).await {
        Ok(Some(card)) => card,
        Ok(None) => {
            tracing::warn!("Card {} not found", card_id);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(e) => {
            tracing::error!("Failed to fetch card {}: {}", card_id, e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    request.extensions_mut().insert(card);
    Ok(next.run(request).await)
}

pub async fn load_label_middleware(
    State(state): State<AppState>,
    Path(LabelPath { label_id }): Path<LabelPath>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let label = match Label::find_by_id(&state.db().pool, label_id).await {
        Ok(Some(label)) => label,
        Ok(None) => {
            tracing::warn!("Label {} not found", label_id);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(e) => {
            tracing::error!("Failed to fetch label {}: {}", label_id, e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    request.extensions_mut().insert(label);
    Ok(next.run(request).await)
}
