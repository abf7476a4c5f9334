use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

use super::{comment::Comment, label::Label};
use crate::position;

const CARD_SELECT: &str =
    "id, list_id, title, description, color, due_date, position, archived, created_at, updated_at";

/// A task on a list. Siblings are ordered ascending by `position`, ties
/// broken by id. `archived` is orthogonal to `position`: an archived card
/// keeps its slot so unarchiving restores it in place.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Card {
    pub id: Uuid,
    pub list_id: Uuid,
    pub title: String,
    pub description: String,
    pub color: String,
    #[ts(optional)]
    pub due_date: Option<DateTime<Utc>>,
    pub position: f64,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A card with its comments and labels attached, returned by detail lookups.
#[derive(Debug, Clone, Serialize, TS)]
pub struct CardDetails {
    #[serde(flatten)]
    #[ts(flatten)]
    pub card: Card,
    pub comments: Vec<Comment>,
    pub labels: Vec<Label>,
}

#[derive(Debug, Deserialize, TS)]
pub struct CreateCard {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: String,
    #[ts(optional)]
    pub due_date: Option<DateTime<Utc>>,
    /// Explicit position. Omitted: appended after the current tail.
    pub position: Option<f64>,
}

#[derive(Debug, Deserialize, TS)]
pub struct UpdateCard {
    pub title: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    #[ts(optional)]
    pub due_date: Option<DateTime<Utc>>,
}

/// Move request. Unlike list moves, the caller-computed position is
/// persisted verbatim together with the target list in one update. The drag
/// UI has already taken the midpoint from its local view of the siblings;
/// re-deriving neighbors server-side is deliberately skipped here.
#[derive(Debug, Deserialize, TS)]
pub struct MoveCard {
    pub list_id: Uuid,
    pub position: f64,
}

/// Compound card filters, AND-composed. Empty filters match everything.
#[derive(Debug, Default, Deserialize, TS)]
pub struct SearchCards {
    pub query: Option<String>,
    pub board_id: Option<Uuid>,
    pub list_id: Option<Uuid>,
    pub archived: Option<bool>,
    pub label_id: Option<Uuid>,
}

impl Card {
    pub async fn create(
        pool: &SqlitePool,
        list_id: Uuid,
        data: &CreateCard,
    ) -> Result<Self, sqlx::Error> {
        let position = match data.position {
            Some(position) => position,
            None => Self::append_position(pool, list_id).await?,
        };

        let id = Uuid::new_v4();
        sqlx::query_as::<_, Self>(&format!(
            "INSERT INTO cards (id, list_id, title, description, color, due_date, position)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {CARD_SELECT}"
        ))
        .bind(id)
        .bind(list_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.color)
        .bind(data.due_date)
        .bind(position)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!("SELECT {CARD_SELECT} FROM cards WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The card plus its comments (newest first) and labels.
    pub async fn find_details(
        pool: &SqlitePool,
        id: Uuid,
    ) -> Result<Option<CardDetails>, sqlx::Error> {
        let Some(card) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let comments = Comment::find_by_card_id(pool, id).await?;
        let labels = Label::find_by_card_id(pool, id).await?;
        Ok(Some(CardDetails {
            card,
            comments,
            labels,
        }))
    }

    /// Cards on a list in display order. Archived cards are hidden unless
    /// requested.
    pub async fn find_by_list_id(
        pool: &SqlitePool,
        list_id: Uuid,
        include_archived: bool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT {CARD_SELECT} FROM cards
             WHERE list_id = $1 AND (archived = 0 OR $2)
             ORDER BY position, id"
        ))
        .bind(list_id)
        .bind(include_archived)
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateCard,
    ) -> Result<Self, sqlx::Error> {
        let existing = Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        let title = data.title.as_ref().unwrap_or(&existing.title);
        let description = data.description.as_ref().unwrap_or(&existing.description);
        let color = data.color.as_ref().unwrap_or(&existing.color);
        let due_date = data.due_date.or(existing.due_date);

        sqlx::query_as::<_, Self>(&format!(
            "UPDATE cards
             SET title = $2, description = $3, color = $4, due_date = $5,
                 updated_at = datetime('now', 'subsec')
             WHERE id = $1
             RETURNING {CARD_SELECT}"
        ))
        .bind(id)
        .bind(title)
        .bind(description)
        .bind(color)
        .bind(due_date)
        .fetch_one(pool)
        .await
    }

    /// Reparent a card and set its position in one update. The caller is
    /// responsible for validating the target list first; the single
    /// statement keeps the list reference and position change atomic.
    pub async fn move_to_list(
        pool: &SqlitePool,
        id: Uuid,
        list_id: Uuid,
        new_position: f64,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "UPDATE cards
             SET list_id = $2, position = $3, updated_at = datetime('now', 'subsec')
             WHERE id = $1
             RETURNING {CARD_SELECT}"
        ))
        .bind(id)
        .bind(list_id)
        .bind(new_position)
        .fetch_one(pool)
        .await
    }

    /// Set or clear the archived flag. Position is untouched.
    pub async fn set_archived(
        pool: &SqlitePool,
        id: Uuid,
        archived: bool,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "UPDATE cards
             SET archived = $2, updated_at = datetime('now', 'subsec')
             WHERE id = $1
             RETURNING {CARD_SELECT}"
        ))
        .bind(id)
        .bind(archived)
        .fetch_one(pool)
        .await
    }

    /// Search cards across boards with AND-composed filters, newest first.
    pub async fn search(
        pool: &SqlitePool,
        filters: &SearchCards,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut builder = QueryBuilder::<Sqlite>::new(
            "SELECT DISTINCT c.id, c.list_id, c.title, c.description, c.color, c.due_date,
                    c.position, c.archived, c.created_at, c.updated_at
             FROM cards c
             JOIN lists l ON l.id = c.list_id
             JOIN boards b ON b.id = l.board_id
             LEFT JOIN card_labels cl ON cl.card_id = c.id
             WHERE 1=1",
        );

        if let Some(query) = filters.query.as_deref().filter(|q| !q.is_empty()) {
            let term = format!("%{query}%");
            builder
                .push(" AND (c.title LIKE ")
                .push_bind(term.clone())
                .push(" OR c.description LIKE ")
                .push_bind(term)
                .push(")");
        }
        if let Some(board_id) = filters.board_id {
            builder.push(" AND b.id = ").push_bind(board_id);
        }
        if let Some(list_id) = filters.list_id {
            builder.push(" AND c.list_id = ").push_bind(list_id);
        }
        if let Some(archived) = filters.archived {
            builder.push(" AND c.archived = ").push_bind(archived);
        }
        if let Some(label_id) = filters.label_id {
            builder.push(" AND cl.label_id = ").push_bind(label_id);
        }

        builder.push(" ORDER BY c.created_at DESC");

        builder.build_query_as::<Self>().fetch_all(pool).await
    }

    /// Position for an append: one step past the current tail.
    async fn append_position(pool: &SqlitePool, list_id: Uuid) -> Result<f64, sqlx::Error> {
        let max: Option<f64> =
            sqlx::query_scalar("SELECT MAX(position) FROM cards WHERE list_id = $1")
                .bind(list_id)
                .fetch_one(pool)
                .await?;
        Ok(max.unwrap_or(0.0) + position::POSITION_STEP)
    }

    /// Delete a card. Comments and label associations are removed by the
    /// schema's cascade rules.
    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cards WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
