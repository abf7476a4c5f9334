use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

use crate::position;

const LIST_SELECT: &str = "id, board_id, name, color, position, created_at, updated_at";

/// A column on a board. Siblings are ordered ascending by `position`,
/// ties broken by id.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct List {
    pub id: Uuid,
    pub board_id: Uuid,
    pub name: String,
    /// Hex color code (e.g., "#6b7280")
    pub color: String,
    pub position: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, TS)]
pub struct CreateList {
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
    /// Explicit position. Omitted: appended after the current tail.
    pub position: Option<f64>,
}

fn default_color() -> String {
    "#6b7280".to_string()
}

#[derive(Debug, Deserialize, TS)]
pub struct UpdateList {
    pub name: Option<String>,
    pub color: Option<String>,
    pub position: Option<f64>,
}

/// Move request. The position is advisory: real neighbors are re-derived
/// from stored positions before the midpoint is taken.
#[derive(Debug, Deserialize, TS)]
pub struct MoveList {
    pub position: f64,
}

impl List {
    pub async fn create(
        pool: &SqlitePool,
        board_id: Uuid,
        data: &CreateList,
    ) -> Result<Self, sqlx::Error> {
        let position = match data.position {
            Some(position) => position,
            None => Self::append_position(pool, board_id).await?,
        };

        let id = Uuid::new_v4();
        sqlx::query_as::<_, Self>(&format!(
            "INSERT INTO lists (id, board_id, name, color, position)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {LIST_SELECT}"
        ))
        .bind(id)
        .bind(board_id)
        .bind(&data.name)
        .bind(&data.color)
        .bind(position)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!("SELECT {LIST_SELECT} FROM lists WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All lists on a board in display order.
    pub async fn find_by_board_id(
        pool: &SqlitePool,
        board_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT {LIST_SELECT} FROM lists WHERE board_id = $1 ORDER BY position, id"
        ))
        .bind(board_id)
        .fetch_all(pool)
        .await
    }

    /// Look up a list on a board by its exact name. Used by quick card
    /// creation.
    pub async fn find_by_board_and_name(
        pool: &SqlitePool,
        board_id: Uuid,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT {LIST_SELECT} FROM lists WHERE board_id = $1 AND name = $2"
        ))
        .bind(board_id)
        .bind(name)
        .fetch_optional(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateList,
    ) -> Result<Self, sqlx::Error> {
        let existing = Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        let name = data.name.as_ref().unwrap_or(&existing.name);
        let color = data.color.as_ref().unwrap_or(&existing.color);
        let position = data.position.unwrap_or(existing.position);

        sqlx::query_as::<_, Self>(&format!(
            "UPDATE lists
             SET name = $2, color = $3, position = $4, updated_at = datetime('now', 'subsec')
             WHERE id = $1
             RETURNING {LIST_SELECT}"
        ))
        .bind(id)
        .bind(name)
        .bind(color)
        .bind(position)
        .fetch_one(pool)
        .await
    }

    /// Move a list near `target` within its board.
    ///
    /// The target position comes from the caller's possibly stale view of
    /// the board, so it is treated as a hint only: the true previous/next
    /// neighbors are re-resolved from stored positions inside the same
    /// transaction that writes the new position. When the gap between the
    /// neighbors has been split too many times to divide further, the whole
    /// board is respaced first; the target is stale in the respaced
    /// coordinates, so the neighbors are re-read by id to keep the move
    /// between the same two lists.
    pub async fn move_to_position(
        pool: &SqlitePool,
        id: Uuid,
        target: f64,
    ) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let list = sqlx::query_as::<_, Self>(&format!(
            "SELECT {LIST_SELECT} FROM lists WHERE id = $1"
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        let (mut prev, mut next) =
            Self::adjacent_siblings(&mut tx, list.board_id, id, target).await?;

        let exhausted = match (&prev, &next) {
            (prev, Some((_, next_pos))) => {
                position::gap_exhausted(prev.as_ref().map_or(0.0, |(_, p)| *p), *next_pos)
            }
            _ => false,
        };

        if exhausted {
            Self::respace_board(&mut tx, list.board_id).await?;
            if let Some((prev_id, pos)) = &mut prev {
                *pos = Self::stored_position(&mut tx, *prev_id).await?;
            }
            if let Some((next_id, pos)) = &mut next {
                *pos = Self::stored_position(&mut tx, *next_id).await?;
            }
        }

        let new_position = position::resolve(prev.map(|(_, p)| p), next.map(|(_, p)| p));

        let moved = sqlx::query_as::<_, Self>(&format!(
            "UPDATE lists
             SET position = $2, updated_at = datetime('now', 'subsec')
             WHERE id = $1
             RETURNING {LIST_SELECT}"
        ))
        .bind(id)
        .bind(new_position)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(moved)
    }

    /// Nearest siblings strictly below and above `target` among a board's
    /// lists, excluding the list being moved. Returned as `(id, position)`
    /// pairs so the neighbor pair can be tracked across a respace; missing
    /// neighbors are handled by [`position::resolve`].
    async fn adjacent_siblings(
        conn: &mut SqliteConnection,
        board_id: Uuid,
        exclude_id: Uuid,
        target: f64,
    ) -> Result<(Option<(Uuid, f64)>, Option<(Uuid, f64)>), sqlx::Error> {
        let prev: Option<(Uuid, f64)> = sqlx::query_as(
            "SELECT id, position FROM lists
             WHERE board_id = $1 AND id != $2 AND position < $3
             ORDER BY position DESC, id DESC LIMIT 1",
        )
        .bind(board_id)
        .bind(exclude_id)
        .bind(target)
        .fetch_optional(&mut *conn)
        .await?;

        let next: Option<(Uuid, f64)> = sqlx::query_as(
            "SELECT id, position FROM lists
             WHERE board_id = $1 AND id != $2 AND position > $3
             ORDER BY position ASC, id ASC LIMIT 1",
        )
        .bind(board_id)
        .bind(exclude_id)
        .bind(target)
        .fetch_optional(&mut *conn)
        .await?;

        Ok((prev, next))
    }

    async fn stored_position(
        conn: &mut SqliteConnection,
        id: Uuid,
    ) -> Result<f64, sqlx::Error> {
        sqlx::query_scalar("SELECT position FROM lists WHERE id = $1")
            .bind(id)
            .fetch_one(&mut *conn)
            .await
    }

    /// Reassign evenly spaced integer positions (`1.0, 2.0, ...`) to every
    /// list on the board, preserving the current display order. Runs inside
    /// the caller's transaction so no intermediate state is observable.
    async fn respace_board(
        conn: &mut SqliteConnection,
        board_id: Uuid,
    ) -> Result<(), sqlx::Error> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT id FROM lists WHERE board_id = $1 ORDER BY position, id",
        )
        .bind(board_id)
        .fetch_all(&mut *conn)
        .await?;

        for (index, list_id) in ids.iter().enumerate() {
            sqlx::query(
                "UPDATE lists SET position = $2, updated_at = datetime('now', 'subsec')
                 WHERE id = $1",
            )
            .bind(list_id)
            .bind((index + 1) as f64)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    /// Position for an append: one step past the current tail.
    async fn append_position(pool: &SqlitePool, board_id: Uuid) -> Result<f64, sqlx::Error> {
        let max: Option<f64> =
            sqlx::query_scalar("SELECT MAX(position) FROM lists WHERE board_id = $1")
                .bind(board_id)
                .fetch_one(pool)
                .await?;
        Ok(max.unwrap_or(0.0) + position::POSITION_STEP)
    }

    /// Delete a list. Its cards (and their comments and label associations)
    /// are removed by the schema's cascade rules.
    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM lists WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
