use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// A kanban board, root of the containment hierarchy.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Board {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, TS)]
pub struct CreateBoard {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize, TS)]
pub struct UpdateBoard {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Board {
    pub async fn create(pool: &SqlitePool, data: &CreateBoard) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO boards (id, name, description)
               VALUES ($1, $2, $3)
               RETURNING id, name, description, created_at, updated_at"#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, name, description, created_at, updated_at FROM boards WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// All boards, most recently created first.
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, name, description, created_at, updated_at
             FROM boards
             ORDER BY created_at DESC",
        )
        .fetch_all(pool)
        .await
    }

    /// Look up a board by its exact name. Used by quick card creation.
    pub async fn find_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, name, description, created_at, updated_at FROM boards WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateBoard,
    ) -> Result<Self, sqlx::Error> {
        let existing = Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        let name = data.name.as_ref().unwrap_or(&existing.name);
        let description = data.description.as_ref().unwrap_or(&existing.description);

        sqlx::query_as::<_, Self>(
            r#"UPDATE boards
               SET name = $2, description = $3, updated_at = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING id, name, description, created_at, updated_at"#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_one(pool)
        .await
    }

    /// Delete a board. Lists, cards, comments and label associations beneath
    /// it are removed by the schema's cascade rules.
    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM boards WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
