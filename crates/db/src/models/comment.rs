use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// A comment on a card. Immutable once created; removed only when its card
/// is deleted.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Comment {
    pub id: Uuid,
    pub card_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, TS)]
pub struct CreateComment {
    pub content: String,
}

impl Comment {
    pub async fn create(
        pool: &SqlitePool,
        card_id: Uuid,
        data: &CreateComment,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO comments (id, card_id, content)
               VALUES ($1, $2, $3)
               RETURNING id, card_id, content, created_at"#,
        )
        .bind(id)
        .bind(card_id)
        .bind(&data.content)
        .fetch_one(pool)
        .await
    }

    /// Comments for a card, newest first.
    pub async fn find_by_card_id(
        pool: &SqlitePool,
        card_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, card_id, content, created_at
             FROM comments
             WHERE card_id = $1
             ORDER BY created_at DESC, id DESC",
        )
        .bind(card_id)
        .fetch_all(pool)
        .await
    }
}
