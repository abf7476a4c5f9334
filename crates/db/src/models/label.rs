use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// A label for visual card categorization. Labels have an independent
/// lifecycle: deleting one removes its card associations, never the cards.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Label {
    pub id: Uuid,
    /// Unique across all labels.
    pub name: String,
    /// Hex color code (e.g., "#3b82f6")
    pub color: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, TS)]
pub struct CreateLabel {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Deserialize, TS)]
pub struct UpdateLabel {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// Junction table entry for card-label relationships.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct CardLabel {
    pub card_id: Uuid,
    pub label_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Label {
    pub async fn create(pool: &SqlitePool, data: &CreateLabel) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO labels (id, name, color)
               VALUES ($1, $2, $3)
               RETURNING id, name, color, created_at"#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.color)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT id, name, color, created_at FROM labels WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, name, color, created_at FROM labels ORDER BY name ASC",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateLabel,
    ) -> Result<Self, sqlx::Error> {
        let existing = Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        let name = data.name.as_ref().unwrap_or(&existing.name);
        let color = data.color.as_ref().unwrap_or(&existing.color);

        sqlx::query_as::<_, Self>(
            r#"UPDATE labels
               SET name = $2, color = $3
               WHERE id = $1
               RETURNING id, name, color, created_at"#,
        )
        .bind(id)
        .bind(name)
        .bind(color)
        .fetch_one(pool)
        .await
    }

    /// Delete a label. Card associations go with it via cascade; cards
    /// themselves are untouched.
    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM labels WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Attach a label to a card. Idempotent: assigning an already-assigned
    /// pair leaves the single existing association row in place.
    pub async fn assign_to_card(
        pool: &SqlitePool,
        card_id: Uuid,
        label_id: Uuid,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT OR IGNORE INTO card_labels (card_id, label_id) VALUES ($1, $2)")
            .bind(card_id)
            .bind(label_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Detach a label from a card. Returns the number of rows removed
    /// (zero when the pair was not assigned).
    pub async fn remove_from_card(
        pool: &SqlitePool,
        card_id: Uuid,
        label_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM card_labels WHERE card_id = $1 AND label_id = $2")
                .bind(card_id)
                .bind(label_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }

    /// Labels attached to a card, ordered by name.
    pub async fn find_by_card_id(
        pool: &SqlitePool,
        card_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT l.id, l.name, l.color, l.created_at
             FROM labels l
             JOIN card_labels cl ON cl.label_id = l.id
             WHERE cl.card_id = $1
             ORDER BY l.name ASC",
        )
        .bind(card_id)
        .fetch_all(pool)
        .await
    }
}
