use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use crate::{
    db::DbPool,
    error::AppError,
    services::persistence::{Slot, SlotStore},
};

/// Slots stored as rows of the `kv_store` table.
#[derive(Clone)]
pub struct SqliteSlots {
    db: DbPool,
}

impl SqliteSlots {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SlotStore for SqliteSlots {
    async fn read_slot(&self, slot: Slot) -> Result<Option<String>, AppError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(slot.key())
            .fetch_optional(&self.db)
            .await?;
        Ok(row.map(|row| row.get::<String, _>("value")))
    }

    async fn write_slot(&self, slot: Slot, payload: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?)
               ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
        )
        .bind(slot.key())
        .bind(payload)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.db)
        .await?;
        Ok(())
    }
}
