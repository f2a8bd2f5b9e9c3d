use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite};
use uuid::Uuid;

use crate::domain::models::cargo_movement::{
    CargoMovementCount, CargoMovementDocument, NewCargoMovement,
};
use crate::storage::{traits::CargoMovementStorage, DbConnection};

/// Ids bound per counts query, below SQLite's bound-parameter limit
const COUNT_CHUNK_SIZE: usize = 10_000;

/// Repository for cargo movement operations
#[derive(Clone)]
pub struct CargoMovementRepository {
    db: DbConnection,
}

impl CargoMovementRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Fixed-width UTC text, so text order is time order
    fn format_date(date: &DateTime<Utc>) -> String {
        date.to_rfc3339_opts(SecondsFormat::Nanos, true)
    }

    fn row_to_document(row: &SqliteRow) -> Result<CargoMovementDocument> {
        let movement_date = row
            .try_get::<Option<String>, _>("movement_date")?
            .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
            .map(|date| date.with_timezone(&Utc));

        Ok(CargoMovementDocument {
            id: row.try_get("id")?,
            cargo_id: row.try_get("cargo_id")?,
            movement_date,
            from_location: row.try_get("from_location")?,
            to_location: row.try_get("to_location")?,
        })
    }

    /// Grouped counts for at most one chunk of distinct ids
    async fn count_chunk(&self, cargo_ids: &[&str]) -> Result<Vec<CargoMovementCount>> {
        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT cargo_id, COUNT(*) AS count FROM cargo_movements WHERE cargo_id IN (",
        );
        let mut ids = query.separated(", ");
        for cargo_id in cargo_ids {
            ids.push_bind(*cargo_id);
        }
        ids.push_unseparated(") GROUP BY cargo_id");

        let rows = query.build().fetch_all(self.db.pool()).await?;

        rows.iter()
            .map(|row| -> Result<CargoMovementCount> {
                Ok(CargoMovementCount {
                    cargo_id: row.try_get("cargo_id")?,
                    count: u64::try_from(row.try_get::<i64, _>("count")?)?,
                })
            })
            .collect()
    }
}

#[async_trait]
impl CargoMovementStorage for CargoMovementRepository {
    async fn store_cargo_movement(&self, movement: &NewCargoMovement) -> Result<CargoMovementDocument> {
        let row = sqlx::query(
            r#"
            INSERT INTO cargo_movements (id, cargo_id, movement_date, from_location, to_location)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, cargo_id, movement_date, from_location, to_location
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&movement.cargo_id)
        .bind(Self::format_date(&movement.movement_date))
        .bind(&movement.from_location)
        .bind(&movement.to_location)
        .fetch_one(self.db.pool())
        .await?;

        Self::row_to_document(&row)
    }

    async fn cargo_movement_exists(&self, cargo_id: &str) -> Result<bool> {
        let exists = sqlx::query(
            r#"
            SELECT 1 FROM cargo_movements WHERE cargo_id = ? LIMIT 1
            "#,
        )
        .bind(cargo_id)
        .fetch_optional(self.db.pool())
        .await?
        .is_some();

        Ok(exists)
    }

    async fn list_cargo_movements(
        &self,
        cargo_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<CargoMovementDocument>> {
        // ROWID breaks ties between equal dates so repeated reads agree
        let rows = sqlx::query(
            r#"
            SELECT id, cargo_id, movement_date, from_location, to_location
            FROM cargo_movements
            WHERE cargo_id = ?
            ORDER BY movement_date DESC, ROWID DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(cargo_id)
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_document).collect()
    }

    async fn count_by_cargo_ids(&self, cargo_ids: &[String]) -> Result<Vec<CargoMovementCount>> {
        let mut unique_ids: Vec<&str> = cargo_ids.iter().map(String::as_str).collect();
        unique_ids.sort_unstable();
        unique_ids.dedup();

        let mut counts = Vec::new();
        for chunk in unique_ids.chunks(COUNT_CHUNK_SIZE) {
            counts.extend(self.count_chunk(chunk).await?);
        }

        Ok(counts)
    }
}
