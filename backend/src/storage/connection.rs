use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Sqlite, SqlitePool};
use std::sync::Arc;

use crate::storage::{traits::Connection, CargoMovementRepository};

/// DbConnection manages the SQLite pool and schema
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        let pool = SqlitePool::connect(url).await?;
        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize a private in-memory database.
    ///
    /// The pool holds a single connection that is never recycled, since an
    /// in-memory SQLite database lives only as long as its connection.
    pub async fn init_in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cargo_movements (
                id TEXT PRIMARY KEY,
                cargo_id TEXT NOT NULL,
                movement_date TEXT NOT NULL,
                from_location TEXT NOT NULL,
                to_location TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Per-cargo listing, newest first
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_cargo_movements_cargo_id_date
            ON cargo_movements(cargo_id, movement_date DESC);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

impl Connection for DbConnection {
    type CargoMovementRepository = CargoMovementRepository;

    fn create_cargo_movement_repository(&self) -> Self::CargoMovementRepository {
        CargoMovementRepository::new(self.clone())
    }
}
