//! PostgreSQL implementation of CatalogRepository.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, trace};

use midibox_core::{CatalogRepository, CreateMidiFileRequest, Error, MidiFile, Result};

#[derive(Clone)]
pub struct PgCatalogRepository {
    pool: Pool<Postgres>,
}

impl PgCatalogRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn map_row(row: PgRow) -> MidiFile {
        MidiFile {
            id: row.get("id"),
            filename: row.get("filename"),
            genre: row.get("genre"),
        }
    }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn create(&self, req: CreateMidiFileRequest) -> Result<i32> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO midi_file (filename, genre)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(&req.filename)
        .bind(&req.genre)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "catalog",
            op = "create",
            file_id = id,
            filename = %req.filename,
            "Inserted midi_file row"
        );
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<MidiFile>> {
        let rows = sqlx::query(
            r#"
            SELECT id, filename, genre
            FROM midi_file
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        trace!(result_count = rows.len(), "catalog: list_all");
        Ok(rows.into_iter().map(Self::map_row).collect())
    }

    async fn list_by_genre(&self, genre: &str) -> Result<Vec<MidiFile>> {
        let rows = sqlx::query(
            r#"
            SELECT id, filename, genre
            FROM midi_file
            WHERE genre = $1
            ORDER BY id
            "#,
        )
        .bind(genre)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        trace!(genre, result_count = rows.len(), "catalog: list_by_genre");
        Ok(rows.into_iter().map(Self::map_row).collect())
    }

    async fn distinct_genres(&self) -> Result<Vec<String>> {
        let genres: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT genre
            FROM midi_file
            WHERE genre IS NOT NULL
            GROUP BY genre
            ORDER BY genre COLLATE "C"
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(genres)
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<MidiFile>> {
        let row = sqlx::query(
            r#"
            SELECT id, filename, genre
            FROM midi_file
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(Self::map_row))
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM midi_file")
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(count)
    }
}
