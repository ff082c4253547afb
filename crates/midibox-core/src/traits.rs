//! Core traits for midibox abstractions.
//!
//! The catalog is reached only through `CatalogRepository`, so the HTTP layer
//! runs unchanged against Postgres or the in-memory store used in tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CreateMidiFileRequest, GenreFilter, MidiFile};

/// Repository for the file catalog.
///
/// Records are insert-only: there is no update and no delete.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Insert a new record and return its id.
    async fn create(&self, req: CreateMidiFileRequest) -> Result<i32>;

    /// Every record in natural (id ascending) order.
    async fn list_all(&self) -> Result<Vec<MidiFile>>;

    /// Records whose genre equals `genre` exactly.
    async fn list_by_genre(&self, genre: &str) -> Result<Vec<MidiFile>>;

    /// Every non-null genre in use, without duplicates, sorted ascending.
    async fn distinct_genres(&self) -> Result<Vec<String>>;

    /// Resolve an id. Absence is `Ok(None)`, not an error.
    async fn get_by_id(&self, id: i32) -> Result<Option<MidiFile>>;

    /// Number of records.
    async fn count(&self) -> Result<i64>;

    /// List records for a parsed filter.
    async fn list(&self, filter: &GenreFilter) -> Result<Vec<MidiFile>> {
        match filter {
            GenreFilter::All => self.list_all().await,
            GenreFilter::Exact(genre) => self.list_by_genre(genre).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Answers list calls with a marker naming which one was used.
    struct ListSpy;

    #[async_trait]
    impl CatalogRepository for ListSpy {
        async fn create(&self, _req: CreateMidiFileRequest) -> Result<i32> {
            Ok(1)
        }

        async fn list_all(&self) -> Result<Vec<MidiFile>> {
            Ok(vec![MidiFile {
                id: 0,
                filename: "all".to_string(),
                genre: None,
            }])
        }

        async fn list_by_genre(&self, genre: &str) -> Result<Vec<MidiFile>> {
            Ok(vec![MidiFile {
                id: 0,
                filename: "by_genre".to_string(),
                genre: Some(genre.to_string()),
            }])
        }

        async fn distinct_genres(&self) -> Result<Vec<String>> {
            Ok(vec![])
        }

        async fn get_by_id(&self, _id: i32) -> Result<Option<MidiFile>> {
            Ok(None)
        }

        async fn count(&self) -> Result<i64> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_list_dispatches_on_filter() {
        let all = ListSpy.list(&GenreFilter::All).await.unwrap();
        assert_eq!(all[0].filename, "all");

        let rock = ListSpy
            .list(&GenreFilter::Exact("rock".to_string()))
            .await
            .unwrap();
        assert_eq!(rock[0].filename, "by_genre");
        assert_eq!(rock[0].genre.as_deref(), Some("rock"));
    }
}
