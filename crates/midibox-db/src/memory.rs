//! In-memory CatalogRepository.
//!
//! Same observable behavior as the Postgres repository (ids start at 1 and
//! only grow, listings come back in id order) without a database. Used by the
//! API tests and by `CATALOG_BACKEND=memory` for local runs.

use async_trait::async_trait;
use tokio::sync::RwLock;

use midibox_core::{CatalogRepository, CreateMidiFileRequest, MidiFile, Result};

#[derive(Default)]
struct Rows {
    next_id: i32,
    files: Vec<MidiFile>,
}

/// Catalog that lives for the life of the process.
#[derive(Default)]
pub struct MemoryCatalogRepository {
    rows: RwLock<Rows>,
}

impl MemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogRepository for MemoryCatalogRepository {
    async fn create(&self, req: CreateMidiFileRequest) -> Result<i32> {
        let mut rows = self.rows.write().await;
        rows.next_id += 1;
        let id = rows.next_id;
        rows.files.push(MidiFile {
            id,
            filename: req.filename,
            genre: req.genre,
        });
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<MidiFile>> {
        Ok(self.rows.read().await.files.clone())
    }

    async fn list_by_genre(&self, genre: &str) -> Result<Vec<MidiFile>> {
        Ok(self
            .rows
            .read()
            .await
            .files
            .iter()
            .filter(|f| f.genre.as_deref() == Some(genre))
            .cloned()
            .collect())
    }

    async fn distinct_genres(&self) -> Result<Vec<String>> {
        let rows = self.rows.read().await;
        let mut genres: Vec<String> = rows.files.iter().filter_map(|f| f.genre.clone()).collect();
        genres.sort();
        genres.dedup();
        Ok(genres)
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<MidiFile>> {
        Ok(self
            .rows
            .read()
            .await
            .files
            .iter()
            .find(|f| f.id == id)
            .cloned())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.rows.read().await.files.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use midibox_core::GenreFilter;

    fn req(filename: &str, genre: Option<&str>) -> CreateMidiFileRequest {
        CreateMidiFileRequest::new(filename, genre.map(str::to_string))
    }

    #[tokio::test]
    async fn test_ids_are_monotonic_from_one() {
        let repo = MemoryCatalogRepository::new();
        assert_eq!(repo.create(req("a.mid", Some("rock"))).await.unwrap(), 1);
        assert_eq!(repo.create(req("b.mid", Some("rock"))).await.unwrap(), 2);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_list_by_genre_is_exact_match() {
        let repo = MemoryCatalogRepository::new();
        repo.create(req("a.mid", Some("rock"))).await.unwrap();
        repo.create(req("b.mid", Some("Rock"))).await.unwrap();
        repo.create(req("c.mid", Some("jazz"))).await.unwrap();
        repo.create(req("d.mid", None)).await.unwrap();

        let rock = repo.list_by_genre("rock").await.unwrap();
        assert_eq!(rock.len(), 1);
        assert_eq!(rock[0].filename, "a.mid");

        let all = repo.list(&GenreFilter::All).await.unwrap();
        assert_eq!(all.len(), 4);
    }

    #[tokio::test]
    async fn test_distinct_genres_dedup_and_skip_untagged() {
        let repo = MemoryCatalogRepository::new();
        repo.create(req("a.mid", Some("rock"))).await.unwrap();
        repo.create(req("b.mid", Some("jazz"))).await.unwrap();
        repo.create(req("c.mid", Some("rock"))).await.unwrap();
        repo.create(req("d.mid", None)).await.unwrap();

        assert_eq!(
            repo.distinct_genres().await.unwrap(),
            vec!["jazz".to_string(), "rock".to_string()]
        );
    }

    #[tokio::test]
    async fn test_get_by_id_absent_is_none() {
        let repo = MemoryCatalogRepository::new();
        repo.create(req("a.mid", Some("rock"))).await.unwrap();
        assert!(repo.get_by_id(1).await.unwrap().is_some());
        assert!(repo.get_by_id(999).await.unwrap().is_none());
    }
}
