//! PostgreSQL catalog repository tests.
//!
//! Run with a migrated database:
//! `DATABASE_URL=postgres://... cargo test -p midibox-db -- --ignored`

use midibox_db::{
    test_fixtures::{test_database, unique_genre},
    CatalogRepository, CreateMidiFileRequest, GenreFilter,
};

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_create_then_get_by_id() {
    let db = test_database().await;
    let genre = unique_genre("rock");

    let id = db
        .catalog
        .create(CreateMidiFileRequest::new("song1.mid", Some(genre.clone())))
        .await
        .expect("Failed to insert");

    let record = db
        .catalog
        .get_by_id(id)
        .await
        .expect("Failed to fetch")
        .expect("Row should exist");
    assert_eq!(record.id, id);
    assert_eq!(record.filename, "song1.mid");
    assert_eq!(record.genre.as_deref(), Some(genre.as_str()));
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_ids_increase() {
    let db = test_database().await;
    let genre = unique_genre("seq");

    let first = db
        .catalog
        .create(CreateMidiFileRequest::new("a.mid", Some(genre.clone())))
        .await
        .unwrap();
    let second = db
        .catalog
        .create(CreateMidiFileRequest::new("b.mid", Some(genre)))
        .await
        .unwrap();
    assert!(second > first);
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_get_by_id_unknown_is_none() {
    let db = test_database().await;
    assert!(db.catalog.get_by_id(-1).await.unwrap().is_none());
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_list_by_genre_exact_match() {
    let db = test_database().await;
    let rock = unique_genre("rock");
    let jazz = unique_genre("jazz");

    db.catalog
        .create(CreateMidiFileRequest::new("r1.mid", Some(rock.clone())))
        .await
        .unwrap();
    db.catalog
        .create(CreateMidiFileRequest::new("j1.mid", Some(jazz.clone())))
        .await
        .unwrap();
    db.catalog
        .create(CreateMidiFileRequest::new("r2.mid", Some(rock.clone())))
        .await
        .unwrap();

    let files = db.catalog.list_by_genre(&rock).await.unwrap();
    let names: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(names, vec!["r1.mid", "r2.mid"]);

    // Case matters
    assert!(db
        .catalog
        .list_by_genre(&rock.to_uppercase())
        .await
        .unwrap()
        .is_empty());

    let all = db.catalog.list(&GenreFilter::All).await.unwrap();
    assert!(all.len() >= 3);
    assert!(all.windows(2).all(|w| w[0].id < w[1].id));
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_distinct_genres_no_duplicates() {
    let db = test_database().await;
    let genre = unique_genre("dup");

    for name in ["d1.mid", "d2.mid", "d3.mid"] {
        db.catalog
            .create(CreateMidiFileRequest::new(name, Some(genre.clone())))
            .await
            .unwrap();
    }
    db.catalog
        .create(CreateMidiFileRequest::new("untagged.mid", None))
        .await
        .unwrap();

    let genres = db.catalog.distinct_genres().await.unwrap();
    assert_eq!(genres.iter().filter(|g| **g == genre).count(), 1);

    let mut sorted = genres.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(genres, sorted);
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_count_tracks_inserts() {
    let db = test_database().await;
    let before = db.catalog.count().await.unwrap();
    db.catalog
        .create(CreateMidiFileRequest::new("c.mid", Some(unique_genre("count"))))
        .await
        .unwrap();
    assert!(db.catalog.count().await.unwrap() > before);
}
