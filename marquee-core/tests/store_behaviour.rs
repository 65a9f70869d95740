//! Durable store behaviour: round trips, cold reads, and corrupt entries.

use marquee_core::store::{MetadataStore, SnapshotStore, StoreRoot};
use marquee_model::{ContentKind, Fingerprint, MetadataResult, RecentEntry, ResultSnapshot};

fn root_at(dir: &tempfile::TempDir) -> StoreRoot {
    StoreRoot::new(dir.path().to_path_buf())
}

fn fingerprint(id: u32) -> Fingerprint {
    Fingerprint {
        kind: ContentKind::Movie,
        external_id: id,
    }
}

#[tokio::test]
async fn metadata_round_trips_across_store_handles() {
    let dir = tempfile::tempdir().unwrap();
    let result = MetadataResult {
        resolved_year: 2024,
        poster_url: "http://img/p.jpg".to_string(),
    };
    MetadataStore::new(root_at(&dir))
        .put(&fingerprint(42), &result)
        .await
        .unwrap();

    // A fresh handle over the same root sees the entry, as after restart.
    let reopened = MetadataStore::new(root_at(&dir));
    assert_eq!(reopened.get(&fingerprint(42)).await.unwrap(), result);
}

#[tokio::test]
async fn missing_metadata_reads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = MetadataStore::new(root_at(&dir));
    assert!(store.get(&fingerprint(1)).await.is_none());
}

#[tokio::test]
async fn kinds_do_not_share_metadata_entries() {
    let dir = tempfile::tempdir().unwrap();
    let store = MetadataStore::new(root_at(&dir));
    let result = MetadataResult {
        resolved_year: 2020,
        poster_url: String::new(),
    };
    store.put(&fingerprint(7), &result).await.unwrap();

    let series = Fingerprint {
        kind: ContentKind::Series,
        external_id: 7,
    };
    assert!(store.get(&series).await.is_none());
}

#[tokio::test]
async fn undecodable_metadata_degrades_to_a_cold_read() {
    let dir = tempfile::tempdir().unwrap();
    cacache::write(dir.path(), "metadata/v1/movie:9", b"not json")
        .await
        .unwrap();
    let store = MetadataStore::new(root_at(&dir));
    assert!(store.get(&fingerprint(9)).await.is_none());
}

#[tokio::test]
async fn snapshot_save_replaces_the_prior_one_wholesale() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(root_at(&dir));

    let first = ResultSnapshot {
        kind: ContentKind::Movie,
        entries: vec![RecentEntry {
            external_id: 1,
            kind: ContentKind::Movie,
            title: "First".to_string(),
            poster_url: String::new(),
            year: 2023,
            extension: "mp4".to_string(),
        }],
    };
    store.save(&first).await.unwrap();

    let second = ResultSnapshot::empty(ContentKind::Movie);
    store.save(&second).await.unwrap();

    assert_eq!(store.load(ContentKind::Movie).await.unwrap(), second);
}

#[tokio::test]
async fn snapshots_are_stored_per_kind() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(root_at(&dir));
    store
        .save(&ResultSnapshot::empty(ContentKind::Movie))
        .await
        .unwrap();

    assert!(store.load(ContentKind::Movie).await.is_some());
    assert!(store.load(ContentKind::Series).await.is_none());
}
