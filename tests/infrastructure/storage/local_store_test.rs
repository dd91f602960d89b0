use std::io;

use bytes::Bytes;
use futures::stream;

use murmur::application::ports::{StagingStore, StagingStoreError};
use murmur::domain::StoragePath;
use murmur::infrastructure::storage::LocalStagingStore;

fn create_test_store() -> (tempfile::TempDir, LocalStagingStore) {
    let dir = tempfile::TempDir::new().unwrap();
    let store = LocalStagingStore::new(dir.path().to_path_buf()).unwrap();
    (dir, store)
}

#[tokio::test]
async fn given_valid_stream_when_storing_then_file_is_persisted() {
    let (dir, store) = create_test_store();
    let path = StoragePath::new("test.wav");

    let chunks = vec![Ok(Bytes::from("hello ")), Ok(Bytes::from("world"))];
    let byte_stream = Box::pin(stream::iter(chunks));

    let size = store.store(&path, byte_stream).await.unwrap();

    assert_eq!(size, 11);
    assert!(dir.path().join(path.as_str()).exists());
}

#[tokio::test]
async fn given_stored_file_when_fetching_then_bytes_match_original() {
    let (_dir, store) = create_test_store();
    let path = StoragePath::new("test.wav");

    let content = b"test content";
    let byte_stream = Box::pin(stream::iter(vec![Ok(Bytes::from(&content[..]))]));
    store.store(&path, byte_stream).await.unwrap();

    let fetched = store.fetch(&path).await.unwrap();
    assert_eq!(&fetched[..], &content[..]);
}

#[tokio::test]
async fn given_empty_stream_when_storing_then_empty_file_is_persisted() {
    let (dir, store) = create_test_store();
    let path = StoragePath::new("silence.wav");

    let byte_stream = Box::pin(stream::iter(Vec::<Result<Bytes, io::Error>>::new()));
    let size = store.store(&path, byte_stream).await.unwrap();

    assert_eq!(size, 0);
    assert_eq!(std::fs::metadata(dir.path().join(path.as_str())).unwrap().len(), 0);
}

#[tokio::test]
async fn given_stored_file_when_deleting_then_directory_is_empty() {
    let (dir, store) = create_test_store();
    let path = StoragePath::new("test.wav");

    let byte_stream = Box::pin(stream::iter(vec![Ok(Bytes::from("data"))]));
    store.store(&path, byte_stream).await.unwrap();

    store.delete(&path).await.unwrap();

    assert!(store.fetch(&path).await.is_err());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn given_stream_error_when_storing_then_returns_io_error_and_leaves_nothing() {
    let (dir, store) = create_test_store();
    let path = StoragePath::new("test.wav");

    let chunks: Vec<Result<Bytes, io::Error>> = vec![
        Ok(Bytes::from("partial")),
        Err(io::Error::new(
            io::ErrorKind::ConnectionReset,
            "network drop",
        )),
    ];
    let byte_stream = Box::pin(stream::iter(chunks));

    let result = store.store(&path, byte_stream).await;

    assert!(matches!(result, Err(StagingStoreError::Stream(_))));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn given_nonexistent_path_when_fetching_then_returns_not_found() {
    let (_dir, store) = create_test_store();
    let path = StoragePath::new("nonexistent.wav");

    assert!(matches!(store.fetch(&path).await, Err(StagingStoreError::NotFound(_))));
}

#[tokio::test]
async fn given_already_deleted_file_when_deleting_again_then_succeeds() {
    let (_dir, store) = create_test_store();
    let path = StoragePath::new("twice.wav");

    let byte_stream = Box::pin(stream::iter(vec![Ok(Bytes::from("data"))]));
    store.store(&path, byte_stream).await.unwrap();

    store.delete(&path).await.unwrap();
    store.delete(&path).await.unwrap();
}

#[tokio::test]
async fn given_many_small_chunks_when_storing_then_size_and_content_are_preserved() {
    let (_dir, store) = create_test_store();
    let path = StoragePath::new("chunks.wav");

    let chunks: Vec<Result<Bytes, io::Error>> =
        (0..1000).map(|_| Ok(Bytes::from_static(b"abcd"))).collect();
    let size = store.store(&path, Box::pin(stream::iter(chunks))).await.unwrap();

    assert_eq!(size, 4000);
    let fetched = store.fetch(&path).await.unwrap();
    assert_eq!(fetched.len(), 4000);
    assert!(fetched.chunks(4).all(|c| c == b"abcd"));
}

#[test]
fn given_missing_directory_when_creating_store_then_directory_is_created() {
    let dir = tempfile::TempDir::new().unwrap();
    let nested = dir.path().join("uploads").join("staging");

    LocalStagingStore::new(nested.clone()).unwrap();

    assert!(nested.is_dir());
}
