use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::StreamExt;
use futures::stream;
use tempfile::TempDir;

use murmur::application::ports::{StagingStore, Summarizer, TranscriptionEngine};
use murmur::application::services::{
    SummaryFailurePolicy, TranscriptionService, TranscriptionServiceError,
};
use murmur::domain::{StoragePath, SummaryOutcome};
use murmur::infrastructure::storage::LocalStagingStore;

use crate::helpers::{MockSummarizer, MockTranscriptionEngine};

const TIMEOUT: Duration = Duration::from_secs(5);

fn create_store() -> (TempDir, Arc<LocalStagingStore>) {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(LocalStagingStore::new(dir.path().to_path_buf()).unwrap());
    (dir, store)
}

/// Size of the staged file on disk, `None` once it is gone.
fn staged_len(dir: &TempDir, path: &StoragePath) -> Option<u64> {
    std::fs::metadata(dir.path().join(path.as_str()))
        .ok()
        .map(|meta| meta.len())
}

fn service(
    store: &Arc<LocalStagingStore>,
    engine: MockTranscriptionEngine,
    timeout: Duration,
) -> TranscriptionService {
    TranscriptionService::new(
        Arc::clone(store) as Arc<dyn StagingStore>,
        Arc::new(engine) as Arc<dyn TranscriptionEngine>,
        timeout,
    )
}

fn audio_stream(data: &'static [u8]) -> futures::stream::BoxStream<'static, Result<Bytes, std::io::Error>> {
    stream::iter(vec![Ok(Bytes::from_static(data))]).boxed()
}

#[tokio::test]
async fn given_uploaded_stream_when_staging_then_file_metadata_reflects_upload() {
    let (dir, store) = create_store();
    let service = service(&store, MockTranscriptionEngine::returning("hi"), TIMEOUT);

    let upload = service
        .stage(
            "Team Sync (final).m4a".to_string(),
            Some("audio/mp4".to_string()),
            audio_stream(b"0123456789"),
        )
        .await
        .unwrap();

    let file = upload.file().clone();
    assert_eq!(file.original_filename, "Team Sync (final).m4a");
    assert_eq!(file.content_type, "audio/mp4");
    assert_eq!(file.size_bytes, 10);
    assert!(file.storage_path.as_str().ends_with("-TeamSyncfinal.m4a"));
    assert_eq!(staged_len(&dir, &file.storage_path), Some(10));

    upload.release().await;
    assert_eq!(staged_len(&dir, &file.storage_path), None);
}

#[tokio::test]
async fn given_staged_upload_when_processed_then_transcript_returned_and_file_released() {
    let (dir, store) = create_store();
    let service = service(&store, MockTranscriptionEngine::returning("hello world"), TIMEOUT);

    let upload = service
        .stage("clip.wav".to_string(), None, audio_stream(b"RIFF"))
        .await
        .unwrap();
    let path = upload.file().storage_path.clone();

    let outcome = service.process(upload).await.unwrap();

    assert_eq!(outcome.transcript, "hello world");
    assert_eq!(outcome.summary, SummaryOutcome::Disabled);
    assert_eq!(outcome.file.content_type, "application/octet-stream");
    assert_eq!(staged_len(&dir, &path), None);
}

#[tokio::test]
async fn given_failing_engine_when_processed_then_error_returned_and_file_released() {
    let (dir, store) = create_store();
    let service = service(&store, MockTranscriptionEngine::failing("status 500"), TIMEOUT);

    let upload = service
        .stage("clip.wav".to_string(), None, audio_stream(b"RIFF"))
        .await
        .unwrap();
    let path = upload.file().storage_path.clone();

    let result = service.process(upload).await;

    assert!(matches!(
        result,
        Err(TranscriptionServiceError::Transcription(_))
    ));
    assert!(result.unwrap_err().is_provider_failure());
    assert_eq!(staged_len(&dir, &path), None);
}

#[tokio::test]
async fn given_engine_slower_than_timeout_when_processed_then_times_out_and_releases() {
    let (dir, store) = create_store();
    let engine = MockTranscriptionEngine::returning("late").with_delay(Duration::from_secs(10));
    let service = service(&store, engine, Duration::from_millis(20));

    let upload = service
        .stage("clip.wav".to_string(), None, audio_stream(b"RIFF"))
        .await
        .unwrap();
    let path = upload.file().storage_path.clone();

    let result = service.process(upload).await;

    assert!(matches!(
        result,
        Err(TranscriptionServiceError::TranscriptionTimedOut(_))
    ));
    assert_eq!(staged_len(&dir, &path), None);
}

#[tokio::test]
async fn given_slow_summarizer_when_partial_policy_then_summary_marked_failed() {
    let (dir, store) = create_store();
    let summarizer = MockSummarizer::returning("late").with_delay(Duration::from_secs(10));
    let service = service(
        &store,
        MockTranscriptionEngine::returning("hello"),
        Duration::from_millis(20),
    )
    .with_summarizer(
        Arc::new(summarizer) as Arc<dyn Summarizer>,
        SummaryFailurePolicy::Partial,
    );

    let upload = service
        .stage("clip.wav".to_string(), None, audio_stream(b"RIFF"))
        .await
        .unwrap();

    let outcome = service.process(upload).await.unwrap();

    assert_eq!(outcome.transcript, "hello");
    assert!(matches!(outcome.summary, SummaryOutcome::Failed { .. }));
    assert_eq!(outcome.summary.text(), None);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn given_failing_summarizer_when_fail_policy_then_error_returned() {
    let (dir, store) = create_store();
    let service = service(&store, MockTranscriptionEngine::returning("hello"), TIMEOUT)
        .with_summarizer(
            Arc::new(MockSummarizer::failing("HTTP 500")) as Arc<dyn Summarizer>,
            SummaryFailurePolicy::Fail,
        );

    let upload = service
        .stage("clip.wav".to_string(), None, audio_stream(b"RIFF"))
        .await
        .unwrap();

    let result = service.process(upload).await;

    assert!(matches!(
        result,
        Err(TranscriptionServiceError::Summarization(_))
    ));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn given_summarizer_when_processed_then_summary_is_completed() {
    let (dir, store) = create_store();
    let service = service(&store, MockTranscriptionEngine::returning("hello"), TIMEOUT)
        .with_summarizer(
            Arc::new(MockSummarizer::returning("short")) as Arc<dyn Summarizer>,
            SummaryFailurePolicy::Partial,
        );
    assert!(service.summarization_enabled());

    let upload = service
        .stage("clip.wav".to_string(), None, audio_stream(b"RIFF"))
        .await
        .unwrap();

    let outcome = service.process(upload).await.unwrap();

    assert_eq!(outcome.summary.text(), Some("short"));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn given_interrupted_upload_stream_when_staging_then_nothing_is_left_behind() {
    let (dir, store) = create_store();
    let service = service(&store, MockTranscriptionEngine::returning("unused"), TIMEOUT);

    let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
        Ok(Bytes::from_static(b"partial")),
        Err(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "client went away",
        )),
    ];

    let result = service
        .stage("clip.wav".to_string(), None, stream::iter(chunks).boxed())
        .await;

    assert!(matches!(
        result,
        Err(TranscriptionServiceError::Staging(_))
    ));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn given_unreleased_upload_when_dropped_then_file_is_deleted_in_background() {
    let (dir, store) = create_store();
    let service = service(&store, MockTranscriptionEngine::returning("unused"), TIMEOUT);

    let upload = service
        .stage("clip.wav".to_string(), None, audio_stream(b"RIFF"))
        .await
        .unwrap();
    let path = upload.file().storage_path.clone();

    drop(upload);

    let mut deleted = false;
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(10)).await;
        if staged_len(&dir, &path).is_none() {
            deleted = true;
            break;
        }
    }
    assert!(deleted);
}
