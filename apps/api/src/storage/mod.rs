//! Result persistence: a blob store for full documents and an index table
//! for compact, point-lookup summaries.
//!
//! Backends are injected as trait objects so the match pipeline runs the
//! same against S3 + PostgreSQL in production and in-memory maps in tests.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::matching::models::AnalysisResult;
use crate::models::image::ImageRecord;
use crate::models::match_record::MatchRecord;

pub mod memory;
pub mod postgres;
pub mod s3;

pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("blob store: {0}")]
    Blob(String),

    #[error("index store: {0}")]
    Index(#[from] sqlx::Error),

    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Key → bytes object storage, addressed by bucket.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// `Ok(None)` when the key does not exist.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Option<Bytes>, StorageError>;
}

/// Metadata table supporting upserts and point lookups.
#[async_trait]
pub trait IndexStore: Send + Sync {
    async fn put_match_record(&self, record: &MatchRecord) -> Result<(), StorageError>;

    async fn get_match_record(&self, request_id: Uuid) -> Result<Option<MatchRecord>, StorageError>;

    async fn put_image_record(&self, record: &ImageRecord) -> Result<(), StorageError>;
}

/// Blob key for a match result.
pub fn result_key(request_id: Uuid) -> String {
    format!("results/{request_id}.json")
}

/// Writes analysis documents and their index records.
///
/// The blob write and the index write are not transactional. If the index
/// write fails after the blob write succeeded, the blob is left orphaned;
/// nothing here compensates or retries.
pub struct ResultStore {
    blobs: Arc<dyn BlobStore>,
    index: Arc<dyn IndexStore>,
    bucket: String,
}

impl ResultStore {
    pub fn new(blobs: Arc<dyn BlobStore>, index: Arc<dyn IndexStore>, bucket: String) -> Self {
        Self {
            blobs,
            index,
            bucket,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Writes the full analysis to `results/{request_id}.json` and returns that key.
    /// Last write wins if the key already exists.
    pub async fn persist(
        &self,
        request_id: Uuid,
        analysis: &AnalysisResult,
    ) -> Result<String, StorageError> {
        let key = result_key(request_id);
        self.put_json(&self.bucket, &key, analysis).await?;
        Ok(key)
    }

    /// Upserts the summary record for a persisted analysis.
    pub async fn index(
        &self,
        request_id: Uuid,
        timestamp: &str,
        storage_key: &str,
        match_score: u8,
    ) -> Result<MatchRecord, StorageError> {
        let record = MatchRecord {
            request_id,
            timestamp: timestamp.to_string(),
            storage_key: storage_key.to_string(),
            bucket: self.bucket.clone(),
            match_score: match_score.to_string(),
        };
        self.index.put_match_record(&record).await?;
        info!("Indexed match result {request_id} (score {match_score})");
        Ok(record)
    }

    pub async fn lookup(&self, request_id: Uuid) -> Result<Option<MatchRecord>, StorageError> {
        self.index.get_match_record(request_id).await
    }

    /// Reads back a stored analysis by the record's bucket and key.
    pub async fn load_analysis(
        &self,
        record: &MatchRecord,
    ) -> Result<Option<AnalysisResult>, StorageError> {
        self.get_json(&record.bucket, &record.storage_key).await
    }

    pub async fn index_image(&self, record: &ImageRecord) -> Result<(), StorageError> {
        self.index.put_image_record(record).await
    }

    /// Serializes `value` as pretty JSON and writes it to `bucket/key`.
    pub async fn put_json<T: Serialize + Sync>(
        &self,
        bucket: &str,
        key: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let body = serde_json::to_vec_pretty(value)?;
        self.blobs
            .put_object(bucket, key, Bytes::from(body), JSON_CONTENT_TYPE)
            .await?;
        info!("Stored s3://{bucket}/{key}");
        Ok(())
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        bucket: &str,
        key: &str,
    ) -> Result<Option<T>, StorageError> {
        match self.blobs.get_object(bucket, key).await? {
            Some(body) => Ok(Some(serde_json::from_slice(&body)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::storage::memory::{MemoryBlobStore, MemoryIndexStore};

    /// Index store whose writes always fail.
    pub(crate) struct FailingIndexStore;

    #[async_trait]
    impl IndexStore for FailingIndexStore {
        async fn put_match_record(&self, _record: &MatchRecord) -> Result<(), StorageError> {
            Err(StorageError::Index(sqlx::Error::PoolTimedOut))
        }

        async fn get_match_record(
            &self,
            _request_id: Uuid,
        ) -> Result<Option<MatchRecord>, StorageError> {
            Ok(None)
        }

        async fn put_image_record(&self, _record: &ImageRecord) -> Result<(), StorageError> {
            Err(StorageError::Index(sqlx::Error::PoolTimedOut))
        }
    }

    /// Blob store that remembers the key and content type of every write.
    #[derive(Default)]
    struct RecordingBlobStore {
        writes: std::sync::Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl BlobStore for RecordingBlobStore {
        async fn put_object(
            &self,
            _bucket: &str,
            key: &str,
            _body: Bytes,
            content_type: &str,
        ) -> Result<(), StorageError> {
            self.writes
                .lock()
                .unwrap()
                .push((key.to_string(), content_type.to_string()));
            Ok(())
        }

        async fn get_object(
            &self,
            _bucket: &str,
            _key: &str,
        ) -> Result<Option<Bytes>, StorageError> {
            Ok(None)
        }
    }

    fn sample_analysis() -> AnalysisResult {
        AnalysisResult {
            match_score: 85,
            missing_keywords: vec!["Kubernetes".to_string()],
            strengths: vec!["Go".to_string(), "API design".to_string()],
            improvements: vec!["Quantify API throughput".to_string()],
            recommended_resume_bullets: vec!["Built Go services handling 5k rps".to_string()],
            cover_letter_intro: "I am excited to apply.".to_string(),
        }
    }

    #[test]
    fn test_result_key_format() {
        let id = Uuid::nil();
        assert_eq!(
            result_key(id),
            "results/00000000-0000-0000-0000-000000000000.json"
        );
    }

    #[tokio::test]
    async fn test_persist_round_trips_analysis() {
        let blobs = Arc::new(MemoryBlobStore::default());
        let store = ResultStore::new(
            blobs.clone(),
            Arc::new(MemoryIndexStore::default()),
            "career-copilot-bucket".to_string(),
        );
        let request_id = Uuid::new_v4();
        let analysis = sample_analysis();

        let key = store.persist(request_id, &analysis).await.unwrap();
        assert_eq!(key, format!("results/{request_id}.json"));

        let raw = blobs
            .get_object("career-copilot-bucket", &key)
            .await
            .unwrap()
            .unwrap();
        let read_back: AnalysisResult = serde_json::from_slice(&raw).unwrap();
        assert_eq!(read_back, analysis);
    }

    #[tokio::test]
    async fn test_persist_writes_json_content_type() {
        let blobs = Arc::new(RecordingBlobStore::default());
        let store = ResultStore::new(
            blobs.clone(),
            Arc::new(MemoryIndexStore::default()),
            "career-copilot-bucket".to_string(),
        );
        let request_id = Uuid::new_v4();

        let key = store.persist(request_id, &sample_analysis()).await.unwrap();

        let writes = blobs.writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, key);
        assert_eq!(writes[0].1, JSON_CONTENT_TYPE);
    }

    #[tokio::test]
    async fn test_index_stores_score_as_text_and_supports_lookup() {
        let store = ResultStore::new(
            Arc::new(MemoryBlobStore::default()),
            Arc::new(MemoryIndexStore::default()),
            "career-copilot-bucket".to_string(),
        );
        let request_id = Uuid::new_v4();
        let key = result_key(request_id);

        let record = store
            .index(request_id, "2026-10-17T06:00:00.000000Z", &key, 85)
            .await
            .unwrap();
        assert_eq!(record.match_score, "85");
        assert_eq!(record.bucket, "career-copilot-bucket");

        let found = store.lookup(request_id).await.unwrap().unwrap();
        assert_eq!(found, record);
        assert!(store.lookup(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_index_failure_leaves_blob_in_place() {
        let blobs = Arc::new(MemoryBlobStore::default());
        let store = ResultStore::new(
            blobs.clone(),
            Arc::new(FailingIndexStore),
            "career-copilot-bucket".to_string(),
        );
        let request_id = Uuid::new_v4();

        let key = store.persist(request_id, &sample_analysis()).await.unwrap();
        let indexed = store.index(request_id, "now", &key, 85).await;

        assert!(matches!(indexed, Err(StorageError::Index(_))));
        assert_eq!(blobs.object_count().await, 1);
    }

    #[tokio::test]
    async fn test_load_analysis_missing_blob_is_none() {
        let store = ResultStore::new(
            Arc::new(MemoryBlobStore::default()),
            Arc::new(MemoryIndexStore::default()),
            "career-copilot-bucket".to_string(),
        );
        let record = MatchRecord {
            request_id: Uuid::new_v4(),
            timestamp: "now".to_string(),
            storage_key: "results/missing.json".to_string(),
            bucket: "career-copilot-bucket".to_string(),
            match_score: "0".to_string(),
        };
        assert!(store.load_analysis(&record).await.unwrap().is_none());
    }
}
