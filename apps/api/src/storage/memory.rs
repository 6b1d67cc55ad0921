use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::image::ImageRecord;
use crate::models::match_record::MatchRecord;
use crate::storage::{BlobStore, IndexStore, StorageError};

/// Process-local blob store keyed by `(bucket, key)`.
#[derive(Default)]
pub struct MemoryBlobStore {
    objects: RwLock<HashMap<(String, String), Bytes>>,
}

#[cfg(test)]
impl MemoryBlobStore {
    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        _content_type: &str,
    ) -> Result<(), StorageError> {
        self.objects
            .write()
            .await
            .insert((bucket.to_string(), key.to_string()), body);
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Option<Bytes>, StorageError> {
        Ok(self
            .objects
            .read()
            .await
            .get(&(bucket.to_string(), key.to_string()))
            .cloned())
    }
}

/// Process-local index tables.
#[derive(Default)]
pub struct MemoryIndexStore {
    matches: RwLock<HashMap<Uuid, MatchRecord>>,
    images: RwLock<HashMap<String, ImageRecord>>,
}

#[cfg(test)]
impl MemoryIndexStore {
    pub async fn match_count(&self) -> usize {
        self.matches.read().await.len()
    }

    pub async fn image_record(&self, image_id: &str) -> Option<ImageRecord> {
        self.images.read().await.get(image_id).cloned()
    }
}

#[async_trait]
impl IndexStore for MemoryIndexStore {
    async fn put_match_record(&self, record: &MatchRecord) -> Result<(), StorageError> {
        self.matches
            .write()
            .await
            .insert(record.request_id, record.clone());
        Ok(())
    }

    async fn get_match_record(&self, request_id: Uuid) -> Result<Option<MatchRecord>, StorageError> {
        Ok(self.matches.read().await.get(&request_id).cloned())
    }

    async fn put_image_record(&self, record: &ImageRecord) -> Result<(), StorageError> {
        self.images
            .write()
            .await
            .insert(record.image_id.clone(), record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_blob_put_overwrites_same_key() {
        let store = MemoryBlobStore::default();
        store
            .put_object("b", "k", Bytes::from_static(b"one"), "text/plain")
            .await
            .unwrap();
        store
            .put_object("b", "k", Bytes::from_static(b"two"), "text/plain")
            .await
            .unwrap();

        assert_eq!(store.object_count().await, 1);
        assert_eq!(
            store.get_object("b", "k").await.unwrap(),
            Some(Bytes::from_static(b"two"))
        );
    }

    #[tokio::test]
    async fn test_blob_buckets_are_separate_namespaces() {
        let store = MemoryBlobStore::default();
        store
            .put_object("a", "k", Bytes::from_static(b"x"), "text/plain")
            .await
            .unwrap();
        assert!(store.get_object("b", "k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_match_record_upsert_is_keyed_by_request_id() {
        let store = MemoryIndexStore::default();
        let mut record = MatchRecord {
            request_id: Uuid::new_v4(),
            timestamp: "t0".to_string(),
            storage_key: "results/x.json".to_string(),
            bucket: "b".to_string(),
            match_score: "10".to_string(),
        };
        store.put_match_record(&record).await.unwrap();
        record.match_score = "20".to_string();
        store.put_match_record(&record).await.unwrap();

        assert_eq!(store.match_count().await, 1);
        let found = store
            .get_match_record(record.request_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.match_score, "20");
    }
}
