//! Image labeling for files dropped under `uploads/`.
//!
//! Label detection is a fixed stub; what matters here is the storage
//! contract, which mirrors the match pipeline: full JSON document to the
//! blob store under `results/`, summary row to the index table.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::models::image::ImageRecord;
use crate::storage::{ResultStore, StorageError};

pub mod handlers;

const UPLOADS_PREFIX: &str = "uploads/";
const RESULTS_PREFIX: &str = "results/";

/// Object-storage event notification (`{"Records": [...]}`).
#[derive(Debug, Deserialize)]
pub struct StorageEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<EventRecord>,
}

#[derive(Debug, Deserialize)]
pub struct EventRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Deserialize)]
pub struct S3Entity {
    pub bucket: BucketRef,
    pub object: ObjectRef,
}

#[derive(Debug, Deserialize)]
pub struct BucketRef {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ObjectRef {
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Confidence")]
    pub confidence: f64,
}

/// Document written to the blob store for one labeled upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAnalysis {
    pub image_id: String,
    pub bucket: String,
    pub uploaded_file: String,
    pub timestamp: String,
    pub labels: Vec<Label>,
}

impl ImageAnalysis {
    /// Index row for this analysis. Confidences become decimal text.
    fn to_record(&self) -> ImageRecord {
        let labels = self
            .labels
            .iter()
            .map(|l| json!({ "Name": l.name, "Confidence": l.confidence.to_string() }))
            .collect();
        ImageRecord {
            image_id: self.image_id.clone(),
            bucket: self.bucket.clone(),
            uploaded_file: self.uploaded_file.clone(),
            timestamp: self.timestamp.clone(),
            labels: serde_json::Value::Array(labels),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LabelingOutcome {
    NoRecords,
    /// The object is not under `uploads/`.
    Skipped,
    Stored { result_file: String },
}

/// Stub detector: the same three labels for every image.
pub fn detect_labels() -> Vec<Label> {
    [("Person", 98.5), ("Car", 85.2), ("Laptop", 90.1)]
        .into_iter()
        .map(|(name, confidence)| Label {
            name: name.to_string(),
            confidence,
        })
        .collect()
}

/// `uploads/a/b.png` → `results/a/b.png.json`.
pub fn result_key_for(upload_key: &str) -> Option<String> {
    upload_key
        .strip_prefix(UPLOADS_PREFIX)
        .map(|rest| format!("{RESULTS_PREFIX}{rest}.json"))
}

/// Handles the first record of an event; later records are ignored.
pub async fn process_event(
    results: &ResultStore,
    event: &StorageEvent,
) -> Result<LabelingOutcome, StorageError> {
    let Some(record) = event.records.first() else {
        return Ok(LabelingOutcome::NoRecords);
    };
    let bucket = &record.s3.bucket.name;
    let key = &record.s3.object.key;

    let Some(result_key) = result_key_for(key) else {
        info!("Skipping s3://{bucket}/{key}: not under {UPLOADS_PREFIX}");
        return Ok(LabelingOutcome::Skipped);
    };

    let analysis = ImageAnalysis {
        image_id: key.clone(),
        bucket: bucket.clone(),
        uploaded_file: key.clone(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        labels: detect_labels(),
    };

    results.put_json(bucket, &result_key, &analysis).await?;
    results.index_image(&analysis.to_record()).await?;
    info!("Labeled s3://{bucket}/{key} → {result_key}");

    Ok(LabelingOutcome::Stored {
        result_file: result_key,
    })
}
