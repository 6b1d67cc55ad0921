use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Index-table row for a labeled image upload, keyed by the upload's object key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub image_id: String,
    pub bucket: String,
    pub uploaded_file: String,
    pub timestamp: String,
    /// `[{"Name": "...", "Confidence": "98.5"}]` with confidences as decimal text.
    pub labels: Value,
}
