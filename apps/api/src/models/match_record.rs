use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Index-table summary of one completed analysis. Written once, never updated.
///
/// `match_score` is decimal text: the index has no native numeric type for
/// it, so scores are stored as strings to avoid type mismatches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub request_id: Uuid,
    /// ISO-8601 UTC.
    pub timestamp: String,
    pub storage_key: String,
    pub bucket: String,
    pub match_score: String,
}
