use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::labeling::{process_event, LabelingOutcome, StorageEvent};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelingResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_file: Option<String>,
}

/// POST /images/events
pub async fn handle_storage_event(
    State(state): State<AppState>,
    Json(event): Json<StorageEvent>,
) -> Result<Json<LabelingResponse>, AppError> {
    let response = match process_event(&state.results, &event).await? {
        LabelingOutcome::NoRecords => LabelingResponse {
            message: "No S3 Records found",
            result_file: None,
        },
        LabelingOutcome::Skipped => LabelingResponse {
            message: "Skipped (not uploads/)",
            result_file: None,
        },
        LabelingOutcome::Stored { result_file } => LabelingResponse {
            message: "Stored result and index record",
            result_file: Some(result_file),
        },
    };
    Ok(Json(response))
}
