//! Axum route handlers for the Match API.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::models::{AnalysisResult, MatchRequest};
use crate::matching::service::{MatchOutcome, ResumeUpload};
use crate::models::match_record::MatchRecord;
use crate::state::AppState;

/// Multipart field carrying the resume document.
const RESUME_FILE_FIELD: &str = "resume_file";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    pub message: &'static str,
    pub request_id: Uuid,
    pub match_score: u8,
    pub storage_key: String,
}

impl MatchResponse {
    fn new(message: &'static str, outcome: MatchOutcome) -> Self {
        Self {
            message,
            request_id: outcome.request_id,
            match_score: outcome.match_score,
            storage_key: outcome.storage_key,
        }
    }
}

/// POST /match
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    let outcome = state.matcher.match_text(request).await?;
    Ok(Json(MatchResponse::new(
        "Resume analysis completed successfully",
        outcome,
    )))
}

/// POST /match-upload
///
/// Multipart form with a `resume_file` file part and a `job_description`
/// text part.
pub async fn handle_match_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<MatchResponse>, AppError> {
    let mut upload: Option<ResumeUpload> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(RESUME_FILE_FIELD) => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid resume file: {e}")))?;
                upload = Some(ResumeUpload { filename, bytes });
            }
            Some("job_description" | "jobDescription") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid job_description: {e}")))?;
                job_description = Some(text);
            }
            _ => {}
        }
    }

    let upload = upload
        .ok_or_else(|| AppError::Validation(format!("{RESUME_FILE_FIELD} is required")))?;
    let job_description = job_description
        .ok_or_else(|| AppError::Validation("job_description is required".to_string()))?;

    let outcome = state.matcher.match_upload(upload, job_description).await?;
    Ok(Json(MatchResponse::new(
        "Resume upload analysis completed successfully",
        outcome,
    )))
}

/// GET /matches/:request_id
pub async fn handle_get_match(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
) -> Result<Json<MatchRecord>, AppError> {
    Ok(Json(state.matcher.find_record(request_id).await?))
}

/// GET /matches/:request_id/result
pub async fn handle_get_match_result(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
) -> Result<Json<AnalysisResult>, AppError> {
    Ok(Json(state.matcher.find_analysis(request_id).await?))
}
