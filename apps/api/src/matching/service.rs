//! Match Service: runs one resume analysis end to end.
//!
//! Flow: (extract) → analyze → persist blob → index record → outcome.
//!
//! Requests share nothing but the injected collaborators; each call gets a
//! fresh request id and timestamp.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction;
use crate::matching::analyzer::Analyzer;
use crate::matching::models::{AnalysisResult, MatchRequest};
use crate::models::match_record::MatchRecord;
use crate::storage::ResultStore;

/// User-facing message when an upload yields no text.
pub const EXTRACTION_FAILED_MESSAGE: &str =
    "Could not extract text. Please upload PDF, DOCX, or TXT resume.";

/// A resume file as received from the client.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub filename: String,
    pub bytes: bytes::Bytes,
}

/// Result of a completed analysis, as returned to the caller.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub request_id: Uuid,
    pub match_score: u8,
    pub storage_key: String,
}

pub struct MatchService {
    analyzer: Analyzer,
    results: Arc<ResultStore>,
}

impl MatchService {
    pub fn new(analyzer: Analyzer, results: Arc<ResultStore>) -> Self {
        Self { analyzer, results }
    }

    /// Text pathway: the resume is already plain text.
    pub async fn match_text(&self, request: MatchRequest) -> Result<MatchOutcome, AppError> {
        request.validate()?;
        self.run(&request.resume_text, &request.job_description)
            .await
    }

    /// Upload pathway: extracts the resume text first. An empty extraction
    /// short-circuits before the model or storage are touched.
    pub async fn match_upload(
        &self,
        upload: ResumeUpload,
        job_description: String,
    ) -> Result<MatchOutcome, AppError> {
        let filename = upload.filename.clone();
        let resume_text = extract_blocking(upload).await;

        if resume_text.trim().is_empty() {
            warn!("No text extracted from upload '{filename}'");
            return Err(AppError::Extraction(EXTRACTION_FAILED_MESSAGE.to_string()));
        }
        info!(
            "Extracted {} chars from upload '{filename}'",
            resume_text.chars().count()
        );

        let request = MatchRequest {
            resume_text,
            job_description,
        };
        request.validate()?;
        self.run(&request.resume_text, &request.job_description)
            .await
    }

    /// Point lookup of a stored summary.
    pub async fn find_record(&self, request_id: Uuid) -> Result<MatchRecord, AppError> {
        self.results
            .lookup(request_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Match result {request_id} not found")))
    }

    /// Loads the full stored analysis for a request.
    pub async fn find_analysis(&self, request_id: Uuid) -> Result<AnalysisResult, AppError> {
        let record = self.find_record(request_id).await?;
        self.results.load_analysis(&record).await?.ok_or_else(|| {
            AppError::NotFound(format!(
                "Stored analysis {} for match {request_id} not found",
                record.storage_key
            ))
        })
    }

    async fn run(&self, resume_text: &str, job_description: &str) -> Result<MatchOutcome, AppError> {
        let request_id = Uuid::new_v4();
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        info!("Starting match analysis {request_id}");

        let analysis = self.analyzer.analyze(resume_text, job_description).await;

        let storage_key = self.results.persist(request_id, &analysis).await?;
        self.results
            .index(request_id, &timestamp, &storage_key, analysis.match_score)
            .await
            .inspect_err(|e| {
                warn!("Index write failed for {request_id}; blob {storage_key} is orphaned: {e}")
            })?;

        info!(
            "Match analysis {request_id} completed: score={}",
            analysis.match_score
        );

        Ok(MatchOutcome {
            request_id,
            match_score: analysis.match_score,
            storage_key,
        })
    }
}

/// Document parsing is CPU-bound, so it runs on the blocking pool. A panic
/// in a parser is treated as "no text".
async fn extract_blocking(upload: ResumeUpload) -> String {
    let ResumeUpload { filename, bytes } = upload;
    tokio::task::spawn_blocking(move || extraction::extract(&filename, &bytes))
        .await
        .unwrap_or_else(|e| {
            warn!("Extraction task failed: {e}");
            String::new()
        })
}
