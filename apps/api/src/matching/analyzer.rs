//! Model client for resume analysis.
//!
//! `analyze` is total: transport faults, timeouts and unusable replies all
//! degrade to [`AnalysisResult::fallback`], so callers only ever handle
//! storage errors.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::llm_client::{strip_json_fences, LlmError, TextGenerator};
use crate::matching::models::{AnalysisResult, ReplyError};
use crate::matching::prompts::build_match_prompt;

#[derive(Debug, Error)]
enum AnalyzeError {
    #[error("{0}")]
    Llm(#[from] LlmError),

    #[error("{0}")]
    Reply(#[from] ReplyError),

    #[error("model call timed out after {0:?}")]
    TimedOut(Duration),
}

pub struct Analyzer {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl Analyzer {
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    /// Scores `resume_text` against `job_description`. Never fails.
    pub async fn analyze(&self, resume_text: &str, job_description: &str) -> AnalysisResult {
        let prompt = build_match_prompt(resume_text, job_description);

        match self.try_analyze(&prompt).await {
            Ok(result) => {
                info!("Model analysis succeeded: match_score={}", result.match_score);
                result
            }
            Err(e) => {
                warn!("Model analysis failed, returning fallback: {e}");
                AnalysisResult::fallback(format!("Error calling model or parsing JSON: {e}"))
            }
        }
    }

    async fn try_analyze(&self, prompt: &str) -> Result<AnalysisResult, AnalyzeError> {
        let raw = tokio::time::timeout(self.timeout, self.generator.generate(prompt))
            .await
            .map_err(|_| AnalyzeError::TimedOut(self.timeout))??;

        debug!("Raw model output: {raw}");

        Ok(AnalysisResult::from_model_reply(strip_json_fences(&raw))?)
    }
}
