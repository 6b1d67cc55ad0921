use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::errors::AppError;

/// Text-pathway request body. Both fields must be non-blank.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    #[serde(alias = "resume_text")]
    pub resume_text: String,
    #[serde(alias = "job_description")]
    pub job_description: String,
}

impl MatchRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.resume_text.trim().is_empty() {
            return Err(AppError::Validation("resumeText cannot be empty".to_string()));
        }
        if self.job_description.trim().is_empty() {
            return Err(AppError::Validation(
                "jobDescription cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Structured compatibility assessment produced from the model's reply.
///
/// The field names are the model-facing contract: they appear verbatim in
/// the analysis prompt and in the stored JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// 0 – 100 inclusive.
    pub match_score: u8,
    pub missing_keywords: Vec<String>,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub recommended_resume_bullets: Vec<String>,
    pub cover_letter_intro: String,
}

#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("reply is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("reply is a JSON {0}, expected an object")]
    NotAnObject(&'static str),
}

impl AnalysisResult {
    /// Degraded result returned when the model cannot be used. The diagnostic
    /// is the only improvement entry.
    pub fn fallback(diagnostic: impl Into<String>) -> Self {
        Self {
            improvements: vec![diagnostic.into()],
            ..Self::default()
        }
    }

    /// Parses untrusted model output. The reply must be a JSON object; each
    /// field is then coerced independently, so missing or mistyped fields
    /// become their zero value instead of failing the whole reply.
    pub fn from_model_reply(raw: &str) -> Result<Self, ReplyError> {
        match serde_json::from_str::<Value>(raw)? {
            Value::Object(fields) => Ok(Self::from_fields(&fields)),
            other => Err(ReplyError::NotAnObject(json_kind(&other))),
        }
    }

    fn from_fields(fields: &Map<String, Value>) -> Self {
        Self {
            match_score: coerce_score(fields.get("match_score")),
            missing_keywords: coerce_list(fields.get("missing_keywords")),
            strengths: coerce_list(fields.get("strengths")),
            improvements: coerce_list(fields.get("improvements")),
            recommended_resume_bullets: coerce_list(fields.get("recommended_resume_bullets")),
            cover_letter_intro: coerce_string(fields.get("cover_letter_intro")),
        }
    }
}

/// Accepts integers, floats (rounded) and numeric strings such as `"85"` or
/// `"85%"`, clamped into 0 – 100. Anything else scores 0.
fn coerce_score(value: Option<&Value>) -> u8 {
    let score = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    match score {
        Some(s) if s.is_finite() => s.round().clamp(0.0, 100.0) as u8,
        _ => 0,
    }
}

/// Keeps the string elements of an array, in order.
fn coerce_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

fn coerce_string(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
