// Prompt for the resume/job-description analysis call.
//
// The key list below and `AnalysisResult` must change together: the model
// only knows the shape we parse from what this template asks for.

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

const EVALUATOR_ROLE: &str = "You are an ATS resume evaluator.";

const REQUIRED_KEYS: &str = "\
The JSON must contain exactly these keys:
match_score (integer 0-100),
missing_keywords (list of strings),
strengths (list of strings),
improvements (list of strings),
recommended_resume_bullets (list of strings),
cover_letter_intro (string)";

/// Renders the analysis prompt. Resume and job description are embedded
/// verbatim; neither is scanned for placeholders.
pub fn build_match_prompt(resume_text: &str, job_description: &str) -> String {
    format!(
        "{EVALUATOR_ROLE}\n\n\
         {JSON_ONLY_INSTRUCTION}\n\n\
         {REQUIRED_KEYS}\n\n\
         RESUME:\n{resume_text}\n\n\
         JOB DESCRIPTION:\n{job_description}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_is_deterministic() {
        let a = build_match_prompt("Rust developer", "Rust role");
        let b = build_match_prompt("Rust developer", "Rust role");
        assert_eq!(a, b);
    }

    #[test]
    fn test_prompt_names_every_result_field() {
        let prompt = build_match_prompt("r", "j");
        for key in [
            "match_score (integer 0-100)",
            "missing_keywords (list of strings)",
            "strengths (list of strings)",
            "improvements (list of strings)",
            "recommended_resume_bullets (list of strings)",
            "cover_letter_intro (string)",
        ] {
            assert!(prompt.contains(key), "prompt missing {key}");
        }
    }

    #[test]
    fn test_prompt_forbids_prose_and_fences() {
        let prompt = build_match_prompt("r", "j");
        assert!(prompt.starts_with("You are an ATS resume evaluator."));
        assert!(prompt.contains("Return ONLY a valid JSON object."));
        assert!(prompt.contains("Do not include markdown."));
        assert!(prompt.contains("Do not wrap with ```json."));
    }

    #[test]
    fn test_inputs_are_embedded_verbatim_and_in_order() {
        let resume = "Built scalable APIs using Go.\n{job_description}";
        let jd = "Seeking backend engineer with Go experience.";
        let prompt = build_match_prompt(resume, jd);

        let resume_at = prompt.find("RESUME:\nBuilt scalable APIs using Go.\n{job_description}");
        let jd_at = prompt.find("JOB DESCRIPTION:\nSeeking backend engineer with Go experience.");
        assert!(resume_at.is_some());
        assert!(jd_at.is_some());
        assert!(resume_at < jd_at);
    }
}
