// Resume matching: prompt → model → coerce → persist.
// All model calls go through llm_client; all writes go through storage.

pub mod analyzer;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod service;
