//! Syllabus structuring: one model call turning raw syllabus text into the
//! module/topic tree. No retry loop here; a bad reply is surfaced directly.

use tracing::{info, instrument};

use crate::config::Prompts;
use crate::domain::StructuredSyllabus;
use crate::error::AppError;
use crate::llm::LanguageModel;
use crate::util::{extract_json_span, fill_template};

/// Anything shorter than this (trimmed) is rejected before touching the model;
/// a real syllabus is never a couple of sentences.
const MIN_SYLLABUS_CHARS: usize = 200;

#[instrument(level = "info", skip(llm, prompts, syllabus_text), fields(text_len = syllabus_text.len()))]
pub async fn structure(
  llm: &dyn LanguageModel,
  prompts: &Prompts,
  syllabus_text: &str,
) -> Result<StructuredSyllabus, AppError> {
  if syllabus_text.trim().len() < MIN_SYLLABUS_CHARS {
    return Err(AppError::Validation("Syllabus text too short".into()));
  }

  let prompt = fill_template(&prompts.structure_user_template, &[("syllabus", syllabus_text)]);
  let raw = llm
    .generate(&prompts.structure_system, &prompt, 0.2)
    .await
    .map_err(AppError::Upstream)?;

  let span = extract_json_span(&raw).ok_or(AppError::NoJson)?;
  let value: serde_json::Value = serde_json::from_str(span)?;
  if value.get("modules").is_none() {
    return Err(AppError::MissingField("modules"));
  }

  // Typed deserialization doubles as schema validation of the nested tree;
  // optional fields (difficulty_hint, subtopics) are defaulted leniently.
  let syllabus: StructuredSyllabus = serde_json::from_value(value)?;
  info!(target: "syllabus", modules = syllabus.modules.len(), "syllabus structured");
  Ok(syllabus)
}
