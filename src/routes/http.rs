//! HTTP endpoint handlers. These are thin wrappers around the engine,
//! generator, and structurer; each is instrumented and logs basic result info.

use axum::{extract::{Path, State}, Json};
use tracing::{info, instrument};

use crate::engine::difficulty_for;
use crate::error::AppError;
use crate::protocol::*;
use crate::state::AppState;
use crate::structurer;

#[instrument(level = "info")]
pub async fn http_health() -> Json<HealthOut> {
  Json(HealthOut { ok: true })
}

#[instrument(level = "info", skip(state, body), fields(user = %body.user_id, topic = %body.topic))]
pub async fn http_generate_question(
  State(state): State<AppState>,
  Json(body): Json<GenerateQuestionIn>,
) -> Result<Json<GenerateQuestionOut>, AppError> {
  let llm = state.llm()?;
  let mastery = state.engine.get_mastery(&body.user_id, &body.topic).await;
  let difficulty = difficulty_for(mastery);

  let outcome = state
    .generator
    .generate(llm, &state.prompts, &body.topic, difficulty, Some(&body.user_id))
    .await?;

  info!(target: "practice", topic = %body.topic, %difficulty, mastery, "question served");
  Ok(Json(GenerateQuestionOut {
    topic: body.topic,
    difficulty,
    question: outcome.into_question(),
  }))
}

#[instrument(level = "info", skip(state, body), fields(user = %body.user_id, topic = %body.topic))]
pub async fn http_submit_answer(
  State(state): State<AppState>,
  Json(body): Json<SubmitAnswerIn>,
) -> Result<Json<SubmitAnswerOut>, AppError> {
  // Exact string comparison; no normalization of option labels.
  let correct = body.selected_option == body.correct_answer;
  let score: u32 = if correct { 100 } else { 0 };

  // The tier used for the update is recomputed from stored mastery, not the
  // tier the question was generated at; the two can differ if mastery crossed
  // a boundary mid-session.
  let mastery = state.engine.get_mastery(&body.user_id, &body.topic).await;
  let current_difficulty = difficulty_for(mastery);

  let new_mastery = state
    .engine
    .update_mastery(&body.user_id, &body.topic, score as f64, current_difficulty)
    .await;
  let next_difficulty = difficulty_for(new_mastery);

  info!(target: "practice", topic = %body.topic, correct, new_mastery, %next_difficulty, "answer evaluated");
  Ok(Json(SubmitAnswerOut {
    correct,
    score,
    updated_mastery: new_mastery * 100.0,
    next_difficulty,
  }))
}

#[instrument(level = "info", skip(state, body), fields(text_len = body.syllabus_text.len()))]
pub async fn http_structure_syllabus(
  State(state): State<AppState>,
  Json(body): Json<StructureSyllabusIn>,
) -> Result<Json<StructureSyllabusOut>, AppError> {
  if body.syllabus_text.trim().is_empty() {
    return Err(AppError::Validation("Empty syllabus text".into()));
  }
  let llm = state.llm()?;

  let structured = structurer::structure(llm, &state.prompts, &body.syllabus_text).await?;
  let syllabus_id = state.syllabi.insert(structured.clone()).await?;

  info!(target: "syllabus", %syllabus_id, modules = structured.modules.len(), "syllabus stored");
  Ok(Json(StructureSyllabusOut { syllabus_id, structured_syllabus: structured }))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_get_syllabus(
  State(state): State<AppState>,
  Path(id): Path<String>,
) -> Result<Json<crate::domain::StructuredSyllabus>, AppError> {
  state
    .syllabi
    .get(&id)
    .await
    .map(Json)
    .ok_or_else(|| AppError::NotFound(format!("syllabus {id}")))
}
