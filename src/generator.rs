//! Question generation: prompt diversification, the model retry loop, and
//! duplicate avoidance.
//!
//! The model is unreliable in two ways we care about: it may return text that
//! is not (or does not contain) valid JSON, and it may return a question the
//! user has already seen. Both burn an attempt out of a budget of 3. Parse
//! failures on the last attempt surface as `Exhausted`; a duplicate on the
//! last attempt is accepted anyway and reported as `DuplicateAccepted` so the
//! fail-open is visible to callers instead of hidden in a loop exit.

use rand::seq::SliceRandom;
use tracing::{info, warn, instrument};

use crate::config::Prompts;
use crate::domain::{Difficulty, GeneratedQuestion};
use crate::error::AppError;
use crate::history::QuestionHistory;
use crate::llm::LanguageModel;
use crate::util::{extract_json_span, fill_template, trunc_for_log};

pub const MAX_ATTEMPTS: u32 = 3;

const REQUIRED_FIELDS: [&str; 4] = ["question", "options", "correct_answer", "explanation"];

/// Instruction-variation knob only; never persisted or returned.
const ASPECTS: [&str; 10] = [
  "theoretical concepts",
  "practical applications",
  "problem-solving scenarios",
  "real-world examples",
  "edge cases and exceptions",
  "comparisons and contrasts",
  "best practices",
  "common mistakes",
  "advanced techniques",
  "fundamental principles",
];

/// How a question made it out of the retry loop.
#[derive(Clone, Debug)]
pub enum QuestionOutcome {
  Fresh(GeneratedQuestion),
  /// All attempts produced already-seen questions; the last one is served
  /// anyway rather than failing the request.
  DuplicateAccepted(GeneratedQuestion),
}

impl QuestionOutcome {
  pub fn into_question(self) -> GeneratedQuestion {
    match self {
      QuestionOutcome::Fresh(q) | QuestionOutcome::DuplicateAccepted(q) => q,
    }
  }
}

#[derive(Clone, Default)]
pub struct QuestionGenerator {
  history: QuestionHistory,
}

impl QuestionGenerator {
  pub fn new(history: QuestionHistory) -> Self {
    Self { history }
  }

  /// Produce one validated MCQ for (topic, difficulty), avoiding questions
  /// `user_id` has seen before. Without a `user_id` there is no history to
  /// consult and every structurally valid question is accepted.
  #[instrument(level = "info", skip(self, llm, prompts), fields(%topic, %difficulty, user = user_id.unwrap_or("-")))]
  pub async fn generate(
    &self,
    llm: &dyn LanguageModel,
    prompts: &Prompts,
    topic: &str,
    difficulty: Difficulty,
    user_id: Option<&str>,
  ) -> Result<QuestionOutcome, AppError> {
    let aspect = ASPECTS
      .choose(&mut rand::thread_rng())
      .copied()
      .unwrap_or(ASPECTS[0]);
    let question_count = match user_id {
      Some(user) => self.history.previous_question_count(user, topic).await,
      None => 0,
    };

    let question_number = (question_count + 1).to_string();
    let mut prompt = fill_template(
      &prompts.question_user_template,
      &[
        ("topic", topic),
        ("difficulty", difficulty.as_str()),
        ("aspect", aspect),
        ("question_number", &question_number),
      ],
    );

    let mut last_error: Option<AppError> = None;
    for attempt in 1..=MAX_ATTEMPTS {
      let question = match self.attempt(llm, prompts, &prompt).await {
        Ok(q) => q,
        Err(e) => {
          warn!(target: "practice", %topic, attempt, error = %e, "question attempt failed");
          last_error = Some(e);
          continue;
        }
      };

      if let Some(user) = user_id {
        if self.history.has_asked_before(user, topic, &question.question).await {
          if attempt < MAX_ATTEMPTS {
            // Steer the model away and spend another attempt.
            prompt.push_str(&format!(
              "\n\nNOTE: Question attempt {} was too similar to a previous question. Generate something COMPLETELY DIFFERENT.",
              attempt
            ));
            continue;
          }
          // Out of attempts: serve the duplicate rather than fail the request.
          self.history.mark_as_asked(user, topic, &question.question).await;
          warn!(target: "practice", %topic, "accepting duplicate question after exhausting attempts");
          return Ok(QuestionOutcome::DuplicateAccepted(question));
        }
        self.history.mark_as_asked(user, topic, &question.question).await;
      }

      info!(target: "practice", %topic, attempt, preview = %trunc_for_log(&question.question, 60), "question accepted");
      return Ok(QuestionOutcome::Fresh(question));
    }

    let last = last_error
      .map(|e| e.to_string())
      .unwrap_or_else(|| "model kept repeating previous questions".into());
    Err(AppError::Exhausted { attempts: MAX_ATTEMPTS, last })
  }

  async fn attempt(
    &self,
    llm: &dyn LanguageModel,
    prompts: &Prompts,
    prompt: &str,
  ) -> Result<GeneratedQuestion, AppError> {
    let raw = llm
      .generate(&prompts.question_system, prompt, 0.7)
      .await
      .map_err(AppError::Upstream)?;
    parse_question(&raw)
  }

  #[allow(dead_code)]
  pub fn history(&self) -> &QuestionHistory {
    &self.history
  }
}

/// Extract the `{...}` span, parse it, and require all MCQ fields.
fn parse_question(raw: &str) -> Result<GeneratedQuestion, AppError> {
  let span = extract_json_span(raw).ok_or(AppError::NoJson)?;
  let value: serde_json::Value = serde_json::from_str(span)?;
  for field in REQUIRED_FIELDS {
    if value.get(field).is_none() {
      return Err(AppError::MissingField(field));
    }
  }
  Ok(serde_json::from_value(value)?)
}
