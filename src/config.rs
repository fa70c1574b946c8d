//! Loading prompt configuration from TOML.
//!
//! Defaults are baked in; set PROMPT_CONFIG_PATH to a TOML file to tune the
//! instruction text without rebuilding. On any IO/parse error we log and fall
//! back to the defaults.

use serde::Deserialize;
use tracing::{info, error};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct PromptConfig {
  #[serde(default)]
  pub prompts: Prompts,
}

/// Instruction templates sent to the language model. `{key}` placeholders are
/// substituted with `util::fill_template`; literal JSON braces in the schema
/// blocks pass through untouched.
#[derive(Clone, Debug, Deserialize)]
pub struct Prompts {
  // MCQ generation
  pub question_system: String,
  pub question_user_template: String,
  // Syllabus structuring
  pub structure_system: String,
  pub structure_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      question_system: "You are a strict JSON generator. Return only valid JSON. Do not add explanations.".into(),
      question_user_template: r#"Generate ONE unique exam-style MCQ question about {topic}.

CRITICAL REQUIREMENTS:
- Difficulty: {difficulty}
- Focus on: {aspect}
- Question number: {question_number} (ensure this is DIFFERENT from previous questions)
- Must be a UNIQUE question - do NOT repeat common examples
- Use specific, detailed scenarios
- Avoid generic or textbook questions

DIVERSITY GUIDELINES:
- If this is question #{question_number}, explore a DIFFERENT sub-topic or angle
- Use varied contexts: industry applications, debugging scenarios, optimization, design patterns
- Include specific numbers, names, or scenarios to make it unique
- Avoid starting with "What is..." if possible - use scenario-based questions

QUESTION REQUIREMENTS:
- Type: Multiple Choice (MCQ)
- Exactly 4 options (A, B, C, D)
- One correct answer
- Make wrong answers plausible but clearly incorrect
- Provide a detailed explanation

Return ONLY valid JSON in this exact schema:
{
  "question": "Detailed, specific question text with context",
  "options": {
    "A": "First option",
    "B": "Second option",
    "C": "Third option",
    "D": "Fourth option"
  },
  "correct_answer": "A|B|C|D",
  "explanation": "Clear explanation of why the answer is correct and why others are wrong"
}

IMPORTANT: Make this question UNIQUE and SPECIFIC. Use real-world scenarios, specific examples, or edge cases."#.into(),
      structure_system: "You are a strict JSON generator. Return only valid JSON. Do not add explanations.".into(),
      structure_user_template: r#"Extract the syllabus structure.

Return ONLY valid JSON.

Schema:
{
  "modules": [
    {
      "name": "Module Name",
      "topics": [
        {
          "name": "Topic Name",
          "difficulty_hint": "easy|medium|hard",
          "subtopics": ["Subtopic 1", "Subtopic 2"]
        }
      ]
    }
  ]
}

Syllabus:
"""
{syllabus}
"""
"#.into(),
    }
  }
}

/// Attempt to load `PromptConfig` from PROMPT_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_prompt_config_from_env() -> Option<PromptConfig> {
  let path = std::env::var("PROMPT_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<PromptConfig>(&s) {
      Ok(cfg) => {
        info!(target: "prepx_backend", %path, "Loaded prompt config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "prepx_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "prepx_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
