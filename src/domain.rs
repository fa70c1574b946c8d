//! Domain models: difficulty tiers, generated questions, and the structured syllabus tree.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Question difficulty tier. Always a projection of the learner's mastery,
/// never stored on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
}

impl Difficulty {
  /// Multiplier applied to the base mastery change for this tier.
  pub fn multiplier(self) -> f64 {
    match self {
      Difficulty::Easy => 0.6,
      Difficulty::Medium => 1.0,
      Difficulty::Hard => 1.5,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Difficulty::Easy => "easy",
      Difficulty::Medium => "medium",
      Difficulty::Hard => "hard",
    }
  }
}

impl Default for Difficulty {
  fn default() -> Self { Difficulty::Medium }
}

impl fmt::Display for Difficulty {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// One multiple-choice question as accepted from the model.
/// All four fields must be present before a question is served.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneratedQuestion {
  pub question: String,
  /// Choice label ("A".."D") to option text. BTreeMap keeps the serialized
  /// order stable for clients.
  pub options: BTreeMap<String, String>,
  pub correct_answer: String,
  pub explanation: String,
}

/// Structured form of a raw syllabus, as extracted by the model.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StructuredSyllabus {
  pub modules: Vec<Module>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Module {
  pub name: String,
  #[serde(default)]
  pub topics: Vec<Topic>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Topic {
  pub name: String,
  #[serde(default)]
  pub difficulty_hint: Difficulty,
  #[serde(default)]
  pub subtopics: Vec<String>,
}
