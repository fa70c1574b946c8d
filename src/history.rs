//! Question history: remembers which questions a user has already seen for a
//! topic, so the generator can steer the model away from repeats.
//!
//! Dedup is approximate on purpose: the default fingerprint is the lowercased,
//! trimmed first 50 characters of the question text, so two questions sharing
//! that prefix are indistinguishable. The `Fingerprint` trait leaves room for
//! a stronger similarity measure without touching the retry protocol.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::RwLock;

/// Lossy question-identity function used for duplicate detection.
pub trait Fingerprint: Send + Sync {
  fn fingerprint(&self, question: &str) -> String;
}

/// Default: normalized prefix of the question text.
pub struct PrefixFingerprint {
  prefix_len: usize,
}

impl PrefixFingerprint {
  pub fn new(prefix_len: usize) -> Self {
    Self { prefix_len }
  }
}

impl Default for PrefixFingerprint {
  fn default() -> Self {
    Self::new(50)
  }
}

impl Fingerprint for PrefixFingerprint {
  fn fingerprint(&self, question: &str) -> String {
    let lowered = question.to_lowercase();
    lowered.trim().chars().take(self.prefix_len).collect()
  }
}

/// Per-(user, topic) set of fingerprints. Grows monotonically; never pruned
/// for the life of the process. Cloning shares the underlying map.
#[derive(Clone)]
pub struct QuestionHistory {
  // user_id -> topic -> fingerprints
  asked: Arc<RwLock<HashMap<String, HashMap<String, HashSet<String>>>>>,
  fingerprint: Arc<dyn Fingerprint>,
}

impl Default for QuestionHistory {
  fn default() -> Self {
    Self::new(Arc::new(PrefixFingerprint::default()))
  }
}

impl QuestionHistory {
  pub fn new(fingerprint: Arc<dyn Fingerprint>) -> Self {
    Self { asked: Arc::new(RwLock::new(HashMap::new())), fingerprint }
  }

  pub async fn has_asked_before(&self, user_id: &str, topic: &str, question: &str) -> bool {
    let fp = self.fingerprint.fingerprint(question);
    self
      .asked
      .read()
      .await
      .get(user_id)
      .and_then(|topics| topics.get(topic))
      .map(|set| set.contains(&fp))
      .unwrap_or(false)
  }

  pub async fn mark_as_asked(&self, user_id: &str, topic: &str, question: &str) {
    let fp = self.fingerprint.fingerprint(question);
    self
      .asked
      .write()
      .await
      .entry(user_id.to_string())
      .or_default()
      .entry(topic.to_string())
      .or_default()
      .insert(fp);
  }

  pub async fn previous_question_count(&self, user_id: &str, topic: &str) -> usize {
    self
      .asked
      .read()
      .await
      .get(user_id)
      .and_then(|topics| topics.get(topic))
      .map(|set| set.len())
      .unwrap_or(0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn absent_user_or_topic_is_not_a_duplicate() {
    let h = QuestionHistory::default();
    assert!(!h.has_asked_before("u1", "graphs", "What is a DAG?").await);
    assert_eq!(h.previous_question_count("u1", "graphs").await, 0);
  }

  #[tokio::test]
  async fn mark_then_hit() {
    let h = QuestionHistory::default();
    h.mark_as_asked("u1", "graphs", "What is a DAG?").await;
    assert!(h.has_asked_before("u1", "graphs", "What is a DAG?").await);
    assert_eq!(h.previous_question_count("u1", "graphs").await, 1);
    // different topic, same user: clean slate
    assert!(!h.has_asked_before("u1", "trees", "What is a DAG?").await);
  }

  #[tokio::test]
  async fn fingerprint_normalizes_case_and_whitespace() {
    let h = QuestionHistory::default();
    h.mark_as_asked("u1", "graphs", "  What is a DAG?  ").await;
    assert!(h.has_asked_before("u1", "graphs", "what is a dag?").await);
  }

  #[tokio::test]
  async fn long_questions_collide_on_shared_prefix() {
    let h = QuestionHistory::default();
    let prefix = "x".repeat(50);
    h.mark_as_asked("u1", "graphs", &format!("{prefix} tail one")).await;
    // Same first 50 chars, different tail: lossy dedup treats it as seen.
    assert!(h.has_asked_before("u1", "graphs", &format!("{prefix} tail two")).await);
    // Re-marking an identical fingerprint does not grow the set.
    h.mark_as_asked("u1", "graphs", &format!("{prefix} tail three")).await;
    assert_eq!(h.previous_question_count("u1", "graphs").await, 1);
  }

  #[tokio::test]
  async fn short_questions_compare_whole() {
    let h = QuestionHistory::default();
    h.mark_as_asked("u1", "graphs", "Short?").await;
    assert!(!h.has_asked_before("u1", "graphs", "Short!").await);
  }
}
