//! Adaptive engine: per-user, per-topic mastery tracking and the
//! mastery-to-difficulty mapping.
//!
//! Mastery lives in [0.0, 1.0] with 0.5 as the uninitialized default.
//! Each answered question moves it by a fixed base change scaled by the
//! question's difficulty multiplier, symmetrically for correct/incorrect.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::domain::Difficulty;

/// Mastery change per question, in percentage points.
const BASE_CHANGE: f64 = 5.0;

const DEFAULT_MASTERY: f64 = 0.5;

/// Map mastery to the tier of the next question. Pure.
pub fn difficulty_for(mastery: f64) -> Difficulty {
  if mastery < 0.4 {
    Difficulty::Easy
  } else if mastery < 0.75 {
    Difficulty::Medium
  } else {
    Difficulty::Hard
  }
}

fn round4(x: f64) -> f64 {
  (x * 10_000.0).round() / 10_000.0
}

/// Owns the in-memory mastery store. Cloning shares the underlying map.
#[derive(Clone, Default)]
pub struct AdaptiveEngine {
  // user_id -> topic -> mastery
  store: Arc<RwLock<HashMap<String, HashMap<String, f64>>>>,
}

impl AdaptiveEngine {
  pub fn new() -> Self {
    Self::default()
  }

  /// Current mastery for (user, topic), defaulting to 0.5. Never writes.
  pub async fn get_mastery(&self, user_id: &str, topic: &str) -> f64 {
    self
      .store
      .read()
      .await
      .get(user_id)
      .and_then(|topics| topics.get(topic))
      .copied()
      .unwrap_or(DEFAULT_MASTERY)
  }

  /// Apply one answer outcome and return the new mastery.
  ///
  /// `score` is 0-100; >= 50 counts as correct. The delta is
  /// base change x difficulty multiplier x sign, converted to the 0-1 scale,
  /// then clamped to [0, 1] and rounded to 4 decimals on write.
  #[instrument(level = "debug", skip(self), fields(%user_id, %topic, score, %difficulty))]
  pub async fn update_mastery(
    &self,
    user_id: &str,
    topic: &str,
    score: f64,
    difficulty: Difficulty,
  ) -> f64 {
    let mut store = self.store.write().await;
    let current = store
      .get(user_id)
      .and_then(|topics| topics.get(topic))
      .copied()
      .unwrap_or(DEFAULT_MASTERY);

    let sign = if score >= 50.0 { 1.0 } else { -1.0 };
    let delta = (BASE_CHANGE * difficulty.multiplier() * sign) / 100.0;
    let updated = round4((current + delta).clamp(0.0, 1.0));

    store
      .entry(user_id.to_string())
      .or_default()
      .insert(topic.to_string(), updated);

    debug!(target: "practice", current, updated, "mastery updated");
    updated
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn difficulty_thresholds() {
    assert_eq!(difficulty_for(0.0), Difficulty::Easy);
    assert_eq!(difficulty_for(0.3999), Difficulty::Easy);
    assert_eq!(difficulty_for(0.4), Difficulty::Medium);
    assert_eq!(difficulty_for(0.7499), Difficulty::Medium);
    assert_eq!(difficulty_for(0.75), Difficulty::Hard);
    assert_eq!(difficulty_for(1.0), Difficulty::Hard);
  }

  #[tokio::test]
  async fn unseen_pair_defaults_to_half() {
    let engine = AdaptiveEngine::new();
    assert_eq!(engine.get_mastery("nobody", "nothing").await, 0.5);
  }

  #[tokio::test]
  async fn correct_medium_answer_from_default() {
    let engine = AdaptiveEngine::new();
    let m = engine.update_mastery("u1", "graphs", 100.0, Difficulty::Medium).await;
    assert_eq!(m, 0.55);
    assert_eq!(engine.get_mastery("u1", "graphs").await, 0.55);
  }

  #[tokio::test]
  async fn incorrect_hard_answer_from_default() {
    let engine = AdaptiveEngine::new();
    // score 20 < 50 counts as incorrect
    let m = engine.update_mastery("u1", "graphs", 20.0, Difficulty::Hard).await;
    assert_eq!(m, 0.425);
  }

  #[tokio::test]
  async fn clamps_at_lower_bound() {
    let engine = AdaptiveEngine::new();
    // Walk mastery down near zero, then fail an easy question.
    for _ in 0..32 {
      engine.update_mastery("u1", "sorting", 0.0, Difficulty::Hard).await;
    }
    let near_zero = engine.get_mastery("u1", "sorting").await;
    assert!(near_zero >= 0.0 && near_zero < 0.03);
    let m = engine.update_mastery("u1", "sorting", 0.0, Difficulty::Easy).await;
    assert_eq!(m, 0.0);
  }

  #[tokio::test]
  async fn clamps_at_upper_bound() {
    let engine = AdaptiveEngine::new();
    for _ in 0..10 {
      engine.update_mastery("u1", "trees", 100.0, Difficulty::Hard).await;
    }
    // 0.5 + 10 * 0.075 = 1.25, clamped at 1.0
    assert_eq!(engine.get_mastery("u1", "trees").await, 1.0);
  }

  #[tokio::test]
  async fn result_rounded_to_four_decimals() {
    let engine = AdaptiveEngine::new();
    // 0.5 - 0.03 = 0.47, then + 0.03 = 0.5; intermediate values stay at 4dp
    engine.update_mastery("u1", "dp", 0.0, Difficulty::Easy).await;
    let m = engine.get_mastery("u1", "dp").await;
    assert_eq!(m, 0.47);
    assert_eq!(m, round4(m));
  }

  #[tokio::test]
  async fn topics_and_users_are_independent() {
    let engine = AdaptiveEngine::new();
    engine.update_mastery("u1", "graphs", 100.0, Difficulty::Medium).await;
    assert_eq!(engine.get_mastery("u1", "trees").await, 0.5);
    assert_eq!(engine.get_mastery("u2", "graphs").await, 0.5);
  }
}
