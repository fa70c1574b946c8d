//! Public request/response structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{Difficulty, GeneratedQuestion, StructuredSyllabus};

#[derive(Debug, Deserialize)]
pub struct GenerateQuestionIn {
    pub user_id: String,
    pub topic: String,
}

#[derive(Serialize)]
pub struct GenerateQuestionOut {
    pub topic: String,
    pub difficulty: Difficulty,
    pub question: GeneratedQuestion,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAnswerIn {
    pub user_id: String,
    pub topic: String,
    pub selected_option: String,
    pub correct_answer: String,
}

#[derive(Serialize)]
pub struct SubmitAnswerOut {
    pub correct: bool,
    /// 100 for a correct answer, 0 otherwise.
    pub score: u32,
    /// Percentage, 0-100 (clients display this directly).
    pub updated_mastery: f64,
    pub next_difficulty: Difficulty,
}

#[derive(Deserialize)]
pub struct StructureSyllabusIn {
    pub syllabus_text: String,
}

#[derive(Debug, Serialize)]
pub struct StructureSyllabusOut {
    pub syllabus_id: String,
    pub structured_syllabus: StructuredSyllabus,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
