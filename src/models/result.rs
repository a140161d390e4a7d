// src/models/result.rs

use serde::{Deserialize, Serialize};

/// Per-question outcome on the student's results page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultAnswer {
    pub question_id: String,
    pub question_text: String,
    pub selected_option_id: String,
    pub selected_option_text: String,
    pub correct_option_id: String,
    pub correct_option_text: String,
    pub is_correct: bool,
}

/// Result-detail payload for one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResultDetails {
    pub submission_id: String,
    #[serde(default)]
    pub quiz_title: String,
    pub score: f64,
    pub total_questions: u32,
    pub answers: Vec<ResultAnswer>,
}
