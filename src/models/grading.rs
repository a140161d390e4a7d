// src/models/grading.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::question::Question;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRef {
    pub id: String,
    pub full_name: String,
    pub email: String,
}

/// Row in the admin's submissions table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionSummary {
    pub id: String,
    pub student: StudentRef,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub is_graded: bool,
}

/// A stored answer as the grading view reports it.
///
/// Single-select attempts fill `selected_option_id`; `selected_option_ids`
/// carries multi-select answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAnswer {
    pub question_id: String,
    #[serde(default)]
    pub selected_option_id: Option<String>,
    #[serde(default)]
    pub selected_option_ids: Option<Vec<String>>,
}

impl StoredAnswer {
    /// The option ids the student picked for this question.
    /// An empty `selected_option_ids` list counts as absent, not as an empty selection.
    pub fn selected_ids(&self) -> Vec<&str> {
        match &self.selected_option_ids {
            Some(ids) if !ids.is_empty() => ids.iter().map(String::as_str).collect(),
            _ => self.selected_option_id.as_deref().into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedSubmission {
    pub id: String,
    #[serde(default)]
    pub student: Option<StudentRef>,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub is_graded: bool,
    #[serde(default)]
    pub answers: Vec<StoredAnswer>,
    #[serde(default)]
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingQuiz {
    pub id: String,
    pub title: String,
    pub questions: Vec<Question>,
}

/// Payload of `GET /api/admin/submissions/{id}/grading-view`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingView {
    pub submission: GradedSubmission,
    pub quiz: GradingQuiz,
}

/// DTO for `PUT /api/admin/submissions/{id}/grade`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeRequest {
    pub score: f64,
    pub feedback: String,
}
