// src/models/submission.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One answered question in a full attempt submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: String,
    pub selected_option_id: String,
}

/// DTO for `POST .../submissions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAnswersRequest {
    pub answers: Vec<Answer>,
}

/// One answered question in the lightweight widget submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetAnswer {
    pub question_id: String,
    pub option_id: String,
}

/// DTO for `POST /api/v1/quizzes/{id}/submit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetSubmitRequest {
    pub answers: Vec<WidgetAnswer>,
}

/// Submission record as stored by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    pub student_id: String,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub is_graded: bool,
}

/// Auto-graded outcome returned straight from a submit call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImmediateResult {
    pub score: f64,
    pub passed: bool,
}

/// Raw submit response. The server answers with either shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SubmitResponse {
    Immediate(ImmediateResult),
    Record(Submission),
}

/// What the caller does next after a submit.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionResult {
    /// Graded on the spot.
    Immediate { score: f64, passed: bool },
    /// Stored for grading; results live under the submission id.
    Deferred { submission_id: String },
}

impl From<SubmitResponse> for SubmissionResult {
    fn from(resp: SubmitResponse) -> Self {
        match resp {
            SubmitResponse::Immediate(r) => SubmissionResult::Immediate {
                score: r.score,
                passed: r.passed,
            },
            SubmitResponse::Record(s) => SubmissionResult::Deferred {
                submission_id: s.id,
            },
        }
    }
}
