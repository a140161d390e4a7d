// src/models/quiz.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::question::{PublicQuestion, Question};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
}

/// Quiz as fetched for an attempt: questions and options, no answer key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizDetails {
    pub id: String,
    #[serde(default)]
    pub course_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub questions: Vec<PublicQuestion>,
}

impl QuizDetails {
    pub fn question(&self, question_id: &str) -> Option<&PublicQuestion> {
        self.questions.iter().find(|q| q.id == question_id)
    }
}

/// Quiz as the admin manages it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub course_id: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// Row in the student's quiz list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSummary {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub course_id: String,

    /// Filled in client-side from the enrolled course.
    #[serde(default)]
    pub course_title: String,

    #[serde(default)]
    pub is_submitted: bool,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub total_questions: u32,
}

/// DTO for creating or updating a quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct QuizRequest {
    #[validate(length(min = 1, max = 200, message = "Quiz title must be between 1 and 200 characters."))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: String,
    #[validate(length(min = 1, message = "Please select a course first to add a quiz."))]
    pub course_id: String,
    pub due_date: Option<DateTime<Utc>>,
}
