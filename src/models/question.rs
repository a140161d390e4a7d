// src/models/question.rs

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// An answer option as the admin sees it, correctness included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizOption {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// A question with its options, correctness flags visible.
/// Returned by admin endpoints and the grading view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub options: Vec<QuizOption>,
}

impl Question {
    /// Ids of every option marked correct.
    pub fn correct_option_ids(&self) -> impl Iterator<Item = &str> {
        self.options
            .iter()
            .filter(|o| o.is_correct)
            .map(|o| o.id.as_str())
    }
}

/// Option shown to a student during an attempt.
/// There is no correctness field; any flag the server sends is dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicOption {
    pub id: String,
    pub text: String,
}

/// Question shown to a student during an attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub id: String,
    pub text: String,

    /// Reported by the server but the attempt UI is single-select regardless.
    #[serde(default)]
    pub is_multiple_choice: bool,

    pub options: Vec<PublicOption>,
}

impl PublicQuestion {
    pub fn has_option(&self, option_id: &str) -> bool {
        self.options.iter().any(|o| o.id == option_id)
    }

    pub fn option(&self, option_id: &str) -> Option<&PublicOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}

/// Option payload when creating or updating a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDraft {
    pub text: String,
    pub is_correct: bool,
}

/// DTO for creating or replacing a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct QuestionRequest {
    #[validate(custom(function = validate_question_text))]
    pub text: String,
    #[validate(custom(function = validate_options))]
    pub options: Vec<OptionDraft>,
}

fn validate_question_text(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::new("question_text_empty")
            .with_message("Question text cannot be empty.".into()));
    }
    if text.len() > 2000 {
        return Err(ValidationError::new("question_text_too_long")
            .with_message("Question text is too long.".into()));
    }
    Ok(())
}

fn validate_options(options: &[OptionDraft]) -> Result<(), ValidationError> {
    if options.len() < 2 {
        return Err(ValidationError::new("too_few_options")
            .with_message("A question must have at least two options.".into()));
    }
    if options.iter().any(|o| o.text.trim().is_empty()) {
        return Err(ValidationError::new("option_text_empty")
            .with_message("Option text cannot be empty.".into()));
    }
    if !options.iter().any(|o| o.is_correct) {
        return Err(ValidationError::new("no_correct_option")
            .with_message("At least one option must be marked as correct.".into()));
    }
    Ok(())
}
