// src/api/admin.rs

use async_trait::async_trait;
use reqwest::Method;

use super::ApiClient;
use crate::{
    error::AppError,
    models::{
        grading::{GradeRequest, GradedSubmission, GradingView, SubmissionSummary},
        question::{Question, QuestionRequest},
        quiz::{Course, Quiz, QuizRequest},
    },
    routes,
};

/// Admin-only endpoints: authoring and grading.
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn courses(&self) -> Result<Vec<Course>, AppError>;

    async fn quizzes_for_course(&self, course_id: &str) -> Result<Vec<Quiz>, AppError>;

    async fn quiz(&self, quiz_id: &str) -> Result<Quiz, AppError>;

    async fn create_quiz(&self, req: &QuizRequest) -> Result<Quiz, AppError>;

    async fn update_quiz(&self, quiz_id: &str, req: &QuizRequest) -> Result<Quiz, AppError>;

    async fn delete_quiz(&self, quiz_id: &str) -> Result<(), AppError>;

    async fn create_question(&self, quiz_id: &str, req: &QuestionRequest) -> Result<Question, AppError>;

    async fn update_question(&self, question_id: &str, req: &QuestionRequest) -> Result<Question, AppError>;

    async fn delete_question(&self, question_id: &str) -> Result<(), AppError>;

    async fn quiz_submissions(&self, quiz_id: &str) -> Result<Vec<SubmissionSummary>, AppError>;

    async fn grading_view(&self, submission_id: &str) -> Result<GradingView, AppError>;

    async fn grade_submission(&self, submission_id: &str, req: &GradeRequest) -> Result<GradedSubmission, AppError>;
}

#[async_trait]
impl AdminApi for ApiClient {
    async fn courses(&self) -> Result<Vec<Course>, AppError> {
        self.get_json(&routes::admin_courses()).await
    }

    async fn quizzes_for_course(&self, course_id: &str) -> Result<Vec<Quiz>, AppError> {
        self.get_json(&routes::admin_quizzes_for_course(course_id)).await
    }

    async fn quiz(&self, quiz_id: &str) -> Result<Quiz, AppError> {
        self.get_json(&routes::admin_quiz(quiz_id)).await
    }

    async fn create_quiz(&self, req: &QuizRequest) -> Result<Quiz, AppError> {
        self.send_json(Method::POST, &routes::admin_quizzes(), req).await
    }

    async fn update_quiz(&self, quiz_id: &str, req: &QuizRequest) -> Result<Quiz, AppError> {
        self.send_json(Method::PUT, &routes::admin_quiz(quiz_id), req).await
    }

    async fn delete_quiz(&self, quiz_id: &str) -> Result<(), AppError> {
        self.send_empty(Method::DELETE, &routes::admin_quiz(quiz_id)).await
    }

    async fn create_question(&self, quiz_id: &str, req: &QuestionRequest) -> Result<Question, AppError> {
        self.send_json(Method::POST, &routes::admin_quiz_questions(quiz_id), req)
            .await
    }

    async fn update_question(&self, question_id: &str, req: &QuestionRequest) -> Result<Question, AppError> {
        self.send_json(Method::PUT, &routes::admin_question(question_id), req)
            .await
    }

    async fn delete_question(&self, question_id: &str) -> Result<(), AppError> {
        self.send_empty(Method::DELETE, &routes::admin_question(question_id))
            .await
    }

    async fn quiz_submissions(&self, quiz_id: &str) -> Result<Vec<SubmissionSummary>, AppError> {
        self.get_json(&routes::admin_quiz_submissions(quiz_id)).await
    }

    async fn grading_view(&self, submission_id: &str) -> Result<GradingView, AppError> {
        self.get_json(&routes::grading_view(submission_id)).await
    }

    async fn grade_submission(&self, submission_id: &str, req: &GradeRequest) -> Result<GradedSubmission, AppError> {
        self.send_json(Method::PUT, &routes::grade_submission(submission_id), req)
            .await
    }
}
