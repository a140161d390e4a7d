// src/api/student.rs

use async_trait::async_trait;
use reqwest::Method;

use super::ApiClient;
use crate::{
    error::AppError,
    models::{
        quiz::{Course, QuizDetails, QuizSummary},
        result::QuizResultDetails,
        submission::{
            Answer, SubmissionResult, SubmitAnswersRequest, SubmitResponse, WidgetAnswer,
            WidgetSubmitRequest,
        },
    },
    routes,
};

/// Student-facing endpoints.
#[async_trait]
pub trait StudentApi: Send + Sync {
    async fn my_courses(&self) -> Result<Vec<Course>, AppError>;

    async fn course_quizzes(&self, course_id: &str) -> Result<Vec<QuizSummary>, AppError>;

    async fn quiz_details(&self, course_id: &str, quiz_id: &str) -> Result<QuizDetails, AppError>;

    async fn submit_answers(
        &self,
        course_id: &str,
        quiz_id: &str,
        answers: Vec<Answer>,
    ) -> Result<SubmissionResult, AppError>;

    async fn submit_widget(
        &self,
        quiz_id: &str,
        answers: Vec<WidgetAnswer>,
    ) -> Result<SubmissionResult, AppError>;

    async fn quiz_result(
        &self,
        course_id: &str,
        quiz_id: &str,
        submission_id: &str,
    ) -> Result<QuizResultDetails, AppError>;
}

#[async_trait]
impl StudentApi for ApiClient {
    async fn my_courses(&self) -> Result<Vec<Course>, AppError> {
        self.get_json(&routes::my_courses()).await
    }

    async fn course_quizzes(&self, course_id: &str) -> Result<Vec<QuizSummary>, AppError> {
        self.get_json(&routes::course_quizzes(course_id)).await
    }

    async fn quiz_details(&self, course_id: &str, quiz_id: &str) -> Result<QuizDetails, AppError> {
        self.get_json(&routes::student_quiz(course_id, quiz_id)).await
    }

    async fn submit_answers(
        &self,
        course_id: &str,
        quiz_id: &str,
        answers: Vec<Answer>,
    ) -> Result<SubmissionResult, AppError> {
        let body = SubmitAnswersRequest { answers };
        let resp: SubmitResponse = self
            .send_json(Method::POST, &routes::student_submissions(course_id, quiz_id), &body)
            .await?;
        Ok(resp.into())
    }

    async fn submit_widget(
        &self,
        quiz_id: &str,
        answers: Vec<WidgetAnswer>,
    ) -> Result<SubmissionResult, AppError> {
        let body = WidgetSubmitRequest { answers };
        let resp: SubmitResponse = self
            .send_json(Method::POST, &routes::widget_submit(quiz_id), &body)
            .await?;
        Ok(resp.into())
    }

    async fn quiz_result(
        &self,
        course_id: &str,
        quiz_id: &str,
        submission_id: &str,
    ) -> Result<QuizResultDetails, AppError> {
        self.get_json(&routes::student_result(course_id, quiz_id, submission_id))
            .await
    }
}
