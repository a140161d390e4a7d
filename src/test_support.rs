// src/test_support.rs

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    api::{
        AdminApi, AuthApi, StudentApi,
        auth::{Profile, TokenResponse},
    },
    error::AppError,
    models::{
        grading::{GradeRequest, GradedSubmission, GradingView, SubmissionSummary},
        question::{OptionDraft, PublicOption, PublicQuestion, Question, QuestionRequest, QuizOption},
        quiz::{Course, Quiz, QuizDetails, QuizRequest, QuizSummary},
        result::QuizResultDetails,
        submission::{Answer, SubmissionResult, WidgetAnswer},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fail {
    Unauthorized,
    NotFound,
    Server,
}

impl Fail {
    fn into_error(self) -> AppError {
        match self {
            Fail::Unauthorized => AppError::Unauthorized,
            Fail::NotFound => AppError::NotFound("Not found".to_string()),
            Fail::Server => AppError::Api {
                status: 500,
                message: "Server exploded".to_string(),
            },
        }
    }
}

/// In-memory stand-in for the LMS API.
#[derive(Default)]
pub struct FakeApi {
    pub quiz: Option<QuizDetails>,
    pub admin_quiz: Option<Quiz>,
    pub courses: Vec<Course>,
    pub course_quizzes: HashMap<String, Vec<QuizSummary>>,
    pub failing_courses: HashMap<String, Fail>,
    pub result: Option<QuizResultDetails>,
    pub grading: Option<GradingView>,
    pub submissions: Vec<SubmissionSummary>,
    pub submit_response: Option<SubmissionResult>,
    pub token: Option<TokenResponse>,
    pub profile: Option<Profile>,

    pub next_failure: Mutex<Option<Fail>>,
    /// Submit calls never complete.
    pub stall_submits: bool,
    pub submitted: Mutex<Vec<Vec<Answer>>>,
    pub widget_submitted: Mutex<Vec<Vec<WidgetAnswer>>>,
    pub graded: Mutex<Vec<(String, GradeRequest)>>,
    pub saved_questions: Mutex<Vec<(Option<String>, QuestionRequest)>>,
    pub saved_quizzes: Mutex<Vec<(Option<String>, QuizRequest)>>,
    pub deleted: Mutex<Vec<String>>,
    pub logouts: Mutex<usize>,
}

impl FakeApi {
    pub fn with_quiz(quiz: QuizDetails) -> Self {
        Self {
            quiz: Some(quiz),
            ..Default::default()
        }
    }

    /// The next call of any kind fails with `fail`.
    pub fn fail_next(&self, fail: Fail) {
        *self.next_failure.lock().unwrap() = Some(fail);
    }

    async fn stall(&self) {
        if self.stall_submits {
            std::future::pending::<()>().await;
        }
    }

    fn check(&self) -> Result<(), AppError> {
        match self.next_failure.lock().unwrap().take() {
            Some(fail) => Err(fail.into_error()),
            None => Ok(()),
        }
    }
}

fn not_found<T>(what: &str) -> Result<T, AppError> {
    Err(AppError::NotFound(format!("{} not found", what)))
}

#[async_trait]
impl StudentApi for FakeApi {
    async fn my_courses(&self) -> Result<Vec<Course>, AppError> {
        self.check()?;
        Ok(self.courses.clone())
    }

    async fn course_quizzes(&self, course_id: &str) -> Result<Vec<QuizSummary>, AppError> {
        if let Some(fail) = self.failing_courses.get(course_id) {
            return Err(fail.into_error());
        }
        Ok(self.course_quizzes.get(course_id).cloned().unwrap_or_default())
    }

    async fn quiz_details(&self, _course_id: &str, quiz_id: &str) -> Result<QuizDetails, AppError> {
        self.check()?;
        match &self.quiz {
            Some(q) if q.id == quiz_id => Ok(q.clone()),
            _ => not_found("Quiz"),
        }
    }

    async fn submit_answers(
        &self,
        _course_id: &str,
        _quiz_id: &str,
        answers: Vec<Answer>,
    ) -> Result<SubmissionResult, AppError> {
        self.check()?;
        self.stall().await;
        self.submitted.lock().unwrap().push(answers);
        Ok(self.submit_response.clone().unwrap_or(SubmissionResult::Deferred {
            submission_id: "sub-1".to_string(),
        }))
    }

    async fn submit_widget(
        &self,
        _quiz_id: &str,
        answers: Vec<WidgetAnswer>,
    ) -> Result<SubmissionResult, AppError> {
        self.check()?;
        self.stall().await;
        self.widget_submitted.lock().unwrap().push(answers);
        Ok(self.submit_response.clone().unwrap_or(SubmissionResult::Immediate {
            score: 100.0,
            passed: true,
        }))
    }

    async fn quiz_result(
        &self,
        _course_id: &str,
        _quiz_id: &str,
        _submission_id: &str,
    ) -> Result<QuizResultDetails, AppError> {
        self.check()?;
        self.result.clone().map_or_else(|| not_found("Result"), Ok)
    }
}

#[async_trait]
impl AdminApi for FakeApi {
    async fn courses(&self) -> Result<Vec<Course>, AppError> {
        self.check()?;
        Ok(self.courses.clone())
    }

    async fn quizzes_for_course(&self, course_id: &str) -> Result<Vec<Quiz>, AppError> {
        self.check()?;
        Ok(self
            .admin_quiz
            .iter()
            .filter(|q| q.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn quiz(&self, _quiz_id: &str) -> Result<Quiz, AppError> {
        self.check()?;
        self.admin_quiz.clone().map_or_else(|| not_found("Quiz"), Ok)
    }

    async fn create_quiz(&self, req: &QuizRequest) -> Result<Quiz, AppError> {
        self.check()?;
        self.saved_quizzes.lock().unwrap().push((None, req.clone()));
        Ok(quiz_from(req, "new-quiz"))
    }

    async fn update_quiz(&self, quiz_id: &str, req: &QuizRequest) -> Result<Quiz, AppError> {
        self.check()?;
        self.saved_quizzes
            .lock()
            .unwrap()
            .push((Some(quiz_id.to_string()), req.clone()));
        Ok(quiz_from(req, quiz_id))
    }

    async fn delete_quiz(&self, quiz_id: &str) -> Result<(), AppError> {
        self.check()?;
        self.deleted.lock().unwrap().push(quiz_id.to_string());
        Ok(())
    }

    async fn create_question(&self, _quiz_id: &str, req: &QuestionRequest) -> Result<Question, AppError> {
        self.check()?;
        self.saved_questions.lock().unwrap().push((None, req.clone()));
        Ok(question_from(req, "new-question"))
    }

    async fn update_question(&self, question_id: &str, req: &QuestionRequest) -> Result<Question, AppError> {
        self.check()?;
        self.saved_questions
            .lock()
            .unwrap()
            .push((Some(question_id.to_string()), req.clone()));
        Ok(question_from(req, question_id))
    }

    async fn delete_question(&self, question_id: &str) -> Result<(), AppError> {
        self.check()?;
        self.deleted.lock().unwrap().push(question_id.to_string());
        Ok(())
    }

    async fn quiz_submissions(&self, _quiz_id: &str) -> Result<Vec<SubmissionSummary>, AppError> {
        self.check()?;
        Ok(self.submissions.clone())
    }

    async fn grading_view(&self, _submission_id: &str) -> Result<GradingView, AppError> {
        self.check()?;
        self.grading.clone().map_or_else(|| not_found("Submission"), Ok)
    }

    async fn grade_submission(&self, submission_id: &str, req: &GradeRequest) -> Result<GradedSubmission, AppError> {
        self.check()?;
        self.graded
            .lock()
            .unwrap()
            .push((submission_id.to_string(), req.clone()));
        let mut submission = match &self.grading {
            Some(view) => view.submission.clone(),
            None => return not_found("Submission"),
        };
        submission.score = Some(req.score);
        submission.feedback = Some(req.feedback.clone());
        submission.is_graded = true;
        Ok(submission)
    }
}

#[async_trait]
impl AuthApi for FakeApi {
    async fn request_token(&self, _email: &str, _password: &str) -> Result<TokenResponse, AppError> {
        self.check()?;
        self.token.clone().ok_or(AppError::Api {
            status: 401,
            message: "Invalid credentials".to_string(),
        })
    }

    async fn profile(&self, _access_token: &str) -> Result<Profile, AppError> {
        self.profile.clone().map_or_else(|| not_found("Profile"), Ok)
    }

    async fn logout(&self) -> Result<(), AppError> {
        *self.logouts.lock().unwrap() += 1;
        self.check()
    }
}

fn quiz_from(req: &QuizRequest, id: &str) -> Quiz {
    Quiz {
        id: id.to_string(),
        title: req.title.clone(),
        description: Some(req.description.clone()),
        course_id: req.course_id.clone(),
        due_date: req.due_date,
        questions: Vec::new(),
    }
}

fn question_from(req: &QuestionRequest, id: &str) -> Question {
    Question {
        id: id.to_string(),
        text: req.text.clone(),
        options: req
            .options
            .iter()
            .enumerate()
            .map(|(i, OptionDraft { text, is_correct })| QuizOption {
                id: format!("{}-{}", id, i),
                text: text.clone(),
                is_correct: *is_correct,
            })
            .collect(),
    }
}

/// Two questions, options `<q>-a` / `<q>-b`.
pub fn two_question_quiz() -> QuizDetails {
    let question = |id: &str, text: &str| PublicQuestion {
        id: id.to_string(),
        text: text.to_string(),
        is_multiple_choice: false,
        options: ["a", "b"]
            .iter()
            .map(|o| PublicOption {
                id: format!("{}-{}", id, o),
                text: o.to_uppercase(),
            })
            .collect(),
    };

    QuizDetails {
        id: "quiz1".to_string(),
        course_id: "c1".to_string(),
        title: "Basics".to_string(),
        description: Some("Warm-up".to_string()),
        questions: vec![question("q1", "First?"), question("q2", "Second?")],
    }
}
