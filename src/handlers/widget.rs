// src/handlers/widget.rs

use crate::{
    api::StudentApi,
    error::AppError,
    handlers::{InFlight, Notice, Page, settle},
    models::{quiz::QuizDetails, submission::SubmissionResult},
    routes::Route,
    session::SessionStore,
};

use super::attempt::AnswerCollector;

/// Embedded quiz card shown inside a course page.
/// Submits to the lightweight endpoint, which usually grades on the spot.
#[derive(Debug, Clone)]
pub struct QuizWidget {
    course_id: String,
    quiz: QuizDetails,
    answers: AnswerCollector,
    submitting: bool,
    outcome: Option<WidgetOutcome>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetOutcome {
    /// Completion is reported to the embedding page.
    Passed { score: f64 },
    Failed { score: f64 },
    /// The server stored the attempt for grading instead.
    Pending { route: Route },
}

impl QuizWidget {
    pub fn new(course_id: &str, quiz: QuizDetails) -> Self {
        Self {
            course_id: course_id.to_string(),
            quiz,
            answers: AnswerCollector::new(),
            submitting: false,
            outcome: None,
        }
    }

    pub fn quiz(&self) -> &QuizDetails {
        &self.quiz
    }

    pub fn outcome(&self) -> Option<&WidgetOutcome> {
        self.outcome.as_ref()
    }

    pub fn select(&mut self, question_id: &str, option_id: &str) -> Result<(), AppError> {
        self.answers.record(&self.quiz, question_id, option_id)
    }

    pub fn can_submit(&self) -> bool {
        !self.submitting && self.answers.covers(&self.quiz)
    }

    /// Submits the card. On failure the selections are kept for another try.
    pub async fn submit<A>(&mut self, api: &A, session: &dyn SessionStore) -> Page<(WidgetOutcome, Notice)>
    where
        A: StudentApi + ?Sized,
    {
        if !self.can_submit() {
            return Page::Failed {
                notice: Notice::warning("Please answer all questions before submitting."),
                back: None,
            };
        }

        let answers = self.answers.to_widget_answers();
        let result = {
            let _in_flight = InFlight::start(&mut self.submitting);
            api.submit_widget(&self.quiz.id, answers).await
        };

        let page = settle(result, session, "Failed to submit quiz.", None).map(|r| match r {
            SubmissionResult::Immediate { score, passed: true } => (
                WidgetOutcome::Passed { score },
                Notice::success(format!("Congratulations! You passed with a score of {:.2}%", score)),
            ),
            SubmissionResult::Immediate { score, passed: false } => (
                WidgetOutcome::Failed { score },
                Notice::error(format!(
                    "Quiz Failed. Your score was {:.2}%. Please try again later.",
                    score
                )),
            ),
            SubmissionResult::Deferred { submission_id } => (
                WidgetOutcome::Pending {
                    route: Route::QuizResult {
                        course_id: self.course_id.clone(),
                        quiz_id: self.quiz.id.clone(),
                        submission_id,
                    },
                },
                Notice::success("Quiz submitted successfully!"),
            ),
        });

        if let Page::Ready((outcome, _)) = &page {
            self.outcome = Some(outcome.clone());
        }
        page
    }
}
