// src/handlers/attempt.rs

use std::collections::HashMap;

use crate::{
    api::StudentApi,
    error::AppError,
    handlers::{InFlight, Notice, Page, settle},
    models::{
        quiz::QuizDetails,
        submission::{Answer, SubmissionResult, WidgetAnswer},
    },
    routes::Route,
    session::SessionStore,
};

/// Holds one selected option per question for the current attempt.
///
/// Single-select: choosing again for the same question replaces the earlier choice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerCollector {
    answers: HashMap<String, String>,
}

impl AnswerCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `option_id` for `question_id`, returning the replaced choice.
    pub fn select(&mut self, question_id: &str, option_id: &str) -> Option<String> {
        self.answers
            .insert(question_id.to_string(), option_id.to_string())
    }

    pub fn selected(&self, question_id: &str) -> Option<&str> {
        self.answers.get(question_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Like `select`, but both ids must belong to `quiz`.
    pub fn record(&mut self, quiz: &QuizDetails, question_id: &str, option_id: &str) -> Result<(), AppError> {
        let question = quiz
            .question(question_id)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown question '{}'", question_id)))?;

        if !question.has_option(option_id) {
            return Err(AppError::BadRequest(format!(
                "Option '{}' does not belong to question '{}'",
                option_id, question_id
            )));
        }

        self.select(question_id, option_id);
        Ok(())
    }

    /// Exactly one answer per question of `quiz`. `record` only accepts
    /// known question ids, so equal counts mean full coverage.
    pub fn covers(&self, quiz: &QuizDetails) -> bool {
        self.answers.len() == quiz.questions.len()
    }

    /// Payload for the full attempt endpoint. Order is irrelevant to the server.
    pub fn to_answers(&self) -> Vec<Answer> {
        self.answers
            .iter()
            .map(|(q, o)| Answer {
                question_id: q.clone(),
                selected_option_id: o.clone(),
            })
            .collect()
    }

    /// Payload for the lightweight widget endpoint.
    pub fn to_widget_answers(&self) -> Vec<WidgetAnswer> {
        self.answers
            .iter()
            .map(|(q, o)| WidgetAnswer {
                question_id: q.clone(),
                option_id: o.clone(),
            })
            .collect()
    }
}

/// A student's attempt at one quiz.
#[derive(Debug, Clone)]
pub struct QuizAttempt {
    course_id: String,
    quiz_id: String,
    quiz: QuizDetails,
    answers: AnswerCollector,
    submitting: bool,
}

impl QuizAttempt {
    pub fn new(course_id: &str, quiz_id: &str, quiz: QuizDetails) -> Self {
        Self {
            course_id: course_id.to_string(),
            quiz_id: quiz_id.to_string(),
            quiz,
            answers: AnswerCollector::new(),
            submitting: false,
        }
    }

    /// Fetches the quiz definition. Every call hits the server; nothing is cached.
    pub async fn load<A>(api: &A, course_id: &str, quiz_id: &str) -> Result<Self, AppError>
    where
        A: StudentApi + ?Sized,
    {
        let quiz = api.quiz_details(course_id, quiz_id).await?;
        tracing::info!(
            "Loaded quiz {} ({} questions) for course {}",
            quiz_id,
            quiz.questions.len(),
            course_id
        );
        Ok(Self::new(course_id, quiz_id, quiz))
    }

    pub fn quiz(&self) -> &QuizDetails {
        &self.quiz
    }

    pub fn answers(&self) -> &AnswerCollector {
        &self.answers
    }

    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    pub fn quiz_id(&self) -> &str {
        &self.quiz_id
    }

    /// Picks `option_id` for `question_id`. Both must belong to this quiz.
    pub fn select(&mut self, question_id: &str, option_id: &str) -> Result<(), AppError> {
        self.answers.record(&self.quiz, question_id, option_id)
    }

    pub fn answered(&self) -> usize {
        self.answers.len()
    }

    pub fn total(&self) -> usize {
        self.quiz.questions.len()
    }

    pub fn is_complete(&self) -> bool {
        self.answers.covers(&self.quiz)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.is_complete() && !self.submitting
    }

    /// Posts the answer set. Answers stay in place whatever the outcome.
    pub async fn submit<A>(&mut self, api: &A) -> Result<SubmissionResult, AppError>
    where
        A: StudentApi + ?Sized,
    {
        if self.submitting {
            return Err(AppError::BadRequest(
                "A submission is already in progress.".to_string(),
            ));
        }
        if !self.is_complete() {
            return Err(AppError::Incomplete {
                answered: self.answered(),
                total: self.total(),
            });
        }

        let answers = self.answers.to_answers();
        let _in_flight = InFlight::start(&mut self.submitting);

        tracing::info!("Submitting {} answers for quiz {}", answers.len(), self.quiz_id);
        api.submit_answers(&self.course_id, &self.quiz_id, answers)
            .await
    }
}

/// Where the attempt page goes after a successful submit.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    /// Stored for grading; open the results page.
    ViewResults { route: Route, notice: Notice },
    /// Graded on the spot by the server.
    Scored { score: f64, passed: bool, notice: Notice },
}

/// Page entry: load the quiz or show an error panel with a way back.
pub async fn open<A>(
    api: &A,
    session: &dyn SessionStore,
    course_id: &str,
    quiz_id: &str,
) -> Page<QuizAttempt>
where
    A: StudentApi + ?Sized,
{
    settle(
        QuizAttempt::load(api, course_id, quiz_id).await,
        session,
        "Failed to load quiz details.",
        Some(Route::QuizList),
    )
}

/// Submit button handler.
pub async fn submit<A>(
    api: &A,
    session: &dyn SessionStore,
    attempt: &mut QuizAttempt,
) -> Page<AttemptOutcome>
where
    A: StudentApi + ?Sized,
{
    if !attempt.is_complete() {
        return Page::Failed {
            notice: Notice::warning("Please answer all questions before submitting."),
            back: None,
        };
    }

    let result = attempt.submit(api).await;
    settle(result, session, "Failed to submit quiz.", None).map(|result| match result {
        SubmissionResult::Deferred { submission_id } => AttemptOutcome::ViewResults {
            route: Route::QuizResult {
                course_id: attempt.course_id.clone(),
                quiz_id: attempt.quiz_id.clone(),
                submission_id,
            },
            notice: Notice::success("Quiz submitted successfully!"),
        },
        SubmissionResult::Immediate { score, passed } => AttemptOutcome::Scored {
            score,
            passed,
            notice: if passed {
                Notice::success(format!("You passed with a score of {:.2}%", score))
            } else {
                Notice::error(format!("Your score was {:.2}%.", score))
            },
        },
    })
}
