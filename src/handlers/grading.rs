// src/handlers/grading.rs

use std::collections::{HashMap, HashSet};

use crate::{
    api::AdminApi,
    error::AppError,
    handlers::{Notice, Page, settle},
    models::{
        grading::{GradeRequest, GradedSubmission, GradingView, StoredAnswer},
        question::Question,
    },
    routes::Route,
    session::SessionStore,
};

/// Whether one question earns its point.
///
/// Exact set equality between the correct options and the selected ones.
/// No partial credit; a question with no correct option never scores.
pub fn question_is_correct(question: &Question, answer: Option<&StoredAnswer>) -> bool {
    let Some(answer) = answer else {
        return false;
    };

    let correct: HashSet<&str> = question.correct_option_ids().collect();
    let selected: HashSet<&str> = answer.selected_ids().into_iter().collect();

    !correct.is_empty() && correct == selected
}

/// One point per correctly answered question.
pub fn auto_score(view: &GradingView) -> u32 {
    let answers: HashMap<&str, &StoredAnswer> = view
        .submission
        .answers
        .iter()
        .map(|a| (a.question_id.as_str(), a))
        .collect();

    view.quiz
        .questions
        .iter()
        .filter(|q| question_is_correct(q, answers.get(q.id.as_str()).copied()))
        .count() as u32
}

/// How an option is flagged in the grading view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    /// Selected and correct.
    Correct,
    /// Selected but wrong.
    Incorrect,
    /// Not selected, but was the right answer.
    Missed,
    None,
}

impl OptionMark {
    pub fn of(selected: bool, is_correct: bool) -> Self {
        match (selected, is_correct) {
            (true, true) => OptionMark::Correct,
            (true, false) => OptionMark::Incorrect,
            (false, true) => OptionMark::Missed,
            (false, false) => OptionMark::None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            OptionMark::Correct => "[+]",
            OptionMark::Incorrect => "[x]",
            OptionMark::Missed => "[correct]",
            OptionMark::None => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedOption {
    pub text: String,
    pub mark: OptionMark,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedQuestion {
    pub number: usize,
    pub text: String,
    pub is_correct: bool,
    pub options: Vec<MarkedOption>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeStatus {
    Pending,
    Graded,
}

/// Admin grading modal for one submission.
#[derive(Debug, Clone)]
pub struct GradingSession {
    view: GradingView,
    auto_score: u32,
    /// Raw text of the score field.
    pub grade_input: String,
    pub feedback_input: String,
}

impl GradingSession {
    pub fn new(view: GradingView) -> Self {
        let auto_score = auto_score(&view);

        // Graded submissions start from the stored score, pending ones from the auto-score.
        let grade_input = match (view.submission.is_graded, view.submission.score) {
            (true, Some(score)) => crate::handlers::result::format_score(score),
            (true, None) => String::new(),
            (false, _) => auto_score.to_string(),
        };
        let feedback_input = view.submission.feedback.clone().unwrap_or_default();

        Self {
            view,
            auto_score,
            grade_input,
            feedback_input,
        }
    }

    pub async fn load<A>(api: &A, submission_id: &str) -> Result<Self, AppError>
    where
        A: AdminApi + ?Sized,
    {
        let view = api.grading_view(submission_id).await?;
        Ok(Self::new(view))
    }

    pub fn view(&self) -> &GradingView {
        &self.view
    }

    pub fn auto_score(&self) -> u32 {
        self.auto_score
    }

    pub fn status(&self) -> GradeStatus {
        if self.view.submission.is_graded {
            GradeStatus::Graded
        } else {
            GradeStatus::Pending
        }
    }

    /// Every question with its options flagged against the stored answer.
    pub fn marked_questions(&self) -> Vec<MarkedQuestion> {
        self.view
            .quiz
            .questions
            .iter()
            .enumerate()
            .map(|(i, q)| {
                let answer = self
                    .view
                    .submission
                    .answers
                    .iter()
                    .find(|a| a.question_id == q.id);
                let selected: HashSet<&str> = answer
                    .map(|a| a.selected_ids().into_iter().collect())
                    .unwrap_or_default();

                MarkedQuestion {
                    number: i + 1,
                    text: q.text.clone(),
                    is_correct: question_is_correct(q, answer),
                    options: q
                        .options
                        .iter()
                        .map(|o| MarkedOption {
                            text: o.text.clone(),
                            mark: OptionMark::of(selected.contains(o.id.as_str()), o.is_correct),
                        })
                        .collect(),
                }
            })
            .collect()
    }

    /// Parses the score field into the PUT payload.
    pub fn grade_request(&self) -> Result<GradeRequest, AppError> {
        let score: f64 = self
            .grade_input
            .trim()
            .parse()
            .ok()
            .filter(|s: &f64| s.is_finite())
            .ok_or_else(|| {
                AppError::BadRequest("Please enter a valid number for the score.".to_string())
            })?;

        Ok(GradeRequest {
            score,
            feedback: self.feedback_input.clone(),
        })
    }

    /// Persists the override. Re-grading an already graded submission simply overwrites.
    pub async fn save<A>(&mut self, api: &A) -> Result<GradedSubmission, AppError>
    where
        A: AdminApi + ?Sized,
    {
        let req = self.grade_request()?;
        let submission_id = self.view.submission.id.clone();
        tracing::info!(
            "Grading submission {} with score {} (auto-score {})",
            submission_id,
            req.score,
            self.auto_score
        );

        let updated = api.grade_submission(&submission_id, &req).await?;

        self.view.submission.score = Some(req.score);
        self.view.submission.feedback = Some(req.feedback);
        self.view.submission.is_graded = true;
        Ok(updated)
    }
}

/// Page entry: open the grading modal for a submission.
pub async fn open<A>(api: &A, session: &dyn SessionStore, submission_id: &str) -> Page<GradingSession>
where
    A: AdminApi + ?Sized,
{
    settle(
        GradingSession::load(api, submission_id).await,
        session,
        "Failed to load submission details.",
        None,
    )
}

/// Save button in the grading modal.
pub async fn save<A>(api: &A, session: &dyn SessionStore, grading: &mut GradingSession) -> Page<Notice>
where
    A: AdminApi + ?Sized,
{
    let quiz_id = grading.view.quiz.id.clone();
    settle(grading.save(api).await, session, "Failed to save grade.", None).map(|_| {
        tracing::debug!("Grade saved; submissions list for quiz {} is stale", quiz_id);
        Notice::success("Grade saved successfully!")
    })
}

/// Where the admin returns after grading.
pub fn back_route(grading: &GradingSession) -> Route {
    Route::QuizSubmissions {
        quiz_id: grading.view.quiz.id.clone(),
    }
}
