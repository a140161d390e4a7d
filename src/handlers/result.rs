// src/handlers/result.rs

use std::fmt;

use crate::{
    api::StudentApi,
    handlers::{Page, settle},
    models::result::{QuizResultDetails, ResultAnswer},
    routes::Route,
    session::SessionStore,
};

/// Score as a percentage of total questions, rounded to 2 decimals.
/// Display only; pass/fail comes from the server.
pub fn percentage(score: f64, total_questions: u32) -> Option<f64> {
    if total_questions == 0 {
        return None;
    }
    let pct = score / f64::from(total_questions) * 100.0;
    Some((pct * 100.0).round() / 100.0)
}

/// Formats a score without a trailing `.0` for whole numbers.
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{}", score as i64)
    } else {
        format!("{}", score)
    }
}

/// One reviewed question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub number: usize,
    pub question: String,
    pub your_answer: String,
    pub is_correct: bool,
    /// Only present when the student's pick was wrong.
    pub correct_answer: Option<String>,
}

impl From<(usize, &ResultAnswer)> for ResultRow {
    fn from((index, answer): (usize, &ResultAnswer)) -> Self {
        Self {
            number: index + 1,
            question: answer.question_text.clone(),
            your_answer: answer.selected_option_text.clone(),
            is_correct: answer.is_correct,
            correct_answer: (!answer.is_correct).then(|| answer.correct_option_text.clone()),
        }
    }
}

/// The results page, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub quiz_title: String,
    pub score: f64,
    pub total_questions: u32,
    pub rows: Vec<ResultRow>,
}

impl ResultView {
    pub fn percentage(&self) -> Option<f64> {
        percentage(self.score, self.total_questions)
    }

    /// e.g. `2/2 (100.00%)`
    pub fn headline(&self) -> String {
        let pct = match self.percentage() {
            Some(p) => format!("{:.2}%", p),
            None => "N/A".to_string(),
        };
        format!("{}/{} ({})", format_score(self.score), self.total_questions, pct)
    }
}

impl From<&QuizResultDetails> for ResultView {
    fn from(details: &QuizResultDetails) -> Self {
        Self {
            quiz_title: details.quiz_title.clone(),
            score: details.score,
            total_questions: details.total_questions,
            rows: details.answers.iter().enumerate().map(ResultRow::from).collect(),
        }
    }
}

impl fmt::Display for ResultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Quiz Results: {}", self.quiz_title)?;
        writeln!(f, "Your Score: {}", self.headline())?;
        writeln!(f)?;
        for row in &self.rows {
            let mark = if row.is_correct { "[correct]" } else { "[wrong]" };
            writeln!(f, "{}. {} {}", row.number, row.question, mark)?;
            writeln!(f, "   Your answer: {}", row.your_answer)?;
            if let Some(correct) = &row.correct_answer {
                writeln!(f, "   Correct answer: {}", correct)?;
            }
        }
        Ok(())
    }
}

/// Page entry: fetch and shape the results for one submission.
pub async fn show<A>(
    api: &A,
    session: &dyn SessionStore,
    course_id: &str,
    quiz_id: &str,
    submission_id: &str,
) -> Page<ResultView>
where
    A: StudentApi + ?Sized,
{
    let result = api
        .quiz_result(course_id, quiz_id, submission_id)
        .await
        .map(|details| ResultView::from(&details));
    settle(result, session, "Failed to load quiz results.", Some(Route::QuizList))
}
