// src/handlers/submissions.rs

use crate::{
    api::AdminApi,
    error::AppError,
    handlers::{Page, settle},
    models::grading::SubmissionSummary,
    routes::Route,
    session::SessionStore,
};

/// Admin table of submissions for one quiz.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionsTable {
    pub quiz_title: String,
    pub rows: Vec<SubmissionSummary>,
}

impl SubmissionsTable {
    pub fn pending(&self) -> impl Iterator<Item = &SubmissionSummary> {
        self.rows.iter().filter(|s| !s.is_graded)
    }
}

pub async fn load_table<A>(api: &A, quiz_id: &str) -> Result<SubmissionsTable, AppError>
where
    A: AdminApi + ?Sized,
{
    let quiz = api.quiz(quiz_id).await?;
    let rows = api.quiz_submissions(quiz_id).await?;
    Ok(SubmissionsTable {
        quiz_title: quiz.title,
        rows,
    })
}

/// Page entry. Always re-fetched so grades saved elsewhere show up.
pub async fn show<A>(api: &A, session: &dyn SessionStore, quiz_id: &str) -> Page<SubmissionsTable>
where
    A: AdminApi + ?Sized,
{
    settle(
        load_table(api, quiz_id).await,
        session,
        "Failed to fetch submissions.",
        Some(Route::ManageQuizzes),
    )
}
