// src/handlers/quizzes.rs

use futures::future::join_all;

use crate::{
    api::StudentApi,
    error::AppError,
    handlers::{Page, settle},
    models::quiz::QuizSummary,
    session::SessionStore,
};

/// The student's quizzes across every enrolled course.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuizBoard {
    pub available: Vec<QuizSummary>,
    pub completed: Vec<QuizSummary>,
}

/// Fetches enrolled courses, then every course's quizzes concurrently.
///
/// A course whose quiz list fails to load is skipped; a 401 still aborts.
pub async fn load_board<A>(api: &A) -> Result<QuizBoard, AppError>
where
    A: StudentApi + ?Sized,
{
    let courses = api.my_courses().await?;
    if courses.is_empty() {
        return Ok(QuizBoard::default());
    }

    let fetches = courses.iter().map(|course| async move {
        let result = api.course_quizzes(&course.id).await;
        (course, result)
    });

    let mut all = Vec::new();
    for (course, result) in join_all(fetches).await {
        match result {
            Ok(quizzes) => all.extend(quizzes.into_iter().map(|mut q| {
                q.course_title = course.title.clone();
                q
            })),
            Err(AppError::Unauthorized) => return Err(AppError::Unauthorized),
            Err(e) => {
                tracing::error!("Failed to fetch quizzes for course {}: {}", course.title, e);
            }
        }
    }

    let (completed, available): (Vec<QuizSummary>, Vec<QuizSummary>) =
        all.into_iter().partition(|q| q.is_submitted);
    Ok(QuizBoard {
        available,
        completed,
    })
}

/// Page entry for the student quiz list.
pub async fn show<A>(api: &A, session: &dyn SessionStore) -> Page<QuizBoard>
where
    A: StudentApi + ?Sized,
{
    settle(
        load_board(api).await,
        session,
        "Failed to load quizzes. Please try again later.",
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::quiz::Course,
        routes::Route,
        session::MemorySessionStore,
        test_support::{Fail, FakeApi},
    };

    fn summary(id: &str, course_id: &str, submitted: bool) -> QuizSummary {
        QuizSummary {
            id: id.to_string(),
            title: format!("Quiz {}", id),
            description: None,
            course_id: course_id.to_string(),
            course_title: String::new(),
            is_submitted: submitted,
            score: submitted.then_some(3.0),
            total_questions: 4,
        }
    }

    fn course(id: &str, title: &str) -> Course {
        Course {
            id: id.to_string(),
            title: title.to_string(),
        }
    }

    #[tokio::test]
    async fn splits_available_and_completed_with_course_titles() {
        let mut api = FakeApi {
            courses: vec![course("c1", "Rust 101"), course("c2", "Networks")],
            ..Default::default()
        };
        api.course_quizzes
            .insert("c1".to_string(), vec![summary("a", "c1", false), summary("b", "c1", true)]);
        api.course_quizzes
            .insert("c2".to_string(), vec![summary("c", "c2", false)]);

        let board = load_board(&api).await.unwrap();
        assert_eq!(board.available.len(), 2);
        assert_eq!(board.completed.len(), 1);
        assert_eq!(board.completed[0].course_title, "Rust 101");
        assert!(board.available.iter().any(|q| q.course_title == "Networks"));
    }

    #[tokio::test]
    async fn failing_course_is_skipped() {
        let mut api = FakeApi {
            courses: vec![course("c1", "Rust 101"), course("c2", "Networks")],
            ..Default::default()
        };
        api.course_quizzes
            .insert("c1".to_string(), vec![summary("a", "c1", false)]);
        api.failing_courses.insert("c2".to_string(), Fail::Server);

        let board = load_board(&api).await.unwrap();
        assert_eq!(board.available.len(), 1);
    }

    #[tokio::test]
    async fn unauthorized_course_fetch_redirects() {
        let mut api = FakeApi {
            courses: vec![course("c1", "Rust 101")],
            ..Default::default()
        };
        api.failing_courses.insert("c1".to_string(), Fail::Unauthorized);
        let session = MemorySessionStore::default();

        let page = show(&api, &session).await;
        assert!(matches!(page, Page::Redirect { to: Route::Login, .. }));
    }

    #[tokio::test]
    async fn no_enrollments_means_empty_board() {
        let api = FakeApi::default();
        assert_eq!(load_board(&api).await.unwrap(), QuizBoard::default());
    }
}
