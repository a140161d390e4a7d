// src/routes.rs

use std::fmt;

use url::Url;

use crate::error::AppError;

/// Client-side navigation targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    StudentDashboard,
    AdminDashboard,
    QuizList,
    QuizAttempt { course_id: String, quiz_id: String },
    QuizResult {
        course_id: String,
        quiz_id: String,
        submission_id: String,
    },
    ManageQuizzes,
    ManageQuestions { quiz_id: String },
    QuizSubmissions { quiz_id: String },
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::StudentDashboard => "/student/dashboard".to_string(),
            Route::AdminDashboard => "/admin/dashboard".to_string(),
            Route::QuizList => "/student/quizzes".to_string(),
            Route::QuizAttempt { course_id, quiz_id } => {
                format!("/student/quizzes/{}/{}", course_id, quiz_id)
            }
            Route::QuizResult {
                course_id,
                quiz_id,
                submission_id,
            } => format!(
                "/student/quizzes/{}/{}/results/{}",
                course_id, quiz_id, submission_id
            ),
            Route::ManageQuizzes => "/admin/manage-quizzes".to_string(),
            Route::ManageQuestions { quiz_id } => format!("/admin/quizzes/{}/questions", quiz_id),
            Route::QuizSubmissions { quiz_id } => format!("/admin/quizzes/{}/submissions", quiz_id),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// A REST endpoint relative to the API base URL.
///
/// Segments are kept separate so ids are percent-encoded when joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiPath {
    segments: Vec<String>,
    query: Vec<(String, String)>,
}

impl ApiPath {
    fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
        }
    }

    fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Resolves this path against the configured base URL.
    pub fn resolve(&self, base: &Url) -> Result<Url, AppError> {
        let mut url = base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| AppError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?;
            segments.pop_if_empty();
            segments.extend(self.segments.iter());
        }
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        Ok(url)
    }
}

impl fmt::Display for ApiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        for (i, (k, v)) in self.query.iter().enumerate() {
            write!(f, "{}{}={}", if i == 0 { '?' } else { '&' }, k, v)?;
        }
        Ok(())
    }
}

// Auth

pub fn login() -> ApiPath {
    ApiPath::new(["api", "auth", "token"])
}

pub fn logout() -> ApiPath {
    ApiPath::new(["api", "auth", "logout"])
}

pub fn profile() -> ApiPath {
    ApiPath::new(["api", "profile", "profile"])
}

// Student

pub fn my_courses() -> ApiPath {
    ApiPath::new(["api", "courses", "my-courses"])
}

pub fn course_quizzes(course_id: &str) -> ApiPath {
    ApiPath::new(["api", "student", "courses", course_id, "quizzes"])
}

pub fn student_quiz(course_id: &str, quiz_id: &str) -> ApiPath {
    ApiPath::new([
        "api", "student", "quizzes", "courses", course_id, "quizzes", quiz_id,
    ])
}

pub fn student_submissions(course_id: &str, quiz_id: &str) -> ApiPath {
    ApiPath::new([
        "api",
        "student",
        "quizzes",
        "courses",
        course_id,
        "quizzes",
        quiz_id,
        "submissions",
    ])
}

pub fn student_result(course_id: &str, quiz_id: &str, submission_id: &str) -> ApiPath {
    ApiPath::new([
        "api",
        "student",
        "courses",
        course_id,
        "quizzes",
        quiz_id,
        "results",
        submission_id,
    ])
}

pub fn widget_submit(quiz_id: &str) -> ApiPath {
    ApiPath::new(["api", "v1", "quizzes", quiz_id, "submit"])
}

// Admin

pub fn admin_courses() -> ApiPath {
    ApiPath::new(["api", "admin", "courses"])
}

pub fn admin_quizzes() -> ApiPath {
    ApiPath::new(["api", "admin", "quizzes"])
}

pub fn admin_quizzes_for_course(course_id: &str) -> ApiPath {
    admin_quizzes().with_query("course_id", course_id)
}

pub fn admin_quiz(quiz_id: &str) -> ApiPath {
    ApiPath::new(["api", "admin", "quizzes", quiz_id])
}

pub fn admin_quiz_questions(quiz_id: &str) -> ApiPath {
    ApiPath::new(["api", "admin", "quizzes", quiz_id, "questions"])
}

pub fn admin_question(question_id: &str) -> ApiPath {
    ApiPath::new(["api", "admin", "questions", question_id])
}

pub fn admin_quiz_submissions(quiz_id: &str) -> ApiPath {
    ApiPath::new(["api", "admin", "quizzes", quiz_id, "submissions"])
}

pub fn grading_view(submission_id: &str) -> ApiPath {
    ApiPath::new(["api", "admin", "submissions", submission_id, "grading-view"])
}

pub fn grade_submission(submission_id: &str) -> ApiPath {
    ApiPath::new(["api", "admin", "submissions", submission_id, "grade"])
}
