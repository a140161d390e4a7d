// src/handlers/authoring.rs

use validator::{Validate, ValidationErrors};

use crate::{
    api::AdminApi,
    error::AppError,
    handlers::{Notice, Page, settle},
    models::{
        question::{OptionDraft, Question, QuestionRequest},
        quiz::{Course, Quiz, QuizRequest},
    },
    routes::Route,
    session::SessionStore,
};

const MIN_OPTIONS: usize = 2;

/// First validation message, checking `fields` in order.
fn first_message(errors: &ValidationErrors, fields: &[&str]) -> String {
    let by_field = errors.field_errors();
    fields
        .iter()
        .filter_map(|field| by_field.get(*field))
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string())
}

/// Editable question form state.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionDraft {
    /// `Some` when editing an existing question.
    pub question_id: Option<String>,
    pub text: String,
    pub options: Vec<OptionDraft>,
}

impl Default for QuestionDraft {
    /// Blank template: two options, the first marked correct.
    fn default() -> Self {
        Self {
            question_id: None,
            text: String::new(),
            options: vec![
                OptionDraft {
                    text: String::new(),
                    is_correct: true,
                },
                OptionDraft {
                    text: String::new(),
                    is_correct: false,
                },
            ],
        }
    }
}

impl From<&Question> for QuestionDraft {
    fn from(question: &Question) -> Self {
        Self {
            question_id: Some(question.id.clone()),
            text: question.text.clone(),
            options: question
                .options
                .iter()
                .map(|o| OptionDraft {
                    text: o.text.clone(),
                    is_correct: o.is_correct,
                })
                .collect(),
        }
    }
}

impl QuestionDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_edit(&self) -> bool {
        self.question_id.is_some()
    }

    pub fn add_option(&mut self, text: impl Into<String>) {
        self.options.push(OptionDraft {
            text: text.into(),
            is_correct: false,
        });
    }

    pub fn set_option_text(&mut self, index: usize, text: impl Into<String>) -> Result<(), AppError> {
        let option = self.option_mut(index)?;
        option.text = text.into();
        Ok(())
    }

    /// Refused when it would leave fewer than two options.
    pub fn remove_option(&mut self, index: usize) -> Result<(), Notice> {
        if self.options.len() <= MIN_OPTIONS {
            return Err(Notice::warning("A question must have at least two options."));
        }
        if index >= self.options.len() {
            return Err(Notice::warning(format!("There is no option #{}.", index + 1)));
        }
        self.options.remove(index);
        Ok(())
    }

    pub fn toggle_correct(&mut self, index: usize) -> Result<(), AppError> {
        let option = self.option_mut(index)?;
        option.is_correct = !option.is_correct;
        Ok(())
    }

    fn option_mut(&mut self, index: usize) -> Result<&mut OptionDraft, AppError> {
        self.options
            .get_mut(index)
            .ok_or_else(|| AppError::BadRequest(format!("There is no option #{}.", index + 1)))
    }

    /// Validated payload. Text is checked before options and is sent as typed,
    /// apart from trimming.
    pub fn to_request(&self) -> Result<QuestionRequest, AppError> {
        let req = QuestionRequest {
            text: self.text.trim().to_string(),
            options: self
                .options
                .iter()
                .map(|o| OptionDraft {
                    text: o.text.trim().to_string(),
                    is_correct: o.is_correct,
                })
                .collect(),
        };
        req.validate()
            .map_err(|e| AppError::BadRequest(first_message(&e, &["text", "options"])))?;
        Ok(req)
    }
}

/// Validated quiz payload.
pub fn quiz_request(
    title: &str,
    description: &str,
    course_id: &str,
    due_date: Option<chrono::DateTime<chrono::Utc>>,
) -> Result<QuizRequest, AppError> {
    let req = QuizRequest {
        title: title.trim().to_string(),
        description: description.trim().to_string(),
        course_id: course_id.to_string(),
        due_date,
    };
    req.validate()
        .map_err(|e| AppError::BadRequest(first_message(&e, &["course_id", "title", "description"])))?;
    Ok(req)
}

pub async fn courses<A>(api: &A, session: &dyn SessionStore) -> Page<Vec<Course>>
where
    A: AdminApi + ?Sized,
{
    settle(api.courses().await, session, "Failed to fetch courses.", None)
}

pub async fn quizzes<A>(api: &A, session: &dyn SessionStore, course_id: &str) -> Page<Vec<Quiz>>
where
    A: AdminApi + ?Sized,
{
    settle(
        api.quizzes_for_course(course_id).await,
        session,
        "Failed to fetch quizzes.",
        Some(Route::AdminDashboard),
    )
}

/// Quiz with its questions, for the question manager.
pub async fn quiz<A>(api: &A, session: &dyn SessionStore, quiz_id: &str) -> Page<Quiz>
where
    A: AdminApi + ?Sized,
{
    settle(
        api.quiz(quiz_id).await,
        session,
        "Failed to fetch quiz details.",
        Some(Route::ManageQuizzes),
    )
}

/// Creates when `quiz_id` is `None`, otherwise replaces.
pub async fn save_quiz<A>(
    api: &A,
    session: &dyn SessionStore,
    quiz_id: Option<&str>,
    req: Result<QuizRequest, AppError>,
) -> Page<(Quiz, Notice)>
where
    A: AdminApi + ?Sized,
{
    let (fallback, done) = match quiz_id {
        Some(_) => ("Failed to update quiz.", "Quiz successfully updated!"),
        None => ("Failed to create quiz.", "Quiz successfully created!"),
    };

    let result = match req {
        Ok(req) => match quiz_id {
            Some(id) => api.update_quiz(id, &req).await,
            None => api.create_quiz(&req).await,
        },
        Err(e) => Err(e),
    };

    settle(result, session, fallback, None).map(|quiz| {
        tracing::info!("Saved quiz {} ({})", quiz.id, quiz.title);
        (quiz, Notice::success(done))
    })
}

pub async fn delete_quiz<A>(api: &A, session: &dyn SessionStore, quiz_id: &str) -> Page<Notice>
where
    A: AdminApi + ?Sized,
{
    settle(api.delete_quiz(quiz_id).await, session, "Failed to delete quiz.", None)
        .map(|()| Notice::success("Quiz deleted."))
}

/// Creates or updates the drafted question under `quiz_id`.
/// Nothing is sent when the draft is invalid.
pub async fn save_question<A>(
    api: &A,
    session: &dyn SessionStore,
    quiz_id: &str,
    draft: &QuestionDraft,
) -> Page<(Question, Notice)>
where
    A: AdminApi + ?Sized,
{
    let req = match draft.to_request() {
        Ok(req) => req,
        Err(e) => {
            return Page::Failed {
                notice: Notice::warning(e.user_message("Failed to save question.")),
                back: None,
            };
        }
    };

    let (result, done) = match &draft.question_id {
        Some(id) => (api.update_question(id, &req).await, "Question successfully updated!"),
        None => (api.create_question(quiz_id, &req).await, "Question successfully saved!"),
    };

    settle(result, session, "Failed to save question.", None)
        .map(|question| (question, Notice::success(done)))
}

pub async fn delete_question<A>(api: &A, session: &dyn SessionStore, question_id: &str) -> Page<Notice>
where
    A: AdminApi + ?Sized,
{
    settle(
        api.delete_question(question_id).await,
        session,
        "Failed to delete question.",
        None,
    )
    .map(|()| Notice::success("Question deleted."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        handlers::Level,
        models::question::QuizOption,
        session::{AdminSession, MemorySessionStore, Session},
        test_support::{Fail, FakeApi},
    };

    fn admin_store() -> MemorySessionStore {
        MemorySessionStore::new(Session::Admin(AdminSession {
            access_token: "admin-token".to_string(),
        }))
    }

    fn filled_draft() -> QuestionDraft {
        let mut draft = QuestionDraft::new();
        draft.text = "Which is a Rust keyword?".to_string();
        draft.set_option_text(0, "fn").unwrap();
        draft.set_option_text(1, "def").unwrap();
        draft
    }

    #[test]
    fn markup_characters_are_sent_as_typed() {
        let mut draft = QuestionDraft::new();
        draft.text = "Is 2 < 3 && 5 > 4?".to_string();
        draft.set_option_text(0, "Vec<T>").unwrap();
        draft.set_option_text(1, " Tom & Jerry ").unwrap();

        let req = draft.to_request().unwrap();
        assert_eq!(req.text, "Is 2 < 3 && 5 > 4?");
        assert_eq!(req.options[0].text, "Vec<T>");
        assert_eq!(req.options[1].text, "Tom & Jerry");

        let quiz = quiz_request("Generics", "Option<T> & Result<T, E>", "c1", None).unwrap();
        assert_eq!(quiz.description, "Option<T> & Result<T, E>");
    }

    #[test]
    fn template_has_two_options_first_correct() {
        let draft = QuestionDraft::new();
        assert_eq!(draft.options.len(), 2);
        assert!(draft.options[0].is_correct);
        assert!(!draft.options[1].is_correct);
        assert!(!draft.is_edit());
    }

    #[test]
    fn cannot_drop_below_two_options() {
        let mut draft = QuestionDraft::new();
        let notice = draft.remove_option(0).unwrap_err();
        assert_eq!(notice.level, Level::Warning);
        assert_eq!(notice.text, "A question must have at least two options.");

        draft.add_option("third");
        assert!(draft.remove_option(2).is_ok());
        assert_eq!(draft.options.len(), 2);
    }

    #[test]
    fn toggle_flips_one_option() {
        let mut draft = QuestionDraft::new();
        draft.toggle_correct(1).unwrap();
        assert!(draft.options[0].is_correct && draft.options[1].is_correct);
        draft.toggle_correct(0).unwrap();
        assert!(!draft.options[0].is_correct);
        assert!(draft.toggle_correct(5).is_err());
    }

    #[test]
    fn blank_text_reported_before_option_problems() {
        let draft = QuestionDraft::new();
        let err = draft.to_request().unwrap_err();
        assert_eq!(err.user_message(""), "Question text cannot be empty.");
    }

    #[test]
    fn option_problems_are_reported() {
        let mut draft = filled_draft();
        draft.set_option_text(1, "  ").unwrap();
        assert_eq!(
            draft.to_request().unwrap_err().user_message(""),
            "Option text cannot be empty."
        );

        let mut draft = filled_draft();
        draft.toggle_correct(0).unwrap();
        assert_eq!(
            draft.to_request().unwrap_err().user_message(""),
            "At least one option must be marked as correct."
        );
    }

    #[test]
    fn draft_from_existing_question_keeps_flags() {
        let question = Question {
            id: "q9".to_string(),
            text: "Pick".to_string(),
            options: vec![
                QuizOption {
                    id: "o1".to_string(),
                    text: "A".to_string(),
                    is_correct: false,
                },
                QuizOption {
                    id: "o2".to_string(),
                    text: "B".to_string(),
                    is_correct: true,
                },
            ],
        };
        let draft = QuestionDraft::from(&question);
        assert_eq!(draft.question_id.as_deref(), Some("q9"));
        assert!(draft.options[1].is_correct);
    }

    #[tokio::test]
    async fn invalid_draft_sends_nothing() {
        let api = FakeApi::default();
        let store = admin_store();
        let page = save_question(&api, &store, "quiz-1", &QuestionDraft::new()).await;

        assert!(matches!(page, Page::Failed { .. }));
        assert!(api.saved_questions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn new_question_is_created() {
        let api = FakeApi::default();
        let store = admin_store();
        let mut draft = filled_draft();
        draft.text = "Which keyword?".to_string();

        let (question, notice) = save_question(&api, &store, "quiz-1", &draft)
            .await
            .ready()
            .unwrap();
        assert_eq!(notice.text, "Question successfully saved!");
        assert_eq!(question.text, "Which keyword?");

        let saved = api.saved_questions.lock().unwrap();
        assert_eq!(saved[0].0, None);
        assert_eq!(saved[0].1.options.len(), 2);
    }

    #[tokio::test]
    async fn existing_question_is_updated() {
        let api = FakeApi::default();
        let store = admin_store();
        let mut draft = filled_draft();
        draft.question_id = Some("q5".to_string());

        let (_, notice) = save_question(&api, &store, "quiz-1", &draft)
            .await
            .ready()
            .unwrap();
        assert_eq!(notice.text, "Question successfully updated!");
        assert_eq!(api.saved_questions.lock().unwrap()[0].0.as_deref(), Some("q5"));
    }

    #[tokio::test]
    async fn quiz_without_course_is_refused_locally() {
        let api = FakeApi::default();
        let store = admin_store();
        let req = quiz_request("Week 1", "", "", None);

        let page = save_quiz(&api, &store, None, req).await;
        match page {
            Page::Failed { notice, .. } => {
                assert_eq!(notice.text, "Please select a course first to add a quiz.")
            }
            other => panic!("unexpected page: {:?}", other),
        }
        assert!(api.saved_quizzes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn quiz_update_failure_shows_server_message() {
        let api = FakeApi::default();
        let store = admin_store();
        api.fail_next(Fail::Server);
        let req = quiz_request("Week 1", "<i>intro</i>", "c1", None);

        let page = save_quiz(&api, &store, Some("quiz-1"), req).await;
        assert!(matches!(page, Page::Failed { notice, .. } if notice.text == "Server exploded"));
    }

    #[tokio::test]
    async fn expired_session_on_delete_redirects() {
        let api = FakeApi::default();
        let store = admin_store();
        api.fail_next(Fail::Unauthorized);

        let page = delete_question(&api, &store, "q1").await;
        assert!(matches!(page, Page::Redirect { to: Route::Login, .. }));
        assert_eq!(store.load().unwrap(), Session::Anonymous);
    }
}
