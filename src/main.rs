// src/main.rs

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use lms_quiz::{
    AppState,
    api::StudentApi,
    config::Config,
    error::AppError,
    handlers::{
        self, Page,
        attempt::{self, AttemptOutcome},
        auth, authoring,
        authoring::QuestionDraft,
        grading, quizzes, result, submissions,
        widget::{QuizWidget, WidgetOutcome},
    },
    models::question::OptionDraft,
    routes::Route,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Terminal client for the LMS quiz workflows.
#[derive(Parser)]
#[command(name = "lms-quiz", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and store the session.
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out and forget the stored session.
    Logout,
    /// List available and completed quizzes across enrolled courses.
    Quizzes,
    /// Take a quiz interactively and submit it.
    Take { course_id: String, quiz_id: String },
    /// Answer a quiz through the embedded widget endpoint.
    Widget { course_id: String, quiz_id: String },
    /// Show the reviewed results of a submission.
    Result {
        course_id: String,
        quiz_id: String,
        submission_id: String,
    },
    /// Authoring and grading.
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
}

#[derive(Subcommand)]
enum AdminCommand {
    /// List courses, or the quizzes of one course.
    Quizzes { course_id: Option<String> },
    QuizCreate {
        course_id: String,
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// RFC 3339, e.g. 2026-03-01T12:00:00Z
        #[arg(long)]
        due: Option<DateTime<Utc>>,
    },
    QuizUpdate {
        quiz_id: String,
        course_id: String,
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        due: Option<DateTime<Utc>>,
    },
    QuizDelete { quiz_id: String },
    /// Show a quiz with its questions and answer key.
    Questions { quiz_id: String },
    QuestionAdd {
        quiz_id: String,
        text: String,
        #[arg(long = "option", required = true)]
        options: Vec<String>,
        /// 1-based index of a correct option; repeatable. Defaults to the first.
        #[arg(long)]
        correct: Vec<usize>,
    },
    QuestionUpdate {
        quiz_id: String,
        question_id: String,
        text: String,
        #[arg(long = "option", required = true)]
        options: Vec<String>,
        #[arg(long)]
        correct: Vec<usize>,
    },
    QuestionDelete { question_id: String },
    /// List submissions for a quiz.
    Submissions { quiz_id: String },
    /// Show a submission with auto-score and per-option marks.
    GradeView { submission_id: String },
    /// Override the score of a submission.
    Grade {
        submission_id: String,
        score: String,
        #[arg(long)]
        feedback: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "lms-quiz.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stderr_layer = fmt::layer().with_writer(io::stderr).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    let state = match AppState::from_config(config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to build API client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(cli.command, &state).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Prints the notice of a non-ready page and hands back the value otherwise.
fn report<T>(page: Page<T>) -> Option<T> {
    match page {
        Page::Ready(value) => Some(value),
        Page::Failed { notice, back } => {
            println!("{}", notice);
            if let Some(back) = back {
                println!("Back: {}", back);
            }
            None
        }
        Page::Redirect { to, notice } => {
            println!("{}", notice);
            println!("-> {}", to);
            None
        }
    }
}

fn done(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

async fn run(command: Command, state: &AppState) -> Result<ExitCode, AppError> {
    let api = &state.client;
    let session = state.session.as_ref();

    match command {
        Command::Login { email, password } => {
            let landing = report(auth::login(api, session, &email, &password).await);
            if let Some((route, notice)) = &landing {
                println!("{}", notice);
                println!("-> {}", route);
            }
            Ok(done(landing.is_some()))
        }
        Command::Logout => {
            report(auth::logout(api, session).await);
            Ok(ExitCode::SUCCESS)
        }
        Command::Quizzes => {
            let Some(board) = report(quizzes::show(api, session).await) else {
                return Ok(ExitCode::FAILURE);
            };
            println!("Available quizzes:");
            if board.available.is_empty() {
                println!("  (none)");
            }
            for q in &board.available {
                println!("  {}/{}  {} [{}] ({} questions)", q.course_id, q.id, q.title, q.course_title, q.total_questions);
            }
            println!("Completed quizzes:");
            if board.completed.is_empty() {
                println!("  (none)");
            }
            for q in &board.completed {
                let score = q.score.map_or_else(|| "pending".to_string(), result::format_score);
                println!("  {}/{}  {} [{}] score: {}", q.course_id, q.id, q.title, q.course_title, score);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Take { course_id, quiz_id } => take_quiz(state, &course_id, &quiz_id).await,
        Command::Widget { course_id, quiz_id } => widget_quiz(state, &course_id, &quiz_id).await,
        Command::Result {
            course_id,
            quiz_id,
            submission_id,
        } => {
            let view = report(result::show(api, session, &course_id, &quiz_id, &submission_id).await);
            if let Some(view) = &view {
                print!("{}", view);
            }
            Ok(done(view.is_some()))
        }
        Command::Admin { command } => run_admin(command, state).await,
    }
}

/// Reads a 1-based choice in `1..=count` from stdin.
fn prompt_choice(count: usize) -> Result<usize, AppError> {
    let stdin = io::stdin();
    loop {
        print!("Your choice [1-{}]: ", count);
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Err(AppError::BadRequest("Input closed before all questions were answered.".to_string()));
        }
        match line.trim().parse::<usize>() {
            Ok(n) if (1..=count).contains(&n) => return Ok(n - 1),
            _ => println!("Please enter a number between 1 and {}.", count),
        }
    }
}

/// Walks the questions on stdin, calling `pick` with each chosen option.
fn collect_answers(
    quiz: &lms_quiz::models::quiz::QuizDetails,
    mut pick: impl FnMut(&str, &str) -> Result<(), AppError>,
) -> Result<(), AppError> {
    println!("{}", quiz.title);
    if let Some(description) = &quiz.description {
        println!("{}", description);
    }
    for (i, question) in quiz.questions.iter().enumerate() {
        println!();
        println!("{}. {}", i + 1, question.text);
        for (j, option) in question.options.iter().enumerate() {
            println!("   {}) {}", j + 1, option.text);
        }
        if question.options.is_empty() {
            continue;
        }
        let choice = prompt_choice(question.options.len())?;
        pick(&question.id, &question.options[choice].id)?;
    }
    Ok(())
}

async fn take_quiz(state: &AppState, course_id: &str, quiz_id: &str) -> Result<ExitCode, AppError> {
    let api = &state.client;
    let session = state.session.as_ref();

    let Some(mut attempt) = report(attempt::open(api, session, course_id, quiz_id).await) else {
        return Ok(ExitCode::FAILURE);
    };

    let quiz = attempt.quiz().clone();
    collect_answers(&quiz, |q, o| attempt.select(q, o))?;

    let Some(outcome) = report(attempt::submit(api, session, &mut attempt).await) else {
        return Ok(ExitCode::FAILURE);
    };
    match outcome {
        AttemptOutcome::ViewResults { route, notice } => {
            println!("{}", notice);
            show_result_route(state, &route).await
        }
        AttemptOutcome::Scored { notice, .. } => {
            println!("{}", notice);
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn widget_quiz(state: &AppState, course_id: &str, quiz_id: &str) -> Result<ExitCode, AppError> {
    let api = &state.client;
    let session = state.session.as_ref();

    let loaded = api.quiz_details(course_id, quiz_id).await;
    let Some(quiz) = report(handlers::settle(loaded, session, "Failed to load quiz details.", None)) else {
        return Ok(ExitCode::FAILURE);
    };

    let mut widget = QuizWidget::new(course_id, quiz);
    let quiz = widget.quiz().clone();
    collect_answers(&quiz, |q, o| widget.select(q, o))?;

    let Some((outcome, notice)) = report(widget.submit(api, session).await) else {
        return Ok(ExitCode::FAILURE);
    };
    println!("{}", notice);
    match outcome {
        WidgetOutcome::Pending { route } => show_result_route(state, &route).await,
        WidgetOutcome::Passed { .. } | WidgetOutcome::Failed { .. } => Ok(ExitCode::SUCCESS),
    }
}

async fn show_result_route(state: &AppState, route: &Route) -> Result<ExitCode, AppError> {
    let Route::QuizResult {
        course_id,
        quiz_id,
        submission_id,
    } = route
    else {
        println!("-> {}", route);
        return Ok(ExitCode::SUCCESS);
    };

    let page = result::show(&state.client, state.session.as_ref(), course_id, quiz_id, submission_id).await;
    let view = report(page);
    if let Some(view) = &view {
        println!();
        print!("{}", view);
    }
    Ok(done(view.is_some()))
}

fn draft_from_args(question_id: Option<String>, text: String, options: Vec<String>, correct: &[usize]) -> QuestionDraft {
    let options = options
        .into_iter()
        .enumerate()
        .map(|(i, text)| OptionDraft {
            text,
            is_correct: if correct.is_empty() { i == 0 } else { correct.contains(&(i + 1)) },
        })
        .collect();
    QuestionDraft {
        question_id,
        text,
        options,
    }
}

async fn run_admin(command: AdminCommand, state: &AppState) -> Result<ExitCode, AppError> {
    let api = &state.client;
    let session = state.session.as_ref();

    let ok = match command {
        AdminCommand::Quizzes { course_id: None } => {
            let courses = report(authoring::courses(api, session).await);
            for c in courses.iter().flatten() {
                println!("{}  {}", c.id, c.title);
            }
            courses.is_some()
        }
        AdminCommand::Quizzes {
            course_id: Some(course_id),
        } => {
            let list = report(authoring::quizzes(api, session, &course_id).await);
            for q in list.iter().flatten() {
                let due = q.due_date.map_or_else(|| "no due date".to_string(), |d| d.to_rfc3339());
                println!("{}  {} ({})", q.id, q.title, due);
            }
            list.is_some()
        }
        AdminCommand::QuizCreate {
            course_id,
            title,
            description,
            due,
        } => {
            let req = authoring::quiz_request(&title, &description, &course_id, due);
            let saved = report(authoring::save_quiz(api, session, None, req).await);
            if let Some((quiz, notice)) = &saved {
                println!("{} ({})", notice, quiz.id);
            }
            saved.is_some()
        }
        AdminCommand::QuizUpdate {
            quiz_id,
            course_id,
            title,
            description,
            due,
        } => {
            let req = authoring::quiz_request(&title, &description, &course_id, due);
            let saved = report(authoring::save_quiz(api, session, Some(&quiz_id), req).await);
            if let Some((_, notice)) = &saved {
                println!("{}", notice);
            }
            saved.is_some()
        }
        AdminCommand::QuizDelete { quiz_id } => print_notice(authoring::delete_quiz(api, session, &quiz_id).await),
        AdminCommand::Questions { quiz_id } => {
            let quiz = report(authoring::quiz(api, session, &quiz_id).await);
            if let Some(quiz) = &quiz {
                println!("{}", quiz.title);
                for (i, q) in quiz.questions.iter().enumerate() {
                    println!("{}. {} ({})", i + 1, q.text, q.id);
                    for o in &q.options {
                        let mark = if o.is_correct { "*" } else { " " };
                        println!("   [{}] {}", mark, o.text);
                    }
                }
            }
            quiz.is_some()
        }
        AdminCommand::QuestionAdd {
            quiz_id,
            text,
            options,
            correct,
        } => {
            let draft = draft_from_args(None, text, options, &correct);
            save_question(state, &quiz_id, &draft).await
        }
        AdminCommand::QuestionUpdate {
            quiz_id,
            question_id,
            text,
            options,
            correct,
        } => {
            let draft = draft_from_args(Some(question_id), text, options, &correct);
            save_question(state, &quiz_id, &draft).await
        }
        AdminCommand::QuestionDelete { question_id } => {
            print_notice(authoring::delete_question(api, session, &question_id).await)
        }
        AdminCommand::Submissions { quiz_id } => {
            let table = report(submissions::show(api, session, &quiz_id).await);
            if let Some(table) = &table {
                println!("Submissions for {}", table.quiz_title);
                for s in &table.rows {
                    let score = match (s.is_graded, s.score) {
                        (true, Some(score)) => result::format_score(score),
                        _ => "-".to_string(),
                    };
                    let status = if s.is_graded { "Graded" } else { "Pending" };
                    println!(
                        "{}  {} <{}>  {}  {}  score: {}",
                        s.id,
                        s.student.full_name,
                        s.student.email,
                        s.submitted_at.to_rfc3339(),
                        status,
                        score
                    );
                }
            }
            table.is_some()
        }
        AdminCommand::GradeView { submission_id } => {
            let session_view = report(grading::open(api, session, &submission_id).await);
            if let Some(g) = &session_view {
                let student = g
                    .view()
                    .submission
                    .student
                    .as_ref()
                    .map_or("unknown student", |s| s.full_name.as_str());
                println!("{} by {} ({:?})", g.view().quiz.title, student, g.status());
                println!(
                    "Auto-score: {}/{}  Grade field: {}",
                    g.auto_score(),
                    g.view().quiz.questions.len(),
                    g.grade_input
                );
                for q in g.marked_questions() {
                    let mark = if q.is_correct { "correct" } else { "incorrect" };
                    println!("{}. {} [{}]", q.number, q.text, mark);
                    for o in &q.options {
                        println!("   {} {}", o.mark.symbol(), o.text);
                    }
                }
                if !g.feedback_input.is_empty() {
                    println!("Feedback: {}", g.feedback_input);
                }
            }
            session_view.is_some()
        }
        AdminCommand::Grade {
            submission_id,
            score,
            feedback,
        } => {
            let Some(mut g) = report(grading::open(api, session, &submission_id).await) else {
                return Ok(ExitCode::FAILURE);
            };
            g.grade_input = score;
            if let Some(feedback) = feedback {
                g.feedback_input = feedback;
            }
            let ok = print_notice(grading::save(api, session, &mut g).await);
            if ok {
                println!("-> {}", grading::back_route(&g));
            }
            ok
        }
    };

    Ok(done(ok))
}

async fn save_question(state: &AppState, quiz_id: &str, draft: &QuestionDraft) -> bool {
    let page = authoring::save_question(&state.client, state.session.as_ref(), quiz_id, draft).await;
    match report(page) {
        Some((question, notice)) => {
            println!("{} ({})", notice, question.id);
            true
        }
        None => false,
    }
}

fn print_notice(page: Page<handlers::Notice>) -> bool {
    match report(page) {
        Some(notice) => {
            println!("{}", notice);
            true
        }
        None => false,
    }
}
