// tests/session_tests.rs

use std::collections::HashMap;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use axum::{
    Form, Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    routing::{get, post},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use lms_quiz::{
    ApiClient,
    api::StudentApi,
    error::AppError,
    handlers::{Page, auth},
    routes::Route,
    session::{FileSessionStore, MemorySessionStore, Session, SessionStore, StudentSession},
};
use serde_json::{Value, json};
use url::Url;

#[derive(Default)]
struct MockAuth {
    hits: AtomicUsize,
    logouts: AtomicUsize,
}

type Shared = Arc<MockAuth>;

async fn token(State(lms): State<Shared>, Form(form): Form<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    lms.hits.fetch_add(1, Ordering::SeqCst);
    let user = form.get("username").map(String::as_str);
    let password = form.get("password").map(String::as_str);
    match (user, password) {
        (Some("ada@example.com"), Some("secret")) => (
            StatusCode::OK,
            Json(json!({ "access_token": "ada-token", "role": "student" })),
        ),
        (Some("root@example.com"), Some("secret")) => (
            StatusCode::OK,
            Json(json!({ "access_token": "root-token", "role": "admin", "message": "Welcome back, admin" })),
        ),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Incorrect email or password" })),
        ),
    }
}

async fn profile(State(lms): State<Shared>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    lms.hits.fetch_add(1, Ordering::SeqCst);
    match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some("Bearer ada-token") => (StatusCode::OK, Json(json!({ "full_name": "Ada Lovelace" }))),
        _ => (StatusCode::UNAUTHORIZED, Json(json!({ "detail": "Not authenticated" }))),
    }
}

async fn logout(State(lms): State<Shared>) -> StatusCode {
    lms.hits.fetch_add(1, Ordering::SeqCst);
    lms.logouts.fetch_add(1, Ordering::SeqCst);
    StatusCode::OK
}

async fn my_courses(State(lms): State<Shared>) -> Json<Value> {
    lms.hits.fetch_add(1, Ordering::SeqCst);
    Json(json!([]))
}

async fn spawn_app() -> (Url, Shared) {
    let lms: Shared = Arc::new(MockAuth::default());

    let app = Router::new()
        .route("/api/auth/token", post(token))
        .route("/api/auth/logout", post(logout))
        .route("/api/profile/profile", get(profile))
        .route("/api/courses/my-courses", get(my_courses))
        .with_state(lms.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let address = Url::parse(&format!("http://127.0.0.1:{}", port)).unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (address, lms)
}

#[tokio::test]
async fn student_login_persists_session_to_file() {
    // Arrange
    let (address, _lms) = spawn_app().await;
    let path = std::env::temp_dir().join(format!("lms-session-{}.json", uuid::Uuid::new_v4()));
    let store = Arc::new(FileSessionStore::new(path.clone()));
    let api = ApiClient::new(address, store.clone()).unwrap();

    // Act
    let page = auth::login(&api, store.as_ref(), "ada@example.com", "secret").await;

    // Assert
    let (route, notice) = page.ready().expect("login should succeed");
    assert_eq!(route, Route::StudentDashboard);
    assert_eq!(notice.text, "Login Successful!");

    let reloaded = FileSessionStore::new(path.clone()).load().unwrap();
    match reloaded {
        Session::Student(s) => {
            assert_eq!(s.full_name, "Ada Lovelace");
            assert_eq!(s.email, "ada@example.com");
            assert_eq!(s.access_token, "ada-token");
        }
        other => panic!("unexpected session: {:?}", other),
    }

    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn admin_login_uses_server_message() {
    let (address, _lms) = spawn_app().await;
    let store = Arc::new(MemorySessionStore::default());
    let api = ApiClient::new(address, store.clone()).unwrap();

    let (route, notice) = auth::login(&api, store.as_ref(), "root@example.com", "secret")
        .await
        .ready()
        .unwrap();
    assert_eq!(route, Route::AdminDashboard);
    assert_eq!(notice.text, "Welcome back, admin");
    assert!(store.load().unwrap().is_admin());
}

#[tokio::test]
async fn bad_credentials_show_detail_and_leave_user_signed_out() {
    let (address, _lms) = spawn_app().await;
    let store = Arc::new(MemorySessionStore::default());
    let api = ApiClient::new(address, store.clone()).unwrap();

    let page = auth::login(&api, store.as_ref(), "ada@example.com", "wrong").await;
    match page {
        Page::Failed { notice, .. } => assert_eq!(notice.text, "Incorrect email or password"),
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(store.load().unwrap(), Session::Anonymous);
}

#[tokio::test]
async fn logout_hits_server_and_clears_session() {
    let (address, lms) = spawn_app().await;
    let store = Arc::new(MemorySessionStore::new(Session::Student(StudentSession {
        email: "ada@example.com".to_string(),
        full_name: "Ada".to_string(),
        role: "student".to_string(),
        access_token: "ada-token".to_string(),
    })));
    let api = ApiClient::new(address, store.clone()).unwrap();

    let page = auth::logout(&api, store.as_ref()).await;
    assert!(matches!(page, Page::Redirect { to: Route::Login, .. }));
    assert_eq!(lms.logouts.load(Ordering::SeqCst), 1);
    assert_eq!(store.load().unwrap(), Session::Anonymous);
}

#[tokio::test]
async fn expired_token_never_reaches_the_server() {
    let (address, lms) = spawn_app().await;
    let expired = encode(
        &Header::default(),
        &json!({ "sub": "ada@example.com", "role": "student", "exp": 1_000_000 }),
        &EncodingKey::from_secret(b"server-side-secret"),
    )
    .unwrap();
    let store = Arc::new(MemorySessionStore::new(Session::Student(StudentSession {
        email: "ada@example.com".to_string(),
        full_name: "Ada".to_string(),
        role: "student".to_string(),
        access_token: expired,
    })));
    let api = ApiClient::new(address, store.clone()).unwrap();

    let err = api.my_courses().await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));
    assert_eq!(lms.hits.load(Ordering::SeqCst), 0);
}
