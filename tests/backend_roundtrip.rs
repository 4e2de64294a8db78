//! End-to-end flows through the real HTTP client against an in-process fake
//! backend.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use classroom_copilot::api::{ApiClient, ClientError};
use classroom_copilot::classroom::{Classroom, ViewError};
use classroom_copilot::config::Timeouts;
use classroom_copilot::guard::{Navigation, Route, RouteGuard};
use classroom_copilot::oauth::OAuthCoordinator;
use classroom_copilot::session::SessionStore;
use classroom_copilot::storage::FileStorage;
use classroom_copilot::views::{self, LoginView};

// =============================================================================
// FAKE BACKEND
// =============================================================================

#[derive(Default)]
struct Backend {
    /// Token the backend currently honors.
    valid_token: Mutex<Option<String>>,
    logouts: Mutex<Vec<String>>,
}

impl Backend {
    fn authorized(&self, headers: &HeaderMap) -> bool {
        let Some(valid) = self.valid_token.lock().unwrap().clone() else {
            return false;
        };
        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == format!("Token {valid}"))
    }
}

type Shared = Arc<Backend>;

async fn login_url() -> Json<Value> {
    Json(json!({ "authorization_url": "https://accounts.google.com/o/oauth2/auth?client_id=x" }))
}

async fn exchange(State(backend): State<Shared>, Json(body): Json<Value>) -> Response {
    if body["code"] != "good" || body["state"].as_str().is_none_or(str::is_empty) {
        return (StatusCode::BAD_REQUEST, "invalid_grant").into_response();
    }
    *backend.valid_token.lock().unwrap() = Some("tok1".to_owned());
    Json(json!({
        "token": "tok1",
        "user": { "id": 1, "name": "A", "email": "a@x.com" },
    }))
    .into_response()
}

async fn logout(State(backend): State<Shared>, headers: HeaderMap) -> StatusCode {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    backend.logouts.lock().unwrap().push(header);
    *backend.valid_token.lock().unwrap() = None;
    StatusCode::NO_CONTENT
}

async fn courses(State(backend): State<Shared>, headers: HeaderMap) -> Response {
    if !backend.authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, r#"{"detail":"Invalid token."}"#).into_response();
    }
    Json(json!([{ "id": 1, "google_id": "course123", "name": "Introduction to AI" }])).into_response()
}

async fn assignments(State(backend): State<Shared>, headers: HeaderMap, Path(course_id): Path<i64>) -> Response {
    if !backend.authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({
        "count": 2,
        "results": [
            { "id": 101, "course": course_id, "title": "Essay", "status": "DraftReady" },
            { "id": 102, "course": course_id, "title": "Quiz", "status": "Submitted" },
        ],
    }))
    .into_response()
}

async fn review(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Path(draft_id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if !backend.authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({
        "id": draft_id,
        "assignment": 101,
        "status": "UserReviewed",
        "generated_content": "draft",
        "user_edits": body["user_edits"],
    }))
    .into_response()
}

async fn spawn_backend() -> (String, Shared) {
    let backend = Shared::default();
    let app = Router::new()
        .route("/api/auth/google/login", get(login_url))
        .route("/api/auth/google/callback", post(exchange))
        .route("/api/auth/logout", post(logout))
        .route("/api/classroom/courses/", get(courses))
        .route("/api/classroom/courses/{course_id}/assignments/", get(assignments))
        .route("/api/ai/drafts/{draft_id}/review/", patch(review))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/api"), backend)
}

struct Harness {
    backend: Shared,
    session: SessionStore,
    oauth: OAuthCoordinator<ApiClient>,
    classroom: Classroom<ApiClient>,
    guard: RouteGuard,
    _dir: tempfile::TempDir,
}

async fn harness() -> Harness {
    let (base_url, backend) = spawn_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("session.json"));
    let session = SessionStore::new(Arc::new(storage));
    let api = ApiClient::with_base_url(&base_url, Timeouts::default()).unwrap();
    Harness {
        backend,
        oauth: OAuthCoordinator::new(api.clone(), session.clone()),
        classroom: Classroom::new(api, session.clone()),
        guard: RouteGuard::new(session.clone()),
        session,
        _dir: dir,
    }
}

// =============================================================================
// FLOWS
// =============================================================================

#[tokio::test]
async fn login_callback_then_dashboard() {
    let h = harness().await;

    let LoginView::OpenProvider { authorization_url } = views::login_view(&h.oauth).await else {
        panic!("login view failed");
    };
    assert!(authorization_url.starts_with("https://accounts.google.com/"));

    let outcome = views::callback_view(&h.oauth, "http://localhost:3000/auth/google/callback?code=good&state=s1").await;
    assert_eq!(outcome.next, Route::Dashboard);
    assert_eq!(h.session.token().as_deref(), Some("tok1"));
    assert_eq!(h.session.current_user().unwrap().email, "a@x.com");
    assert_eq!(h.guard.evaluate(Route::Dashboard), Navigation::Render(Route::Dashboard));

    let courses = h.classroom.courses().await.unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].name, "Introduction to AI");
}

#[tokio::test]
async fn paginated_assignments_filter_submitted() {
    let h = harness().await;
    h.oauth.complete_callback("good", "s1").await.unwrap();

    let visible = h.classroom.assignments(1, false).await.unwrap();
    assert_eq!(visible.iter().map(|a| a.id).collect::<Vec<_>>(), vec![101]);
    assert_eq!(h.classroom.assignments(1, true).await.unwrap().len(), 2);
}

#[tokio::test]
async fn review_sends_patch_body() {
    let h = harness().await;
    h.oauth.complete_callback("good", "s1").await.unwrap();

    let review = classroom_copilot::api::types::DraftReview {
        user_edits: Some("tighter intro".into()),
        final_content_for_submission: None,
    };
    let draft = h.classroom.review_draft(7, review).await.unwrap();
    assert_eq!(draft.id, 7);
    assert_eq!(draft.user_edits.as_deref(), Some("tighter intro"));
}

#[tokio::test]
async fn rejected_exchange_leaves_no_session() {
    let h = harness().await;
    let err = h.oauth.complete_callback("bad", "s1").await.unwrap_err();
    assert_eq!(err, ClientError::AuthExchange { status: 400, body: "invalid_grant".into() });
    assert!(!h.session.is_authenticated());
    assert_eq!(h.guard.evaluate(Route::Dashboard), Navigation::Redirect(Route::Login));
}

#[tokio::test]
async fn revoked_token_clears_session_and_redirects() {
    let h = harness().await;
    h.oauth.complete_callback("good", "s1").await.unwrap();
    *h.backend.valid_token.lock().unwrap() = None;

    let err = h.classroom.courses().await.unwrap_err();
    assert_eq!(err, ViewError::Redirect(Route::Login));
    assert!(!h.session.is_authenticated());
    assert!(h.session.current_user().is_none());
}

#[tokio::test]
async fn logout_notifies_backend_and_clears() {
    let h = harness().await;
    h.oauth.complete_callback("good", "s1").await.unwrap();

    h.oauth.logout().await.unwrap();
    assert_eq!(*h.backend.logouts.lock().unwrap(), vec!["Token tok1".to_owned()]);
    assert!(!h.session.is_authenticated());

    // Nothing to tell the backend once logged out, but clearing still succeeds.
    h.oauth.logout().await.unwrap();
    assert_eq!(h.backend.logouts.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn unreachable_backend_is_network_error() {
    let dir = tempfile::tempdir().unwrap();
    let session = SessionStore::new(Arc::new(FileStorage::new(dir.path().join("s.json"))));
    let api = ApiClient::with_base_url("http://127.0.0.1:1/api", Timeouts::default()).unwrap();
    let oauth = OAuthCoordinator::new(api, session);

    match views::login_view(&oauth).await {
        LoginView::Failed { cause, .. } => assert!(matches!(cause, ClientError::Network(_))),
        other => panic!("expected failure, got {other:?}"),
    }
}
