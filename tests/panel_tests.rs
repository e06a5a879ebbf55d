use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::extract::RawQuery;
use axum::http::{header, Request, StatusCode};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower::ServiceExt;

use bakehouse::api::ApiClient;
use bakehouse::config::SESSION_COOKIE;
use bakehouse::models::{AppState, WebSession};
use bakehouse::routes::build_app;
use bakehouse::session::{Claims, Role};

fn state() -> AppState {
    // Nothing listens here; these tests never reach the backend.
    let api = ApiClient::new("http://127.0.0.1:9/api", Duration::from_secs(1)).unwrap();
    AppState::new(api, String::new(), 10)
}

/// Order list backend on an ephemeral port that records every query string.
/// A `status=cancelled` filter makes it fail.
async fn order_backend(seen: Arc<Mutex<Vec<String>>>) -> AppState {
    let stub = Router::new().route(
        "/api/admin/all-orders",
        axum::routing::get(move |RawQuery(query): RawQuery| {
            let seen = Arc::clone(&seen);
            async move {
                let query = query.unwrap_or_default();
                seen.lock().unwrap().push(query.clone());
                if query.contains("status=cancelled") {
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({"success": false, "message": "Orders are temporarily unavailable"})),
                    );
                }
                let body: Value = json!({
                    "success": true,
                    "data": {"orders": []},
                    "pagination": {"current_page": 3, "per_page": 10, "total": 0}
                });
                (StatusCode::OK, Json(body))
            }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, stub).await.unwrap();
    });
    let api = ApiClient::new(&format!("http://{}/api", addr), Duration::from_secs(5)).unwrap();
    AppState::new(api, String::new(), 10)
}

async fn body_text(resp: axum::response::Response) -> String {
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8_lossy(&body).into_owned()
}

fn login_as(state: &AppState, role: Role, exp: Option<i64>, reset: bool) -> String {
    let claims = Claims {
        role,
        branch_id: Some("4".into()),
        subject: Some("7".into()),
        name: Some("Test User".into()),
        email: None,
        exp,
    };
    let sid = format!("sid-{}", role.label().replace(' ', "-"));
    state.sessions.lock().unwrap().insert(
        sid.clone(),
        WebSession::new("a.b.c".into(), claims, "Test User".into(), reset),
    );
    sid
}

async fn get(app: Router, uri: &str, sid: Option<&str>) -> axum::response::Response {
    let mut req = Request::builder().uri(uri);
    if let Some(sid) = sid {
        req = req.header(header::COOKIE, format!("{}={}", SESSION_COOKIE, sid));
    }
    app.oneshot(req.body(Body::empty()).unwrap()).await.unwrap()
}

fn location(resp: &axum::response::Response) -> &str {
    resp.headers().get(header::LOCATION).unwrap().to_str().unwrap()
}

#[tokio::test]
async fn test_protected_pages_redirect_to_login() {
    let app = build_app(state(), None);
    let resp = get(app.clone(), "/dashboard", None).await;
    assert!(resp.status().is_redirection());
    assert_eq!(location(&resp), "/login");

    let resp = get(app, "/", None).await;
    assert_eq!(location(&resp), "/login");
}

#[tokio::test]
async fn test_login_page_renders() {
    let resp = get(build_app(state(), None), "/login", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("action=\"/login\""));
    assert!(html.contains("127.0.0.1"));
}

#[tokio::test]
async fn test_stylesheet_is_served() {
    let resp = get(build_app(state(), Some("body{}".into())), "/static/styles.css", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "text/css");
    assert!(resp.headers().contains_key(header::CACHE_CONTROL));
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"body{}");
}

#[tokio::test]
async fn test_role_gating_on_resource_routes() {
    let state = state();
    let sid = login_as(&state, Role::Branch, None, false);
    let app = build_app(state, None);

    let resp = get(app.clone(), "/r/users", Some(&sid)).await;
    assert_eq!(location(&resp), "/dashboard");

    let resp = get(app, "/r/croissants", Some(&sid)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_forced_password_change_locks_other_pages() {
    let state = state();
    let sid = login_as(&state, Role::Admin, None, true);
    let app = build_app(state, None);

    let resp = get(app.clone(), "/dashboard", Some(&sid)).await;
    assert_eq!(location(&resp), "/change-password");

    let resp = get(app, "/change-password", Some(&sid)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&body).contains("must set a new password"));
}

#[tokio::test]
async fn test_expired_session_is_dropped() {
    let state = state();
    let sid = login_as(&state, Role::SuperAdmin, Some(1), false);
    let app = build_app(state.clone(), None);

    let resp = get(app, "/dashboard", Some(&sid)).await;
    assert_eq!(location(&resp), "/login");
    assert!(state.session(&sid).is_none());
}

#[tokio::test]
async fn test_branch_list_is_scoped_and_forwards_paging() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let state = order_backend(Arc::clone(&seen)).await;
    let sid = login_as(&state, Role::Branch, None, false);
    let app = build_app(state, None);

    let resp = get(app, "/r/orders?branch_id=99&status=pending&page=3&per_page=10&bogus=1", Some(&sid)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;

    assert_eq!(
        seen.lock().unwrap().clone(),
        vec!["page=3&per_page=10&branch_id=4&status=pending".to_string()]
    );
    assert!(html.contains("No data"));
    assert!(html.contains("name=\"branch_id\" value=\"4\" readonly"));
}

#[tokio::test]
async fn test_rejected_filter_renders_inline_without_a_request() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let state = order_backend(Arc::clone(&seen)).await;
    let sid = login_as(&state, Role::Admin, None, false);
    let app = build_app(state, None);

    let resp = get(app, "/r/orders?status=baking", Some(&sid)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;

    assert!(seen.lock().unwrap().is_empty());
    assert!(html.contains("Status must be one of"));
    assert!(html.contains("No data"));
}

#[tokio::test]
async fn test_backend_failure_renders_inline() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let state = order_backend(Arc::clone(&seen)).await;
    let sid = login_as(&state, Role::Admin, None, false);
    let app = build_app(state.clone(), None);

    let resp = get(app, "/r/orders?status=cancelled", Some(&sid)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;

    assert_eq!(seen.lock().unwrap().len(), 1);
    assert!(html.contains("Orders are temporarily unavailable"));
    assert!(html.contains("No data"));
    assert!(state.session(&sid).is_some());
}
