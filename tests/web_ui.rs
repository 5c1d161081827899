use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use dietician_ui::adapters::backend::MockBackend;
use dietician_ui::adapters::session::MemorySessionStore;
use dietician_ui::adapters::web::{AppState, SESSION_COOKIE, router};
use dietician_ui::ports::BackendPort;
use dietician_ui::usecases::{AuthService, DieticianService, DocumentService};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

const FORM: &str = "application/x-www-form-urlencoded";
const BOUNDARY: &str = "dieticianboundary";

fn app() -> Router {
    let backend: Arc<dyn BackendPort> = Arc::new(MockBackend::with_delay(0));
    let state = AppState {
        auth: Arc::new(AuthService::new(Arc::clone(&backend))),
        dietician: Arc::new(DieticianService::new(Arc::clone(&backend))),
        documents: Arc::new(DocumentService::new(
            Arc::clone(&backend),
            Duration::from_millis(10),
            5,
        )),
        sessions: Arc::new(MemorySessionStore::new()),
        backend_url: "http://localhost:8000".to_string(),
    };
    router(state, 1024 * 1024)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Option<String>, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, cookie, String::from_utf8_lossy(&bytes).into_owned())
}

fn get(uri: &str, cookie: &str) -> Request<Body> {
    Request::get(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

fn post_form(uri: &str, cookie: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::COOKIE, cookie)
        .header(header::CONTENT_TYPE, FORM)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_file(cookie: &str, file_name: &str, bytes: &str) -> Request<Body> {
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n{d}\r\n--{b}--\r\n",
        b = BOUNDARY,
        f = file_name,
        d = bytes
    );
    Request::post("/documents")
        .header(header::COOKIE, cookie)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Opens a session and validates a mock key. Returns the cookie pair.
async fn signed_in(app: &Router) -> String {
    let (_, cookie, _) = send(app, Request::get("/").body(Body::empty()).unwrap()).await;
    let cookie = cookie.expect("session cookie issued");
    let (status, _, body) = send(
        app,
        post_form("/api-key", &cookie, "api_key=fai_test&action=test"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("API key is valid!"));
    cookie
}

/// Polls the page until the background document job has finished.
async fn wait_until_processed(app: &Router, cookie: &str) -> String {
    let mut page = String::new();
    for _ in 0..100 {
        tokio::time::sleep(Duration::from_millis(20)).await;
        let (_, _, body) = send(app, get("/", cookie)).await;
        page = body;
        if page.contains("Document processed!") {
            break;
        }
    }
    assert!(page.contains("Document processed!"), "document never finished");
    page
}

#[tokio::test]
async fn test_first_visit_issues_cookie_and_asks_for_key() {
    let app = app();
    let (status, cookie, body) = send(&app, Request::get("/").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(cookie.unwrap().starts_with(SESSION_COOKIE));
    assert!(body.contains("Backend connected"));
    assert!(body.contains("API Key Required"));
}

#[tokio::test]
async fn test_untested_key_is_gated() {
    let app = app();
    let (_, cookie, _) = send(&app, Request::get("/").body(Body::empty()).unwrap()).await;
    let cookie = cookie.unwrap();
    let (_, _, body) = send(
        &app,
        post_form("/api-key", &cookie, "api_key=fai_test&action=save"),
    )
    .await;
    assert!(body.contains("API Key Not Validated"));
    assert!(!body.contains("Analyze Menu for My Health Profile"));
}

#[tokio::test]
async fn test_invalid_key_is_reported() {
    let app = app();
    let (_, cookie, _) = send(&app, Request::get("/").body(Body::empty()).unwrap()).await;
    let (_, _, body) = send(
        &app,
        post_form("/api-key", &cookie.unwrap(), "api_key=nope&action=test"),
    )
    .await;
    assert!(body.contains("Invalid API key"));
    assert!(body.contains("Authentication failed"));
}

#[tokio::test]
async fn test_typed_menu_analysis() {
    let app = app();
    let cookie = signed_in(&app).await;
    send(&app, get("/?mode=type", &cookie)).await;

    let (status, _, body) = send(
        &app,
        post_form(
            "/analyze",
            &cookie,
            "menu_items=Laksa%0AKaya+Toast&age_group=senior&preference=halal&condition=diabetes",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Analysis complete!"));
    assert!(body.contains("[MOCK] Laksa: ask for less gravy"));
    assert!(body.contains("[MOCK] Kaya Toast: ask for less gravy"));
}

#[tokio::test]
async fn test_empty_menu_shows_error() {
    let app = app();
    let cookie = signed_in(&app).await;
    send(&app, get("/?mode=type", &cookie)).await;
    let (_, _, body) = send(&app, post_form("/analyze", &cookie, "menu_items=+%2C+")).await;
    assert!(body.contains("Please enter at least one menu item to analyze."));
}

#[tokio::test]
async fn test_unknown_form_values_are_bad_requests() {
    let app = app();
    let cookie = signed_in(&app).await;
    let (status, _, _) = send(
        &app,
        post_form("/analyze", &cookie, "menu_items=Laksa&age_group=toddler"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = send(&app, get("/guidelines?category=pizza", &cookie)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recommendations() {
    let app = app();
    let cookie = signed_in(&app).await;
    let (_, _, body) = send(
        &app,
        post_form("/recommendations", &cookie, "query=healthy+breakfast"),
    )
    .await;
    assert!(body.contains("Personalized Food Recommendations"));
    assert!(body.contains("healthy breakfast"));
}

#[tokio::test]
async fn test_guidelines_panel() {
    let app = app();
    let cookie = signed_in(&app).await;
    let (status, _, body) = send(
        &app,
        get("/guidelines?category=sodium_guidelines", &cookie),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("[MOCK] Health Promotion Board"));
}

#[tokio::test]
async fn test_unsupported_upload_is_rejected() {
    let app = app();
    let cookie = signed_in(&app).await;
    let (_, _, body) = send(&app, post_file(&cookie, "menu.exe", "MZ")).await;
    assert!(body.contains("Unsupported file type: menu.exe"));
}

#[tokio::test]
async fn test_upload_select_and_analyze() {
    let app = app();
    let cookie = signed_in(&app).await;

    let (status, _, body) = send(&app, post_file(&cookie, "menu.pdf", "%PDF-1.4 fake")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Document processing started for menu.pdf"));

    let page = wait_until_processed(&app, &cookie).await;
    assert!(page.contains("value=\"Hainanese Chicken Rice\""));

    // Same file again is recognised by its key.
    let (_, _, body) = send(&app, post_file(&cookie, "menu.pdf", "%PDF-1.4 fake")).await;
    assert!(body.contains("menu.pdf already processed!"));

    let (_, _, body) = send(
        &app,
        post_form(
            "/menu/selection",
            &cookie,
            "item=Hainanese+Chicken+Rice&custom=Teh+Tarik",
        ),
    )
    .await;
    assert!(body.contains("Selected 2 items: Hainanese Chicken Rice, Teh Tarik"));

    let (_, _, body) = send(&app, post_form("/analyze", &cookie, "age_group=adult")).await;
    assert!(body.contains("[MOCK] Hainanese Chicken Rice: ask for less gravy"));
    assert!(body.contains("[MOCK] Teh Tarik: ask for less gravy"));
}

#[tokio::test]
async fn test_oversized_upload_is_payload_too_large() {
    let app = app();
    let cookie = signed_in(&app).await;
    let big = "x".repeat(2 * 1024 * 1024);
    let (status, _, _) = send(&app, post_file(&cookie, "menu.pdf", &big)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_reprocess_restarts_last_upload() {
    let app = app();
    let cookie = signed_in(&app).await;

    let (_, _, body) = send(&app, post_form("/documents/reprocess", &cookie, "")).await;
    assert!(body.contains("Upload a document first."));

    send(&app, post_file(&cookie, "menu.pdf", "%PDF-1.4 fake")).await;
    wait_until_processed(&app, &cookie).await;

    // No file in this request: the stored upload is sent again.
    let (status, _, body) = send(&app, post_form("/documents/reprocess", &cookie, "")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Reprocessing menu.pdf"));
    assert!(!body.contains("already processed!"));

    let page = wait_until_processed(&app, &cookie).await;
    assert!(page.contains("value=\"Hainanese Chicken Rice\""));
}

#[tokio::test]
async fn test_healthz_and_stylesheet() {
    let app = app();
    let (status, _, body) = send(&app, Request::get("/healthz").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");

    let response = app
        .clone()
        .oneshot(Request::get("/static/style.css").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/css; charset=utf-8"
    );
}
