//! Request handlers. Each one applies its form to the session, calls a use case
//! and answers with the re-rendered page.

use super::error::WebError;
use super::forms::{
    self, ApiKeyForm, GuidelinesQuery, IndexQuery, KeyAction, RecommendationForm,
};
use super::pages::{self, Level, Notice, PageView};
use super::styles::STYLESHEET;
use super::{AppState, SESSION_COOKIE};
use crate::domain::{DocumentUpload, DomainError, GuidelineCategory, InputMode};
use crate::ports::SharedSession;
use crate::usecases::{Access, AuthService};
use axum::extract::{Form, Multipart, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use maud::Markup;
use std::sync::Arc;
use tower_cookies::cookie::SameSite;
use tower_cookies::{Cookie, Cookies};
use tracing::{debug, info, warn};
use uuid::Uuid;

const KEY_REQUIRED: &str = "🔑 Enter and test your API key in the sidebar first.";

/// Looks up the caller's session, issuing a new cookie when there is none.
async fn session_for(state: &AppState, cookies: &Cookies) -> Result<SharedSession, WebError> {
    let existing = cookies
        .get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());
    let id = match existing {
        Some(id) => id,
        None => {
            let id = Uuid::new_v4();
            debug!(session = %id, "issuing session cookie");
            cookies.add(
                Cookie::build((SESSION_COOKIE, id.to_string()))
                    .path("/")
                    .http_only(true)
                    .same_site(SameSite::Lax)
                    .build(),
            );
            id
        }
    };
    let session = state.sessions.get_or_create(id).await?;
    session.lock().await.touch();
    Ok(session)
}

/// Access level and key of the session, read under one lock.
async fn credentials(session: &SharedSession) -> (Access, String) {
    let guard = session.lock().await;
    (AuthService::access(&guard), guard.api_key.clone())
}

async fn render(state: &AppState, session: &SharedSession, mut view: PageView) -> Markup {
    view.backend_connected = state.dietician.backend_available().await;
    view.backend_url = state.backend_url.clone();
    let snapshot = session.lock().await.clone();
    pages::page(&snapshot, &view)
}

pub async fn index(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(query): Query<IndexQuery>,
) -> Result<Markup, WebError> {
    let session = session_for(&state, &cookies).await?;
    if let Some(mode) = query.mode.as_deref().and_then(InputMode::parse) {
        session.lock().await.input_mode = mode;
    }
    Ok(render(&state, &session, PageView::default()).await)
}

pub async fn api_key(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<ApiKeyForm>,
) -> Result<Markup, WebError> {
    let session = session_for(&state, &cookies).await?;
    let mut view = PageView::default();

    match KeyAction::parse(&form.action) {
        KeyAction::Clear => {
            session.lock().await.clear_api_key();
            view.sidebar.push(Notice::new(Level::Info, "API key cleared"));
        }
        KeyAction::Save => state.auth.set_api_key(&session, &form.api_key).await,
        KeyAction::Test => {
            state.auth.set_api_key(&session, &form.api_key).await;
            match state.auth.test_api_key(&session).await {
                Ok(_) => view
                    .sidebar
                    .push(Notice::new(Level::Success, "✅ API key is valid!")),
                Err(DomainError::InvalidInput(msg)) => {
                    view.sidebar.push(Notice::new(Level::Warning, msg));
                }
                Err(e) => {
                    let detail = match &e {
                        DomainError::Backend { .. } => "Authentication failed".to_string(),
                        other => other.user_message(),
                    };
                    view.sidebar
                        .push(Notice::new(Level::Error, "❌ Invalid API key"));
                    view.sidebar
                        .push(Notice::new(Level::Error, format!("Error: {}", detail)));
                }
            }
        }
    }
    Ok(render(&state, &session, view).await)
}

pub async fn guidelines(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(query): Query<GuidelinesQuery>,
) -> Result<Markup, WebError> {
    let category = query
        .category
        .parse::<GuidelineCategory>()
        .map_err(|e| WebError::BadRequest(e.to_string()))?;
    let session = session_for(&state, &cookies).await?;
    let (_, api_key) = credentials(&session).await;

    let mut view = PageView::default();
    match state.dietician.guidelines(&api_key, category).await {
        Ok(json) => view.guidelines = Some((category, json)),
        Err(e) => {
            warn!(category = %category, error = %e, "guidelines unavailable");
            view.sidebar
                .push(Notice::new(Level::Error, "Failed to fetch guidelines"));
            view.sidebar
                .push(Notice::new(Level::Error, format!("Error: {}", e.user_message())));
        }
    }
    Ok(render(&state, &session, view).await)
}

/// Reads the `file` field. A form submitted without choosing a file yields `None`.
async fn read_upload(multipart: &mut Multipart) -> Result<Option<DocumentUpload>, WebError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;
        if file_name.is_empty() || bytes.is_empty() {
            return Ok(None);
        }
        return Ok(Some(DocumentUpload {
            file_name,
            content_type,
            bytes,
        }));
    }
    Ok(None)
}

pub async fn upload_document(
    State(state): State<AppState>,
    cookies: Cookies,
    mut multipart: Multipart,
) -> Result<Markup, WebError> {
    let session = session_for(&state, &cookies).await?;
    let mut view = PageView::default();

    let Some(upload) = read_upload(&mut multipart).await? else {
        view.main
            .push(Notice::new(Level::Warning, "Choose a file to upload."));
        return Ok(render(&state, &session, view).await);
    };
    if !upload.is_supported() {
        view.main.push(Notice::new(
            Level::Error,
            format!(
                "Unsupported file type: {}. Upload a PDF, PNG, JPG, JPEG or DOCX file.",
                upload.file_name
            ),
        ));
        return Ok(render(&state, &session, view).await);
    }

    let (access, api_key) = credentials(&session).await;
    if access != Access::Granted {
        view.main.push(Notice::new(Level::Warning, KEY_REQUIRED));
        return Ok(render(&state, &session, view).await);
    }

    let upload = Arc::new(upload);
    let started = {
        let mut guard = session.lock().await;
        guard.input_mode = InputMode::Upload;
        if guard.document.is_processing() {
            view.main.push(Notice::new(
                Level::Warning,
                "⏳ Another document is still processing. Please wait for it to finish.",
            ));
            false
        } else if guard.is_processed(&upload.file_key()) {
            view.main.push(Notice::new(
                Level::Success,
                format!("✅ {} already processed!", upload.file_name),
            ));
            false
        } else {
            guard.start_document(Arc::clone(&upload));
            true
        }
    };

    if started {
        info!(file = %upload.file_name, size = upload.bytes.len(), "document upload accepted");
        view.main.push(Notice::new(
            Level::Info,
            format!("📄 Document processing started for {}", upload.file_name),
        ));
        state
            .documents
            .spawn(Arc::clone(&session), api_key, Arc::clone(&upload));
    }
    Ok(render(&state, &session, view).await)
}

pub async fn reprocess_document(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Result<Markup, WebError> {
    let session = session_for(&state, &cookies).await?;
    let mut view = PageView::default();

    let restart = {
        let mut guard = session.lock().await;
        if guard.document.is_processing() {
            view.main.push(Notice::new(
                Level::Warning,
                "⏳ The document is still processing.",
            ));
            None
        } else if AuthService::access(&guard) != Access::Granted {
            view.main.push(Notice::new(Level::Warning, KEY_REQUIRED));
            None
        } else if let Some(upload) = guard.last_upload.clone() {
            guard.reprocess(&upload.file_key());
            guard.start_document(Arc::clone(&upload));
            Some((guard.api_key.clone(), upload))
        } else {
            view.main
                .push(Notice::new(Level::Info, "Upload a document first."));
            None
        }
    };

    if let Some((api_key, upload)) = restart {
        info!(file = %upload.file_name, "reprocessing document");
        view.main.push(Notice::new(
            Level::Info,
            format!("🔄 Reprocessing {}", upload.file_name),
        ));
        state.documents.spawn(Arc::clone(&session), api_key, upload);
    }
    Ok(render(&state, &session, view).await)
}

pub async fn menu_selection(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Markup, WebError> {
    let session = session_for(&state, &cookies).await?;
    let form = forms::selection_form(&fields);
    session
        .lock()
        .await
        .update_selection(&form.items, &form.custom);
    Ok(render(&state, &session, PageView::default()).await)
}

pub async fn analyze(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Markup, WebError> {
    let mut form =
        forms::analysis_form(&fields).map_err(|e| WebError::BadRequest(e.to_string()))?;
    let session = session_for(&state, &cookies).await?;
    let (access, api_key, mode, selected) = {
        let guard = session.lock().await;
        (
            AuthService::access(&guard),
            guard.api_key.clone(),
            guard.input_mode,
            guard.selected_menu_items.clone(),
        )
    };
    if mode == InputMode::Upload {
        form.menu_text = selected.join("\n");
    }

    let mut view = PageView::default();
    if access != Access::Granted {
        view.main.push(Notice::new(Level::Warning, KEY_REQUIRED));
    } else {
        match state.dietician.analyze(&api_key, form.clone()).await {
            Ok(outcome) => view.analysis = Some(outcome),
            Err(DomainError::InvalidInput(msg)) => {
                view.main.push(Notice::new(Level::Error, msg));
            }
            Err(e) => {
                warn!(error = %e, "menu analysis failed");
                view.main.push(Notice::new(Level::Error, e.user_message()));
            }
        }
    }
    view.analysis_form = form;
    Ok(render(&state, &session, view).await)
}

pub async fn recommendations(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<RecommendationForm>,
) -> Result<Markup, WebError> {
    let session = session_for(&state, &cookies).await?;
    let (access, api_key) = credentials(&session).await;

    let mut view = PageView {
        recommendation_query: form.query.clone(),
        ..PageView::default()
    };
    if access != Access::Granted {
        view.main.push(Notice::new(Level::Warning, KEY_REQUIRED));
    } else {
        match state.dietician.recommend(&api_key, &form.query).await {
            Ok(text) => view.recommendations = Some(text),
            Err(DomainError::InvalidInput(msg)) => {
                view.main.push(Notice::new(Level::Warning, msg));
            }
            Err(e) => {
                warn!(error = %e, "recommendations failed");
                view.main.push(Notice::new(
                    Level::Error,
                    format!("❌ Error getting recommendations: {}", e.user_message()),
                ));
            }
        }
    }
    Ok(render(&state, &session, view).await)
}

pub async fn healthz() -> &'static str {
    "ok"
}

pub async fn stylesheet() -> impl IntoResponse {
    ([(CONTENT_TYPE, "text/css; charset=utf-8")], STYLESHEET)
}
