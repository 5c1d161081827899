//! Server-rendered page. Every route answers with the whole page, rebuilt
//! from the session plus whatever the request just produced.

use crate::domain::entities::title_case;
use crate::domain::{
    AgeGroup, DietaryPreference, DocumentState, GuidelineCategory, HealthCondition, InputMode,
    Section, Session,
};
use crate::usecases::{Access, AnalysisForm, AnalysisOutcome, AuthService};
use maud::{DOCTYPE, Markup, PreEscaped, html};

/// Seconds between automatic reloads while a document is processing.
const PROCESSING_REFRESH_SECS: u32 = 3;

const LOADING_SCRIPT: &str = "document.querySelectorAll('form[data-loading]').forEach(function (form) {\
    form.addEventListener('submit', function () {\
        document.getElementById('loading').classList.add('visible');\
    });\
});";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Warning,
    Error,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub text: String,
}

impl Notice {
    pub fn new(level: Level, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

/// Request-scoped parts of the page. Session state is rendered separately.
#[derive(Debug, Default)]
pub struct PageView {
    pub backend_connected: bool,
    pub backend_url: String,
    /// Banners under the API key form.
    pub sidebar: Vec<Notice>,
    /// Banners at the top of the main area.
    pub main: Vec<Notice>,
    pub guidelines: Option<(GuidelineCategory, serde_json::Value)>,
    pub analysis_form: AnalysisForm,
    pub analysis: Option<AnalysisOutcome>,
    pub recommendation_query: String,
    pub recommendations: Option<String>,
}

pub fn page(session: &Session, view: &PageView) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                @if session.document.is_processing() {
                    meta http-equiv="refresh" content=(format!("{};url=/", PROCESSING_REFRESH_SECS));
                }
                title { "Singapore AI Dietician" }
                link rel="stylesheet" href="/static/style.css";
            }
            body {
                div #loading .loading-overlay {
                    div.spinner {}
                    p { "Working on it..." }
                }
                div.layout {
                    aside.sidebar { (sidebar(session, view)) }
                    main.content { (main_area(session, view)) }
                }
                script { (PreEscaped(LOADING_SCRIPT)) }
            }
        }
    }
}

pub fn notice(level: Level, text: &str) -> Markup {
    html! {
        div class={ "notice notice-" (level.as_str()) } role="status" { (text) }
    }
}

fn notices(list: &[Notice]) -> Markup {
    html! {
        @for n in list { (notice(n.level, &n.text)) }
    }
}

fn sidebar(session: &Session, view: &PageView) -> Markup {
    html! {
        h2 { "⚙️ Backend Status" }
        @if view.backend_connected {
            (notice(Level::Success, "✅ Backend connected"))
        } @else {
            (notice(Level::Error, "❌ Backend disconnected"))
            (notice(Level::Warning, &format!("Please start the backend server at {}", view.backend_url)))
        }

        hr;
        h2 { "🔐 API Key Authentication" }
        form.stack method="post" action="/api-key" data-loading {
            label for="api_key" { "Enter your API Key:" }
            input #api_key type="password" name="api_key" autocomplete="off"
                placeholder="fai_xxxxxxxxxxxxxxxxxxxxxxxx" value=(session.api_key);
            div.row {
                button type="submit" name="action" value="test" { "🔍 Test API Key" }
                button.secondary type="submit" name="action" value="save" { "Save" }
                button.secondary type="submit" name="action" value="clear" { "Clear" }
            }
        }
        (notices(&view.sidebar))
        @if let Some(info) = &session.api_key_info {
            div {
                div.nutrition-metric { "Rate Limit" strong { (info.rate_limit.as_deref().unwrap_or("N/A")) } }
                div.nutrition-metric { "Remaining" strong { (info.remaining.as_deref().unwrap_or("N/A")) } }
            }
            @if !info.permissions.is_empty() {
                p { "Permissions: " (info.permissions.join(", ")) }
            }
        }
        @match AuthService::access(session) {
            Access::Granted => { (notice(Level::Success, "🟢 API key authenticated")) }
            Access::KeyUnverified => {
                (notice(Level::Warning, "🟡 API key not tested - click 'Test API Key' above"))
            }
            Access::KeyRequired => {
                (notice(Level::Info, "🔑 Enter an API key to access protected features"))
            }
        }

        hr;
        details {
            summary { "📋 Singapore My Healthy Plate Guidelines" }
            (healthy_plate())
        }

        hr;
        details open[view.guidelines.is_some()] {
            summary { "🏛️ Official Singapore Guidelines" }
            p { strong { "Access official Health Promotion Board guidelines" } }
            form.stack method="get" action="/guidelines" data-loading {
                label for="category" { "Select guideline category:" }
                select #category name="category" {
                    @for category in GuidelineCategory::ALL {
                        option value=(category.as_str())
                            selected[view.guidelines.as_ref().map(|(c, _)| c) == Some(category)] {
                            (category.as_str())
                        }
                    }
                }
                button type="submit" { "📋 View Guidelines" }
            }
            @if let Some((_, json)) = &view.guidelines {
                pre.json {
                    (serde_json::to_string_pretty(json).unwrap_or_else(|_| json.to_string()))
                }
            }
        }
    }
}

fn healthy_plate() -> Markup {
    html! {
        p { strong { "Half Plate (50%)" } br; "🥬 Fruits & Vegetables" br; em { "Minimum 2 servings each daily" } }
        p { strong { "Quarter Plate (25%)" } br; "🌾 Wholegrains" br; em { "Rich in vitamins B, E, minerals" } }
        p { strong { "Quarter Plate (25%)" } br; "🍗 Lean Meat & Others" br; em { "2-3 servings daily (3 for seniors 50+)" } }
    }
}

fn main_area(session: &Session, view: &PageView) -> Markup {
    html! {
        h1.main-header { "🇸🇬 Singapore AI Dietician" }
        p.subtitle {
            "Get personalized dietary recommendations based on Singapore's My Healthy Plate guidelines"
        }
        (notices(&view.main))
        @if view.backend_connected {
            @match AuthService::access(session) {
                Access::KeyRequired => {
                    (notice(Level::Warning, "🔑 API Key Required"))
                    (notice(Level::Info, "Please enter your API key in the sidebar to access the Singapore AI Dietician features."))
                    (introduction())
                }
                Access::KeyUnverified => {
                    (notice(Level::Warning, "🟡 API Key Not Validated"))
                    (notice(Level::Info, "Your API key hasn't been tested yet. Please click 'Test API Key' in the sidebar to validate it."))
                }
                Access::Granted => {
                    (menu_analysis(session, view))
                    hr;
                    (recommendation_section(view))
                }
            }
        }
    }
}

fn introduction() -> Markup {
    html! {
        h3 { "🇸🇬 Singapore AI Dietician API" }
        p { "This application provides AI-powered dietary recommendations based on Singapore's official health guidelines." }
        p { strong { "Features:" } }
        ul {
            li { "🍽️ Menu analysis with nutritional insights" }
            li { "📋 Compliance with Singapore's My Healthy Plate guidelines" }
            li { "🥗 Personalized dietary recommendations" }
            li { "📄 Document upload and menu extraction" }
            li { "🔍 Food recommendations based on health conditions" }
        }
        p { strong { "To get started:" } }
        ol {
            li { "🔑 Obtain an API key (format: " code { "fai_xxxxxxxxxx" } ")" }
            li { "📝 Enter your API key in the sidebar (password field)" }
            li { "✅ Click \"Test API Key\" to validate" }
            li { "🚀 Start analyzing menus!" }
        }
        p { strong { "Need an API key?" } }
        ul {
            li { "Contact the administrator to get your personal API key" }
            li { "API keys provide rate limiting and access control" }
            li { "Different keys have different permission levels" }
        }
    }
}

fn menu_analysis(session: &Session, view: &PageView) -> Markup {
    let upload_mode = session.input_mode == InputMode::Upload;
    html! {
        h2 { "🍽️ Menu Analysis" }
        p { "How would you like to provide menu information?" }
        nav.mode-switch {
            a.active[upload_mode] href="/?mode=upload" { "📄 Upload menu image/document" }
            a.active[!upload_mode] href="/?mode=type" { "📝 Type menu items" }
        }
        @if upload_mode {
            (upload_section(session))
        }

        h2 { "📝 Menu Selection" }
        @if upload_mode && session.has_document_items() {
            (selection_section(session))
        }
        (analysis_form(session, &view.analysis_form))
        @if let Some(outcome) = &view.analysis {
            (analysis_results(outcome))
        }
    }
}

fn upload_section(session: &Session) -> Markup {
    html! {
        form.stack method="post" action="/documents" enctype="multipart/form-data" data-loading {
            label for="file" { "Upload Menu (Image, PDF, etc.)" }
            input #file type="file" name="file" accept=".pdf,.png,.jpg,.jpeg,.docx" required;
            button type="submit" { "🔍 Process Document" }
        }
        @match &session.document {
            DocumentState::Idle => {}
            DocumentState::Processing { file_name, started_at, .. } => {
                div.processing.notice.notice-info {
                    div.spinner.inline {}
                    span {
                        "🔍 Processing " (file_name) "... This may take a few minutes for PDFs. "
                        small { "(started " (started_at.format("%H:%M:%S UTC").to_string()) ")" }
                    }
                }
            }
            DocumentState::Ready { file_key, file_name, summary } => {
                (notice(Level::Success, &format!("✅ {}: {}", file_name, summary)))
                @if session.is_processed(file_key) {
                    (notice(Level::Info, &format!(
                        "Found {} menu items from this document",
                        session.extracted_items.len()
                    )))
                }
                (reprocess_form())
            }
            DocumentState::Failed { file_name, error, .. } => {
                (notice(Level::Error, &format!("❌ {}: {}", file_name, error)))
                @if session.last_upload.is_some() {
                    (reprocess_form())
                }
            }
        }
        @if let Some(content) = &session.document_content {
            details {
                summary { "📄 Extracted Document Content" }
                textarea readonly rows="10" { (content) }
            }
        }
    }
}

fn reprocess_form() -> Markup {
    html! {
        form method="post" action="/documents/reprocess" data-loading {
            button.secondary type="submit" { "🔄 Reprocess Document" }
        }
    }
}

fn selection_section(session: &Session) -> Markup {
    html! {
        (notice(Level::Success, &format!(
            "📄 Document processed! Found {} menu options.",
            session.extracted_items.len()
        )))
        form method="post" action="/menu/selection" {
            fieldset {
                legend { "Select items to analyze:" }
                @for item in &session.extracted_items {
                    label.check {
                        input type="checkbox" name="item" value=(item)
                            checked[session.selected_menu_items.contains(item)];
                        " " (item)
                    }
                }
            }
            label.block for="custom" { "Add custom items (comma-separated):" }
            input #custom type="text" name="custom" value=(session.custom_additions)
                placeholder="e.g., Teh Tarik, Kaya Toast";
            button type="submit" { "Update Selection" }
        }
        @match session.selection_summary() {
            Some(summary) => { (notice(Level::Success, &format!("✅ {}", summary))) }
            None => { (notice(Level::Info, "👆 Select items above to analyze")) }
        }
    }
}

fn analysis_form(session: &Session, form: &AnalysisForm) -> Markup {
    html! {
        form method="post" action="/analyze" data-loading {
            @if session.input_mode == InputMode::Type {
                label.block for="menu_items" { "Menu Items (one per line or comma-separated)" }
                textarea #menu_items name="menu_items" rows="5"
                    placeholder="Chicken Rice\nLaksa\nKaya Toast\nTeh Tarik" { (form.menu_text) }
            } @else if !session.selected_menu_items.is_empty() {
                label.block { "Items to Analyze:" }
                textarea readonly rows="4" { (session.selected_menu_items.join("\n")) }
            } @else {
                (notice(Level::Warning, "⚠️ No items selected. Please select items from the menu above or upload a document."))
            }
            div.columns {
                div {
                    label.block for="age_group" { "Age Group" }
                    select #age_group name="age_group" {
                        @for group in AgeGroup::ALL {
                            option value=(group.as_str()) selected[group == form.age_group] {
                                (title_case(group.as_str()))
                            }
                        }
                    }
                }
                fieldset {
                    legend { "Dietary Preferences" }
                    @for preference in DietaryPreference::ALL {
                        label.check {
                            input type="checkbox" name="preference" value=(preference.as_str())
                                checked[form.preferences.contains(preference)];
                            " " (preference.as_str())
                        }
                    }
                }
            }
            fieldset {
                legend { "Health Conditions" }
                @for condition in HealthCondition::ALL {
                    label.check {
                        input type="checkbox" name="condition" value=(condition.as_str())
                            checked[form.conditions.contains(condition)];
                        " " (condition.as_str())
                    }
                }
            }
            button.primary type="submit" { "🔍 Analyze Menu for My Health Profile" }
        }
    }
}

fn analysis_results(outcome: &AnalysisOutcome) -> Markup {
    let report = &outcome.report;
    html! {
        (notice(Level::Success, "✅ Analysis complete!"))
        h3 { "📋 Analyzed Menu Items" }
        ol {
            @for item in &outcome.menu_items { li { (item) } }
        }
        div.tabs {
            input #tab-rec type="radio" name="result-tab" checked;
            label for="tab-rec" { "🥗 Recommendations" }
            input #tab-nut type="radio" name="result-tab";
            label for="tab-nut" { "📊 Nutritional Analysis" }
            input #tab-sg type="radio" name="result-tab";
            label for="tab-sg" { "🇸🇬 Guidelines Compliance" }
            input #tab-alt type="radio" name="result-tab";
            label for="tab-alt" { "🔄 Healthier Alternatives" }

            div #panel-rec .tab-panel {
                h3 { "🥗 Dietary Recommendations" }
                (section(&report.recommendations, "recommendation-box",
                    html! { p { "No recommendations available" } }))
            }
            div #panel-nut .tab-panel {
                h3 { "📊 Nutritional Analysis" }
                @match &report.nutritional_analysis {
                    Section::Fields(fields) => {
                        @for (name, value) in fields {
                            div.nutrition-metric { (name) strong { (value) } }
                        }
                    }
                    other => {
                        (section(other, "recommendation-box",
                            notice(Level::Info, "No nutritional analysis available")))
                    }
                }
            }
            div #panel-sg .tab-panel {
                h3 { "🇸🇬 Singapore Guidelines Compliance" }
                (section(&report.guidelines_compliance, "recommendation-box",
                    notice(Level::Info, "No compliance analysis available")))
            }
            div #panel-alt .tab-panel {
                h3 { "🔄 Healthier Alternatives" }
                (section(&report.alternatives, "alternative-box",
                    html! { p { "No alternatives suggested" } }))
            }
        }
    }
}

fn section(section: &Section, item_class: &str, empty: Markup) -> Markup {
    html! {
        @match section {
            Section::Items(items) => {
                @for item in items { div class=(item_class) { (item) } }
            }
            Section::Fields(fields) => {
                @for (name, value) in fields {
                    p { strong { (name) ":" } " " (value) }
                }
            }
            Section::Text(text) => { div.prewrap class=(item_class) { (text) } }
            Section::Empty => { (empty) }
        }
    }
}

fn recommendation_section(view: &PageView) -> Markup {
    html! {
        h2 { "🍽️ Get Food Recommendations" }
        form.stack method="post" action="/recommendations" data-loading {
            label for="query" { "What kind of food are you looking for?" }
            input #query type="text" name="query" value=(view.recommendation_query)
                placeholder="e.g., healthy breakfast options, low-sodium lunch, vegetarian dinner";
            button type="submit" { "🔍 Get Recommendations" }
        }
        @if let Some(text) = &view.recommendations {
            h3 { "💡 Personalized Food Recommendations" }
            div.recommendation-box.prewrap { (text) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AnalysisReport;

    fn granted() -> Session {
        Session {
            api_key: "fai_k".to_string(),
            api_key_valid: true,
            ..Session::default()
        }
    }

    fn connected() -> PageView {
        PageView {
            backend_connected: true,
            backend_url: "http://localhost:8000".to_string(),
            ..PageView::default()
        }
    }

    #[test]
    fn test_disconnected_backend_hides_main_features() {
        let view = PageView {
            backend_url: "http://backend:9000".to_string(),
            ..PageView::default()
        };
        let html = page(&granted(), &view).into_string();
        assert!(html.contains("Backend disconnected"));
        assert!(html.contains("http://backend:9000"));
        assert!(!html.contains("Menu Analysis"));
    }

    #[test]
    fn test_missing_key_shows_introduction() {
        let html = page(&Session::default(), &connected()).into_string();
        assert!(html.contains("API Key Required"));
        assert!(html.contains("To get started:"));
        assert!(!html.contains("action=\"/analyze\""));
    }

    #[test]
    fn test_backend_text_is_escaped() {
        let view = PageView {
            recommendations: Some("<script>alert(1)</script>".to_string()),
            ..connected()
        };
        let html = page(&granted(), &view).into_string();
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>alert(1)"));
    }

    #[test]
    fn test_processing_document_refreshes_page() {
        let mut session = granted();
        session.document = DocumentState::Processing {
            file_key: "menu.pdf_4".to_string(),
            file_name: "menu.pdf".to_string(),
            started_at: chrono::Utc::now(),
        };
        let html = page(&session, &connected()).into_string();
        assert!(html.contains("http-equiv=\"refresh\""));
        assert!(html.contains("Processing menu.pdf"));
    }

    #[test]
    fn test_results_render_all_tabs() {
        let view = PageView {
            analysis: Some(AnalysisOutcome {
                menu_items: vec!["Laksa".to_string()],
                report: AnalysisReport {
                    recommendations: Section::Items(vec!["Less gravy".to_string()]),
                    ..AnalysisReport::default()
                },
            }),
            ..connected()
        };
        let html = page(&granted(), &view).into_string();
        assert!(html.contains("Less gravy"));
        assert!(html.contains("No nutritional analysis available"));
        assert!(html.contains("No compliance analysis available"));
        assert!(html.contains("No alternatives suggested"));
    }
}
