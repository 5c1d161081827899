//! Domain entities. Value types exchanged with the dietician backend.
//!
//! No HTTP types here: adapters build these from backend JSON.

use crate::domain::DomainError;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Age group used to personalise recommendations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeGroup {
    Child,
    Adolescent,
    #[default]
    Adult,
    Senior,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 4] = [
        AgeGroup::Child,
        AgeGroup::Adolescent,
        AgeGroup::Adult,
        AgeGroup::Senior,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AgeGroup::Child => "child",
            AgeGroup::Adolescent => "adolescent",
            AgeGroup::Adult => "adult",
            AgeGroup::Senior => "senior",
        }
    }
}

/// Generates a closed vocabulary enum that (de)serializes as its kebab/snake wire name.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($wire => Ok($name::$variant),)+
                    other => Err(DomainError::InvalidInput(format!(
                        "unknown {}: {}",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

impl FromStr for AgeGroup {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgeGroup::ALL
            .into_iter()
            .find(|g| g.as_str() == s.trim())
            .ok_or_else(|| DomainError::InvalidInput(format!("unknown age group: {}", s)))
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

wire_enum!(
    /// Dietary restriction or preference.
    DietaryPreference {
        Vegetarian => "vegetarian",
        Vegan => "vegan",
        Halal => "halal",
        Kosher => "kosher",
        GlutenFree => "gluten-free",
        DairyFree => "dairy-free",
        LowSodium => "low-sodium",
        LowSugar => "low-sugar",
        Keto => "keto",
        Paleo => "paleo",
    }
);

wire_enum!(
    /// Health condition relevant to dietary advice.
    HealthCondition {
        Diabetes => "diabetes",
        Hypertension => "hypertension",
        HeartDisease => "heart-disease",
        KidneyDisease => "kidney-disease",
        HighCholesterol => "high-cholesterol",
        Obesity => "obesity",
        Osteoporosis => "osteoporosis",
        Anemia => "anemia",
    }
);

wire_enum!(
    /// Official Health Promotion Board guideline category.
    GuidelineCategory {
        MyHealthyPlate => "my_healthy_plate",
        NutritionalTargets => "nutritional_targets",
        AgeSpecific => "age_specific",
        SodiumGuidelines => "sodium_guidelines",
        BeverageGuidelines => "beverage_guidelines",
        HealthierChoiceSymbol => "healthier_choice_symbol",
    }
);

/// Body of `POST /analyze-menu`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub menu_items: Vec<String>,
    pub dietary_preferences: Vec<DietaryPreference>,
    pub health_conditions: Vec<HealthCondition>,
    pub age_group: AgeGroup,
}

/// One rendered part of an analysis result. The backend is free to send a list,
/// an object or plain text for each part.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Section {
    Items(Vec<String>),
    Fields(Vec<(String, String)>),
    Text(String),
    #[default]
    Empty,
}

impl Section {
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Section::Empty,
            Some(Value::Array(items)) if items.is_empty() => Section::Empty,
            Some(Value::Array(items)) => Section::Items(items.iter().map(display_value).collect()),
            Some(Value::Object(map)) if map.is_empty() => Section::Empty,
            Some(Value::Object(map)) => Section::Fields(
                map.iter()
                    .map(|(k, v)| (title_case(k), display_value(v)))
                    .collect(),
            ),
            Some(Value::String(s)) if s.trim().is_empty() => Section::Empty,
            Some(other) => Section::Text(display_value(other)),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Section::Empty)
    }
}

/// Parsed response of `POST /analyze-menu`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisReport {
    pub recommendations: Section,
    pub nutritional_analysis: Section,
    pub guidelines_compliance: Section,
    pub alternatives: Section,
}

impl AnalysisReport {
    pub fn from_value(value: &Value) -> Self {
        Self {
            recommendations: Section::from_value(value.get("recommendations")),
            nutritional_analysis: Section::from_value(value.get("nutritional_analysis")),
            guidelines_compliance: Section::from_value(
                value.get("singapore_guidelines_compliance"),
            ),
            alternatives: Section::from_value(value.get("alternatives")),
        }
    }
}

/// Metadata returned by `GET /api-info` for a valid key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApiKeyInfo {
    pub rate_limit: Option<String>,
    pub remaining: Option<String>,
    pub permissions: Vec<String>,
}

impl ApiKeyInfo {
    pub fn from_value(value: &Value) -> Self {
        let rate = value.get("rate_limit");
        Self {
            rate_limit: rate.and_then(|r| r.get("limit")).map(display_value),
            remaining: rate.and_then(|r| r.get("remaining")).map(display_value),
            permissions: value
                .get("api_key")
                .and_then(|k| k.get("permissions"))
                .and_then(Value::as_array)
                .map(|perms| perms.iter().map(display_value).collect())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
    NotFound,
    Unknown(String),
}

impl JobStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "pending" => JobStatus::Pending,
            "running" => JobStatus::Running,
            "completed" => JobStatus::Completed,
            "failed" => JobStatus::Failed,
            "not_found" => JobStatus::NotFound,
            other => JobStatus::Unknown(other.to_string()),
        }
    }
}

/// Snapshot of a backend document-processing job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobState {
    pub status: JobStatus,
    pub progress: Option<f64>,
    pub error: Option<String>,
}

impl JobState {
    pub fn from_value(value: &Value) -> Self {
        Self {
            status: JobStatus::parse(
                value
                    .get("status")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown"),
            ),
            progress: value.get("progress").and_then(Value::as_f64),
            error: value
                .get("error")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: JobStatus::NotFound,
            progress: None,
            error: Some("Job not found or expired".to_string()),
        }
    }
}

/// Reply to a document upload: a job to poll, or items the backend already has.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentStart {
    Started {
        job_id: String,
    },
    Fallback {
        menu_items: Vec<String>,
        error: Option<String>,
    },
    CacheHit {
        menu_items: Vec<String>,
    },
}

impl DocumentStart {
    pub fn from_value(value: &Value) -> Result<Self, DomainError> {
        let job_id = match value.get("job_id") {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        if let Some(job_id) = job_id {
            return Ok(DocumentStart::Started { job_id });
        }

        let menu_items = || -> Vec<String> {
            value
                .get("menu_items")
                .and_then(Value::as_array)
                .map(|items| items.iter().map(display_value).collect())
                .unwrap_or_default()
        };

        match value.get("status").and_then(Value::as_str) {
            Some("fallback_success") => Ok(DocumentStart::Fallback {
                menu_items: menu_items(),
                error: value
                    .get("error")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            }),
            Some("cache_hit") => Ok(DocumentStart::CacheHit {
                menu_items: menu_items(),
            }),
            _ => Err(DomainError::UnexpectedResponse(
                value.to_string().chars().take(200).collect(),
            )),
        }
    }
}

/// Extensions accepted by the upload form.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "png", "jpg", "jpeg", "docx"];

/// A file uploaded through the UI, forwarded to the backend as multipart.
/// `bytes` is reference counted, so clones never copy the file.
#[derive(Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl DocumentUpload {
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }

    pub fn is_supported(&self) -> bool {
        self.extension()
            .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
    }

    /// Identifies an upload already processed in a session.
    pub fn file_key(&self) -> String {
        format!("{}_{}", self.file_name, self.bytes.len())
    }
}

impl fmt::Debug for DocumentUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Result of the full upload -> poll -> extract flow.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentOutcome {
    Extracted {
        job_id: String,
        content: String,
        items: Vec<String>,
    },
    /// Job finished but produced no readable content.
    ContentUnavailable {
        job_id: String,
        preselected: Vec<String>,
    },
    Fallback {
        items: Vec<String>,
        error: Option<String>,
    },
    CacheHit {
        items: Vec<String>,
    },
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `total_calories` -> `Total Calories`.
pub fn title_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut prev_alpha = false;
    for c in key.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("total_calories"), "Total Calories");
        assert_eq!(title_case("SODIUM_mg"), "Sodium Mg");
    }

    #[test]
    fn test_analysis_request_wire_format() {
        let req = AnalysisRequest {
            menu_items: vec!["Laksa".to_string()],
            dietary_preferences: vec![DietaryPreference::GlutenFree],
            health_conditions: vec![HealthCondition::HeartDisease],
            age_group: AgeGroup::Senior,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "menu_items": ["Laksa"],
                "dietary_preferences": ["gluten-free"],
                "health_conditions": ["heart-disease"],
                "age_group": "senior"
            })
        );
    }

    #[test]
    fn test_section_shapes() {
        let report = AnalysisReport::from_value(&json!({
            "recommendations": ["Eat more greens", "Less gravy"],
            "nutritional_analysis": {"calories": 650, "sodium_level": "high"},
            "singapore_guidelines_compliance": "Mostly compliant",
        }));
        assert_eq!(
            report.recommendations,
            Section::Items(vec!["Eat more greens".into(), "Less gravy".into()])
        );
        assert_eq!(
            report.nutritional_analysis,
            Section::Fields(vec![
                ("Calories".into(), "650".into()),
                ("Sodium Level".into(), "high".into()),
            ])
        );
        assert_eq!(
            report.guidelines_compliance,
            Section::Text("Mostly compliant".into())
        );
        assert!(report.alternatives.is_empty());
    }

    #[test]
    fn test_fields_keep_backend_order() {
        let value = json!({
            "total_calories": 650,
            "sodium_mg": 1800,
            "assessment": "high",
        });
        let section = Section::from_value(Some(&value));
        assert_eq!(
            section,
            Section::Fields(vec![
                ("Total Calories".into(), "650".into()),
                ("Sodium Mg".into(), "1800".into()),
                ("Assessment".into(), "high".into()),
            ])
        );
    }

    #[test]
    fn test_document_start_variants() {
        assert_eq!(
            DocumentStart::from_value(&json!({"job_id": "abc"})).unwrap(),
            DocumentStart::Started {
                job_id: "abc".into()
            }
        );
        assert_eq!(
            DocumentStart::from_value(&json!({"status": "cache_hit", "menu_items": ["Laksa"]}))
                .unwrap(),
            DocumentStart::CacheHit {
                menu_items: vec!["Laksa".into()]
            }
        );
        assert_eq!(
            DocumentStart::from_value(&json!({"status": "fallback_success", "error": "ocr down"}))
                .unwrap(),
            DocumentStart::Fallback {
                menu_items: vec![],
                error: Some("ocr down".into())
            }
        );
        assert!(matches!(
            DocumentStart::from_value(&json!({"status": "weird"})),
            Err(DomainError::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn test_api_key_info_lenient() {
        let info = ApiKeyInfo::from_value(&json!({
            "api_key": {"permissions": ["read", "analyze"]},
            "rate_limit": {"limit": 100, "remaining": 97}
        }));
        assert_eq!(info.rate_limit.as_deref(), Some("100"));
        assert_eq!(info.remaining.as_deref(), Some("97"));
        assert_eq!(info.permissions, vec!["read", "analyze"]);
        assert_eq!(ApiKeyInfo::from_value(&json!("nope")), ApiKeyInfo::default());
    }

    #[test]
    fn test_upload_extension_and_key() {
        let upload = DocumentUpload {
            file_name: "Menu.JPEG".to_string(),
            content_type: None,
            bytes: Bytes::from(vec![0; 42]),
        };
        assert!(upload.is_supported());
        assert_eq!(upload.file_key(), "Menu.JPEG_42");

        let bad = DocumentUpload {
            file_name: "menu.txt".to_string(),
            ..upload
        };
        assert!(!bad.is_supported());
    }

    #[test]
    fn test_wire_enum_parse() {
        assert_eq!(
            "low-sodium".parse::<DietaryPreference>().unwrap(),
            DietaryPreference::LowSodium
        );
        assert_eq!(
            "age_specific".parse::<GuidelineCategory>().unwrap(),
            GuidelineCategory::AgeSpecific
        );
        assert!("pizza".parse::<HealthCondition>().is_err());
        assert_eq!("senior".parse::<AgeGroup>().unwrap(), AgeGroup::Senior);
    }
}
