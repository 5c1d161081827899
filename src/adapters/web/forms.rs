//! Form payloads posted by the page.
//!
//! Checkbox groups repeat their field name, so those forms are read as raw
//! `(name, value)` pairs and folded here.

use crate::domain::{AgeGroup, DietaryPreference, DomainError, HealthCondition};
use crate::usecases::AnalysisForm;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    pub mode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiKeyForm {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub action: String,
}

/// What the API key form asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Save,
    Test,
    Clear,
}

impl KeyAction {
    /// Unknown actions fall back to testing, which is what the Enter key submits.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "save" => KeyAction::Save,
            "clear" => KeyAction::Clear,
            _ => KeyAction::Test,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GuidelinesQuery {
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationForm {
    #[serde(default)]
    pub query: String,
}

/// Checked extracted items plus the free-text extras.
#[derive(Debug, Default, PartialEq)]
pub struct SelectionForm {
    pub items: Vec<String>,
    pub custom: String,
}

pub fn selection_form(fields: &[(String, String)]) -> SelectionForm {
    let mut form = SelectionForm::default();
    for (name, value) in fields {
        match name.as_str() {
            "item" => form.items.push(value.clone()),
            "custom" => form.custom = value.clone(),
            _ => {}
        }
    }
    form
}

/// Builds the analysis form. Unknown enum values are rejected rather than dropped.
pub fn analysis_form(fields: &[(String, String)]) -> Result<AnalysisForm, DomainError> {
    let mut form = AnalysisForm::default();
    for (name, value) in fields {
        match name.as_str() {
            "menu_items" => form.menu_text = value.clone(),
            "age_group" => form.age_group = value.parse::<AgeGroup>()?,
            "preference" => {
                let preference = value.parse::<DietaryPreference>()?;
                if !form.preferences.contains(&preference) {
                    form.preferences.push(preference);
                }
            }
            "condition" => {
                let condition = value.parse::<HealthCondition>()?;
                if !form.conditions.contains(&condition) {
                    form.conditions.push(condition);
                }
            }
            _ => {}
        }
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_analysis_form_collects_repeated_fields() {
        let form = analysis_form(&pairs(&[
            ("menu_items", "Laksa\nKaya Toast"),
            ("age_group", "senior"),
            ("preference", "halal"),
            ("preference", "low-sodium"),
            ("preference", "halal"),
            ("condition", "hypertension"),
        ]))
        .unwrap();
        assert_eq!(form.menu_text, "Laksa\nKaya Toast");
        assert_eq!(form.age_group, AgeGroup::Senior);
        assert_eq!(
            form.preferences,
            vec![DietaryPreference::Halal, DietaryPreference::LowSodium]
        );
        assert_eq!(form.conditions, vec![HealthCondition::Hypertension]);
    }

    #[test]
    fn test_analysis_form_rejects_unknown_values() {
        assert!(analysis_form(&pairs(&[("condition", "scurvy")])).is_err());
        assert!(analysis_form(&pairs(&[("age_group", "toddler")])).is_err());
    }

    #[test]
    fn test_selection_form() {
        let form = selection_form(&pairs(&[
            ("item", "Laksa"),
            ("item", "Nasi Lemak"),
            ("custom", "Teh Tarik"),
        ]));
        assert_eq!(form.items, vec!["Laksa", "Nasi Lemak"]);
        assert_eq!(form.custom, "Teh Tarik");
    }

    #[test]
    fn test_key_action_defaults_to_test() {
        assert_eq!(KeyAction::parse("clear"), KeyAction::Clear);
        assert_eq!(KeyAction::parse(""), KeyAction::Test);
    }
}
