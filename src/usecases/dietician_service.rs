//! Dietician use cases: menu analysis, food recommendations, official guidelines.
//!
//! Validates user input, then delegates to the backend port.

use crate::domain::menu::parse_menu_input;
use crate::domain::{
    AgeGroup, AnalysisReport, AnalysisRequest, DietaryPreference, DomainError, GuidelineCategory,
    HealthCondition,
};
use crate::ports::BackendPort;
use std::sync::Arc;
use tracing::info;

/// Raw analysis form input, before menu parsing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisForm {
    /// One item per line or comma-separated.
    pub menu_text: String,
    pub age_group: AgeGroup,
    pub preferences: Vec<DietaryPreference>,
    pub conditions: Vec<HealthCondition>,
}

/// Items that were sent along with the backend's report.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub menu_items: Vec<String>,
    pub report: AnalysisReport,
}

pub struct DieticianService {
    backend: Arc<dyn BackendPort>,
}

impl DieticianService {
    pub fn new(backend: Arc<dyn BackendPort>) -> Self {
        Self { backend }
    }

    pub async fn backend_available(&self) -> bool {
        self.backend.health().await
    }

    pub async fn analyze(
        &self,
        api_key: &str,
        form: AnalysisForm,
    ) -> Result<AnalysisOutcome, DomainError> {
        let menu_items = parse_menu_input(&form.menu_text);
        if menu_items.is_empty() {
            return Err(DomainError::InvalidInput(
                "Please enter at least one menu item to analyze.".to_string(),
            ));
        }

        let request = AnalysisRequest {
            menu_items,
            dietary_preferences: form.preferences,
            health_conditions: form.conditions,
            age_group: form.age_group,
        };
        let report = self.backend.analyze_menu(api_key, &request).await?;
        info!(items = request.menu_items.len(), "analysis rendered");

        Ok(AnalysisOutcome {
            menu_items: request.menu_items,
            report,
        })
    }

    pub async fn recommend(&self, api_key: &str, query: &str) -> Result<String, DomainError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DomainError::InvalidInput(
                "Describe what kind of food you are looking for.".to_string(),
            ));
        }
        self.backend.recommendations(api_key, query).await
    }

    pub async fn guidelines(
        &self,
        api_key: &str,
        category: GuidelineCategory,
    ) -> Result<serde_json::Value, DomainError> {
        self.backend.guidelines(api_key, category).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::backend::MockBackend;

    fn service() -> DieticianService {
        DieticianService::new(Arc::new(MockBackend::with_delay(0)))
    }

    #[tokio::test]
    async fn test_empty_menu_is_rejected() {
        let form = AnalysisForm {
            menu_text: " ,\n , ".to_string(),
            ..Default::default()
        };
        let err = service().analyze("fai_k", form).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_menu_items_are_parsed_before_sending() {
        let form = AnalysisForm {
            menu_text: "Chicken Rice\nLaksa, Teh Tarik".to_string(),
            age_group: AgeGroup::Senior,
            preferences: vec![DietaryPreference::Halal],
            conditions: vec![HealthCondition::Diabetes],
        };
        let outcome = service().analyze("fai_k", form).await.unwrap();
        assert_eq!(outcome.menu_items, vec!["Chicken Rice", "Laksa", "Teh Tarik"]);
    }

    #[tokio::test]
    async fn test_blank_recommendation_query_is_rejected() {
        assert!(matches!(
            service().recommend("fai_k", "   ").await,
            Err(DomainError::InvalidInput(_))
        ));
    }
}
