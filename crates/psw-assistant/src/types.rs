//! Assistant message and suggestion types
//!
//! These mirror the JSON the model is asked to produce, so field names stay
//! camelCase on the wire.

use std::fmt;

use psw_core::types::format_number;
use psw_models::{Project, ReferenceData, WizardStep};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One turn of a conversation with the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiMessage {
    pub role: MessageRole,
    pub content: String,
}

impl AiMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Value the model proposes for a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SuggestionValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl SuggestionValue {
    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => serde_json::json!(n),
            Self::Text(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for SuggestionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A proposed value for one project field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSuggestion {
    /// Project field in camelCase (`industryId`, `budgetTemplateId`, ...)
    pub field_id: String,
    pub field_name: String,
    pub value: SuggestionValue,
    pub display_value: String,
    pub confidence: Confidence,
}

/// Reply from the model with any suggestions pulled out of it
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AiResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<FieldSuggestion>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRef {
    pub id: String,
    pub name: String,
    pub standard_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRef {
    pub id: String,
    pub name: String,
    pub category: String,
}

/// The slice of reference data the model gets to see
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextReferenceData {
    pub industries: Vec<NamedRef>,
    pub roles: Vec<RoleRef>,
    pub templates: Vec<TemplateRef>,
    pub resource_managers: Vec<NamedRef>,
}

impl ContextReferenceData {
    pub fn from_reference(reference: &ReferenceData) -> Self {
        Self {
            industries: reference
                .industries
                .iter()
                .map(|i| NamedRef {
                    id: i.id.clone(),
                    name: i.name.clone(),
                })
                .collect(),
            roles: reference
                .active_roles()
                .map(|r| RoleRef {
                    id: r.id.clone(),
                    name: r.name.clone(),
                    standard_rate: r.standard_rate,
                })
                .collect(),
            templates: reference
                .templates
                .iter()
                .map(|t| TemplateRef {
                    id: t.id.clone(),
                    name: t.name.clone(),
                    category: t.category.clone(),
                })
                .collect(),
            resource_managers: reference
                .resource_managers
                .iter()
                .map(|m| NamedRef {
                    id: m.id.clone(),
                    name: m.name.clone(),
                })
                .collect(),
        }
    }
}

/// What the model knows about the user's position in the wizard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardContext {
    pub step: WizardStep,
    pub project_data: Value,
    pub reference_data: ContextReferenceData,

    /// Replaces the step-based system prompt (used by the budgeting agent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl WizardContext {
    pub fn new(step: WizardStep, project_data: Value, reference: &ReferenceData) -> Self {
        Self {
            step,
            project_data,
            reference_data: ContextReferenceData::from_reference(reference),
            system_prompt: None,
        }
    }

    pub fn for_project(step: WizardStep, project: &Project, reference: &ReferenceData) -> Self {
        let project_data = serde_json::to_value(project).unwrap_or_default();
        Self::new(step, project_data, reference)
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Non-empty string field of the project data
    pub fn project_field(&self, field: &str) -> Option<&str> {
        self.project_data
            .get(field)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_value_shapes() {
        let parsed: Vec<SuggestionValue> = serde_json::from_str(r#"["6", 250000, true]"#).unwrap();
        assert_eq!(parsed[0], SuggestionValue::Text("6".into()));
        assert_eq!(parsed[1], SuggestionValue::Number(250000.0));
        assert_eq!(parsed[2], SuggestionValue::Bool(true));
        assert_eq!(parsed[1].to_string(), "250000");
    }

    #[test]
    fn test_field_suggestion_wire_format() {
        let json = r#"{
            "fieldId": "industryId",
            "fieldName": "Industry",
            "value": "6",
            "displayValue": "Financial Services",
            "confidence": "high"
        }"#;
        let suggestion: FieldSuggestion = serde_json::from_str(json).unwrap();
        assert_eq!(suggestion.field_id, "industryId");
        assert_eq!(suggestion.confidence, Confidence::High);
    }

    #[test]
    fn test_context_from_project() {
        let mut project = Project::default();
        project.client_name = "Acme Holdings".into();
        let reference = ReferenceData::standard();

        let context = WizardContext::for_project(WizardStep::ProjectSetup, &project, &reference);
        assert_eq!(context.project_field("clientName"), Some("Acme Holdings"));
        assert_eq!(context.project_field("industryId"), None);
        assert_eq!(context.reference_data.industries.len(), reference.industries.len());
        assert!(context.reference_data.roles.iter().any(|r| r.id == "T004"));
        assert!(context.system_prompt.is_none());
    }
}
