//! Field suggestions: pulling them out of model output and applying them

use once_cell::sync::Lazy;
use psw_core::error::{PswError, ValidationErrors};
use psw_core::result::ServiceResult;
use psw_models::ProjectPatch;
use psw_services::ProjectStore;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::types::{FieldSuggestion, SuggestionValue};

static JSON_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```json\s*(.*?)\s*```").unwrap());
static JSON_BLOCKS_FOR_DISPLAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```json.*?```").unwrap());

static JSON_ARRAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\[.*\]").unwrap());

/// Body of the first fenced ```json block, if any
pub fn json_block(text: &str) -> Option<&str> {
    JSON_BLOCK
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parse each element on its own so one malformed entry doesn't sink the rest
fn suggestions_from_array(items: Vec<Value>) -> Vec<FieldSuggestion> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<FieldSuggestion>(item) {
            Ok(suggestion) => Some(suggestion),
            Err(e) => {
                debug!(error = %e, "Skipping malformed suggestion");
                None
            }
        })
        .collect()
}

/// Suggestions embedded in a chat reply as ```json { "suggestions": [...] } ```
pub fn parse_chat_suggestions(text: &str) -> Option<Vec<FieldSuggestion>> {
    let block = json_block(text)?;
    let mut data: Value = serde_json::from_str(block).ok()?;
    match data.get_mut("suggestions").map(Value::take) {
        Some(Value::Array(items)) => Some(suggestions_from_array(items)),
        _ => None,
    }
}

/// Suggestions from a reply that should be a bare JSON array
///
/// Accepts an array anywhere in the text, a whole-text array, or an object
/// with a `suggestions` array. Anything else yields no suggestions.
pub fn parse_suggestion_list(text: &str) -> Vec<FieldSuggestion> {
    if let Some(m) = JSON_ARRAY.find(text) {
        if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(m.as_str()) {
            return suggestions_from_array(items);
        }
    }

    match serde_json::from_str::<Value>(text.trim()) {
        Ok(Value::Array(items)) => suggestions_from_array(items),
        Ok(Value::Object(mut data)) => match data.remove("suggestions") {
            Some(Value::Array(items)) => suggestions_from_array(items),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Reply text with the ```json blocks removed, for display
pub fn clean_message_text(text: &str) -> String {
    JSON_BLOCKS_FOR_DISPLAY.replace_all(text, "").trim().to_string()
}

fn patch_from_value(field_id: &str, value: Value) -> Result<ProjectPatch, serde_json::Error> {
    let mut fields = Map::new();
    fields.insert(field_id.to_string(), value);
    serde_json::from_value(Value::Object(fields))
}

/// Single-field patch for a suggestion
///
/// Numbers and booleans destined for text fields (`"industryId": 6`) are
/// retried as text.
fn patch_for(suggestion: &FieldSuggestion) -> Result<ProjectPatch, String> {
    match patch_from_value(&suggestion.field_id, suggestion.value.to_json()) {
        Ok(patch) => Ok(patch),
        Err(first) => match suggestion.value {
            SuggestionValue::Text(_) => Err(first.to_string()),
            _ => patch_from_value(&suggestion.field_id, Value::String(suggestion.value.to_string()))
                .map_err(|_| first.to_string()),
        },
    }
}

/// Merge accepted suggestions into the store's current project
///
/// Each suggestion is applied on its own. The result carries the ids of the
/// fields that were set and an error per field that could not be, either
/// because the project has no such field, the value has the wrong type, or the
/// value fails validation.
pub fn apply_suggestions(
    store: &mut ProjectStore,
    suggestions: &[FieldSuggestion],
) -> ServiceResult<Vec<String>> {
    let mut applied = Vec::new();
    let mut errors = ValidationErrors::new();

    for suggestion in suggestions {
        let field = suggestion.field_id.as_str();
        let patch = match patch_for(suggestion) {
            Ok(patch) => patch,
            Err(reason) => {
                debug!(field, %reason, "Rejected suggestion");
                errors.add(field, format!("cannot be applied: {}", reason));
                continue;
            }
        };

        match store.set_current_project(&patch) {
            Ok(()) => applied.push(field.to_string()),
            Err(PswError::Validation(invalid)) => {
                for message in invalid.full_messages() {
                    errors.add(field, message);
                }
            }
            Err(e) => errors.add(field, e.to_string()),
        }
    }

    debug!(applied = applied.len(), rejected = errors.errors.len(), "Applied suggestions");
    ServiceResult::partial(applied, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Confidence;
    use psw_core::config::BudgetingConfig;
    use psw_models::{ContractType, ReferenceData};

    fn suggestion(field_id: &str, value: SuggestionValue) -> FieldSuggestion {
        FieldSuggestion {
            field_id: field_id.into(),
            field_name: field_id.into(),
            display_value: value.to_string(),
            value,
            confidence: Confidence::Medium,
        }
    }

    const REPLY: &str = r#"Financial Services looks right for this client.

```json
{
  "suggestions": [
    {"fieldId": "industryId", "fieldName": "Industry", "value": "6", "displayValue": "Financial Services", "confidence": "high"},
    {"fieldId": "broken"}
  ]
}
```

Shall I pick a template too?"#;

    #[test]
    fn test_parse_chat_suggestions() {
        let parsed = parse_chat_suggestions(REPLY).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].display_value, "Financial Services");

        assert!(parse_chat_suggestions("No JSON here").is_none());
        assert!(parse_chat_suggestions("```json\n{\"other\": 1}\n```").is_none());
        assert!(parse_chat_suggestions("```json\nnot json\n```").is_none());
    }

    #[test]
    fn test_clean_message_text() {
        let cleaned = clean_message_text(REPLY);
        assert!(!cleaned.contains("```"));
        assert!(cleaned.starts_with("Financial Services looks right"));
        assert!(cleaned.ends_with("Shall I pick a template too?"));
    }

    #[test]
    fn test_parse_suggestion_list_shapes() {
        let array = r#"Here you go: [{"fieldId": "resourceManagerId", "fieldName": "Resource Manager", "value": "rm-1", "displayValue": "Jordan Lee", "confidence": "low"}]"#;
        assert_eq!(parse_suggestion_list(array).len(), 1);

        let object = r#"{"suggestions": [{"fieldId": "contractType", "fieldName": "Contract Type", "value": "Fixed Fee", "displayValue": "Fixed Fee", "confidence": "medium"}]}"#;
        assert_eq!(parse_suggestion_list(object)[0].field_id, "contractType");

        assert!(parse_suggestion_list("[]").is_empty());
        assert!(parse_suggestion_list("I have no suggestions.").is_empty());
    }

    #[test]
    fn test_apply_suggestions_reports_per_field() {
        let mut store = ProjectStore::new(ReferenceData::shared(), BudgetingConfig::default());
        let suggestions = vec![
            suggestion("industryId", SuggestionValue::Text("6".into())),
            suggestion("contractType", SuggestionValue::Text("Fixed Fee".into())),
            suggestion("totalProjectFee", SuggestionValue::Number(250_000.0)),
            suggestion("budgetTemplateId", SuggestionValue::Number(7.0)),
            suggestion("workPackagePriority", SuggestionValue::Text("Planning".into())),
            suggestion("adminFeePercent", SuggestionValue::Number(3.0)),
        ];

        let result = apply_suggestions(&mut store, &suggestions);
        assert!(result.is_failure());
        assert_eq!(
            result.result().unwrap(),
            &vec![
                "industryId".to_string(),
                "contractType".to_string(),
                "totalProjectFee".to_string(),
                "budgetTemplateId".to_string(),
            ]
        );
        assert!(result.errors().has_error("workPackagePriority"));
        assert!(result.errors().has_error("adminFeePercent"));

        let project = store.current_project();
        assert_eq!(project.industry_id, "6");
        assert_eq!(project.contract_type, ContractType::FixedFee);
        assert_eq!(project.total_project_fee, 250_000.0);
        assert_eq!(project.budget_template_id, "7");
        assert_eq!(project.admin_fee_percent, 0.10);
    }

    #[test]
    fn test_apply_no_suggestions_is_success() {
        let mut store = ProjectStore::new(ReferenceData::shared(), BudgetingConfig::default());
        let result = apply_suggestions(&mut store, &[]);
        assert!(result.is_success());
        assert!(result.result().unwrap().is_empty());
    }
}
