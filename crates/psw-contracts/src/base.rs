//! Base contract system
//!
//! A step contract inspects a project snapshot and reports findings. Findings
//! are plain values; only `Severity::Error` findings block the wizard's "Next".

use psw_core::error::ValidationErrors;
use psw_metrics::MetricsEngine;
use psw_models::{Project, WizardStep};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One finding against one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

impl ValidationIssue {
    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Outcome of validating a step or a whole project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn from_issues(errors: Vec<ValidationIssue>) -> Self {
        Self {
            is_valid: !errors.iter().any(ValidationIssue::is_error),
            errors,
        }
    }

    pub fn valid() -> Self {
        Self::from_issues(Vec::new())
    }

    pub fn blocking(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.errors.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.errors.iter().filter(|i| i.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.blocking().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn issue_for(&self, field: &str) -> Option<&ValidationIssue> {
        self.errors.iter().find(|i| i.field == field)
    }

    /// Blocking findings as field-keyed errors (warnings dropped)
    pub fn to_validation_errors(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for issue in self.blocking() {
            errors.add(issue.field.clone(), issue.message.clone());
        }
        errors
    }
}

/// Rules for one wizard step
pub trait StepContract: Send + Sync {
    fn step(&self) -> WizardStep;

    fn validate(&self, project: &Project, engine: &MetricsEngine<'_>) -> Vec<ValidationIssue>;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_never_invalidate() {
        let result = ValidationResult::from_issues(vec![ValidationIssue::warning(
            "grossMargin",
            "low",
        )]);
        assert!(result.is_valid);
        assert_eq!(result.warning_count(), 1);
        assert_eq!(result.error_count(), 0);
        assert!(result.to_validation_errors().is_empty());
    }

    #[test]
    fn test_single_error_invalidates() {
        let result = ValidationResult::from_issues(vec![
            ValidationIssue::warning("demandHours", "variance"),
            ValidationIssue::error("demandStartDate", "Start date is required"),
        ]);
        assert!(!result.is_valid);
        assert_eq!(result.error_count(), 1);
        assert!(result.issue_for("demandStartDate").unwrap().is_error());
        assert!(result.to_validation_errors().has_error("demandStartDate"));
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        let issue = ValidationIssue::error("budget", "x");
        let value = serde_json::to_value(&issue).unwrap();
        assert_eq!(value["severity"], "error");

        let result = ValidationResult::valid();
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["isValid"], true);
    }
}
