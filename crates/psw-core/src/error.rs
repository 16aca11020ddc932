//! Core error types for PSW
//!
//! Hard failures of store, import/export and configuration operations.
//! Wizard validation findings are not errors; they live in `psw-contracts`.

use std::collections::BTreeMap;
use thiserror::Error;

/// Core error type for all PSW operations
#[derive(Error, Debug)]
pub enum PswError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("External service error: {service} - {message}")]
    ExternalService { service: String, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PswError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl Into<String>) -> Self {
        PswError::NotFound {
            entity,
            field,
            value: value.into(),
        }
    }

    /// Single field validation failure
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, message);
        PswError::Validation(errors)
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            PswError::NotFound { .. } => "not_found",
            PswError::Validation(_) => "validation_failed",
            PswError::Export(_) => "export_failed",
            PswError::Import(_) => "import_failed",
            PswError::Serialization(_) => "serialization_error",
            PswError::Config(_) => "configuration_error",
            PswError::ExternalService { .. } => "external_service_error",
            PswError::Internal(_) => "internal_error",
        }
    }

    /// Process exit code used by the CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            PswError::NotFound { .. } => 3,
            PswError::Validation(_) => 4,
            PswError::Config(_) => 78,
            _ => 1,
        }
    }
}

impl From<serde_json::Error> for PswError {
    fn from(err: serde_json::Error) -> Self {
        PswError::Serialization(err.to_string())
    }
}

/// Field-keyed input errors (bad week number, negative amount, ...)
#[derive(Error, Debug, Default, Clone, PartialEq)]
#[error("{}", self.full_messages().join("; "))]
pub struct ValidationErrors {
    /// Field-specific errors: field_name -> messages
    pub errors: BTreeMap<String, Vec<String>>,
    /// Errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    /// Check if there are errors for a specific field
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
        self.base_errors.extend(other.base_errors);
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        for (field, field_messages) in &self.errors {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }
}

impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(source: validator::ValidationErrors) -> Self {
        let mut errors = ValidationErrors::new();
        for (field, field_errors) in source.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("is invalid ({})", error.code));
                errors.add(field.to_string(), message);
            }
        }
        errors
    }
}

impl From<validator::ValidationErrors> for PswError {
    fn from(source: validator::ValidationErrors) -> Self {
        PswError::Validation(source.into())
    }
}
