//! Assistant errors

use thiserror::Error;

/// Failures talking to an AI provider
///
/// Callers in the wizard never surface these directly; they log them and fall
/// back to a canned message.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("AI service not configured")]
    NotConfigured,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Provider error: HTTP {status} - {body}")]
    Api { status: u16, body: String },

    #[error("Empty response from provider")]
    EmptyResponse,
}

pub type AssistantResult<T> = Result<T, AssistantError>;

impl AssistantError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotConfigured => "ai_not_configured",
            Self::Http(_) => "ai_http_error",
            Self::Json(_) => "ai_invalid_payload",
            Self::Api { .. } => "ai_provider_error",
            Self::EmptyResponse => "ai_empty_response",
        }
    }
}

impl From<AssistantError> for psw_core::PswError {
    fn from(err: AssistantError) -> Self {
        psw_core::PswError::ExternalService {
            service: "ai".to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AssistantError::NotConfigured.error_code(), "ai_not_configured");
        let api = AssistantError::Api {
            status: 529,
            body: "overloaded".into(),
        };
        assert_eq!(api.error_code(), "ai_provider_error");
        assert_eq!(api.to_string(), "Provider error: HTTP 529 - overloaded");
    }

    #[test]
    fn test_converts_to_external_service_error() {
        let err: psw_core::PswError = AssistantError::EmptyResponse.into();
        assert!(matches!(err, psw_core::PswError::ExternalService { .. }));
    }
}
