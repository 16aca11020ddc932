//! AI service capability and provider selection

use std::sync::Arc;

use async_trait::async_trait;
use psw_core::config::{AiConfig, AiProvider};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::anthropic::AnthropicService;
use crate::openai::OpenAiService;
use crate::error::{AssistantError, AssistantResult};
use crate::types::{AiMessage, AiResponse, FieldSuggestion, WizardContext};

/// A language model that can chat about the wizard and propose field values
#[async_trait]
pub trait AiService: Send + Sync {
    /// Whether calls can succeed at all (provider selected and credentialed)
    fn is_available(&self) -> bool;

    /// Continue a conversation; suggestions are pulled out of the reply
    async fn chat(
        &self,
        messages: &[AiMessage],
        context: &WizardContext,
    ) -> AssistantResult<AiResponse>;

    /// Ask for field suggestions for the context's current step
    async fn get_suggestions(&self, context: &WizardContext)
        -> AssistantResult<Vec<FieldSuggestion>>;
}

/// Decode a provider reply, turning non-2xx statuses into [`AssistantError::Api`]
pub(crate) async fn json_body<T: DeserializeOwned>(response: reqwest::Response) -> AssistantResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AssistantError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json().await?)
}

/// Stand-in used when no provider is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledService;

#[async_trait]
impl AiService for DisabledService {
    fn is_available(&self) -> bool {
        false
    }

    async fn chat(
        &self,
        _messages: &[AiMessage],
        _context: &WizardContext,
    ) -> AssistantResult<AiResponse> {
        Err(AssistantError::NotConfigured)
    }

    async fn get_suggestions(
        &self,
        _context: &WizardContext,
    ) -> AssistantResult<Vec<FieldSuggestion>> {
        Ok(Vec::new())
    }
}

/// Pick the provider named in the configuration
///
/// A provider without credentials degrades to [`DisabledService`] with a
/// warning instead of failing startup.
pub fn service_from_config(config: &AiConfig) -> AssistantResult<Arc<dyn AiService>> {
    if config.provider != AiProvider::Disabled && !config.is_configured() {
        warn!(provider = ?config.provider, "AI provider selected without an API key; assistant disabled");
        return Ok(Arc::new(DisabledService));
    }

    let service: Arc<dyn AiService> = match config.provider {
        AiProvider::Disabled => return Ok(Arc::new(DisabledService)),
        AiProvider::Anthropic => Arc::new(AnthropicService::new(config)?),
        AiProvider::OpenAi => Arc::new(OpenAiService::new(config)?),
    };
    info!(provider = ?config.provider, model = %config.model(), "AI assistant enabled");
    Ok(service)
}

#[cfg(test)]
mockall::mock! {
    pub Service {}

    #[async_trait]
    impl AiService for Service {
        fn is_available(&self) -> bool;

        async fn chat(
            &self,
            messages: &[AiMessage],
            context: &WizardContext,
        ) -> AssistantResult<AiResponse>;

        async fn get_suggestions(
            &self,
            context: &WizardContext,
        ) -> AssistantResult<Vec<FieldSuggestion>>;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psw_models::{ReferenceData, WizardStep};
    use serde_json::json;

    fn context() -> WizardContext {
        WizardContext::new(WizardStep::ProjectSetup, json!({}), &ReferenceData::standard())
    }

    #[tokio::test]
    async fn test_disabled_service() {
        let service = DisabledService;
        assert!(!service.is_available());
        assert!(matches!(
            service.chat(&[AiMessage::user("hi")], &context()).await,
            Err(AssistantError::NotConfigured)
        ));
        assert!(service.get_suggestions(&context()).await.unwrap().is_empty());
    }

    #[test]
    fn test_service_from_config() {
        let disabled = service_from_config(&AiConfig::default()).unwrap();
        assert!(!disabled.is_available());

        let missing_key = AiConfig {
            provider: AiProvider::Anthropic,
            api_key: Some("  ".into()),
            ..Default::default()
        };
        assert!(!service_from_config(&missing_key).unwrap().is_available());

        let configured = AiConfig {
            provider: AiProvider::Anthropic,
            api_key: Some("sk-ant-test".into()),
            ..Default::default()
        };
        assert!(service_from_config(&configured).unwrap().is_available());

        let openai = AiConfig {
            provider: AiProvider::OpenAi,
            api_key: Some("sk-test".into()),
            ..Default::default()
        };
        assert!(service_from_config(&openai).unwrap().is_available());
    }
}
