//! Anthropic Messages API provider

use std::time::Duration;

use async_trait::async_trait;
use psw_core::config::{AiConfig, AiProvider};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AssistantError, AssistantResult};
use crate::prompts::{suggestion_prompt, system_prompt};
use crate::service::{json_body, AiService};
use crate::suggestions::{clean_message_text, parse_chat_suggestions, parse_suggestion_list};
use crate::types::{AiMessage, AiResponse, FieldSuggestion, WizardContext};

const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: &'a [AiMessage],
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    /// First text block, empty when the reply has none
    fn text(self) -> String {
        self.content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .unwrap_or_default()
    }
}

pub struct AnthropicService {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
}

impl AnthropicService {
    pub fn new(config: &AiConfig) -> AssistantResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone().unwrap_or_default(),
            model: config.model_or(AiProvider::Anthropic.default_model()).to_string(),
            base_url: config.base_url_or(AiProvider::Anthropic.default_base_url()).to_string(),
            max_tokens: config.max_tokens,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.base_url.trim_end_matches('/'))
    }

    async fn complete(&self, system: &str, messages: &[AiMessage]) -> AssistantResult<String> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system,
            messages,
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await?;

        let reply: MessagesResponse = json_body(response).await?;
        let text = reply.text();
        debug!(model = %self.model, chars = text.len(), "Received completion");
        Ok(text)
    }
}

#[async_trait]
impl AiService for AnthropicService {
    fn is_available(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    async fn chat(
        &self,
        messages: &[AiMessage],
        context: &WizardContext,
    ) -> AssistantResult<AiResponse> {
        if !self.is_available() {
            return Err(AssistantError::NotConfigured);
        }

        let text = self.complete(&system_prompt(context), messages).await?;
        Ok(AiResponse {
            suggestions: parse_chat_suggestions(&text),
            message: clean_message_text(&text),
        })
    }

    async fn get_suggestions(
        &self,
        context: &WizardContext,
    ) -> AssistantResult<Vec<FieldSuggestion>> {
        if !self.is_available() {
            return Ok(Vec::new());
        }

        let prompt = suggestion_prompt(context);
        let text = self
            .complete(&prompt.system, &[AiMessage::user(prompt.user)])
            .await?;
        Ok(parse_suggestion_list(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psw_models::{ReferenceData, WizardStep};
    use serde_json::json;

    fn config(api_key: Option<&str>) -> AiConfig {
        AiConfig {
            api_key: api_key.map(String::from),
            base_url: Some("https://api.anthropic.com/".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_request_body() {
        let messages = [AiMessage::user("Which template?")];
        let request = MessagesRequest {
            model: "claude-3-5-haiku-20241022",
            max_tokens: 1024,
            system: "be brief",
            messages: &messages,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "claude-3-5-haiku-20241022",
                "max_tokens": 1024,
                "system": "be brief",
                "messages": [{"role": "user", "content": "Which template?"}]
            })
        );
    }

    #[test]
    fn test_response_text_extraction() {
        let reply: MessagesResponse = serde_json::from_value(json!({
            "id": "msg_1",
            "content": [
                {"type": "tool_use", "id": "t1"},
                {"type": "text", "text": "Use the standard audit template."}
            ]
        }))
        .unwrap();
        assert_eq!(reply.text(), "Use the standard audit template.");

        let empty: MessagesResponse = serde_json::from_value(json!({"content": []})).unwrap();
        assert_eq!(empty.text(), "");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let service = AnthropicService::new(&config(Some("key"))).unwrap();
        assert_eq!(service.endpoint(), "https://api.anthropic.com/v1/messages");
        assert!(service.is_available());
    }

    #[tokio::test]
    async fn test_without_key_never_calls_out() {
        let service = AnthropicService::new(&config(None)).unwrap();
        let context =
            WizardContext::new(WizardStep::ProjectSetup, json!({}), &ReferenceData::standard());

        assert!(!service.is_available());
        assert!(matches!(
            service.chat(&[AiMessage::user("hello")], &context).await,
            Err(AssistantError::NotConfigured)
        ));
        assert!(service.get_suggestions(&context).await.unwrap().is_empty());
    }
}
