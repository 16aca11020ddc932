//! OpenAI Chat Completions provider

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

const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

impl<'a> CompletionRequest<'a> {
    /// System prompt first, then the conversation
    fn new(model: &'a str, max_tokens: u32, system: &'a str, history: &'a [AiMessage]) -> Self {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage {
            role: "system",
            content: system,
        });
        messages.extend(history.iter().map(|m| ChatMessage {
            role: m.role.as_str(),
            content: &m.content,
        }));
        Self {
            model,
            messages,
            temperature: TEMPERATURE,
            max_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl CompletionResponse {
    fn text(self) -> AssistantResult<String> {
        let choice = self.choices.into_iter().next().ok_or(AssistantError::EmptyResponse)?;
        Ok(choice.message.content.unwrap_or_default())
    }
}

pub struct OpenAiService {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
}

impl OpenAiService {
    pub fn new(config: &AiConfig) -> AssistantResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone().unwrap_or_default(),
            model: config.model_or(AiProvider::OpenAi.default_model()).to_string(),
            base_url: config.base_url_or(AiProvider::OpenAi.default_base_url()).to_string(),
            max_tokens: config.max_tokens,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'))
    }

    async fn complete(&self, system: &str, history: &[AiMessage]) -> AssistantResult<String> {
        let request = CompletionRequest::new(&self.model, self.max_tokens, system, history);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let reply: CompletionResponse = json_body(response).await?;
        let text = reply.text()?;
        debug!(model = %self.model, chars = text.len(), "Received completion");
        Ok(text)
    }
}

#[async_trait]
impl AiService for OpenAiService {
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
    use serde_json::json;

    #[test]
    fn test_system_prompt_leads_the_conversation() {
        let history = [AiMessage::user("Which template?"), AiMessage::assistant("Audit.")];
        let request = CompletionRequest::new("gpt-4o-mini", 512, "be brief", &history);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "gpt-4o-mini",
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "Which template?"},
                    {"role": "assistant", "content": "Audit."}
                ],
                "temperature": 0.7f32,
                "max_tokens": 512
            })
        );
    }

    #[test]
    fn test_response_text() {
        let reply: CompletionResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "Use the tax template."}}]
        }))
        .unwrap();
        assert_eq!(reply.text().unwrap(), "Use the tax template.");

        let empty: CompletionResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(matches!(empty.text(), Err(AssistantError::EmptyResponse)));
    }

    #[test]
    fn test_provider_defaults() {
        let service = OpenAiService::new(&AiConfig {
            provider: AiProvider::OpenAi,
            api_key: Some("sk-test".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(service.model, "gpt-4o-mini");
        assert_eq!(service.endpoint(), "https://api.openai.com/v1/chat/completions");
        assert!(service.is_available());

        let blank = OpenAiService::new(&AiConfig {
            provider: AiProvider::OpenAi,
            model: Some(String::new()),
            base_url: Some("  ".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(blank.model, "gpt-4o-mini");
        assert_eq!(blank.endpoint(), "https://api.openai.com/v1/chat/completions");
    }
}
