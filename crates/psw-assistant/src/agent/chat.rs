//! Budgeting conversation
//!
//! Keeps the transcript and the latest estimate. Every reply, including the
//! canned ones used when the model can't be reached, lands in the transcript.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use psw_core::types::generate_id;
use psw_models::{ReferenceData, WizardStep};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::estimate::BudgetEstimate;
use super::parser::parse_budget_from_response;
use crate::prompts::budgeting_system_prompt;
use crate::service::AiService;
use crate::types::{AiMessage, MessageRole, WizardContext};

pub const UNAVAILABLE_MESSAGE: &str =
    "I'm currently not available. Please configure your API key to use the AI assistant.";

pub const ERROR_MESSAGE: &str = "I'm sorry, I encountered an error. Please try again.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationMessage {
    fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

pub struct BudgetingChat {
    service: Arc<dyn AiService>,
    reference: Arc<ReferenceData>,
    messages: Vec<ConversationMessage>,
    budget: Option<BudgetEstimate>,
}

impl BudgetingChat {
    pub fn new(service: Arc<dyn AiService>, reference: Arc<ReferenceData>) -> Self {
        Self {
            service,
            reference,
            messages: Vec::new(),
            budget: None,
        }
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn budget(&self) -> Option<&BudgetEstimate> {
        self.budget.as_ref()
    }

    pub fn has_started(&self) -> bool {
        !self.messages.is_empty()
    }

    /// Replace the estimate with one the user edited by hand
    pub fn update_budget(&mut self, budget: BudgetEstimate) {
        self.budget = Some(budget);
    }

    fn push(&mut self, role: MessageRole, content: impl Into<String>) -> &ConversationMessage {
        self.messages.push(ConversationMessage::new(role, content));
        &self.messages[self.messages.len() - 1]
    }

    fn context(&self) -> WizardContext {
        let budget = serde_json::to_value(&self.budget).unwrap_or_default();
        WizardContext::new(WizardStep::Budget, budget, &self.reference)
            .with_system_prompt(budgeting_system_prompt(self.budget.as_ref()))
    }

    /// Send a user message and return the assistant's reply
    ///
    /// The estimate is re-extracted from every successful exchange.
    pub async fn send_message(&mut self, content: &str) -> &ConversationMessage {
        self.push(MessageRole::User, content);

        let service = Arc::clone(&self.service);
        if !service.is_available() {
            debug!("Budgeting chat without an AI service");
            return self.push(MessageRole::Assistant, UNAVAILABLE_MESSAGE);
        }

        let history: Vec<AiMessage> = self
            .messages
            .iter()
            .map(|m| AiMessage {
                role: m.role,
                content: m.content.clone(),
            })
            .collect();

        match service.chat(&history, &self.context()).await {
            Ok(response) => {
                let estimate = parse_budget_from_response(&response.message, content, &self.reference);
                debug!(
                    lines = estimate.line_items.len(),
                    hours = estimate.total_hours,
                    "Extracted budget estimate"
                );
                self.budget = Some(estimate);
                self.push(MessageRole::Assistant, response.message)
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "Budgeting chat failed");
                self.push(MessageRole::Assistant, ERROR_MESSAGE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::ResourceLevel;
    use crate::error::AssistantError;
    use crate::service::{DisabledService, MockService};
    use crate::types::AiResponse;

    fn chat_with(service: MockService) -> BudgetingChat {
        BudgetingChat::new(Arc::new(service), ReferenceData::shared())
    }

    #[tokio::test]
    async fn test_unavailable_service_gets_fallback() {
        let mut chat = BudgetingChat::new(Arc::new(DisabledService), ReferenceData::shared());
        assert!(!chat.has_started());

        let reply = chat.send_message("2 managers for 6 weeks").await;
        assert_eq!(reply.role, MessageRole::Assistant);
        assert_eq!(reply.content, UNAVAILABLE_MESSAGE);
        assert_eq!(chat.messages().len(), 2);
        assert!(chat.budget().is_none());
    }

    #[tokio::test]
    async fn test_reply_updates_estimate() {
        let mut service = MockService::new();
        service.expect_is_available().return_const(true);
        service
            .expect_chat()
            .times(1)
            .returning(|messages, context| {
                assert_eq!(messages.len(), 1);
                assert_eq!(messages[0].role, MessageRole::User);
                assert!(context
                    .system_prompt
                    .as_deref()
                    .unwrap_or_default()
                    .ends_with("Current budget: none yet"));
                Ok(AiResponse {
                    message: "Sounds good. Two managers over 6 weeks comes to 480 hours.".into(),
                    suggestions: None,
                })
            });

        let mut chat = chat_with(service);
        let reply = chat.send_message("2 managers for 6 weeks").await;
        assert!(reply.content.starts_with("Sounds good."));

        let budget = chat.budget().unwrap();
        assert_eq!(budget.engagement_length, 6);
        assert_eq!(budget.line_items[0].resource_level, ResourceLevel::Manager);
        assert_eq!(budget.total_hours, 480.0);
    }

    #[tokio::test]
    async fn test_history_is_sent_each_turn() {
        let mut service = MockService::new();
        service.expect_is_available().return_const(true);
        let mut turn = 0;
        service.expect_chat().times(2).returning(move |messages, _| {
            turn += 1;
            assert_eq!(messages.len(), 2 * turn - 1);
            Ok(AiResponse {
                message: format!("reply {}", turn),
                suggestions: None,
            })
        });

        let mut chat = chat_with(service);
        chat.send_message("1 partner").await;
        chat.send_message("make it 2 partners").await;
        assert_eq!(chat.messages().len(), 4);
        assert_eq!(chat.budget().unwrap().line_items[0].count, 2);
    }

    #[tokio::test]
    async fn test_provider_error_gets_apology() {
        let mut service = MockService::new();
        service.expect_is_available().return_const(true);
        service.expect_chat().returning(|_, _| {
            Err(AssistantError::Api {
                status: 500,
                body: "boom".into(),
            })
        });

        let mut chat = chat_with(service);
        chat.update_budget(BudgetEstimate::from_line_items("Kept", 4, Vec::new()));
        let reply = chat.send_message("anything").await;
        assert_eq!(reply.content, ERROR_MESSAGE);
        assert_eq!(chat.budget().unwrap().project_name, "Kept");
    }
}
