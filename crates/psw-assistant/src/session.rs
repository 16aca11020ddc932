//! Wizard assistant session
//!
//! The side-panel conversation that follows the user through the wizard.
//! Landing on a new step posts a welcome message and fetches inline field
//! suggestions; suggestions that arrive in a chat reply wait as a pending
//! action until the user accepts or rejects them.

use std::collections::BTreeMap;
use std::sync::Arc;

use psw_core::result::ServiceResult;
use psw_core::types::generate_id;
use psw_models::{Project, ReferenceData, WizardStep};
use psw_services::ProjectStore;
use serde::Serialize;
use tracing::{debug, warn};

use crate::agent::ERROR_MESSAGE;
use crate::prompts::welcome_message;
use crate::service::AiService;
use crate::suggestions::apply_suggestions;
use crate::types::{AiMessage, FieldSuggestion, WizardContext};

/// Suggestions from a chat reply awaiting the user's decision
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingAction {
    pub id: String,
    pub suggestions: Vec<FieldSuggestion>,
    /// "Fill 2 fields"
    pub description: String,
}

impl PendingAction {
    fn fill_fields(suggestions: Vec<FieldSuggestion>) -> Self {
        let description = match suggestions.len() {
            1 => "Fill 1 field".to_string(),
            n => format!("Fill {} fields", n),
        };
        Self {
            id: generate_id(),
            suggestions,
            description,
        }
    }
}

pub struct WizardAssistant {
    service: Arc<dyn AiService>,
    reference: Arc<ReferenceData>,
    messages: Vec<AiMessage>,
    pending: Option<PendingAction>,
    inline: BTreeMap<String, FieldSuggestion>,
    last_step: Option<WizardStep>,
}

impl WizardAssistant {
    pub fn new(service: Arc<dyn AiService>, reference: Arc<ReferenceData>) -> Self {
        Self {
            service,
            reference,
            messages: Vec::new(),
            pending: None,
            inline: BTreeMap::new(),
            last_step: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.service.is_available()
    }

    pub fn messages(&self) -> &[AiMessage] {
        &self.messages
    }

    pub fn pending_action(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    /// Inline suggestions keyed by field id
    pub fn inline_suggestions(&self) -> &BTreeMap<String, FieldSuggestion> {
        &self.inline
    }

    pub fn inline_suggestion(&self, field_id: &str) -> Option<&FieldSuggestion> {
        self.inline.get(field_id)
    }

    pub fn set_inline_suggestion(&mut self, field_id: &str, suggestion: Option<FieldSuggestion>) {
        match suggestion {
            Some(s) => {
                self.inline.insert(field_id.to_string(), s);
            }
            None => {
                self.inline.remove(field_id);
            }
        }
    }

    /// Greet a step the session has not just been on
    ///
    /// Returns false when `step` is already the current step. The history is
    /// kept across steps; inline suggestions are replaced.
    pub async fn initialize_for_step(&mut self, step: WizardStep, project: &Project) -> bool {
        if self.last_step == Some(step) {
            return false;
        }
        self.messages.push(AiMessage::assistant(welcome_message(step, project)));
        self.last_step = Some(step);
        self.inline.clear();

        if !self.service.is_available() {
            return true;
        }

        let context = WizardContext::for_project(step, project, &self.reference);
        match self.service.get_suggestions(&context).await {
            Ok(suggestions) => {
                debug!(step = step.number(), count = suggestions.len(), "Inline suggestions");
                self.inline = suggestions
                    .into_iter()
                    .map(|s| (s.field_id.clone(), s))
                    .collect();
            }
            Err(e) => warn!(error = %e, code = e.error_code(), "Inline suggestions failed"),
        }
        true
    }

    /// Ask about the project at `step`
    ///
    /// Without a service nothing is recorded and `None` is returned.
    pub async fn send_message(
        &mut self,
        content: &str,
        step: WizardStep,
        project: &Project,
    ) -> Option<&AiMessage> {
        let service = Arc::clone(&self.service);
        if !service.is_available() {
            return None;
        }

        self.messages.push(AiMessage::user(content));
        let context = WizardContext::for_project(step, project, &self.reference);

        let reply = match service.chat(&self.messages, &context).await {
            Ok(response) => {
                if let Some(suggestions) = response.suggestions.filter(|s| !s.is_empty()) {
                    let action = PendingAction::fill_fields(suggestions);
                    debug!(action = %action.description, "Suggestions pending");
                    self.pending = Some(action);
                }
                response.message
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "Assistant chat failed");
                ERROR_MESSAGE.to_string()
            }
        };
        self.messages.push(AiMessage::assistant(reply));
        self.messages.last()
    }

    /// Apply the pending suggestions to the store and clear them
    pub fn accept_suggestions(&mut self, store: &mut ProjectStore) -> Option<ServiceResult<Vec<String>>> {
        let action = self.pending.take()?;
        Some(apply_suggestions(store, &action.suggestions))
    }

    pub fn reject_suggestions(&mut self) -> Option<PendingAction> {
        self.pending.take()
    }

    pub fn clear_messages(&mut self) {
        self.messages.clear();
        self.last_step = None;
    }
}
