//! # psw-assistant
//!
//! Everything in PSW that talks to a language model, plus the offline helpers
//! that keep the wizard usable without one.
//!
//! - [`service`]: the [`AiService`] capability and provider selection
//! - [`anthropic`]: the Anthropic Messages API provider
//! - [`openai`]: the OpenAI Chat Completions provider
//! - [`prompts`]: system, suggestion and welcome prompts per wizard step
//! - [`suggestions`]: parsing model output into field suggestions and applying them
//! - [`completion`]: per-step field completion tracking
//! - [`agent`]: the conversational budgeting agent (fast and full paths)
//!
//! Core computations never depend on this crate.

pub mod agent;
pub mod anthropic;
pub mod completion;
pub mod error;
pub mod openai;
pub mod prompts;
pub mod service;
pub mod session;
pub mod suggestions;
pub mod types;

pub use anthropic::AnthropicService;
pub use openai::OpenAiService;
pub use completion::{next_action_prompt, step_completion, FieldStatus, StepCompletion};
pub use error::{AssistantError, AssistantResult};
pub use service::{service_from_config, AiService, DisabledService};
pub use session::{PendingAction, WizardAssistant};
pub use suggestions::apply_suggestions;
pub use types::{
    AiMessage, AiResponse, Confidence, ContextReferenceData, FieldSuggestion, MessageRole,
    SuggestionValue, WizardContext,
};
