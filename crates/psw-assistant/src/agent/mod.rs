//! Budgeting agent
//!
//! A conversational shortcut for sizing engagements without walking the full
//! wizard. The fast path prices a single resource level for a few weeks; the
//! full path schedules a team week by week.

pub mod chat;
pub mod estimate;
pub mod fast_path;
pub mod full_path;
pub mod level;
pub mod parser;

pub use chat::{BudgetingChat, ConversationMessage, ERROR_MESSAGE, UNAVAILABLE_MESSAGE};
pub use estimate::{margin_percent, BudgetEstimate, BudgetLineItem};
pub use fast_path::{FastPathPlan, FAST_PATH_MAX_WEEKS};
pub use full_path::{
    FullPathPlan, LevelHours, ResourceAllocation, WeeklyAllocation, FULL_PATH_MIN_WEEKS,
    MAX_ENGAGEMENT_WEEKS,
};
pub use level::ResourceLevel;
pub use parser::parse_budget_from_response;

/// Which agent flow a project is sized with
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathType {
    Fast,
    Full,
}

impl PathType {
    /// Engagements longer than the fast path allows go down the full path
    pub fn for_engagement(weeks: u32) -> Self {
        if weeks <= FAST_PATH_MAX_WEEKS {
            PathType::Fast
        } else {
            PathType::Full
        }
    }
}
