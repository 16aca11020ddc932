//! Pull a budget estimate out of free-form conversation
//!
//! A fenced JSON estimate in the reply wins. Otherwise the request and reply
//! are scanned for a project name, an engagement length and phrases like
//! "2 managers at 20 hours per week".

use once_cell::sync::Lazy;
use psw_models::ReferenceData;
use regex::{Captures, Regex};
use tracing::debug;

use super::estimate::{BudgetEstimate, BudgetLineItem};
use super::full_path::MAX_ENGAGEMENT_WEEKS;
use super::level::ResourceLevel;
use crate::suggestions::json_block;

pub const DEFAULT_PROJECT_NAME: &str = "New Project";
pub const DEFAULT_ENGAGEMENT_WEEKS: u32 = 4;
pub const DEFAULT_HOURS_PER_WEEK: f64 = 40.0;
const DEFAULT_MANAGER_HOURS: f64 = 160.0;

static NAME_IN_REPLY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)project\s+(?:name|called|titled)[:\s]+["']?([^"'\n]+)["']?"#).unwrap()
});
static NAME_IN_REQUEST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(?:for|called)\s+["']?([^"'\n]+?)["']?\s+(?:project|audit)"#).unwrap()
});
static WEEKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d+)\s*(?:weeks?|wks?)\b").unwrap());
static MONTHS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d+)\s*months?\b").unwrap());
static RESOURCES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(\d+)\s+(partners?|senior\s+managers?|managers?|seniors?|staff(?:\s+members?)?|associates?)\b(?:\s+(?:for|working|@|at))?(?:\s*(\d+)\s*(?:hours?|hrs?|h)\b(?:\s*/\s*|\s+per\s+|\s+a\s+)?(?:weeks?|wk)?)?",
    )
    .unwrap()
});

fn first_number(re: &Regex, text: &str) -> Option<u32> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn project_name(ai_text: &str, user_input: &str) -> String {
    NAME_IN_REPLY
        .captures(ai_text)
        .or_else(|| NAME_IN_REQUEST.captures(user_input))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().trim_end_matches(&['.', ',', '!'][..]).trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string())
}

/// Weeks stated anywhere, else months x 4, else the default; clamped to
/// 1..=MAX_ENGAGEMENT_WEEKS
fn engagement_length(ai_text: &str, user_input: &str) -> u32 {
    let weeks = first_number(&WEEKS, ai_text).or_else(|| first_number(&WEEKS, user_input));
    let months = || first_number(&MONTHS, ai_text).or_else(|| first_number(&MONTHS, user_input));

    weeks
        .or_else(|| months().map(|m| m.saturating_mul(4)))
        .unwrap_or(DEFAULT_ENGAGEMENT_WEEKS)
        .clamp(1, MAX_ENGAGEMENT_WEEKS)
}

fn level_for(word: &str) -> ResourceLevel {
    let word = word.to_ascii_lowercase();
    if word.starts_with("partner") {
        ResourceLevel::Partner
    } else if word.starts_with("senior") && word.contains("manager") {
        ResourceLevel::SeniorManager
    } else if word.starts_with("manager") {
        ResourceLevel::Manager
    } else if word.starts_with("senior") {
        ResourceLevel::Senior
    } else if word.starts_with("associate") {
        ResourceLevel::Associate
    } else {
        ResourceLevel::Staff
    }
}

fn line_item(caps: &Captures<'_>, weeks: u32, reference: &ReferenceData) -> Option<BudgetLineItem> {
    let count: u32 = caps.get(1)?.as_str().parse().ok()?;
    if count == 0 {
        return None;
    }
    let level = level_for(caps.get(2)?.as_str());
    let hours_per_week = caps
        .get(3)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(DEFAULT_HOURS_PER_WEEK);

    let role = level.role(reference)?;
    Some(BudgetLineItem::for_engagement(level, role, count, hours_per_week, weeks))
}

fn resource_lines(text: &str, weeks: u32, reference: &ReferenceData) -> Vec<BudgetLineItem> {
    RESOURCES
        .captures_iter(text)
        .filter_map(|caps| line_item(&caps, weeks, reference))
        .collect()
}

/// Best-effort budget estimate from one exchange
///
/// Staffing is read from the user's request, falling back to the reply when the
/// request names nobody. With no staffing at all the estimate is one Manager for
/// 160 hours.
pub fn parse_budget_from_response(
    ai_text: &str,
    user_input: &str,
    reference: &ReferenceData,
) -> BudgetEstimate {
    if let Some(block) = json_block(ai_text) {
        match serde_json::from_str::<BudgetEstimate>(block) {
            Ok(mut estimate) => {
                estimate.recompute_totals();
                return estimate;
            }
            Err(e) => debug!(error = %e, "JSON block is not a budget estimate"),
        }
    }

    let weeks = engagement_length(ai_text, user_input);

    let mut line_items = resource_lines(user_input, weeks, reference);
    if line_items.is_empty() {
        line_items = resource_lines(ai_text, weeks, reference);
    }
    if line_items.is_empty() {
        if let Some(role) = ResourceLevel::Manager.role(reference) {
            line_items.push(BudgetLineItem::new(
                ResourceLevel::Manager,
                role,
                1,
                DEFAULT_HOURS_PER_WEEK,
                DEFAULT_MANAGER_HOURS,
            ));
        }
    }

    BudgetEstimate::from_line_items(project_name(ai_text, user_input), weeks, line_items)
}
