//! Fast path: one resource level, a fixed pot of hours, a short engagement
//!
//! Hours are spread evenly over the engagement weeks and written out as a
//! weekly budget CSV, plus an assignment request for the resource managers
//! when nobody has been named yet.

use std::fmt::Display;

use csv::Writer;
use once_cell::sync::Lazy;
use psw_core::error::PswError;
use psw_core::result::PswResult;
use psw_models::ReferenceData;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use super::estimate::{BudgetEstimate, BudgetLineItem};
use super::level::ResourceLevel;

pub const FAST_PATH_MAX_WEEKS: u32 = 4;

pub const FAST_PATH_BUDGET_HEADER: [&str; 9] = [
    "Project Name",
    "Week",
    "Resource Level",
    "Hours",
    "Standard Rate",
    "Labor Cost",
    "Revenue",
    "Cost",
    "Gross Margin",
];

pub const ASSIGNMENT_HEADER: [&str; 5] =
    ["Project Name", "Week", "Resource Level", "Hours", "Assignment Status"];

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

pub(crate) fn export_error(e: impl Display) -> PswError {
    PswError::Export(e.to_string())
}

pub(crate) fn into_string(writer: Writer<Vec<u8>>) -> PswResult<String> {
    let data = writer
        .into_inner()
        .map_err(|e| export_error(format!("CSV writer error: {}", e)))?;
    String::from_utf8(data).map_err(|e| export_error(format!("UTF-8 conversion error: {}", e)))
}

/// `Q3 Tax Review` -> `Q3_Tax_Review_<suffix>.csv`
pub(crate) fn file_name(project_name: &str, suffix: &str) -> String {
    format!("{}_{}.csv", WHITESPACE.replace_all(project_name.trim(), "_"), suffix)
}

fn money(value: f64) -> String {
    format!("{:.2}", value)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FastPathPlan {
    #[validate(length(min = 1, message = "is required"))]
    pub project_name: String,

    #[validate(range(min = 1, max = 4, message = "must be between 1 and 4 weeks"))]
    pub engagement_length: u32,

    #[serde(default)]
    pub resource_level: ResourceLevel,

    #[validate(range(min = 1.0, message = "must be at least 1 hour"))]
    pub total_hours: f64,

    /// Also produce a request for the resource managers to staff the work
    #[serde(default)]
    pub needs_resource_assignment: bool,
}

impl Default for FastPathPlan {
    fn default() -> Self {
        Self {
            project_name: String::new(),
            engagement_length: 1,
            resource_level: ResourceLevel::Staff,
            total_hours: 40.0,
            needs_resource_assignment: false,
        }
    }
}

impl FastPathPlan {
    pub fn hours_per_week(&self) -> f64 {
        if self.engagement_length == 0 {
            return 0.0;
        }
        self.total_hours / self.engagement_length as f64
    }

    /// Whole-engagement line for the plan's level at its role rates
    pub fn line_item(&self, reference: &ReferenceData) -> PswResult<BudgetLineItem> {
        let role = self.resource_level.role(reference).ok_or_else(|| {
            PswError::not_found("Role", "name", self.resource_level.role_name())
        })?;
        Ok(BudgetLineItem::new(
            self.resource_level,
            role,
            1,
            self.hours_per_week(),
            self.total_hours,
        ))
    }

    pub fn estimate(&self, reference: &ReferenceData) -> PswResult<BudgetEstimate> {
        self.validate()?;
        let item = self.line_item(reference)?;
        Ok(BudgetEstimate::from_line_items(
            self.project_name.clone(),
            self.engagement_length,
            vec![item],
        ))
    }

    /// Weekly budget rows followed by a TOTAL row
    pub fn budget_csv(&self, reference: &ReferenceData) -> PswResult<String> {
        self.validate()?;
        let item = self.line_item(reference)?;
        let hours_per_week = self.hours_per_week();
        let weekly_revenue = hours_per_week * item.rate;
        let weekly_cost = hours_per_week * item.labor_cost;

        let mut wtr = Writer::from_writer(vec![]);
        wtr.write_record(FAST_PATH_BUDGET_HEADER).map_err(export_error)?;

        for week in 1..=self.engagement_length {
            wtr.write_record([
                self.project_name.clone(),
                format!("Week {}", week),
                self.resource_level.to_string(),
                money(hours_per_week),
                money(item.rate),
                money(item.labor_cost),
                money(weekly_revenue),
                money(weekly_cost),
                money(weekly_revenue - weekly_cost),
            ])
            .map_err(export_error)?;
        }

        wtr.write_record([
            String::new(),
            "TOTAL".to_string(),
            String::new(),
            money(self.total_hours),
            String::new(),
            String::new(),
            money(item.revenue),
            money(item.cost),
            money(item.gross_margin),
        ])
        .map_err(export_error)?;

        info!(project = %self.project_name, weeks = self.engagement_length, "Built fast path budget");
        into_string(wtr)
    }

    /// Request for the resource managers, one row per week
    pub fn assignment_csv(&self) -> PswResult<String> {
        self.validate()?;
        let hours_per_week = money(self.hours_per_week());

        let mut wtr = Writer::from_writer(vec![]);
        wtr.write_record(ASSIGNMENT_HEADER).map_err(export_error)?;
        for week in 1..=self.engagement_length {
            let label = format!("Week {}", week);
            wtr.write_record([
                self.project_name.as_str(),
                label.as_str(),
                self.resource_level.as_str(),
                hours_per_week.as_str(),
                "Needs Assignment",
            ])
            .map_err(export_error)?;
        }
        into_string(wtr)
    }

    pub fn budget_file_name(&self) -> String {
        file_name(&self.project_name, "Budget")
    }

    pub fn assignment_file_name(&self) -> String {
        file_name(&self.project_name, "RM_Assignment")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn plan() -> FastPathPlan {
        FastPathPlan {
            project_name: "Q3 Tax Review".into(),
            engagement_length: 2,
            resource_level: ResourceLevel::Manager,
            total_hours: 30.0,
            needs_resource_assignment: true,
        }
    }

    #[test]
    fn test_budget_csv() {
        let csv = plan().budget_csv(&ReferenceData::standard()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Project Name,Week,Resource Level,Hours,Standard Rate,Labor Cost,Revenue,Cost,Gross Margin",
                "Q3 Tax Review,Week 1,Manager,15.00,580.00,109.00,8700.00,1635.00,7065.00",
                "Q3 Tax Review,Week 2,Manager,15.00,580.00,109.00,8700.00,1635.00,7065.00",
                ",TOTAL,,30.00,,,17400.00,3270.00,14130.00",
            ]
        );
    }

    #[test]
    fn test_assignment_csv() {
        let csv = plan().assignment_csv().unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "Q3 Tax Review,Week 1,Manager,15.00,Needs Assignment");
    }

    #[test]
    fn test_associate_bills_at_staff_rates() {
        let plan = FastPathPlan {
            resource_level: ResourceLevel::Associate,
            ..plan()
        };
        let estimate = plan.estimate(&ReferenceData::standard()).unwrap();
        assert_eq!(estimate.line_items[0].rate, 300.0);
        assert_eq!(estimate.total_revenue, 9000.0);
        assert_eq!(estimate.total_hours, 30.0);
    }

    #[test]
    fn test_rejects_long_engagements() {
        let plan = FastPathPlan {
            engagement_length: FAST_PATH_MAX_WEEKS + 1,
            ..plan()
        };
        assert!(plan.budget_csv(&ReferenceData::standard()).is_err());

        let unnamed = FastPathPlan::default();
        assert!(unnamed.validate().is_err());
    }

    #[test]
    fn test_file_names() {
        let plan = plan();
        assert_eq!(plan.budget_file_name(), "Q3_Tax_Review_Budget.csv");
        assert_eq!(plan.assignment_file_name(), "Q3_Tax_Review_RM_Assignment.csv");
    }
}
