//! Full path: a staffed team over a longer engagement
//!
//! Each resource line is a level, a head count and hours per week. Weekly
//! allocations repeat the team's weekly hours from the start date.

use chrono::{Duration, NaiveDate};
use csv::Writer;
use psw_core::error::PswError;
use psw_core::result::PswResult;
use psw_models::ReferenceData;
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use super::estimate::{BudgetEstimate, BudgetLineItem};
use super::fast_path::{export_error, file_name, into_string};
use super::level::ResourceLevel;
use super::parser::DEFAULT_HOURS_PER_WEEK;

pub const FULL_PATH_MIN_WEEKS: u32 = 5;

/// Five years
pub const MAX_ENGAGEMENT_WEEKS: u32 = 260;

pub const FULL_PATH_HEADER: [&str; 4] = ["Week", "Week Start Date", "Resource Level", "Hours"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAllocation {
    pub level: ResourceLevel,
    pub count: u32,
    pub hours_per_week: f64,
    /// count x hours per week x engagement weeks
    pub total_hours: f64,
}

impl ResourceAllocation {
    pub fn new(level: ResourceLevel, count: u32, hours_per_week: f64, weeks: u32) -> Self {
        let mut allocation = Self {
            level,
            count,
            hours_per_week,
            total_hours: 0.0,
        };
        allocation.recompute(weeks);
        allocation
    }

    pub fn weekly_hours(&self) -> f64 {
        self.hours_per_week * self.count as f64
    }

    fn recompute(&mut self, weeks: u32) {
        self.total_hours = self.weekly_hours() * weeks as f64;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelHours {
    pub level: ResourceLevel,
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyAllocation {
    pub week_number: u32,
    pub week_start_date: NaiveDate,
    pub allocations: Vec<LevelHours>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FullPathPlan {
    #[validate(length(min = 1, message = "is required"))]
    pub project_name: String,

    #[validate(range(min = 5, max = 260, message = "must be between 5 and 260 weeks"))]
    pub engagement_length: u32,

    pub start_date: Option<NaiveDate>,

    #[serde(default)]
    resources: Vec<ResourceAllocation>,
}

impl FullPathPlan {
    pub fn new(project_name: impl Into<String>, engagement_length: u32, start_date: Option<NaiveDate>) -> Self {
        Self {
            project_name: project_name.into(),
            engagement_length,
            start_date,
            resources: Vec::new(),
        }
    }

    pub fn resources(&self) -> &[ResourceAllocation] {
        &self.resources
    }

    /// Add one full-time person at `level`
    pub fn add_resource(&mut self, level: ResourceLevel) -> &ResourceAllocation {
        self.add_allocation(level, 1, DEFAULT_HOURS_PER_WEEK)
    }

    pub fn add_allocation(&mut self, level: ResourceLevel, count: u32, hours_per_week: f64) -> &ResourceAllocation {
        let allocation = ResourceAllocation::new(level, count, hours_per_week, self.engagement_length);
        self.resources.push(allocation);
        &self.resources[self.resources.len() - 1]
    }

    pub fn update_resource(&mut self, index: usize, count: u32, hours_per_week: f64) -> PswResult<()> {
        let weeks = self.engagement_length;
        let allocation = self
            .resources
            .get_mut(index)
            .ok_or_else(|| PswError::not_found("ResourceAllocation", "index", index.to_string()))?;
        allocation.count = count;
        allocation.hours_per_week = hours_per_week;
        allocation.recompute(weeks);
        Ok(())
    }

    pub fn remove_resource(&mut self, index: usize) -> PswResult<ResourceAllocation> {
        if index >= self.resources.len() {
            return Err(PswError::not_found("ResourceAllocation", "index", index.to_string()));
        }
        Ok(self.resources.remove(index))
    }

    pub fn set_engagement_length(&mut self, weeks: u32) {
        self.engagement_length = weeks;
        for allocation in &mut self.resources {
            allocation.recompute(weeks);
        }
    }

    pub fn total_weekly_hours(&self) -> f64 {
        self.resources.iter().map(ResourceAllocation::weekly_hours).sum()
    }

    pub fn total_hours(&self) -> f64 {
        self.resources.iter().map(|r| r.total_hours).sum()
    }

    /// Week-by-week hours per level, week n starting 7(n-1) days after the start date
    pub fn weekly_allocations(&self) -> PswResult<Vec<WeeklyAllocation>> {
        self.validate()?;
        let start = self
            .start_date
            .ok_or_else(|| PswError::invalid("startDate", "Please set a start date first"))?;

        let allocations = (0..self.engagement_length)
            .map(|week| {
                let week_start_date = start
                    .checked_add_signed(Duration::weeks(week as i64))
                    .ok_or_else(|| PswError::invalid("startDate", "schedule runs past the last supported date"))?;
                Ok(WeeklyAllocation {
                    week_number: week + 1,
                    week_start_date,
                    allocations: self
                        .resources
                        .iter()
                        .map(|r| LevelHours {
                            level: r.level,
                            hours: r.weekly_hours(),
                        })
                        .collect(),
                })
            })
            .collect::<PswResult<Vec<_>>>()?;
        debug!(weeks = allocations.len(), levels = self.resources.len(), "Generated weekly allocations");
        Ok(allocations)
    }

    pub fn estimate(&self, reference: &ReferenceData) -> PswResult<BudgetEstimate> {
        self.validate()?;
        let line_items = self
            .resources
            .iter()
            .map(|r| {
                let role = r
                    .level
                    .role(reference)
                    .ok_or_else(|| PswError::not_found("Role", "name", r.level.role_name()))?;
                Ok(BudgetLineItem::new(r.level, role, r.count, r.hours_per_week, r.total_hours))
            })
            .collect::<PswResult<Vec<_>>>()?;
        Ok(BudgetEstimate::from_line_items(
            self.project_name.clone(),
            self.engagement_length,
            line_items,
        ))
    }

    pub fn csv(&self) -> PswResult<String> {
        let weeks = self.weekly_allocations()?;

        let mut wtr = Writer::from_writer(vec![]);
        wtr.write_record(FULL_PATH_HEADER).map_err(export_error)?;
        for week in &weeks {
            for allocation in &week.allocations {
                wtr.write_record([
                    week.week_number.to_string(),
                    week.week_start_date.format("%Y-%m-%d").to_string(),
                    allocation.level.to_string(),
                    allocation.hours.to_string(),
                ])
                .map_err(export_error)?;
            }
        }
        into_string(wtr)
    }

    pub fn file_name(&self) -> String {
        file_name(&self.project_name, "Budget")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn plan() -> FullPathPlan {
        let mut plan = FullPathPlan::new("Harbor Audit", 6, NaiveDate::from_ymd_opt(2024, 1, 8));
        plan.add_allocation(ResourceLevel::Manager, 1, 20.0);
        plan.add_resource(ResourceLevel::Staff);
        plan.update_resource(1, 2, 40.0).unwrap();
        plan
    }

    #[test]
    fn test_totals_follow_count_and_weeks() {
        let mut plan = plan();
        assert_eq!(plan.resources()[1].total_hours, 2.0 * 40.0 * 6.0);
        assert_eq!(plan.total_weekly_hours(), 100.0);
        assert_eq!(plan.total_hours(), 600.0);

        plan.set_engagement_length(8);
        assert_eq!(plan.total_hours(), 800.0);
    }

    #[test]
    fn test_weekly_allocations() {
        let weeks = plan().weekly_allocations().unwrap();
        assert_eq!(weeks.len(), 6);
        assert_eq!(weeks[0].week_start_date, NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
        assert_eq!(weeks[5].week_start_date, NaiveDate::from_ymd_opt(2024, 2, 12).unwrap());
        assert_eq!(
            weeks[2].allocations,
            vec![
                LevelHours { level: ResourceLevel::Manager, hours: 20.0 },
                LevelHours { level: ResourceLevel::Staff, hours: 80.0 },
            ]
        );
    }

    #[test]
    fn test_requires_start_date_and_minimum_length() {
        let mut plan = plan();
        plan.start_date = None;
        assert!(plan.weekly_allocations().is_err());

        let short = FullPathPlan::new("Short", 4, NaiveDate::from_ymd_opt(2024, 1, 8));
        assert!(short.weekly_allocations().is_err());

        let mut endless = FullPathPlan::new("Endless", 4_000_000_000, NaiveDate::from_ymd_opt(2024, 1, 8));
        endless.add_resource(ResourceLevel::Staff);
        assert!(endless.weekly_allocations().is_err());
        assert!(endless.estimate(&ReferenceData::standard()).is_err());

        let longest = FullPathPlan::new("Longest", MAX_ENGAGEMENT_WEEKS, NaiveDate::from_ymd_opt(2024, 1, 8));
        assert_eq!(longest.weekly_allocations().unwrap().len(), 260);
    }

    #[test]
    fn test_schedule_past_last_date_is_an_error() {
        let plan = FullPathPlan::new("Late", 5, Some(NaiveDate::MAX));
        assert!(matches!(plan.weekly_allocations(), Err(PswError::Validation(_))));
    }

    #[test]
    fn test_csv() {
        let csv = plan().csv().unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 1 + 6 * 2);
        assert_eq!(lines[0], "Week,Week Start Date,Resource Level,Hours");
        assert_eq!(lines[1], "1,2024-01-08,Manager,20");
        assert_eq!(lines[4], "2,2024-01-15,Staff,80");
    }

    #[test]
    fn test_estimate_and_resource_errors() {
        let mut plan = plan();
        let estimate = plan.estimate(&ReferenceData::standard()).unwrap();
        assert_eq!(estimate.total_hours, 600.0);
        assert_eq!(estimate.total_revenue, 120.0 * 580.0 + 480.0 * 300.0);

        assert!(plan.update_resource(5, 1, 10.0).is_err());
        assert_eq!(plan.remove_resource(0).unwrap().level, ResourceLevel::Manager);
        assert!(plan.remove_resource(3).is_err());
    }
}
