//! Step 4: resource demand

use psw_core::types::format_number;
use psw_metrics::MetricsEngine;
use psw_models::{Project, WizardStep};

use crate::base::{StepContract, ValidationIssue};

/// Demand must have a start date and should reconcile with the budget
///
/// Scheduling fewer hours than budgeted is a warning; scheduling more is an
/// error.
pub struct DemandContract;

impl StepContract for DemandContract {
    fn step(&self) -> WizardStep {
        WizardStep::Demand
    }

    fn validate(&self, project: &Project, engine: &MetricsEngine<'_>) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if project.demand_start_date.is_none() {
            issues.push(ValidationIssue::error("demandStartDate", "Start date is required"));
        }

        let demand = engine.demand_metrics(project);
        if demand.variance != 0.0 {
            let message = format!("Demand hours variance: {} hours", format_number(demand.variance));
            if demand.variance > 0.0 {
                issues.push(ValidationIssue::warning("demandHours", message));
            } else {
                issues.push(ValidationIssue::error("demandHours", message));
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use psw_models::{
        BudgetLine, BudgetLineKey, NewResourceDemand, ReferenceData, WeeklyHours,
    };

    fn project(budget_hours: u32, demand_hours: f64) -> Project {
        let mut project = Project::default();
        project.demand_start_date = NaiveDate::from_ymd_opt(2024, 1, 15);
        project
            .budget_lines
            .push(BudgetLine::new(BudgetLineKey::new("wp-1", None, "T004"), budget_hours));
        project.resource_demands.push(
            NewResourceDemand {
                role_id: "T004".into(),
                weekly_hours: vec![(1, demand_hours)].into_iter().collect::<WeeklyHours>(),
                ..Default::default()
            }
            .into(),
        );
        project
    }

    #[test]
    fn test_under_scheduled_is_warning() {
        let reference = ReferenceData::standard();
        let engine = MetricsEngine::new(&reference);
        let issues = DemandContract.validate(&project(100, 80.0), &engine);
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
        assert_eq!(issues[0].message, "Demand hours variance: 20 hours");
    }

    #[test]
    fn test_over_scheduled_is_error() {
        let reference = ReferenceData::standard();
        let engine = MetricsEngine::new(&reference);
        let issues = DemandContract.validate(&project(100, 120.0), &engine);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
        assert_eq!(issues[0].message, "Demand hours variance: -20 hours");
    }

    #[test]
    fn test_balanced_with_start_date_passes() {
        let reference = ReferenceData::standard();
        let engine = MetricsEngine::new(&reference);
        assert!(DemandContract.validate(&project(40, 40.0), &engine).is_empty());
    }

    #[test]
    fn test_missing_start_date() {
        let reference = ReferenceData::standard();
        let engine = MetricsEngine::new(&reference);
        let mut p = project(40, 40.0);
        p.demand_start_date = None;
        let issues = DemandContract.validate(&p, &engine);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "demandStartDate");
    }
}
