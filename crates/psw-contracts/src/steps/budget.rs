//! Step 2: budget

use psw_metrics::MetricsEngine;
use psw_models::{Project, WizardStep};

use crate::base::{StepContract, ValidationIssue};

/// At least one hour must be budgeted against a known role
pub struct BudgetContract;

impl StepContract for BudgetContract {
    fn step(&self) -> WizardStep {
        WizardStep::Budget
    }

    fn validate(&self, project: &Project, engine: &MetricsEngine<'_>) -> Vec<ValidationIssue> {
        if engine.budget_metrics(project).total_hours == 0 {
            vec![ValidationIssue::error(
                "budget",
                "Budget must have at least one hour entry",
            )]
        } else {
            Vec::new()
        }
    }
}
