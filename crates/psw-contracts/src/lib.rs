//! # psw-contracts
//!
//! Validation rules that gate the wizard.
//!
//! Each step has a contract implementing [`StepContract`]. A contract never
//! fails; it returns findings with a severity, and only error-severity
//! findings stop the user from moving forward.

pub mod base;
pub mod steps;

pub use base::{Severity, StepContract, ValidationIssue, ValidationResult};
pub use steps::{
    BudgetContract, DemandContract, GrossMarginContract, ProjectSetupContract, ReviewContract,
};

use psw_metrics::MetricsEngine;
use psw_models::{Project, WizardStep};
use tracing::debug;

/// Contract responsible for a step
pub fn contract_for(step: WizardStep) -> &'static dyn StepContract {
    match step {
        WizardStep::ProjectSetup => &ProjectSetupContract,
        WizardStep::Budget => &BudgetContract,
        WizardStep::GrossMargin => &GrossMarginContract,
        WizardStep::Demand => &DemandContract,
        WizardStep::Review => &ReviewContract,
    }
}

pub fn validate_step(step: WizardStep, project: &Project, engine: &MetricsEngine<'_>) -> ValidationResult {
    let result = ValidationResult::from_issues(contract_for(step).validate(project, engine));
    debug!(
        step = step.number(),
        errors = result.error_count(),
        warnings = result.warning_count(),
        "Validated step"
    );
    result
}

/// Findings of every step, in step order
pub fn validate_project(project: &Project, engine: &MetricsEngine<'_>) -> ValidationResult {
    let issues = WizardStep::ALL
        .iter()
        .flat_map(|step| contract_for(*step).validate(project, engine))
        .collect();
    ValidationResult::from_issues(issues)
}
