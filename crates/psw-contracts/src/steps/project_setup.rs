//! Step 1: project setup

use psw_metrics::MetricsEngine;
use psw_models::{Project, WizardStep};

use crate::base::{StepContract, ValidationIssue};

/// Identity and contract fields must be filled in
pub struct ProjectSetupContract;

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl StepContract for ProjectSetupContract {
    fn step(&self) -> WizardStep {
        WizardStep::ProjectSetup
    }

    fn validate(&self, project: &Project, _engine: &MetricsEngine<'_>) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if is_blank(&project.sap_project_id) {
            issues.push(ValidationIssue::error("sapProjectId", "Project # is required"));
        }
        if is_blank(&project.industry_id) {
            issues.push(ValidationIssue::error("industryId", "Industry is required"));
        }
        if is_blank(&project.budget_template_id) {
            issues.push(ValidationIssue::error(
                "budgetTemplateId",
                "Budget template is required",
            ));
        }
        if project.is_fixed_fee() && project.total_project_fee <= 0.0 {
            issues.push(ValidationIssue::error(
                "totalProjectFee",
                "Total Project Fee is required for Fixed Fee contracts",
            ));
        }

        issues
    }
}
