//! Step 5: review

use psw_metrics::MetricsEngine;
use psw_models::{Project, WizardStep};

use crate::base::{StepContract, ValidationIssue};

/// No rules of its own; the review screen shows the whole-project result
pub struct ReviewContract;

impl StepContract for ReviewContract {
    fn step(&self) -> WizardStep {
        WizardStep::Review
    }

    fn validate(&self, _project: &Project, _engine: &MetricsEngine<'_>) -> Vec<ValidationIssue> {
        Vec::new()
    }
}
