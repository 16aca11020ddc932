//! Step 3: gross margin

use psw_core::types::format_percent;
use psw_metrics::MetricsEngine;
use psw_models::{Project, WizardStep};

use crate::base::{StepContract, ValidationIssue};

/// Margin under target is reported but never blocks
pub struct GrossMarginContract;

impl StepContract for GrossMarginContract {
    fn step(&self) -> WizardStep {
        WizardStep::GrossMargin
    }

    fn validate(&self, project: &Project, engine: &MetricsEngine<'_>) -> Vec<ValidationIssue> {
        let margin = engine.gross_margin_metrics(project);
        if margin.meets_target {
            return Vec::new();
        }

        vec![ValidationIssue::warning(
            "grossMargin",
            format!(
                "Gross margin ({}) is below target ({})",
                format_percent(margin.gross_margin_percent),
                format_percent(margin.target)
            ),
        )]
    }
}
