//! Metrics engine
//!
//! Binds the reference data and the gross margin target so callers can ask
//! for any metric set with just a project.

use psw_core::config::{BudgetingConfig, DEFAULT_GROSS_MARGIN_TARGET};
use psw_models::{Project, ReferenceData};
use serde::{Deserialize, Serialize};

use crate::budget::BudgetMetrics;
use crate::demand::DemandMetrics;
use crate::margin::GrossMarginMetrics;

/// All three metric sets for one project snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub budget: BudgetMetrics,
    pub gross_margin: GrossMarginMetrics,
    pub demand: DemandMetrics,
}

#[derive(Debug, Clone, Copy)]
pub struct MetricsEngine<'a> {
    reference: &'a ReferenceData,
    gross_margin_target: f64,
}

impl<'a> MetricsEngine<'a> {
    pub fn new(reference: &'a ReferenceData) -> Self {
        Self {
            reference,
            gross_margin_target: DEFAULT_GROSS_MARGIN_TARGET,
        }
    }

    pub fn from_config(reference: &'a ReferenceData, config: &BudgetingConfig) -> Self {
        Self::new(reference).with_target(config.gross_margin_target)
    }

    pub fn with_target(mut self, gross_margin_target: f64) -> Self {
        self.gross_margin_target = gross_margin_target;
        self
    }

    pub fn reference(&self) -> &'a ReferenceData {
        self.reference
    }

    pub fn gross_margin_target(&self) -> f64 {
        self.gross_margin_target
    }

    pub fn budget_metrics(&self, project: &Project) -> BudgetMetrics {
        BudgetMetrics::compute(project, self.reference)
    }

    pub fn gross_margin_metrics(&self, project: &Project) -> GrossMarginMetrics {
        let budget = self.budget_metrics(project);
        GrossMarginMetrics::compute(project, &budget, self.gross_margin_target)
    }

    pub fn demand_metrics(&self, project: &Project) -> DemandMetrics {
        let budget = self.budget_metrics(project);
        DemandMetrics::compute(project, &budget, self.reference)
    }

    /// Computes the budget once and derives the other two sets from it
    pub fn project_summary(&self, project: &Project) -> ProjectSummary {
        let budget = self.budget_metrics(project);
        let gross_margin = GrossMarginMetrics::compute(project, &budget, self.gross_margin_target);
        let demand = DemandMetrics::compute(project, &budget, self.reference);
        ProjectSummary {
            budget,
            gross_margin,
            demand,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psw_models::{BudgetLine, BudgetLineKey};

    #[test]
    fn test_summary_matches_individual_metrics() {
        let reference = ReferenceData::standard();
        let engine = MetricsEngine::new(&reference);

        let mut project = Project::default();
        project
            .budget_lines
            .push(BudgetLine::new(BudgetLineKey::new("wp-1", None, "T004"), 40));

        let summary = engine.project_summary(&project);
        assert_eq!(summary.budget, engine.budget_metrics(&project));
        assert_eq!(summary.gross_margin, engine.gross_margin_metrics(&project));
        assert_eq!(summary.demand, engine.demand_metrics(&project));

        // 23200 billings + 2320 admin fee vs 4360 labor cost
        assert_eq!(summary.gross_margin.total_revenue, 25_520.0);
        assert!(summary.gross_margin.meets_target);
        assert_eq!(summary.demand.variance, 40.0);
    }

    #[test]
    fn test_target_from_config() {
        let reference = ReferenceData::standard();
        let config = BudgetingConfig {
            gross_margin_target: 0.9,
            ..Default::default()
        };
        let engine = MetricsEngine::from_config(&reference, &config);
        assert_eq!(engine.gross_margin_target(), 0.9);

        let mut project = Project::default();
        project
            .budget_lines
            .push(BudgetLine::new(BudgetLineKey::new("wp-1", None, "T004"), 40));
        assert!(!engine.gross_margin_metrics(&project).meets_target);
    }
}
