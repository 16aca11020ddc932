//! Demand reconciliation against the budget

use std::collections::BTreeMap;

use psw_models::{Project, ReferenceData};
use serde::{Deserialize, Serialize};

use crate::budget::BudgetMetrics;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandMetrics {
    pub total_demand_hours: f64,
    pub demand_by_role: BTreeMap<String, f64>,
    pub demand_by_week: BTreeMap<u8, f64>,

    /// Budgeted hours of every resolved role except partner-level ones
    pub budget_hours_excluding_partners: f64,

    /// Budget minus demand. Positive means under-scheduled.
    pub variance: f64,
}

impl DemandMetrics {
    pub fn compute(project: &Project, budget: &BudgetMetrics, reference: &ReferenceData) -> Self {
        let mut metrics = DemandMetrics::default();

        for demand in &project.resource_demands {
            for (week, hours) in demand.weekly_hours.iter() {
                metrics.total_demand_hours += hours;
                *metrics
                    .demand_by_role
                    .entry(demand.role_id.clone())
                    .or_default() += hours;
                *metrics.demand_by_week.entry(week).or_default() += hours;
            }
        }

        metrics.budget_hours_excluding_partners = budget
            .hours_by_role
            .iter()
            .filter_map(|(role_id, hours)| {
                reference
                    .role(role_id)
                    .filter(|role| !role.is_partner())
                    .map(|_| *hours as f64)
            })
            .sum();

        metrics.variance = metrics.budget_hours_excluding_partners - metrics.total_demand_hours;
        metrics
    }

    pub fn is_balanced(&self) -> bool {
        self.variance == 0.0
    }

    pub fn is_over_scheduled(&self) -> bool {
        self.variance < 0.0
    }
}
