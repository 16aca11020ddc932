//! Budget totals

use std::collections::BTreeMap;

use psw_models::{Project, ReferenceData};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetMetrics {
    pub total_hours: u64,

    /// Hours staffed by the firm's own people
    #[serde(rename = "totalHoursByCR")]
    pub total_hours_by_cr: u64,

    pub total_hours_by_sub: u64,

    /// Sum of hours x billing rate (rate override or role standard rate)
    pub estimated_billings: f64,

    /// Sum of hours x role labor cost
    pub labor_cost: f64,

    pub hours_by_role: BTreeMap<String, u64>,
    pub hours_by_work_package: BTreeMap<String, u64>,
}

impl BudgetMetrics {
    pub fn compute(project: &Project, reference: &ReferenceData) -> Self {
        let mut metrics = BudgetMetrics::default();

        for line in &project.budget_lines {
            let Some(role) = reference.role(&line.role_id) else {
                debug!(
                    line_id = %line.id,
                    role_id = %line.role_id,
                    "Skipping budget line with unknown role"
                );
                continue;
            };

            let hours = u64::from(line.hours);
            metrics.total_hours += hours;
            if line.is_subcontractor {
                metrics.total_hours_by_sub += hours;
            } else {
                metrics.total_hours_by_cr += hours;
            }

            metrics.estimated_billings += f64::from(line.hours) * line.billing_rate(role);
            metrics.labor_cost += f64::from(line.hours) * role.labor_cost;

            *metrics.hours_by_role.entry(role.id.clone()).or_default() += hours;
            *metrics
                .hours_by_work_package
                .entry(line.work_package_id.clone())
                .or_default() += hours;
        }

        metrics
    }

    pub fn is_empty(&self) -> bool {
        self.total_hours == 0
    }
}
