//! Gross margin decomposition

use psw_models::Project;
use serde::{Deserialize, Serialize};

use crate::budget::BudgetMetrics;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrossMarginMetrics {
    // revenue
    pub labor_fees: f64,
    pub admin_fee: f64,
    pub expense_revenue: f64,
    pub resale_revenue: f64,
    pub fee_adjustment: f64,
    pub total_revenue: f64,

    // cost
    pub staff_cost: f64,
    pub subcontractor_cost: f64,
    pub expense_cost: f64,
    pub resale_cost: f64,
    pub total_cost: f64,

    pub gross_margin: f64,

    /// Margin as a ratio of revenue; 0 unless revenue is positive
    pub gross_margin_percent: f64,

    pub target: f64,
    pub meets_target: bool,
}

impl GrossMarginMetrics {
    pub fn compute(project: &Project, budget: &BudgetMetrics, target: f64) -> Self {
        let labor_fees = budget.estimated_billings;
        let admin_fee = labor_fees * project.admin_fee_percent;
        let expense_revenue: f64 = project
            .expenses
            .iter()
            .filter(|e| e.is_billable)
            .map(|e| e.amount)
            .sum();
        let resale_revenue = 0.0;
        let fee_adjustment = project.fee_adjustment;
        let total_revenue = labor_fees + admin_fee + expense_revenue + resale_revenue + fee_adjustment;

        let staff_cost = budget.labor_cost;
        let subcontractor_cost: f64 = project.subcontractors.iter().map(|s| s.total_cost()).sum();
        // non-billable expenses are still incurred
        let expense_cost: f64 = project.expenses.iter().map(|e| e.amount).sum();
        let resale_cost = 0.0;
        let total_cost = staff_cost + subcontractor_cost + expense_cost + resale_cost;

        let gross_margin = total_revenue - total_cost;
        let gross_margin_percent = if total_revenue > 0.0 {
            gross_margin / total_revenue
        } else {
            0.0
        };

        Self {
            labor_fees,
            admin_fee,
            expense_revenue,
            resale_revenue,
            fee_adjustment,
            total_revenue,
            staff_cost,
            subcontractor_cost,
            expense_cost,
            resale_cost,
            total_cost,
            gross_margin,
            gross_margin_percent,
            target,
            meets_target: gross_margin_percent >= target,
        }
    }

    /// Percentage points short of the target (0 when met)
    pub fn shortfall(&self) -> f64 {
        (self.target - self.gross_margin_percent).max(0.0)
    }
}
