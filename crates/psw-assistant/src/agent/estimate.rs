//! Budget estimates built by the agent

use psw_models::Role;
use serde::{Deserialize, Serialize};

use super::level::ResourceLevel;

/// Gross margin as a percentage (0..100 scale), 0 when there is no revenue
pub fn margin_percent(gross_margin: f64, revenue: f64) -> f64 {
    if revenue > 0.0 {
        gross_margin / revenue * 100.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetLineItem {
    pub resource_level: ResourceLevel,
    pub count: u32,
    pub hours_per_week: f64,
    pub hours: f64,
    pub rate: f64,
    pub labor_cost: f64,
    pub revenue: f64,
    pub cost: f64,
    pub gross_margin: f64,
    pub gross_margin_percent: f64,
}

impl BudgetLineItem {
    /// Line priced at the role's standard rate and labor cost
    pub fn new(level: ResourceLevel, role: &Role, count: u32, hours_per_week: f64, hours: f64) -> Self {
        let revenue = hours * role.standard_rate;
        let cost = hours * role.labor_cost;
        Self {
            resource_level: level,
            count,
            hours_per_week,
            hours,
            rate: role.standard_rate,
            labor_cost: role.labor_cost,
            revenue,
            cost,
            gross_margin: revenue - cost,
            gross_margin_percent: margin_percent(revenue - cost, revenue),
        }
    }

    /// `count` people at `hours_per_week` for `weeks`
    pub fn for_engagement(
        level: ResourceLevel,
        role: &Role,
        count: u32,
        hours_per_week: f64,
        weeks: u32,
    ) -> Self {
        let hours = hours_per_week * weeks as f64 * count as f64;
        Self::new(level, role, count, hours_per_week, hours)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetEstimate {
    pub project_name: String,
    /// Weeks
    pub engagement_length: u32,
    pub line_items: Vec<BudgetLineItem>,
    #[serde(default)]
    pub total_hours: f64,
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub total_gross_margin: f64,
    #[serde(default)]
    pub gross_margin_percent: f64,
}

impl BudgetEstimate {
    pub fn from_line_items(
        project_name: impl Into<String>,
        engagement_length: u32,
        line_items: Vec<BudgetLineItem>,
    ) -> Self {
        let mut estimate = Self {
            project_name: project_name.into(),
            engagement_length,
            line_items,
            total_hours: 0.0,
            total_revenue: 0.0,
            total_cost: 0.0,
            total_gross_margin: 0.0,
            gross_margin_percent: 0.0,
        };
        estimate.recompute_totals();
        estimate
    }

    pub fn recompute_totals(&mut self) {
        self.total_hours = self.line_items.iter().map(|item| item.hours).sum();
        self.total_revenue = self.line_items.iter().map(|item| item.revenue).sum();
        self.total_cost = self.line_items.iter().map(|item| item.cost).sum();
        self.total_gross_margin = self.total_revenue - self.total_cost;
        self.gross_margin_percent = margin_percent(self.total_gross_margin, self.total_revenue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psw_models::ReferenceData;

    #[test]
    fn test_line_item_math() {
        let reference = ReferenceData::standard();
        let manager = reference.role("T004").unwrap();

        let item = BudgetLineItem::for_engagement(ResourceLevel::Manager, manager, 2, 20.0, 4);
        assert_eq!(item.hours, 160.0);
        assert_eq!(item.revenue, 160.0 * 580.0);
        assert_eq!(item.cost, 160.0 * 109.0);
        assert_eq!(item.gross_margin, 160.0 * 471.0);
        assert!((item.gross_margin_percent - 471.0 / 580.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_estimate_totals() {
        let reference = ReferenceData::standard();
        let partner = reference.role("T001").unwrap();
        let staff = reference.role("T007").unwrap();

        let estimate = BudgetEstimate::from_line_items(
            "Audit",
            5,
            vec![
                BudgetLineItem::for_engagement(ResourceLevel::Partner, partner, 1, 4.0, 5),
                BudgetLineItem::for_engagement(ResourceLevel::Staff, staff, 2, 40.0, 5),
            ],
        );
        assert_eq!(estimate.total_hours, 420.0);
        assert_eq!(estimate.total_revenue, 20.0 * 830.0 + 400.0 * 300.0);
        assert_eq!(estimate.total_cost, 20.0 * 368.0 + 400.0 * 51.0);
        assert_eq!(
            estimate.total_gross_margin,
            estimate.total_revenue - estimate.total_cost
        );
    }

    #[test]
    fn test_empty_estimate_has_zero_margin() {
        let estimate = BudgetEstimate::from_line_items("Empty", 4, Vec::new());
        assert_eq!(estimate.total_revenue, 0.0);
        assert_eq!(estimate.gross_margin_percent, 0.0);
    }
}
