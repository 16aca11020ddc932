//! Budget line model
//!
//! Hours allocated to one role on one cell (work package, optional work item)
//! of the project's budget template.

use psw_core::traits::{Entity, Id, Identifiable};
use psw_core::types::generate_id;
use serde::{Deserialize, Serialize};

use crate::role::Role;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetLine {
    pub id: Id,
    pub work_package_id: String,
    pub work_item_id: Option<String>,
    pub role_id: String,

    /// Whole hours; a line never stores zero
    pub hours: u32,

    /// Billing rate replacing the role's standard rate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_override: Option<f64>,

    #[serde(default)]
    pub is_subcontractor: bool,
}

impl Identifiable for BudgetLine {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for BudgetLine {
    const TYPE_NAME: &'static str = "BudgetLine";
}

impl BudgetLine {
    pub fn new(key: BudgetLineKey, hours: u32) -> Self {
        Self {
            id: generate_id(),
            work_package_id: key.work_package_id,
            work_item_id: key.work_item_id,
            role_id: key.role_id,
            hours,
            rate_override: None,
            is_subcontractor: false,
        }
    }

    pub fn key(&self) -> BudgetLineKey {
        BudgetLineKey {
            work_package_id: self.work_package_id.clone(),
            work_item_id: self.work_item_id.clone(),
            role_id: self.role_id.clone(),
        }
    }

    /// Billing rate for this line given its resolved role
    pub fn billing_rate(&self, role: &Role) -> f64 {
        self.rate_override.unwrap_or(role.standard_rate)
    }
}

/// Identity of a budget cell: at most one line exists per key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BudgetLineKey {
    pub work_package_id: String,
    pub work_item_id: Option<String>,
    pub role_id: String,
}

impl BudgetLineKey {
    pub fn new(
        work_package_id: impl Into<String>,
        work_item_id: Option<&str>,
        role_id: impl Into<String>,
    ) -> Self {
        Self {
            work_package_id: work_package_id.into(),
            work_item_id: work_item_id.map(String::from),
            role_id: role_id.into(),
        }
    }

    pub fn matches(&self, line: &BudgetLine) -> bool {
        line.work_package_id == self.work_package_id
            && line.work_item_id == self.work_item_id
            && line.role_id == self.role_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_matches_on_all_three_parts() {
        let line = BudgetLine::new(BudgetLineKey::new("wp-1", Some("wi-1-1"), "T004"), 40);

        assert!(BudgetLineKey::new("wp-1", Some("wi-1-1"), "T004").matches(&line));
        assert!(!BudgetLineKey::new("wp-1", None, "T004").matches(&line));
        assert!(!BudgetLineKey::new("wp-1", Some("wi-1-1"), "T003").matches(&line));
        assert_eq!(line.key(), BudgetLineKey::new("wp-1", Some("wi-1-1"), "T004"));
    }

    #[test]
    fn test_billing_rate_prefers_override() {
        let role = Role::new("T004", "Manager", 580.0, 109.0);
        let mut line = BudgetLine::new(BudgetLineKey::new("wp-1", None, "T004"), 10);
        assert_eq!(line.billing_rate(&role), 580.0);

        line.rate_override = Some(500.0);
        assert_eq!(line.billing_rate(&role), 500.0);
    }
}
