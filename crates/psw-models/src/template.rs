//! Budget templates
//!
//! A template is a named tree of work packages (and optional work items)
//! that a project's budget allocates hours against.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub id: String,
    pub code: String,
    pub name: String,
    pub display_order: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkPackage {
    pub id: String,
    /// Outline number shown next to the package name (`1.1`, `1.2`, ...)
    pub extension_id: String,
    pub name: String,
    pub display_order: u32,
    #[serde(default)]
    pub work_items: Vec<WorkItem>,
}

impl WorkPackage {
    pub fn work_item(&self, id: &str) -> Option<&WorkItem> {
        self.work_items.iter().find(|wi| wi.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetTemplate {
    pub id: String,
    pub name: String,
    pub category: String,
    pub work_packages: Vec<WorkPackage>,
}

impl BudgetTemplate {
    pub fn work_package(&self, id: &str) -> Option<&WorkPackage> {
        self.work_packages.iter().find(|wp| wp.id == id)
    }

    /// Whether a (work package, work item) pair addresses a cell of this template
    pub fn contains(&self, work_package_id: &str, work_item_id: Option<&str>) -> bool {
        match (self.work_package(work_package_id), work_item_id) {
            (Some(_), None) => true,
            (Some(wp), Some(item)) => wp.work_item(item).is_some(),
            (None, _) => false,
        }
    }

    /// Work packages in display order
    pub fn ordered_work_packages(&self) -> Vec<&WorkPackage> {
        let mut packages: Vec<&WorkPackage> = self.work_packages.iter().collect();
        packages.sort_by_key(|wp| wp.display_order);
        packages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> BudgetTemplate {
        BudgetTemplate {
            id: "t".into(),
            name: "T".into(),
            category: "Tax".into(),
            work_packages: vec![
                WorkPackage {
                    id: "wp-2".into(),
                    extension_id: "1.2".into(),
                    name: "Second".into(),
                    display_order: 2,
                    work_items: vec![],
                },
                WorkPackage {
                    id: "wp-1".into(),
                    extension_id: "1.1".into(),
                    name: "First".into(),
                    display_order: 1,
                    work_items: vec![WorkItem {
                        id: "wi-1".into(),
                        code: "P1".into(),
                        name: "Item".into(),
                        display_order: 1,
                    }],
                },
            ],
        }
    }

    #[test]
    fn test_contains() {
        let t = template();
        assert!(t.contains("wp-1", None));
        assert!(t.contains("wp-1", Some("wi-1")));
        assert!(!t.contains("wp-2", Some("wi-1")));
        assert!(!t.contains("wp-9", None));
    }

    #[test]
    fn test_ordered_work_packages() {
        let t = template();
        let ids: Vec<&str> = t.ordered_work_packages().iter().map(|wp| wp.id.as_str()).collect();
        assert_eq!(ids, vec!["wp-1", "wp-2"]);
    }
}
