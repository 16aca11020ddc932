//! Subcontractor model

use psw_core::traits::{Entity, Id, Identifiable, Patch};
use psw_core::types::generate_id;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Outside resource billed to the project
///
/// Only `hours x cost_per_hour` feeds the margin; `bill_rate_per_hour` is
/// informational.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcontractor {
    pub id: Id,
    pub name: String,
    pub hours: f64,
    /// Role used for cost-rate lookup
    pub role_id: String,
    pub cost_per_hour: f64,
    pub bill_rate_per_hour: f64,
}

impl Identifiable for Subcontractor {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Subcontractor {
    const TYPE_NAME: &'static str = "Subcontractor";
}

impl Subcontractor {
    pub fn total_cost(&self) -> f64 {
        self.hours * self.cost_per_hour
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct NewSubcontractor {
    pub name: String,

    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub hours: f64,

    pub role_id: String,

    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub cost_per_hour: f64,

    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub bill_rate_per_hour: f64,
}

impl Default for NewSubcontractor {
    fn default() -> Self {
        Self {
            name: String::new(),
            hours: 0.0,
            role_id: "T004".to_string(),
            cost_per_hour: 0.0,
            bill_rate_per_hour: 0.0,
        }
    }
}

impl From<NewSubcontractor> for Subcontractor {
    fn from(new: NewSubcontractor) -> Self {
        Self {
            id: generate_id(),
            name: new.name,
            hours: new.hours,
            role_id: new.role_id,
            cost_per_hour: new.cost_per_hour,
            bill_rate_per_hour: new.bill_rate_per_hour,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubcontractorPatch {
    pub name: Option<String>,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub hours: Option<f64>,
    pub role_id: Option<String>,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub cost_per_hour: Option<f64>,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub bill_rate_per_hour: Option<f64>,
}

impl Patch<Subcontractor> for SubcontractorPatch {
    fn apply_to(&self, sub: &mut Subcontractor) {
        if let Some(ref name) = self.name {
            sub.name = name.clone();
        }
        if let Some(hours) = self.hours {
            sub.hours = hours;
        }
        if let Some(ref role_id) = self.role_id {
            sub.role_id = role_id.clone();
        }
        if let Some(cost) = self.cost_per_hour {
            sub.cost_per_hour = cost;
        }
        if let Some(rate) = self.bill_rate_per_hour {
            sub.bill_rate_per_hour = rate;
        }
    }

    fn is_empty(&self) -> bool {
        *self == SubcontractorPatch::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_subcontractor_defaults() {
        let sub: Subcontractor = NewSubcontractor::default().into();
        assert_eq!(sub.role_id, "T004");
        assert_eq!(sub.hours, 0.0);
        assert_eq!(sub.total_cost(), 0.0);
        assert!(!sub.id.is_empty());
    }

    #[test]
    fn test_negative_hours_rejected() {
        let new = NewSubcontractor {
            hours: -1.0,
            ..Default::default()
        };
        assert!(new.validate().is_err());
    }

    #[test]
    fn test_patch_apply() {
        let mut sub: Subcontractor = NewSubcontractor {
            name: "Contractor A".into(),
            hours: 10.0,
            cost_per_hour: 100.0,
            ..Default::default()
        }
        .into();

        SubcontractorPatch {
            hours: Some(20.0),
            ..Default::default()
        }
        .apply_to(&mut sub);

        assert_eq!(sub.name, "Contractor A");
        assert_eq!(sub.total_cost(), 2000.0);
    }
}
