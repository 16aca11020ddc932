//! Role model
//!
//! Staffing levels (Partner, Manager, Staff, ...) with their billing rate and
//! internal labor cost per hour.

use psw_core::traits::{Entity, Identifiable};
use serde::{Deserialize, Serialize};

/// Role reference entry
///
/// Budget lines, subcontractors and resource demands point at roles by id.
/// Roles are read-only reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,

    /// Activity type code sent to SAP (same as id for the standard table)
    pub code: String,

    pub name: String,

    /// Billing rate per hour
    pub standard_rate: f64,

    /// Internal cost per hour
    pub labor_cost: f64,

    /// Offshore (India) delivery role
    #[serde(default)]
    pub is_india: bool,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Identifiable for Role {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Role {
    const TYPE_NAME: &'static str = "Role";
}

impl Role {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        standard_rate: f64,
        labor_cost: f64,
    ) -> Self {
        let id = id.into();
        Self {
            code: id.clone(),
            id,
            name: name.into(),
            standard_rate,
            labor_cost,
            is_india: false,
            is_active: true,
        }
    }

    pub fn india(mut self) -> Self {
        self.is_india = true;
        self
    }

    /// Partner-level roles are excluded from demand reconciliation
    pub fn is_partner(&self) -> bool {
        self.name.to_lowercase().contains("partner")
    }

    /// Margin earned on one hour of this role at its standard rate
    pub fn hourly_margin(&self) -> f64 {
        self.standard_rate - self.labor_cost
    }
}
