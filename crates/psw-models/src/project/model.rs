//! Project model
//!
//! The aggregate the wizard edits. A project owns its budget lines,
//! subcontractors, expenses and resource demands outright; everything else it
//! references (roles, industries, templates) is reference data.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use psw_core::config::DEFAULT_ADMIN_FEE_PERCENT;
use psw_core::traits::{Entity, Id, Identifiable, Patch};
use psw_core::types::generate_id;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::budget_line::{BudgetLine, BudgetLineKey};
use crate::expense::Expense;
use crate::resource_demand::ResourceDemand;
use crate::subcontractor::Subcontractor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ContractType {
    #[serde(rename = "Fixed Fee")]
    FixedFee,
    #[default]
    #[serde(rename = "Time & Materials")]
    TimeAndMaterials,
}

impl ContractType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FixedFee => "Fixed Fee",
            Self::TimeAndMaterials => "Time & Materials",
        }
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a project budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum ProjectStatus {
    #[default]
    Draft,
    Submitted,
    Approved,
    Uploaded,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 4] = [
        ProjectStatus::Draft,
        ProjectStatus::Submitted,
        ProjectStatus::Approved,
        ProjectStatus::Uploaded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Submitted => "Submitted",
            Self::Approved => "Approved",
            Self::Uploaded => "Uploaded",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Project entity
///
/// Text fields that the wizard asks for default to the empty string; an empty
/// string counts as "not filled in" for validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Id,

    /// SAP project number (13 digits in practice)
    #[serde(default)]
    pub sap_project_id: String,

    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub client_name: String,

    /// Fiscal year end as shown by SAP (`12/31/2024`)
    #[serde(default)]
    pub year_end: String,

    #[serde(default)]
    pub industry_id: String,

    #[serde(default)]
    pub delivery_service_org: String,

    #[serde(default)]
    pub resource_manager_id: String,

    #[serde(default)]
    pub resource_manager_name: String,

    #[serde(default)]
    pub contract_type: ContractType,

    /// Contracted fee, only meaningful for Fixed Fee contracts
    #[serde(default)]
    pub total_project_fee: f64,

    pub time_entry_start_date: Option<NaiveDate>,

    #[serde(default)]
    pub budget_template_id: String,

    #[serde(default)]
    pub status: ProjectStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Manual revenue adjustment, may be negative
    #[serde(default)]
    pub fee_adjustment: f64,

    /// Admin fee as a ratio of labor fees (0.10 = 10%)
    #[serde(default = "default_admin_fee_percent")]
    pub admin_fee_percent: f64,

    pub demand_start_date: Option<NaiveDate>,

    #[serde(default)]
    pub budget_lines: Vec<BudgetLine>,

    #[serde(default)]
    pub subcontractors: Vec<Subcontractor>,

    #[serde(default)]
    pub expenses: Vec<Expense>,

    #[serde(default)]
    pub resource_demands: Vec<ResourceDemand>,
}

fn default_admin_fee_percent() -> f64 {
    DEFAULT_ADMIN_FEE_PERCENT
}

impl Default for Project {
    fn default() -> Self {
        Self::new_empty(DEFAULT_ADMIN_FEE_PERCENT)
    }
}

impl Identifiable for Project {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Project {
    const TYPE_NAME: &'static str = "Project";
}

impl Project {
    /// Fresh draft with a new id and the given admin fee ratio
    pub fn new_empty(admin_fee_percent: f64) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            sap_project_id: String::new(),
            client_id: String::new(),
            client_name: String::new(),
            year_end: String::new(),
            industry_id: String::new(),
            delivery_service_org: String::new(),
            resource_manager_id: String::new(),
            resource_manager_name: String::new(),
            contract_type: ContractType::TimeAndMaterials,
            total_project_fee: 0.0,
            time_entry_start_date: None,
            budget_template_id: String::new(),
            status: ProjectStatus::Draft,
            created_at: now,
            updated_at: now,
            fee_adjustment: 0.0,
            admin_fee_percent,
            demand_start_date: None,
            budget_lines: Vec::new(),
            subcontractors: Vec::new(),
            expenses: Vec::new(),
            resource_demands: Vec::new(),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn is_fixed_fee(&self) -> bool {
        self.contract_type == ContractType::FixedFee
    }

    pub fn budget_line(&self, key: &BudgetLineKey) -> Option<&BudgetLine> {
        self.budget_lines.iter().find(|line| key.matches(line))
    }

    /// Label used in export file names and CSV rows
    pub fn export_id(&self) -> &str {
        if self.sap_project_id.is_empty() {
            &self.id
        } else {
            &self.sap_project_id
        }
    }
}

/// Partial update of the project's scalar fields
///
/// Unknown keys are rejected so that a misspelled field coming from the AI
/// assistant is reported instead of silently dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sap_project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_service_org: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_manager_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_manager_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<ContractType>,

    #[validate(range(min = 0.0, message = "must not be negative"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_project_fee: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_entry_start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_adjustment: Option<f64>,

    #[validate(range(min = 0.0, max = 1.0, message = "must be a ratio between 0 and 1"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_fee_percent: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub demand_start_date: Option<NaiveDate>,
}

impl Patch<Project> for ProjectPatch {
    fn apply_to(&self, project: &mut Project) {
        if let Some(ref v) = self.sap_project_id {
            project.sap_project_id = v.clone();
        }
        if let Some(ref v) = self.client_id {
            project.client_id = v.clone();
        }
        if let Some(ref v) = self.client_name {
            project.client_name = v.clone();
        }
        if let Some(ref v) = self.year_end {
            project.year_end = v.clone();
        }
        if let Some(ref v) = self.industry_id {
            project.industry_id = v.clone();
        }
        if let Some(ref v) = self.delivery_service_org {
            project.delivery_service_org = v.clone();
        }
        if let Some(ref v) = self.resource_manager_id {
            project.resource_manager_id = v.clone();
        }
        if let Some(ref v) = self.resource_manager_name {
            project.resource_manager_name = v.clone();
        }
        if let Some(v) = self.contract_type {
            project.contract_type = v;
        }
        if let Some(v) = self.total_project_fee {
            project.total_project_fee = v;
        }
        if let Some(v) = self.time_entry_start_date {
            project.time_entry_start_date = Some(v);
        }
        if let Some(ref v) = self.budget_template_id {
            project.budget_template_id = v.clone();
        }
        if let Some(v) = self.status {
            project.status = v;
        }
        if let Some(v) = self.fee_adjustment {
            project.fee_adjustment = v;
        }
        if let Some(v) = self.admin_fee_percent {
            project.admin_fee_percent = v;
        }
        if let Some(v) = self.demand_start_date {
            project.demand_start_date = Some(v);
        }
    }

    fn is_empty(&self) -> bool {
        *self == ProjectPatch::default()
    }
}
