//! # psw-models
//!
//! Domain models for the PSW budgeting wizard.
//!
//! The project aggregate and the entities it owns (budget lines,
//! subcontractors, expenses, resource demands), plus the static reference
//! tables (roles, industries, locations, budget templates) they point into.

pub use psw_core::traits::{Entity, Id, Identifiable, Patch};

pub mod role;
pub mod template;
pub mod reference;
pub mod project;
pub mod budget_line;
pub mod subcontractor;
pub mod expense;
pub mod resource_demand;
pub mod step;

pub use role::Role;
pub use template::{BudgetTemplate, WorkItem, WorkPackage};
pub use reference::{
    Industry, Location, ReferenceData, ResourceManager, SapProjectRecord, TemplateCategory,
};
pub use project::{ContractType, Project, ProjectPatch, ProjectStatus};
pub use budget_line::{BudgetLine, BudgetLineKey};
pub use subcontractor::{NewSubcontractor, Subcontractor, SubcontractorPatch};
pub use expense::{Expense, ExpenseCategory, ExpensePatch, NewExpense};
pub use resource_demand::{
    NewResourceDemand, RequestType, ResourceDemand, ResourceDemandPatch, WeeklyHours, DEMAND_WEEKS,
};
pub use step::WizardStep;
