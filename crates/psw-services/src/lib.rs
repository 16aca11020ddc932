//! # psw-services
//!
//! Operations over the project aggregate.
//!
//! - [`store::ProjectStore`]: the editable current project and the saved list
//! - [`wizard`]: step navigation gated by the step contracts
//! - [`export`]: SAP budget and ProFinda demand CSV uploads
//! - [`historical`]: budget sheet ingestion and the historical merge

pub mod export;
pub mod historical;
pub mod store;
pub mod wizard;

pub use export::{BudgetExporter, DemandRow, SapBudgetRow};
pub use historical::{BudgetSheet, CostRow, HistoricalRow, HistoricalSample, SheetTotals};
pub use store::ProjectStore;
pub use wizard::{Wizard, WizardSession};
