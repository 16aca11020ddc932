//! # psw-metrics
//!
//! Derived figures for a project: budget totals, the gross margin
//! decomposition and demand variance.
//!
//! Everything here is a pure function of a `Project` and the reference data.
//! Nothing is cached and nothing fails; a line that points at an unknown role
//! simply contributes zero.

pub mod budget;
pub mod demand;
pub mod engine;
pub mod margin;

pub use budget::BudgetMetrics;
pub use demand::DemandMetrics;
pub use engine::{MetricsEngine, ProjectSummary};
pub use margin::GrossMarginMetrics;
