//! Project aggregate

pub mod model;

pub use model::{ContractType, Project, ProjectPatch, ProjectStatus};
