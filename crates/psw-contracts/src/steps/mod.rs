//! One contract per wizard step

pub mod budget;
pub mod demand;
pub mod gross_margin;
pub mod project_setup;
pub mod review;

pub use budget::BudgetContract;
pub use demand::DemandContract;
pub use gross_margin::GrossMarginContract;
pub use project_setup::ProjectSetupContract;
pub use review::ReviewContract;
