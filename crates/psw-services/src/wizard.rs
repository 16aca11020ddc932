//! Wizard navigation
//!
//! Moving backwards or jumping to a step is always allowed. Only `advance`
//! (the "Next" button) consults the current step's contract.

use std::sync::Arc;

use psw_contracts::{validate_step, ValidationResult};
use psw_core::config::BudgetingConfig;
use psw_core::result::PswResult;
use psw_metrics::MetricsEngine;
use psw_models::{Project, ReferenceData, WizardStep};
use tracing::debug;

use crate::store::ProjectStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Wizard {
    step: WizardStep,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_step(&self) -> WizardStep {
        self.step
    }

    /// Jump to a 1-based step number, clamped into range
    pub fn set_step(&mut self, n: i64) -> WizardStep {
        self.step = WizardStep::from_number(n);
        self.step
    }

    pub fn next_step(&mut self) -> WizardStep {
        self.step = self.step.next();
        self.step
    }

    pub fn prev_step(&mut self) -> WizardStep {
        self.step = self.step.prev();
        self.step
    }

    /// Validate the current step and move forward only if it has no errors
    ///
    /// Warnings come back in the result but never hold the user back.
    pub fn advance(&mut self, project: &Project, engine: &MetricsEngine<'_>) -> ValidationResult {
        let result = validate_step(self.step, project, engine);
        if result.is_valid {
            let from = self.step;
            self.next_step();
            debug!(from = from.number(), to = self.step.number(), "Advanced wizard");
        } else {
            debug!(step = self.step.number(), errors = result.error_count(), "Advance blocked");
        }
        result
    }
}

/// A store and a navigator that move together
pub struct WizardSession {
    pub store: ProjectStore,
    pub wizard: Wizard,
}

impl WizardSession {
    pub fn new(reference: Arc<ReferenceData>, config: BudgetingConfig) -> Self {
        Self {
            store: ProjectStore::new(reference, config),
            wizard: Wizard::new(),
        }
    }

    pub fn from_store(store: ProjectStore) -> Self {
        Self {
            store,
            wizard: Wizard::new(),
        }
    }

    pub fn current_step(&self) -> WizardStep {
        self.wizard.current_step()
    }

    pub fn advance(&mut self) -> ValidationResult {
        let engine = self.store.engine();
        self.wizard.advance(self.store.current_project(), &engine)
    }

    /// Fresh project, back to step 1
    pub fn new_project(&mut self) {
        self.store.reset_project();
        self.wizard = Wizard::new();
    }

    /// Open a saved project at step 1
    pub fn open_project(&mut self, id: &str) -> PswResult<()> {
        self.store.load_project(id)?;
        self.wizard = Wizard::new();
        Ok(())
    }
}
