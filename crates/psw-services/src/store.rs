//! Project store
//!
//! Owns the project being edited plus the list of saved projects. Every
//! mutation touches a single collection and stamps `updated_at`.

use std::collections::BTreeMap;
use std::sync::Arc;

use psw_contracts::{validate_project, validate_step, ValidationResult};
use psw_core::config::BudgetingConfig;
use psw_core::error::PswError;
use psw_core::result::PswResult;
use psw_core::traits::{Entity, Id, Patch};
use psw_metrics::MetricsEngine;
use psw_models::{
    BudgetLine, BudgetLineKey, Expense, ExpensePatch, NewExpense, NewResourceDemand,
    NewSubcontractor, Project, ProjectPatch, ProjectStatus, ReferenceData, ResourceDemand,
    ResourceDemandPatch, SapProjectRecord, Subcontractor, SubcontractorPatch, WeeklyHours,
    WizardStep, DEMAND_WEEKS,
};
use tracing::{debug, info};
use validator::Validate;

fn find_mut<'a, T: Entity>(items: &'a mut [T], id: &str) -> PswResult<&'a mut T> {
    items
        .iter_mut()
        .find(|item| item.id() == id)
        .ok_or_else(|| PswError::not_found(T::TYPE_NAME, "id", id))
}

fn remove_by_id<T: Entity>(items: &mut Vec<T>, id: &str) -> PswResult<T> {
    let index = items
        .iter()
        .position(|item| item.id() == id)
        .ok_or_else(|| PswError::not_found(T::TYPE_NAME, "id", id))?;
    Ok(items.remove(index))
}

pub struct ProjectStore {
    reference: Arc<ReferenceData>,
    config: BudgetingConfig,
    current: Project,
    saved: Vec<Project>,
}

impl ProjectStore {
    pub fn new(reference: Arc<ReferenceData>, config: BudgetingConfig) -> Self {
        let current = Project::new_empty(config.admin_fee_percent);
        Self {
            reference,
            config,
            current,
            saved: Vec::new(),
        }
    }

    /// Store whose current project is an existing document
    pub fn with_project(reference: Arc<ReferenceData>, config: BudgetingConfig, project: Project) -> Self {
        Self {
            reference,
            config,
            current: project,
            saved: Vec::new(),
        }
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn config(&self) -> &BudgetingConfig {
        &self.config
    }

    pub fn engine(&self) -> MetricsEngine<'_> {
        MetricsEngine::from_config(&self.reference, &self.config)
    }

    pub fn current_project(&self) -> &Project {
        &self.current
    }

    pub fn into_project(self) -> Project {
        self.current
    }

    pub fn saved_projects(&self) -> &[Project] {
        &self.saved
    }

    // ------------------------------------------------------------------
    // Project fields
    // ------------------------------------------------------------------

    /// Merge the fields present in `patch` into the current project
    pub fn set_current_project(&mut self, patch: &ProjectPatch) -> PswResult<()> {
        patch.validate()?;
        if patch.is_empty() {
            return Ok(());
        }
        patch.apply_to(&mut self.current);
        self.current.touch();
        debug!(project_id = %self.current.id, "Merged project fields");
        Ok(())
    }

    /// Replace the current project with a fresh draft
    pub fn reset_project(&mut self) {
        self.current = Project::new_empty(self.config.admin_fee_percent);
        debug!(project_id = %self.current.id, "Started new project");
    }

    /// Insert or replace the current project in the saved list
    pub fn save_project(&mut self) {
        match self.saved.iter_mut().find(|p| p.id == self.current.id) {
            Some(existing) => *existing = self.current.clone(),
            None => self.saved.push(self.current.clone()),
        }
        debug!(project_id = %self.current.id, saved = self.saved.len(), "Saved project");
    }

    pub fn load_project(&mut self, id: &str) -> PswResult<()> {
        let project = self
            .saved
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| PswError::not_found("Project", "id", id))?;
        self.current = project;
        debug!(project_id = %id, "Loaded project");
        Ok(())
    }

    /// Fill client fields from the SAP directory
    pub fn apply_sap_lookup(&mut self, sap_project_id: &str) -> PswResult<SapProjectRecord> {
        let record = self
            .reference
            .lookup_sap_project(sap_project_id)
            .cloned()
            .ok_or_else(|| PswError::not_found("SapProject", "projectId", sap_project_id.trim()))?;

        self.current.sap_project_id = record.project_id.clone();
        self.current.client_id = record.client_id.clone();
        self.current.client_name = record.client_name.clone();
        self.current.year_end = record.year_end.clone();
        self.current.delivery_service_org = record.delivery_org.clone();
        self.current.touch();
        debug!(sap_project_id = %record.project_id, client = %record.client_name, "Applied SAP lookup");
        Ok(record)
    }

    // ------------------------------------------------------------------
    // Budget lines
    // ------------------------------------------------------------------

    /// Upsert the hours of one budget cell. Zero hours removes the line.
    pub fn set_budget_line(
        &mut self,
        work_package_id: &str,
        work_item_id: Option<&str>,
        role_id: &str,
        hours: u32,
    ) {
        let key = BudgetLineKey::new(work_package_id, work_item_id, role_id);
        let lines = &mut self.current.budget_lines;
        let existing = lines.iter().position(|line| key.matches(line));

        match (existing, hours) {
            (Some(index), 0) => {
                lines.remove(index);
                debug!(work_package_id, role_id, "Removed budget line");
            }
            (Some(index), _) => {
                lines[index].hours = hours;
                debug!(work_package_id, role_id, hours, "Updated budget line");
            }
            (None, 0) => return,
            (None, _) => {
                lines.push(BudgetLine::new(key, hours));
                debug!(work_package_id, role_id, hours, "Added budget line");
            }
        }
        self.current.touch();
    }

    pub fn budget_hours(&self, work_package_id: &str, work_item_id: Option<&str>, role_id: &str) -> u32 {
        let key = BudgetLineKey::new(work_package_id, work_item_id, role_id);
        self.current.budget_line(&key).map(|l| l.hours).unwrap_or(0)
    }

    // ------------------------------------------------------------------
    // Subcontractors
    // ------------------------------------------------------------------

    pub fn add_subcontractor(&mut self, new: NewSubcontractor) -> PswResult<Id> {
        new.validate()?;
        let sub = Subcontractor::from(new);
        let id = sub.id.clone();
        self.current.subcontractors.push(sub);
        self.current.touch();
        debug!(subcontractor_id = %id, "Added subcontractor");
        Ok(id)
    }

    pub fn update_subcontractor(&mut self, id: &str, patch: &SubcontractorPatch) -> PswResult<()> {
        patch.validate()?;
        patch.apply_to(find_mut(&mut self.current.subcontractors, id)?);
        self.current.touch();
        debug!(subcontractor_id = %id, "Updated subcontractor");
        Ok(())
    }

    pub fn remove_subcontractor(&mut self, id: &str) -> PswResult<Subcontractor> {
        let removed = remove_by_id(&mut self.current.subcontractors, id)?;
        self.current.touch();
        debug!(subcontractor_id = %id, "Removed subcontractor");
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Expenses
    // ------------------------------------------------------------------

    pub fn add_expense(&mut self, new: NewExpense) -> PswResult<Id> {
        new.validate()?;
        let expense = Expense::from(new);
        let id = expense.id.clone();
        self.current.expenses.push(expense);
        self.current.touch();
        debug!(expense_id = %id, "Added expense");
        Ok(id)
    }

    pub fn update_expense(&mut self, id: &str, patch: &ExpensePatch) -> PswResult<()> {
        patch.validate()?;
        patch.apply_to(find_mut(&mut self.current.expenses, id)?);
        self.current.touch();
        debug!(expense_id = %id, "Updated expense");
        Ok(())
    }

    pub fn remove_expense(&mut self, id: &str) -> PswResult<Expense> {
        let removed = remove_by_id(&mut self.current.expenses, id)?;
        self.current.touch();
        debug!(expense_id = %id, "Removed expense");
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Resource demands
    // ------------------------------------------------------------------

    pub fn add_resource_demand(&mut self, new: NewResourceDemand) -> PswResult<Id> {
        new.validate()?;
        for (week, hours) in new.weekly_hours.iter() {
            check_week(week)?;
            check_hours(hours)?;
        }
        let demand = ResourceDemand::from(new);
        let id = demand.id.clone();
        self.current.resource_demands.push(demand);
        self.current.touch();
        debug!(demand_id = %id, "Added resource demand");
        Ok(id)
    }

    pub fn update_resource_demand(&mut self, id: &str, patch: &ResourceDemandPatch) -> PswResult<()> {
        patch.validate()?;
        patch.apply_to(find_mut(&mut self.current.resource_demands, id)?);
        self.current.touch();
        debug!(demand_id = %id, "Updated resource demand");
        Ok(())
    }

    pub fn remove_resource_demand(&mut self, id: &str) -> PswResult<ResourceDemand> {
        let removed = remove_by_id(&mut self.current.resource_demands, id)?;
        self.current.touch();
        debug!(demand_id = %id, "Removed resource demand");
        Ok(removed)
    }

    /// Set one week of a demand schedule; zero hours clears the week
    pub fn set_demand_weekly_hours(&mut self, id: &str, week: u8, hours: f64) -> PswResult<()> {
        check_week(week)?;
        check_hours(hours)?;
        let demand = find_mut(&mut self.current.resource_demands, id)?;
        demand.weekly_hours.set(week, hours);
        self.current.touch();
        debug!(demand_id = %id, week, hours, "Set weekly demand hours");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Validation and lifecycle
    // ------------------------------------------------------------------

    pub fn validate_step(&self, step: WizardStep) -> ValidationResult {
        validate_step(step, &self.current, &self.engine())
    }

    pub fn validate_project(&self) -> ValidationResult {
        validate_project(&self.current, &self.engine())
    }

    /// Mark the project Submitted if whole-project validation passes
    ///
    /// The validation result is returned either way; the status only changes
    /// when it is valid.
    pub fn submit(&mut self) -> ValidationResult {
        let result = self.validate_project();
        if result.is_valid {
            self.current.status = ProjectStatus::Submitted;
            self.current.touch();
            info!(project_id = %self.current.id, warnings = result.warning_count(), "Project submitted");
        } else {
            info!(
                project_id = %self.current.id,
                errors = result.error_count(),
                "Project submission blocked"
            );
        }
        result
    }

    /// Saved projects counted by status (every status present, zero included)
    pub fn status_counts(&self) -> BTreeMap<ProjectStatus, usize> {
        let mut counts: BTreeMap<ProjectStatus, usize> =
            ProjectStatus::ALL.iter().map(|s| (*s, 0)).collect();
        for project in &self.saved {
            *counts.entry(project.status).or_default() += 1;
        }
        counts
    }
}

fn check_week(week: u8) -> PswResult<()> {
    if WeeklyHours::is_valid_week(week) {
        Ok(())
    } else {
        Err(PswError::invalid(
            "week",
            format!("must be between 1 and {}", DEMAND_WEEKS),
        ))
    }
}

fn check_hours(hours: f64) -> PswResult<()> {
    if hours.is_finite() && hours >= 0.0 {
        Ok(())
    } else {
        Err(PswError::invalid("hours", "must be a non-negative number"))
    }
}
