//! Step completion tracking
//!
//! Which fields of the current step are filled in, and what the user should do
//! next. The assistant uses this to nudge without calling the model.

use psw_models::{Project, WizardStep};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldStatus {
    pub field_id: &'static str,
    pub field_name: &'static str,
    pub is_complete: bool,
    pub is_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

impl FieldStatus {
    fn required(field_id: &'static str, field_name: &'static str, is_complete: bool) -> Self {
        Self {
            field_id,
            field_name,
            is_complete,
            is_required: true,
            hint: None,
        }
    }

    fn optional(field_id: &'static str, field_name: &'static str, is_complete: bool) -> Self {
        Self {
            is_required: false,
            ..Self::required(field_id, field_name, is_complete)
        }
    }

    fn hint(mut self, hint: &'static str) -> Self {
        self.hint = Some(hint);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepCompletion {
    pub step: WizardStep,
    pub fields: Vec<FieldStatus>,
    pub completed_count: usize,
    pub required_count: usize,
    pub is_complete: bool,
    pub next_incomplete_field: Option<FieldStatus>,
    pub progress_percent: u8,
}

fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

fn step_fields(step: WizardStep, project: &Project) -> Vec<FieldStatus> {
    match step {
        WizardStep::ProjectSetup => vec![
            FieldStatus::required("sapProjectId", "SAP Project Number", filled(&project.sap_project_id))
                .hint("Enter the 13-digit project number and click Lookup to load client information"),
            FieldStatus::required("industryId", "Industry", filled(&project.industry_id))
                .hint("Select the industry that best matches this project"),
            FieldStatus::optional(
                "resourceManagerId",
                "Resource Manager",
                filled(&project.resource_manager_id),
            )
            .hint("Choose a resource manager to oversee resource allocation"),
            // always has a value
            FieldStatus::required("contractType", "Contract Type", true),
            FieldStatus::required("budgetTemplateId", "Budget Template", filled(&project.budget_template_id))
                .hint("Select a template to structure your budget work packages"),
        ],
        WizardStep::Budget => vec![FieldStatus::required(
            "budgetLines",
            "Budget Hours",
            !project.budget_lines.is_empty(),
        )
        .hint("Enter hours for at least one role in a work package")],
        WizardStep::GrossMargin => {
            vec![FieldStatus::optional("grossMarginReviewed", "Gross Margin Review", true)]
        }
        WizardStep::Demand => vec![
            FieldStatus::required(
                "demandStartDate",
                "Demand Start Date",
                project.demand_start_date.is_some(),
            )
            .hint("Select the week when resource work should begin"),
            FieldStatus::required(
                "resourceDemands",
                "Resource Demand Entries",
                !project.resource_demands.is_empty(),
            )
            .hint("Add at least one resource demand with weekly hours"),
        ],
        WizardStep::Review => vec![FieldStatus::optional("readyForSubmit", "Project Review", true)],
    }
}

pub fn step_completion(step: WizardStep, project: &Project) -> StepCompletion {
    let fields = step_fields(step, project);

    let required_count = fields.iter().filter(|f| f.is_required).count();
    let completed_count = fields
        .iter()
        .filter(|f| f.is_required && f.is_complete)
        .count();
    let next_incomplete_field = fields
        .iter()
        .find(|f| f.is_required && !f.is_complete)
        .cloned();
    let progress_percent = if required_count == 0 {
        100
    } else {
        (completed_count as f64 / required_count as f64 * 100.0).round() as u8
    };

    StepCompletion {
        step,
        fields,
        completed_count,
        required_count,
        is_complete: completed_count == required_count,
        next_incomplete_field,
        progress_percent,
    }
}

/// What to tell the user to do next, if anything
pub fn next_action_prompt(completion: &StepCompletion) -> Option<String> {
    if completion.is_complete {
        if completion.step.is_last() {
            return Some(
                "Your project is ready for review. Check the summary and submit when ready."
                    .to_string(),
            );
        }
        return Some(format!(
            "Great job! You've completed all required fields for this step. Click \"Next\" to continue to step {}.",
            completion.step.number() + 1
        ));
    }

    completion.next_incomplete_field.as_ref().map(|field| match field.hint {
        Some(hint) => hint.to_string(),
        None => format!("Please complete the \"{}\" field.", field.field_name),
    })
}
