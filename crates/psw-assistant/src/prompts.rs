//! Prompt text sent to the model

use psw_core::config::DEFAULT_GROSS_MARGIN_TARGET;
use psw_core::types::format_percent;
use psw_models::{Project, WizardStep};

use crate::agent::BudgetEstimate;
use crate::types::WizardContext;

/// System and user halves of a suggestion request
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionPrompt {
    pub system: String,
    pub user: String,
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

fn to_pretty_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// Chat system prompt: the base guidance plus the current step's notes
///
/// A context carrying its own system prompt uses that verbatim.
pub fn system_prompt(context: &WizardContext) -> String {
    if let Some(ref prompt) = context.system_prompt {
        return prompt.clone();
    }

    let reference = &context.reference_data;
    let industries = reference
        .industries
        .iter()
        .map(|i| i.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let templates = reference
        .templates
        .iter()
        .map(|t| format!("{} ({})", t.name, t.category))
        .collect::<Vec<_>>()
        .join(", ");
    let managers = reference
        .resource_managers
        .iter()
        .map(|m| m.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut prompt = format!(
        r#"You are a helpful AI assistant for PSW (Project Setup Workbook), a project budgeting and resource planning application. You guide users through setting up projects step by step.

Your role is to:
1. Proactively guide users through the wizard steps
2. Suggest field values based on context and industry best practices
3. Answer questions about the fields and what values to enter
4. Be concise and helpful

Available reference data:
- Industries: {industries}
- Budget Templates: {templates}
- Resource Managers: {managers}

Current project data:
{project}

When you want to suggest filling fields, include a JSON block with suggestions in this format:
```json
{{
  "suggestions": [
    {{
      "fieldId": "industryId",
      "fieldName": "Industry",
      "value": "6",
      "displayValue": "Financial Services",
      "confidence": "high"
    }}
  ]
}}
```

Be conversational but efficient. Focus on helping the user complete their task quickly."#,
        project = to_pretty_json(&context.project_data),
    );

    prompt.push_str("\n\n");
    prompt.push_str(&step_notes(context.step));
    prompt
}

fn step_notes(step: WizardStep) -> String {
    let body = match step {
        WizardStep::ProjectSetup => {
            "This step involves:
- Looking up the SAP project number (13-digit ID)
- Selecting the industry
- Choosing a resource manager
- Setting the contract type (Time & Materials or Fixed Fee)
- Selecting a budget template

Guide the user to fill in these fields. If they've selected an industry, suggest an appropriate budget template. Common patterns:
- Financial Services, Technology, Healthcare -> often need GCS (Advisory) templates
- Construction, Real Estate -> often need Assurance templates
- Any industry can need Tax Compliance for tax work

If the project info is already populated from SAP lookup, acknowledge that and move to suggesting industry/template."
                .to_string()
        }
        WizardStep::Budget => "This step involves entering hours by work package and role. The budget grid shows:
- Work packages from the selected template
- Roles (Partner, Director, Manager, Senior, Staff, etc.)
- Hours per role per work package

You can suggest work packages that are commonly used for the selected industry. Don't estimate specific hours - that requires project-specific knowledge."
            .to_string(),
        WizardStep::GrossMargin => format!(
            "This step shows the gross margin calculation including:
- Revenue from labor fees
- Subcontractor costs
- Expenses (billable and non-billable)
- Target gross margin is {}

You can explain the components but don't make specific suggestions for this step.",
            format_percent(DEFAULT_GROSS_MARGIN_TARGET)
        ),
        WizardStep::Demand => "This step involves scheduling resources by week. The grid shows:
- Resource type (Named, Unnamed, Generic)
- Role selection
- Location
- Weekly hour allocations

You can suggest:
- Even distribution of budget hours across weeks
- Typical team composition based on project size
- Remind about matching demand to budget hours"
            .to_string(),
        WizardStep::Review => "This is the final review step. Help the user understand the summary and address any validation warnings."
            .to_string(),
    };
    format!("You are currently on {}.\n\n{}", step, body)
}

/// Prompt asking for a bare JSON array of suggestions for the current step
pub fn suggestion_prompt(context: &WizardContext) -> SuggestionPrompt {
    let reference = &context.reference_data;
    let system = format!(
        r#"You are an AI that generates field suggestions for a project setup wizard.
Return ONLY a JSON array of suggestions, no other text.

Each suggestion should have:
- fieldId: the form field identifier
- fieldName: human-readable name
- value: the actual value to set
- displayValue: what to show the user
- confidence: "high", "medium", or "low"

Available reference data:
- Industries: {}
- Templates: {}
- Resource Managers: {}"#,
        to_json(&reference.industries),
        to_json(&reference.templates),
        to_json(&reference.resource_managers),
    );

    let project = to_json(&context.project_data);
    let user = match context.step {
        WizardStep::ProjectSetup => format!(
            "Generate suggestions for Step 1 (Project Setup).
Current project data: {project}

Suggest appropriate values for any empty fields based on:
1. If deliveryServiceOrg is set, suggest matching budget template category
2. If industry is not set but we have client info, suggest likely industry
3. Suggest a resource manager if not set

Return JSON array of suggestions."
        ),
        WizardStep::Budget => format!(
            "Generate work package suggestions for Step 2 (Budget).
Current project data: {project}

Based on the selected industry and template, suggest which work packages are most important to fill in first.
Return as suggestions with fieldId as \"workPackagePriority\" and value as the work package name."
        ),
        WizardStep::Demand => format!(
            "Generate resource demand suggestions for Step 4.
Current project data: {project}

Suggest:
1. If budget hours exist, how to distribute them evenly across 12 weeks
2. Typical role mix for the project type

Return JSON array of suggestions."
        ),
        WizardStep::GrossMargin | WizardStep::Review => {
            "No suggestions needed for this step. Return empty array: []".to_string()
        }
    };

    SuggestionPrompt { system, user }
}

/// Steps the suggestion prompt asks the model anything useful for
pub fn step_has_suggestions(step: WizardStep) -> bool {
    matches!(
        step,
        WizardStep::ProjectSetup | WizardStep::Budget | WizardStep::Demand
    )
}

/// Opening assistant message when the user lands on a step
pub fn welcome_message(step: WizardStep, project: &Project) -> String {
    match step {
        WizardStep::ProjectSetup if !project.sap_project_id.trim().is_empty() => {
            let client = if project.client_name.is_empty() {
                "Unknown"
            } else {
                project.client_name.as_str()
            };
            format!(
                "I see you've loaded project \"{}\". Would you like me to suggest an industry and budget template based on the delivery organization \"{}\"?",
                client, project.delivery_service_org
            )
        }
        WizardStep::ProjectSetup => "Let's set up your project! Start by entering the SAP project number to load the client information, or I can help you select an industry and template manually.".to_string(),
        WizardStep::Budget => format!(
            "Now let's work on the budget. I can suggest which work packages are most relevant for your {}.",
            if project.industry_id.is_empty() {
                "project"
            } else {
                "selected industry"
            }
        ),
        WizardStep::GrossMargin => format!(
            "Here's your gross margin summary. The target is {}. Let me know if you need help understanding any of the components.",
            format_percent(DEFAULT_GROSS_MARGIN_TARGET)
        ),
        WizardStep::Demand => format!(
            "Time to schedule resources! You have {}. Would you like me to suggest an even distribution across the weeks?",
            if project.budget_lines.is_empty() {
                "no budget hours yet"
            } else {
                "budget hours to allocate"
            }
        ),
        WizardStep::Review => "Great job! Here's your project summary. Review the details and address any warnings before submitting.".to_string(),
    }
}

/// System prompt for the budgeting agent conversation
pub fn budgeting_system_prompt(current: Option<&BudgetEstimate>) -> String {
    let budget = current
        .map(to_json)
        .unwrap_or_else(|| "none yet".to_string());
    format!(
        "You are a budget planning assistant for professional services projects.
Help users create and adjust project budgets. When they describe a project, extract:
- Project name (if mentioned)
- Duration in weeks or months
- Resource requirements (roles like Partner, Senior Manager, Manager, Senior, Staff)
- Hours per week for each role

Provide clear, conversational responses. When creating or adjusting budgets, explain your reasoning.
Current budget: {budget}"
    )
}
