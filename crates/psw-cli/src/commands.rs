//! Subcommand handlers
//!
//! Handlers read the project document, run one operation, and write the
//! document back when it changed. Each returns an [`Outcome`] that `main`
//! prints as text, JSON or YAML.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use psw_assistant::agent::{
    parse_budget_from_response, BudgetEstimate, BudgetingChat, FastPathPlan, FullPathPlan, PathType,
};
use psw_assistant::prompts::welcome_message;
use psw_assistant::{
    apply_suggestions, next_action_prompt, service_from_config, step_completion, WizardAssistant,
    WizardContext,
};
use psw_contracts::ValidationResult;
use psw_core::config::AppConfig;
use psw_core::error::PswError;
use psw_core::result::PswResult;
use psw_core::types::{format_currency, format_number, format_percent};
use psw_models::{ProjectPatch, ReferenceData, WizardStep};
use psw_services::export::{budget_file_name, demand_csv, demand_file_name, write_export};
use psw_services::historical::{fill_with_historical, historical_samples, load_budget_sheet};
use psw_services::{BudgetExporter, BudgetSheet, ProjectStore};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::cli::{Command, ExportKind, OutputFormat, ResourceSpec};
use crate::document::{load_project, save_project};

/// What a command produced
#[derive(Debug)]
pub struct Outcome {
    pub text: String,
    pub data: Value,
    /// False when the command ran but its result is a failure (invalid project, blocked submit)
    pub success: bool,
}

impl Outcome {
    fn new(text: impl Into<String>, data: impl Serialize) -> anyhow::Result<Self> {
        Ok(Self {
            text: text.into(),
            data: serde_json::to_value(data)?,
            success: true,
        })
    }

    fn with_success(mut self, success: bool) -> Self {
        self.success = success;
        self
    }

    pub fn render(&self, format: OutputFormat) -> anyhow::Result<String> {
        Ok(match format {
            OutputFormat::Text => self.text.clone(),
            OutputFormat::Json => serde_json::to_string_pretty(&self.data)?,
            OutputFormat::Yaml => serde_yaml::to_string(&self.data)?,
        })
    }
}

pub struct App {
    pub config: AppConfig,
    pub reference: Arc<ReferenceData>,
    pub project_path: PathBuf,
}

impl App {
    pub fn new(config: AppConfig, project_path: impl Into<PathBuf>) -> Self {
        Self {
            config,
            reference: ReferenceData::shared(),
            project_path: project_path.into(),
        }
    }

    fn open_store(&self) -> PswResult<ProjectStore> {
        let project = load_project(&self.project_path)?;
        Ok(ProjectStore::with_project(
            Arc::clone(&self.reference),
            self.config.budgeting.clone(),
            project,
        ))
    }

    fn save(&self, store: &ProjectStore) -> PswResult<()> {
        save_project(&self.project_path, store.current_project())
    }

    fn output_dir(&self, out: Option<PathBuf>) -> PathBuf {
        out.unwrap_or_else(|| PathBuf::from(&self.config.export.output_dir))
    }

    pub async fn run(&self, command: Command) -> anyhow::Result<Outcome> {
        debug!(?command, project = %self.project_path.display(), "Running command");
        match command {
            Command::New { force } => self.new_project(force),
            Command::Lookup { sap_project_id } => self.lookup(&sap_project_id),
            Command::Set { fields } => self.set_fields(&fields),
            Command::Hours {
                work_package,
                role,
                hours,
                work_item,
            } => self.set_hours(&work_package, work_item.as_deref(), &role, hours),
            Command::Metrics => self.metrics(),
            Command::Validate { step } => self.validate(step),
            Command::Progress { step } => self.progress(step),
            Command::Suggest { step, apply } => self.suggest(step, apply).await,
            Command::Ask {
                message,
                step,
                apply,
            } => self.ask(&message, step, apply).await,
            Command::Submit => self.submit(),
            Command::Export { kind, out } => self.export(kind, self.output_dir(out)),
            Command::Agent { message } => self.agent(&message).await,
            Command::FastPath {
                name,
                weeks,
                level,
                hours,
                assign,
                out,
            } => {
                let plan = FastPathPlan {
                    project_name: name,
                    engagement_length: weeks,
                    resource_level: level,
                    total_hours: hours,
                    needs_resource_assignment: assign,
                };
                self.fast_path(&plan, &self.output_dir(out))
            }
            Command::FullPath {
                name,
                weeks,
                start,
                resources,
                out,
            } => {
                let mut plan = FullPathPlan::new(name, weeks, Some(start));
                for ResourceSpec {
                    level,
                    count,
                    hours_per_week,
                } in resources
                {
                    plan.add_allocation(level, count, hours_per_week);
                }
                self.full_path(&plan, &self.output_dir(out))
            }
            Command::Sheet { file, historical } => self.sheet(file.as_deref(), historical.as_deref()),
        }
    }

    fn new_project(&self, force: bool) -> anyhow::Result<Outcome> {
        if self.project_path.exists() && !force {
            return Err(PswError::invalid(
                "project",
                format!("{} already exists, pass --force to replace it", self.project_path.display()),
            )
            .into());
        }
        let store = ProjectStore::new(Arc::clone(&self.reference), self.config.budgeting.clone());
        self.save(&store)?;

        let project = store.current_project();
        info!(project_id = %project.id, "Created project document");
        Outcome::new(
            format!(
                "Created draft project {} in {}\n\n{}",
                project.id,
                self.project_path.display(),
                welcome_message(WizardStep::FIRST, project)
            ),
            project,
        )
    }

    fn lookup(&self, sap_project_id: &str) -> anyhow::Result<Outcome> {
        let mut store = self.open_store()?;
        let record = store.apply_sap_lookup(sap_project_id)?;
        self.save(&store)?;
        Outcome::new(
            format!(
                "{} ({}), year end {}, {}",
                record.client_name, record.client_id, record.year_end, record.delivery_org
            ),
            &record,
        )
    }

    fn set_fields(&self, fields: &str) -> anyhow::Result<Outcome> {
        let patch: ProjectPatch =
            serde_json::from_str(fields).map_err(|e| PswError::invalid("fields", e.to_string()))?;
        let mut store = self.open_store()?;
        store.set_current_project(&patch)?;
        self.save(&store)?;
        Outcome::new("Project updated", store.current_project())
    }

    fn set_hours(
        &self,
        work_package_id: &str,
        work_item_id: Option<&str>,
        role_id: &str,
        hours: u32,
    ) -> anyhow::Result<Outcome> {
        let role = self
            .reference
            .role(role_id)
            .ok_or_else(|| PswError::not_found("Role", "id", role_id))?;
        let mut store = self.open_store()?;
        store.set_budget_line(work_package_id, work_item_id, role_id, hours);
        self.save(&store)?;

        let budget = store.engine().budget_metrics(store.current_project());
        Outcome::new(
            format!(
                "{} {}: {}h (budget total {}h, {})",
                work_package_id,
                role.name,
                hours,
                budget.total_hours,
                format_currency(budget.estimated_billings)
            ),
            &budget,
        )
    }

    fn metrics(&self) -> anyhow::Result<Outcome> {
        let store = self.open_store()?;
        let summary = store.engine().project_summary(store.current_project());
        let (budget, margin, demand) = (&summary.budget, &summary.gross_margin, &summary.demand);

        let mut text = String::new();
        writeln!(text, "Budget hours        {}", budget.total_hours)?;
        writeln!(text, "Estimated billings  {}", format_currency(budget.estimated_billings))?;
        writeln!(text, "Labor cost          {}", format_currency(budget.labor_cost))?;
        writeln!(text, "Total revenue       {}", format_currency(margin.total_revenue))?;
        writeln!(text, "Total cost          {}", format_currency(margin.total_cost))?;
        writeln!(
            text,
            "Gross margin        {} ({}, target {}{})",
            format_currency(margin.gross_margin),
            format_percent(margin.gross_margin_percent),
            format_percent(margin.target),
            if margin.meets_target { "" } else { ", below target" }
        )?;
        write!(
            text,
            "Demand hours        {} (variance {})",
            format_number(demand.total_demand_hours),
            format_number(demand.variance)
        )?;
        Outcome::new(text, &summary)
    }

    fn validate(&self, step: Option<i64>) -> anyhow::Result<Outcome> {
        let store = self.open_store()?;
        let (label, result) = match step {
            Some(n) => {
                let step = WizardStep::from_number(n);
                (step.to_string(), store.validate_step(step))
            }
            None => ("Project".to_string(), store.validate_project()),
        };
        Ok(Outcome::new(validation_text(&label, &result), &result)?.with_success(result.is_valid))
    }

    fn progress(&self, step: i64) -> anyhow::Result<Outcome> {
        let store = self.open_store()?;
        let project = store.current_project();
        let step = WizardStep::from_number(step);
        let completion = step_completion(step, project);
        let next_action = next_action_prompt(&completion);

        let mut text = format!(
            "{} - {}% ({}/{} required)\n",
            step, completion.progress_percent, completion.completed_count, completion.required_count
        );
        for field in &completion.fields {
            let mark = if field.is_complete { "x" } else { " " };
            let required = if field.is_required { "" } else { " (optional)" };
            writeln!(text, "  [{}] {}{}", mark, field.field_name, required)?;
        }
        text.push('\n');
        text.push_str(next_action.as_deref().unwrap_or("This step is complete."));

        Outcome::new(
            text,
            json!({
                "completion": completion,
                "nextAction": next_action,
                "welcome": welcome_message(step, project),
            }),
        )
    }

    async fn suggest(&self, step: i64, apply: bool) -> anyhow::Result<Outcome> {
        let mut store = self.open_store()?;
        let step = WizardStep::from_number(step);
        let service = service_from_config(&self.config.ai).map_err(PswError::from)?;

        if !service.is_available() {
            let completion = step_completion(step, store.current_project());
            let hint = next_action_prompt(&completion).unwrap_or_default();
            return Outcome::new(
                format!("The AI assistant is not configured.\n{}", hint).trim_end().to_string(),
                json!({ "available": false, "suggestions": [], "nextAction": hint }),
            );
        }

        let context = WizardContext::for_project(step, store.current_project(), &self.reference);
        let suggestions = service.get_suggestions(&context).await.map_err(PswError::from)?;

        let mut text = String::new();
        for s in &suggestions {
            writeln!(text, "{}: {} ({:?})", s.field_name, s.display_value, s.confidence)?;
        }
        if suggestions.is_empty() {
            text.push_str("No suggestions for this step.\n");
        }

        if !apply {
            return Outcome::new(
                text.trim_end().to_string(),
                json!({ "available": true, "suggestions": suggestions }),
            );
        }

        let outcome = apply_suggestions(&mut store, &suggestions);
        let applied = outcome.result().cloned().unwrap_or_default();
        if !applied.is_empty() {
            self.save(&store)?;
        }
        writeln!(text, "\nApplied {} of {} suggestions", applied.len(), suggestions.len())?;
        for message in outcome.errors().full_messages() {
            writeln!(text, "  {}", message)?;
        }
        Ok(Outcome::new(
            text.trim_end().to_string(),
            json!({
                "available": true,
                "suggestions": suggestions,
                "applied": applied,
                "errors": outcome.errors().full_messages(),
            }),
        )?
        .with_success(outcome.is_success()))
    }

    async fn ask(&self, message: &str, step: i64, apply: bool) -> anyhow::Result<Outcome> {
        let mut store = self.open_store()?;
        let step = WizardStep::from_number(step);
        let service = service_from_config(&self.config.ai).map_err(PswError::from)?;
        let mut assistant = WizardAssistant::new(service, Arc::clone(&self.reference));
        assistant.initialize_for_step(step, store.current_project()).await;

        let welcome = assistant
            .messages()
            .first()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        let reply = match assistant.send_message(message, step, store.current_project()).await {
            Some(reply) => reply.content.clone(),
            None => {
                return Outcome::new(
                    format!("{}\n\nThe AI assistant is not configured.", welcome),
                    json!({ "available": false, "welcome": welcome }),
                );
            }
        };

        let mut text = reply.clone();
        let inline: Vec<_> = assistant.inline_suggestions().values().cloned().collect();
        let pending = assistant.pending_action().cloned();
        if let Some(action) = &pending {
            writeln!(text, "\n\n{}:", action.description)?;
            for s in &action.suggestions {
                writeln!(text, "  {}: {}", s.field_name, s.display_value)?;
            }
        }

        let mut applied = Vec::new();
        let mut errors = Vec::new();
        if apply {
            if let Some(outcome) = assistant.accept_suggestions(&mut store) {
                applied = outcome.result().cloned().unwrap_or_default();
                errors = outcome.errors().full_messages();
                if !applied.is_empty() {
                    self.save(&store)?;
                }
                writeln!(text, "Applied {} field(s)", applied.len())?;
            }
        }

        let success = errors.is_empty();
        Ok(Outcome::new(
            text.trim_end().to_string(),
            json!({
                "available": true,
                "welcome": welcome,
                "reply": reply,
                "pendingAction": pending,
                "inlineSuggestions": inline,
                "applied": applied,
                "errors": errors,
            }),
        )?
        .with_success(success))
    }

    fn submit(&self) -> anyhow::Result<Outcome> {
        let mut store = self.open_store()?;
        let result = store.submit();
        if result.is_valid {
            self.save(&store)?;
        }
        let status = store.current_project().status;
        let text = format!("{}\nStatus: {}", validation_text("Project", &result), status.as_str());
        Ok(Outcome::new(text, json!({ "status": status, "validation": result }))?
            .with_success(result.is_valid))
    }

    fn export(&self, kind: ExportKind, dir: PathBuf) -> anyhow::Result<Outcome> {
        let store = self.open_store()?;
        let project = store.current_project();
        let (file_name, contents) = match kind {
            ExportKind::Budget => {
                let exporter = BudgetExporter::new(&self.reference, &self.config.budgeting);
                (budget_file_name(project), exporter.budget_csv(project)?)
            }
            ExportKind::Demand => (demand_file_name(project), demand_csv(project)?),
        };
        let path = write_export(&dir, &file_name, &contents)?;
        Outcome::new(
            format!("Wrote {}", path.display()),
            json!({ "path": path, "rows": contents.lines().count().saturating_sub(1) }),
        )
    }

    async fn agent(&self, message: &str) -> anyhow::Result<Outcome> {
        let service = service_from_config(&self.config.ai).map_err(PswError::from)?;
        let mut chat = BudgetingChat::new(service, Arc::clone(&self.reference));
        let reply = chat.send_message(message).await.content.clone();

        // Without a model, size the request on its own
        let estimate = chat
            .budget()
            .cloned()
            .unwrap_or_else(|| parse_budget_from_response("", message, &self.reference));

        let path = PathType::for_engagement(estimate.engagement_length);
        let next = match path {
            PathType::Fast => "psw fast-path",
            PathType::Full => "psw full-path",
        };
        Outcome::new(
            format!("{}\n\n{}\nNext: {}", reply, estimate_text(&estimate), next),
            json!({ "reply": reply, "estimate": estimate, "path": path }),
        )
    }

    fn fast_path(&self, plan: &FastPathPlan, dir: &Path) -> anyhow::Result<Outcome> {
        let estimate = plan.estimate(&self.reference)?;
        let mut files = vec![write_export(dir, &plan.budget_file_name(), &plan.budget_csv(&self.reference)?)?];
        if plan.needs_resource_assignment {
            files.push(write_export(dir, &plan.assignment_file_name(), &plan.assignment_csv()?)?);
        }
        Outcome::new(
            format!("{}\n{}", estimate_text(&estimate), written(&files)),
            json!({ "estimate": estimate, "files": files }),
        )
    }

    fn full_path(&self, plan: &FullPathPlan, dir: &Path) -> anyhow::Result<Outcome> {
        let estimate = plan.estimate(&self.reference)?;
        let weeks = plan.weekly_allocations()?;
        let file = write_export(dir, &plan.file_name(), &plan.csv()?)?;
        Outcome::new(
            format!(
                "{}\n{} weekly allocations of {}h\n{}",
                estimate_text(&estimate),
                weeks.len(),
                format_number(plan.total_weekly_hours()),
                written(&[file.clone()])
            ),
            json!({ "estimate": estimate, "weeks": weeks, "files": [file] }),
        )
    }

    fn sheet(&self, file: Option<&Path>, historical: Option<&str>) -> anyhow::Result<Outcome> {
        let mut sheet = file.map(load_budget_sheet).unwrap_or_else(BudgetSheet::mock);
        if let Some(sample_id) = historical {
            let sample = historical_samples()
                .into_iter()
                .find(|s| s.sample_id == sample_id)
                .ok_or_else(|| PswError::not_found("HistoricalSample", "sampleId", sample_id))?;
            sheet = fill_with_historical(&sheet, &sample.rows);
        }

        let mut text = format!("{}\n", sheet.template_name);
        writeln!(text, "{:<16}{:>12}{:>12}  Comments", "Cost type", "Year 1", "Year 2")?;
        for row in &sheet.rows {
            writeln!(
                text,
                "{:<16}{:>12}{:>12}  {}",
                row.cost_type,
                format_currency(row.year1),
                format_currency(row.year2),
                row.comments
            )?;
        }
        write!(
            text,
            "{:<16}{:>12}{:>12}",
            "Total",
            format_currency(sheet.totals.year1),
            format_currency(sheet.totals.year2)
        )?;
        Outcome::new(text, &sheet)
    }
}

fn validation_text(label: &str, result: &ValidationResult) -> String {
    if result.errors.is_empty() {
        return format!("{}: valid", label);
    }
    let mut text = format!(
        "{}: {} ({} errors, {} warnings)",
        label,
        if result.is_valid { "valid" } else { "invalid" },
        result.error_count(),
        result.warning_count()
    );
    for issue in &result.errors {
        let kind = if issue.is_error() { "error" } else { "warning" };
        let _ = write!(text, "\n  {:<8}{}: {}", kind, issue.field, issue.message);
    }
    text
}

fn estimate_text(estimate: &BudgetEstimate) -> String {
    let mut text = format!("{} ({} weeks)\n", estimate.project_name, estimate.engagement_length);
    for item in &estimate.line_items {
        let _ = writeln!(
            text,
            "  {} x {} at {}h/week: {}h, {}",
            item.count,
            item.resource_level,
            format_number(item.hours_per_week),
            format_number(item.hours),
            format_currency(item.revenue)
        );
    }
    let _ = write!(
        text,
        "Total {}h, revenue {}, cost {}, margin {} ({:.1}%)",
        format_number(estimate.total_hours),
        format_currency(estimate.total_revenue),
        format_currency(estimate.total_cost),
        format_currency(estimate.total_gross_margin),
        estimate.gross_margin_percent
    );
    text
}

fn written(files: &[PathBuf]) -> String {
    files
        .iter()
        .map(|f| format!("Wrote {}", f.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use psw_assistant::agent::{ResourceLevel, UNAVAILABLE_MESSAGE};
    use psw_models::ProjectStatus;
    use std::fs;
    use tempfile::TempDir;

    fn app() -> (TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.export.output_dir = dir.path().join("out").display().to_string();
        let app = App::new(config, dir.path().join("project.json"));
        (dir, app)
    }

    fn psw_error(err: &anyhow::Error) -> &PswError {
        err.downcast_ref::<PswError>().unwrap()
    }

    #[tokio::test]
    async fn test_wizard_through_submit_and_export() {
        let (_dir, app) = app();

        app.run(Command::New { force: false }).await.unwrap();
        let again = app.run(Command::New { force: false }).await.unwrap_err();
        assert_eq!(psw_error(&again).exit_code(), 4);

        let lookup = app
            .run(Command::Lookup {
                sap_project_id: "0001251396026".into(),
            })
            .await
            .unwrap();
        assert!(lookup.text.starts_with("Acme Corporation (C10045)"));

        app.run(Command::Set {
            fields: r#"{"industryId":"20","budgetTemplateId":"assur-standard"}"#.into(),
        })
        .await
        .unwrap();

        let step1 = app.run(Command::Validate { step: Some(1) }).await.unwrap();
        assert!(step1.success, "{}", step1.text);

        let hours = app
            .run(Command::Hours {
                work_package: "wp-1".into(),
                role: "T004".into(),
                hours: 40,
                work_item: None,
            })
            .await
            .unwrap();
        assert_eq!(hours.data["totalHours"], 40);
        assert_eq!(hours.data["estimatedBillings"], 23_200.0);

        let metrics = app.run(Command::Metrics).await.unwrap();
        assert!(metrics.text.contains("$23,200"));

        let export = app
            .run(Command::Export {
                kind: ExportKind::Budget,
                out: None,
            })
            .await
            .unwrap();
        let path = PathBuf::from(export.data["path"].as_str().unwrap());
        let csv = fs::read_to_string(&path).unwrap();
        assert_eq!(csv.lines().count(), 2);

        let submitted = app.run(Command::Submit).await.unwrap();
        let project = load_project(&app.project_path).unwrap();
        if submitted.success {
            assert_eq!(project.status, ProjectStatus::Submitted);
        } else {
            assert_eq!(project.status, ProjectStatus::Draft);
        }
    }

    #[tokio::test]
    async fn test_commands_need_a_document() {
        let (_dir, app) = app();
        let err = app.run(Command::Metrics).await.unwrap_err();
        assert_eq!(psw_error(&err).exit_code(), 3);
    }

    #[tokio::test]
    async fn test_unknown_role_and_bad_fields() {
        let (_dir, app) = app();
        app.run(Command::New { force: false }).await.unwrap();

        let err = app
            .run(Command::Hours {
                work_package: "wp-1".into(),
                role: "T999".into(),
                hours: 8,
                work_item: None,
            })
            .await
            .unwrap_err();
        assert_eq!(psw_error(&err).exit_code(), 3);

        let err = app
            .run(Command::Set {
                fields: r#"{"notAField":"x"}"#.into(),
            })
            .await
            .unwrap_err();
        assert_eq!(psw_error(&err).exit_code(), 4);
    }

    #[tokio::test]
    async fn test_blank_project_fails_validation() {
        let (_dir, app) = app();
        app.run(Command::New { force: false }).await.unwrap();

        let outcome = app.run(Command::Validate { step: Some(1) }).await.unwrap();
        assert!(!outcome.success);
        assert!(outcome.text.contains("invalid"));

        let progress = app.run(Command::Progress { step: 1 }).await.unwrap();
        assert!(progress.text.contains("[ ] SAP Project Number"));
        assert!(progress.data["nextAction"].is_string());
    }

    #[tokio::test]
    async fn test_suggest_and_agent_without_ai() {
        let (_dir, app) = app();
        app.run(Command::New { force: false }).await.unwrap();

        let suggest = app.run(Command::Suggest { step: 1, apply: true }).await.unwrap();
        assert_eq!(suggest.data["available"], false);

        let ask = app
            .run(Command::Ask {
                message: "Which industry fits?".into(),
                step: 2,
                apply: true,
            })
            .await
            .unwrap();
        assert_eq!(ask.data["available"], false);
        assert!(ask.text.starts_with("Now let's work on the budget."));

        let agent = app
            .run(Command::Agent {
                message: "2 managers for 6 weeks".into(),
            })
            .await
            .unwrap();
        assert_eq!(agent.data["reply"], UNAVAILABLE_MESSAGE);
        assert_eq!(agent.data["estimate"]["totalHours"], 480.0);
        assert_eq!(agent.data["path"], "full");
    }

    #[tokio::test]
    async fn test_fast_and_full_path_write_files() {
        let (dir, app) = app();
        let out = dir.path().join("agent");

        let fast = app
            .run(Command::FastPath {
                name: "Q3 Tax Review".into(),
                weeks: 2,
                level: ResourceLevel::Manager,
                hours: 30.0,
                assign: true,
                out: Some(out.clone()),
            })
            .await
            .unwrap();
        assert_eq!(fast.data["files"].as_array().unwrap().len(), 2);
        assert!(out.join("Q3_Tax_Review_RM_Assignment.csv").exists());

        let full = app
            .run(Command::FullPath {
                name: "Harbor Audit".into(),
                weeks: 6,
                start: chrono::NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
                resources: vec!["Manager:1:20".parse().unwrap(), "Staff:2:40".parse().unwrap()],
                out: Some(out.clone()),
            })
            .await
            .unwrap();
        assert_eq!(full.data["estimate"]["totalHours"], 600.0);
        assert_eq!(full.data["weeks"].as_array().unwrap().len(), 6);

        let too_long = app
            .run(Command::FastPath {
                name: "Long".into(),
                weeks: 6,
                level: ResourceLevel::Staff,
                hours: 40.0,
                assign: false,
                out: Some(out.clone()),
            })
            .await
            .unwrap_err();
        assert_eq!(psw_error(&too_long).exit_code(), 4);

        let endless = app
            .run(Command::FullPath {
                name: "Endless".into(),
                weeks: 4_000_000_000,
                start: chrono::NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
                resources: vec!["Staff".parse().unwrap()],
                out: Some(out),
            })
            .await
            .unwrap_err();
        assert_eq!(psw_error(&endless).exit_code(), 4);
    }

    #[tokio::test]
    async fn test_sheet_with_historical_fill() {
        let (_dir, app) = app();
        let outcome = app
            .run(Command::Sheet {
                file: None,
                historical: Some("hist-2022-budget".into()),
            })
            .await
            .unwrap();
        assert!(outcome.text.contains("Includes bonus pool"));

        let missing = app
            .run(Command::Sheet {
                file: None,
                historical: Some("nope".into()),
            })
            .await
            .unwrap_err();
        assert_eq!(psw_error(&missing).exit_code(), 3);
    }
}
