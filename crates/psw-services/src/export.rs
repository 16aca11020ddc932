//! CSV uploads
//!
//! Two files leave the wizard from the review step: the SAP budget upload
//! (one row per budget line) and the ProFinda demand upload (one row per
//! resource demand, twelve week columns).

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use csv::{Reader, Writer};
use psw_core::config::{BudgetingConfig, SapAmountPolicy};
use psw_core::error::PswError;
use psw_core::result::PswResult;
use psw_core::types::format_number;
use psw_models::{BudgetLine, Project, ReferenceData, DEMAND_WEEKS};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const SAP_BUDGET_HEADER: [&str; 7] = [
    "ProjectID",
    "WorkPackageID",
    "ResourceType",
    "ActivityType/Role",
    "WorkItem",
    "Hours",
    "Amount",
];

fn export_error(e: impl Display) -> PswError {
    PswError::Export(e.to_string())
}

fn import_error(e: impl Display) -> PswError {
    PswError::Import(e.to_string())
}

fn into_string(writer: Writer<Vec<u8>>) -> PswResult<String> {
    let data = writer
        .into_inner()
        .map_err(|e| export_error(format!("CSV writer error: {}", e)))?;
    String::from_utf8(data).map_err(|e| export_error(format!("UTF-8 conversion error: {}", e)))
}

/// One row of the SAP budget upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SapBudgetRow {
    #[serde(rename = "ProjectID")]
    pub project_id: String,
    #[serde(rename = "WorkPackageID")]
    pub work_package_id: String,
    #[serde(rename = "ResourceType")]
    pub resource_type: String,
    #[serde(rename = "ActivityType/Role")]
    pub activity_type: String,
    #[serde(rename = "WorkItem")]
    pub work_item: String,
    #[serde(rename = "Hours")]
    pub hours: u32,
    #[serde(rename = "Amount")]
    pub amount: f64,
}

/// One row of the ProFinda demand upload
#[derive(Debug, Clone, PartialEq)]
pub struct DemandRow {
    pub project_id: String,
    pub request_type: String,
    pub email: String,
    pub employee_id: String,
    pub role: String,
    pub location: String,
    pub weeks: [f64; DEMAND_WEEKS as usize],
}

pub struct BudgetExporter<'a> {
    reference: &'a ReferenceData,
    config: &'a BudgetingConfig,
}

impl<'a> BudgetExporter<'a> {
    pub fn new(reference: &'a ReferenceData, config: &'a BudgetingConfig) -> Self {
        Self { reference, config }
    }

    /// Amount column for one line under the configured policy
    pub fn amount(&self, line: &BudgetLine) -> f64 {
        let hours = f64::from(line.hours);
        match self.config.sap_amount_policy {
            SapAmountPolicy::FlatRate => hours * self.config.sap_flat_rate,
            SapAmountPolicy::RoleRate => self
                .reference
                .role(&line.role_id)
                .map(|role| hours * line.billing_rate(role))
                .unwrap_or(0.0),
        }
    }

    pub fn sap_rows(&self, project: &Project) -> Vec<SapBudgetRow> {
        project
            .budget_lines
            .iter()
            .map(|line| SapBudgetRow {
                project_id: project.sap_project_id.clone(),
                work_package_id: line.work_package_id.clone(),
                resource_type: self.config.sap_resource_type.clone(),
                activity_type: line.role_id.clone(),
                work_item: line.work_item_id.clone().unwrap_or_default(),
                hours: line.hours,
                amount: self.amount(line),
            })
            .collect()
    }

    pub fn budget_csv(&self, project: &Project) -> PswResult<String> {
        let mut wtr = Writer::from_writer(vec![]);
        wtr.write_record(SAP_BUDGET_HEADER).map_err(export_error)?;

        for row in self.sap_rows(project) {
            wtr.write_record([
                row.project_id,
                row.work_package_id,
                row.resource_type,
                row.activity_type,
                row.work_item,
                row.hours.to_string(),
                format_number(row.amount),
            ])
            .map_err(export_error)?;
        }

        into_string(wtr)
    }
}

pub fn demand_rows(project: &Project) -> Vec<DemandRow> {
    project
        .resource_demands
        .iter()
        .map(|demand| DemandRow {
            project_id: project.sap_project_id.clone(),
            request_type: demand.request_type.to_string(),
            email: demand.employee_email.clone().unwrap_or_default(),
            employee_id: demand.employee_id.clone().unwrap_or_default(),
            role: demand.role_id.clone(),
            location: demand.location_id.clone(),
            weeks: demand.weekly_hours.dense(),
        })
        .collect()
}

fn demand_header() -> Vec<String> {
    let mut header: Vec<String> = ["ProjectID", "RequestType", "Email", "EmployeeID", "Role", "Location"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    header.extend((1..=DEMAND_WEEKS).map(|w| format!("Week{}", w)));
    header
}

pub fn demand_csv(project: &Project) -> PswResult<String> {
    let mut wtr = Writer::from_writer(vec![]);
    wtr.write_record(demand_header()).map_err(export_error)?;

    for row in demand_rows(project) {
        let mut record = vec![
            row.project_id,
            row.request_type,
            row.email,
            row.employee_id,
            row.role,
            row.location,
        ];
        record.extend(row.weeks.iter().map(|h| format_number(*h)));
        wtr.write_record(&record).map_err(export_error)?;
    }

    into_string(wtr)
}

/// Read an SAP budget upload back into typed rows
pub fn parse_sap_budget_csv(data: &str) -> PswResult<Vec<SapBudgetRow>> {
    let mut reader = Reader::from_reader(data.as_bytes());
    reader
        .deserialize()
        .collect::<Result<Vec<SapBudgetRow>, _>>()
        .map_err(import_error)
}

/// Read a ProFinda demand upload back into rows
pub fn parse_demand_csv(data: &str) -> PswResult<Vec<DemandRow>> {
    let mut reader = Reader::from_reader(data.as_bytes());
    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record.map_err(import_error)?;
        let field = |i: usize| record.get(i).unwrap_or_default().to_string();

        let mut weeks = [0.0; DEMAND_WEEKS as usize];
        for (i, slot) in weeks.iter_mut().enumerate() {
            let raw = record.get(6 + i).unwrap_or("0");
            *slot = raw
                .trim()
                .parse()
                .map_err(|_| import_error(format!("Invalid hours '{}' in Week{}", raw, i + 1)))?;
        }

        rows.push(DemandRow {
            project_id: field(0),
            request_type: field(1),
            email: field(2),
            employee_id: field(3),
            role: field(4),
            location: field(5),
            weeks,
        });
    }

    Ok(rows)
}

pub fn budget_file_name(project: &Project) -> String {
    format!("budget_upload_{}.csv", project.export_id())
}

pub fn demand_file_name(project: &Project) -> String {
    format!("demand_upload_{}.csv", project.export_id())
}

/// Write an export into `dir`, creating the directory if needed
pub fn write_export(dir: &Path, file_name: &str, contents: &str) -> PswResult<PathBuf> {
    fs::create_dir_all(dir).map_err(export_error)?;
    let path = dir.join(file_name);
    fs::write(&path, contents).map_err(export_error)?;
    info!(path = %path.display(), bytes = contents.len(), "Wrote export");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use psw_models::{
        BudgetLineKey, NewResourceDemand, RequestType, ResourceDemand, WeeklyHours,
    };

    fn project() -> Project {
        let mut project = Project::default();
        project.sap_project_id = "0001251396026".into();
        project
            .budget_lines
            .push(BudgetLine::new(BudgetLineKey::new("wp-1", None, "T004"), 40));
        project
            .budget_lines
            .push(BudgetLine::new(BudgetLineKey::new("wp-2", Some("wi-2-1"), "T007"), 12));
        project
            .budget_lines
            .push(BudgetLine::new(BudgetLineKey::new("wp-3", None, "T999"), 3));
        project
    }

    #[test]
    fn test_budget_csv_empty_has_header_only() {
        let reference = ReferenceData::standard();
        let config = BudgetingConfig::default();
        let csv = BudgetExporter::new(&reference, &config)
            .budget_csv(&Project::default())
            .unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0],
            "ProjectID,WorkPackageID,ResourceType,ActivityType/Role,WorkItem,Hours,Amount"
        );
    }

    #[test]
    fn test_budget_csv_flat_rate() {
        let reference = ReferenceData::standard();
        let config = BudgetingConfig::default();
        let csv = BudgetExporter::new(&reference, &config)
            .budget_csv(&project())
            .unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "0001251396026,wp-1,0ACT,T004,,40,23200");
        assert_eq!(lines[2], "0001251396026,wp-2,0ACT,T007,wi-2-1,12,6960");
    }

    #[test]
    fn test_budget_csv_round_trip_row_count_and_hours() {
        let reference = ReferenceData::standard();
        let config = BudgetingConfig::default();
        let project = project();
        let csv = BudgetExporter::new(&reference, &config)
            .budget_csv(&project)
            .unwrap();

        let rows = parse_sap_budget_csv(&csv).unwrap();
        assert_eq!(rows.len(), project.budget_lines.len());
        for (row, line) in rows.iter().zip(&project.budget_lines) {
            assert_eq!(row.hours, line.hours);
            assert_eq!(row.work_item, line.work_item_id.clone().unwrap_or_default());
        }
    }

    #[test]
    fn test_role_rate_policy() {
        let reference = ReferenceData::standard();
        let config = BudgetingConfig {
            sap_amount_policy: SapAmountPolicy::RoleRate,
            ..Default::default()
        };
        let exporter = BudgetExporter::new(&reference, &config);
        let mut project = project();
        project.budget_lines[0].rate_override = Some(600.0);

        let rows = exporter.sap_rows(&project);
        assert_eq!(rows[0].amount, 24_000.0);
        assert_eq!(rows[1].amount, 3_600.0);
        // unknown role
        assert_eq!(rows[2].amount, 0.0);
    }

    fn demand(weeks: &[(u8, f64)]) -> ResourceDemand {
        NewResourceDemand {
            request_type: RequestType::Named,
            employee_email: Some("jdoe@cr.com".into()),
            employee_id: Some("E100".into()),
            role_id: "T004".into(),
            location_id: "16".into(),
            weekly_hours: weeks.iter().copied().collect::<WeeklyHours>(),
            ..Default::default()
        }
        .into()
    }

    #[test]
    fn test_demand_csv_fills_missing_weeks_with_zero() {
        let mut project = Project::default();
        project.sap_project_id = "0002491434026".into();
        project.resource_demands.push(demand(&[(1, 40.0), (3, 20.0)]));

        let csv = demand_csv(&project).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("Week11,Week12"));
        assert_eq!(
            lines[1],
            "0002491434026,Named,jdoe@cr.com,E100,T004,16,40,0,20,0,0,0,0,0,0,0,0,0"
        );

        let rows = parse_demand_csv(&csv).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].weeks[0], 40.0);
        assert_eq!(rows[0].weeks[11], 0.0);
    }

    #[test]
    fn test_file_names_and_write() {
        let project = project();
        assert_eq!(budget_file_name(&project), "budget_upload_0001251396026.csv");
        assert_eq!(demand_file_name(&project), "demand_upload_0001251396026.csv");

        let dir = tempfile::tempdir().unwrap();
        let path = write_export(&dir.path().join("out"), "a.csv", "x\n").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "x\n");
    }

    #[test]
    fn test_parse_rejects_garbage_hours() {
        let csv = "ProjectID,WorkPackageID,ResourceType,ActivityType/Role,WorkItem,Hours,Amount\n\
                   1,wp-1,0ACT,T004,,forty,0\n";
        let err = parse_sap_budget_csv(csv).unwrap_err();
        assert_eq!(err.error_code(), "import_failed");
    }
}
