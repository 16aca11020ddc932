//! Budget sheet ingestion and historical merge
//!
//! A budget sheet is a small cost-type by year table. Sheets are read from
//! CSV with loose header matching; anything unreadable falls back to the
//! built-in sample sheet so the caller always has something to show.

use std::path::Path;

use csv::ReaderBuilder;
use once_cell::sync::Lazy;
use psw_core::error::PswError;
use psw_core::result::PswResult;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

static COST_TYPE_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"cost|item|type").unwrap());
static YEAR1_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"year.?1|yr.?1|y1").unwrap());
static YEAR2_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"year.?2|yr.?2|y2").unwrap());
static COMMENTS_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"comment|notes").unwrap());

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostRow {
    pub cost_type: String,
    pub year1: f64,
    pub year2: f64,
    #[serde(default)]
    pub comments: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetTotals {
    pub year1: f64,
    pub year2: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSheet {
    pub template_name: String,
    pub rows: Vec<CostRow>,
    pub totals: SheetTotals,
}

/// Row from a past budget; only the present fields are applied in a merge
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalRow {
    pub cost_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalSample {
    pub sample_id: String,
    pub template_name: String,
    pub rows: Vec<HistoricalRow>,
}

fn cost_row(cost_type: &str, year1: f64, year2: f64, comments: &str) -> CostRow {
    CostRow {
        cost_type: cost_type.to_string(),
        year1,
        year2,
        comments: comments.to_string(),
    }
}

fn hist(cost_type: &str, year1: f64, year2: f64, comments: Option<&str>) -> HistoricalRow {
    HistoricalRow {
        cost_type: cost_type.to_string(),
        year1: Some(year1),
        year2: Some(year2),
        comments: comments.map(String::from),
    }
}

impl BudgetSheet {
    pub fn new(template_name: impl Into<String>, rows: Vec<CostRow>) -> Self {
        let mut sheet = Self {
            template_name: template_name.into(),
            rows,
            totals: SheetTotals::default(),
        };
        sheet.recompute_totals();
        sheet
    }

    /// Built-in sample sheet used when a real one cannot be read
    pub fn mock() -> Self {
        Self::new(
            "Standard Budget v2",
            vec![
                cost_row("Project Name", 0.0, 0.0, "Contoso Migration Project"),
                cost_row("Project Code", 0.0, 0.0, "0702208200025"),
                cost_row("Salaries", 120_000.0, 125_000.0, ""),
                cost_row("Contractors", 30_000.0, 20_000.0, ""),
                cost_row("Travel", 8_000.0, 5_000.0, ""),
            ],
        )
    }

    pub fn recompute_totals(&mut self) {
        self.totals = SheetTotals {
            year1: self.rows.iter().map(|r| r.year1).sum(),
            year2: self.rows.iter().map(|r| r.year2).sum(),
        };
    }

    pub fn row(&self, cost_type: &str) -> Option<&CostRow> {
        let key = cost_type.to_lowercase();
        self.rows.iter().find(|r| r.cost_type.to_lowercase() == key)
    }
}

/// Past budgets offered for auto-fill
pub fn historical_samples() -> Vec<HistoricalSample> {
    vec![
        HistoricalSample {
            sample_id: "hist-2023-std".into(),
            template_name: "Standard Budget v2".into(),
            rows: vec![
                hist("Salaries", 110_000.0, 115_000.0, None),
                hist("Contractors", 25_000.0, 22_000.0, None),
                hist("Travel", 7_000.0, 6_000.0, None),
            ],
        },
        HistoricalSample {
            sample_id: "hist-2022-budget".into(),
            template_name: "Budget".into(),
            rows: vec![
                hist("Salaries", 125_000.0, 130_000.0, Some("Includes bonus pool")),
                hist("Contractors", 40_000.0, 30_000.0, Some("Higher contractor usage")),
                hist("Travel", 5_000.0, 4_000.0, Some("")),
                hist("Software", 12_000.0, 8_000.0, Some("Licenses and tools")),
            ],
        },
        HistoricalSample {
            sample_id: "hist-psw-legacy".into(),
            template_name: "PSW2.6".into(),
            rows: vec![
                hist("Salaries", 100_000.0, 105_000.0, None),
                hist("Contractors", 20_000.0, 15_000.0, None),
                hist("Hardware", 15_000.0, 5_000.0, None),
            ],
        },
    ]
}

/// Lenient number parsing: `$1,200` reads as 1200, anything else as 0
fn parse_amount(raw: &str) -> f64 {
    raw.trim()
        .trim_start_matches('$')
        .replace(',', "")
        .parse()
        .unwrap_or(0.0)
}

fn find_column(headers: &[String], pattern: &Regex) -> Option<usize> {
    headers.iter().position(|h| pattern.is_match(h))
}

/// Parse a budget sheet from CSV text
///
/// The first row is the header. Columns are matched case-insensitively;
/// unmatched cost type and year columns default to the first three columns.
pub fn read_budget_sheet_csv(data: &str, template_name: &str) -> PswResult<BudgetSheet> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| PswError::Import(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let cost_idx = find_column(&headers, &COST_TYPE_HEADER).unwrap_or(0);
    let year1_idx = find_column(&headers, &YEAR1_HEADER).unwrap_or(1);
    let year2_idx = find_column(&headers, &YEAR2_HEADER).unwrap_or(2);
    let comments_idx = find_column(&headers, &COMMENTS_HEADER);
    debug!(cost_idx, year1_idx, year2_idx, ?comments_idx, "Guessed budget sheet columns");

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| PswError::Import(e.to_string()))?;
        let cost_type = record.get(cost_idx).unwrap_or("").trim();
        if cost_type.is_empty() {
            continue;
        }
        rows.push(CostRow {
            cost_type: cost_type.to_string(),
            year1: parse_amount(record.get(year1_idx).unwrap_or("")),
            year2: parse_amount(record.get(year2_idx).unwrap_or("")),
            comments: comments_idx
                .and_then(|i| record.get(i))
                .unwrap_or("")
                .to_string(),
        });
    }

    Ok(BudgetSheet::new(template_name, rows))
}

/// Read a budget sheet file, falling back to [`BudgetSheet::mock`] on failure
pub fn load_budget_sheet(path: &Path) -> BudgetSheet {
    let template_name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Budget")
        .to_string();

    let parsed = std::fs::read_to_string(path)
        .map_err(|e| PswError::Import(e.to_string()))
        .and_then(|data| read_budget_sheet_csv(&data, &template_name));

    match parsed {
        Ok(sheet) => sheet,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Budget sheet unreadable, using sample sheet");
            BudgetSheet::mock()
        }
    }
}

/// Apply historical values onto a template sheet
///
/// Rows match on case-insensitive cost type. Matching rows keep their
/// position and take only the fields the historical row carries; historical
/// rows with no match are appended.
pub fn fill_with_historical(template: &BudgetSheet, historical: &[HistoricalRow]) -> BudgetSheet {
    let mut merged = template.clone();

    for row in merged.rows.iter_mut() {
        let key = row.cost_type.to_lowercase();
        // last one wins when the historical set repeats a cost type
        if let Some(h) = historical
            .iter()
            .rev()
            .find(|h| h.cost_type.to_lowercase() == key)
        {
            if let Some(y1) = h.year1 {
                row.year1 = y1;
            }
            if let Some(y2) = h.year2 {
                row.year2 = y2;
            }
            if let Some(ref comments) = h.comments {
                row.comments = comments.clone();
            }
        }
    }

    for h in historical {
        if h.cost_type.is_empty() {
            continue;
        }
        let key = h.cost_type.to_lowercase();
        if template.rows.iter().any(|r| r.cost_type.to_lowercase() == key) {
            continue;
        }
        merged.rows.push(CostRow {
            cost_type: h.cost_type.clone(),
            year1: h.year1.unwrap_or(0.0),
            year2: h.year2.unwrap_or(0.0),
            comments: h.comments.clone().unwrap_or_default(),
        });
    }

    merged.recompute_totals();
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mock_sheet_totals() {
        let sheet = BudgetSheet::mock();
        assert_eq!(sheet.totals.year1, 158_000.0);
        assert_eq!(sheet.totals.year2, 150_000.0);
    }

    #[test]
    fn test_read_csv_guesses_columns() {
        let data = "Notes,Cost Type,Yr 2,Year 1\n\
                    first,Salaries,\"$125,000\",120000\n\
                    ,,5,5\n\
                    ,Travel,oops,8000\n";
        let sheet = read_budget_sheet_csv(data, "Budget").unwrap();

        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0], cost_row("Salaries", 120_000.0, 125_000.0, "first"));
        assert_eq!(sheet.rows[1].year2, 0.0);
        assert_eq!(sheet.totals.year1, 128_000.0);
    }

    #[test]
    fn test_load_missing_file_falls_back_to_mock() {
        let dir = tempfile::tempdir().unwrap();
        let sheet = load_budget_sheet(&dir.path().join("nope.csv"));
        assert_eq!(sheet, BudgetSheet::mock());
    }

    #[test]
    fn test_load_uses_file_stem_as_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("PSW2.6.csv");
        std::fs::write(&path, "Cost Type,Year 1,Year 2\nSalaries,1,2\n").unwrap();
        let sheet = load_budget_sheet(&path);
        assert_eq!(sheet.template_name, "PSW2.6");
        assert_eq!(sheet.rows.len(), 1);
    }

    #[test]
    fn test_fill_with_historical_preserves_order_and_appends() {
        let template = BudgetSheet::mock();
        let samples = historical_samples();
        let merged = fill_with_historical(&template, &samples[1].rows);

        let order: Vec<&str> = merged.rows.iter().map(|r| r.cost_type.as_str()).collect();
        assert_eq!(
            order,
            vec!["Project Name", "Project Code", "Salaries", "Contractors", "Travel", "Software"]
        );

        let salaries = merged.row("salaries").unwrap();
        assert_eq!(salaries.year1, 125_000.0);
        assert_eq!(salaries.comments, "Includes bonus pool");
        assert_eq!(merged.row("Project Name").unwrap().comments, "Contoso Migration Project");

        assert_eq!(merged.totals.year1, 125_000.0 + 40_000.0 + 5_000.0 + 12_000.0);
    }

    #[test]
    fn test_fill_keeps_fields_history_lacks() {
        let template = BudgetSheet::new("T", vec![cost_row("Travel", 1.0, 2.0, "keep me")]);
        let historical = vec![HistoricalRow {
            cost_type: "TRAVEL".into(),
            year1: Some(10.0),
            ..Default::default()
        }];
        let merged = fill_with_historical(&template, &historical);
        assert_eq!(merged.rows, vec![cost_row("Travel", 10.0, 2.0, "keep me")]);
        assert_eq!(merged.totals.year1, 10.0);
    }
}
