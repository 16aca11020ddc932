//! Command line arguments

use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use psw_assistant::agent::ResourceLevel;

#[derive(Debug, Parser)]
#[command(name = "psw", version, about = "Project setup, budget and resource demand planning")]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Project document to read and update
    #[arg(short, long, global = true, default_value = "project.json")]
    pub project: PathBuf,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportKind {
    /// SAP budget upload
    Budget,
    /// Resource demand schedule
    Demand,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start a new draft project document
    New {
        /// Overwrite an existing document
        #[arg(long)]
        force: bool,
    },

    /// Fill client details from the SAP project directory
    Lookup { sap_project_id: String },

    /// Update project fields from a JSON object, e.g. '{"industryId":"20"}'
    Set { fields: String },

    /// Set the hours of one budget cell (0 removes it)
    Hours {
        work_package: String,
        role: String,
        hours: u32,
        #[arg(long)]
        work_item: Option<String>,
    },

    /// Budget, gross margin and demand figures
    Metrics,

    /// Validate one step, or the whole project
    Validate {
        #[arg(long)]
        step: Option<i64>,
    },

    /// Field completion for a step and what to do next
    Progress {
        #[arg(long, default_value_t = 1)]
        step: i64,
    },

    /// Ask the assistant for field suggestions
    Suggest {
        #[arg(long, default_value_t = 1)]
        step: i64,
        /// Write the suggestions into the project document
        #[arg(long)]
        apply: bool,
    },

    /// Ask the wizard assistant about a step of the project
    Ask {
        message: String,
        #[arg(long, default_value_t = 1)]
        step: i64,
        /// Accept any field values proposed in the reply
        #[arg(long)]
        apply: bool,
    },

    /// Submit the project if it passes validation
    Submit,

    /// Write an export file
    Export {
        #[arg(value_enum)]
        kind: ExportKind,
        /// Output directory, defaults to the configured export directory
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Describe an engagement to the budgeting agent
    Agent { message: String },

    /// Single-level budget for an engagement of up to four weeks
    FastPath {
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 1)]
        weeks: u32,
        #[arg(long, default_value = "Staff")]
        level: ResourceLevel,
        /// Total hours over the engagement
        #[arg(long, default_value_t = 40.0)]
        hours: f64,
        /// Also write a resource manager assignment request
        #[arg(long)]
        assign: bool,
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Weekly team schedule for a longer engagement
    FullPath {
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 5)]
        weeks: u32,
        /// First week's start date (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,
        /// LEVEL:COUNT:HOURS_PER_WEEK, repeatable
        #[arg(long = "resource", required = true)]
        resources: Vec<ResourceSpec>,
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Read a budget sheet and optionally fill it from a past budget
    Sheet {
        file: Option<PathBuf>,
        /// Historical sample id to merge in
        #[arg(long)]
        historical: Option<String>,
    },
}

/// `Manager:2:40`; count and hours default to 1 and 40
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSpec {
    pub level: ResourceLevel,
    pub count: u32,
    pub hours_per_week: f64,
}

impl FromStr for ResourceSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let level = parts.next().unwrap_or_default().parse::<ResourceLevel>()?;
        let count = match parts.next() {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| format!("invalid count '{}'", raw))?,
            None => 1,
        };
        let hours_per_week = match parts.next() {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| format!("invalid hours '{}'", raw))?,
            None => 40.0,
        };
        if parts.next().is_some() {
            return Err(format!("expected LEVEL:COUNT:HOURS, got '{}'", s));
        }
        Ok(Self {
            level,
            count,
            hours_per_week,
        })
    }
}
