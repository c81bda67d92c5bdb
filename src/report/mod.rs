//! Taskwarrior reports: the data a table surface is built from
//!
//! A report is a list of labelled columns and one row per task. Every row
//! keeps the task UUID separately from the visible attributes so an edited
//! cell can always be traced back to the task it came from.

pub mod parse;
pub mod source;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use parse::{classify_column, parse_report};
pub use source::{ReportSource, StaticSource, TaskwarriorSource};

/// How the values of a column are treated in the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// Free text, editable in place. Dates are shown as taskwarrior
    /// formats them and count as text too.
    String,
    /// Computed or identifying attributes
    ReadOnly,
}

impl ColumnType {
    /// Structural marker attached to every cell of this column
    pub fn class(&self) -> &'static str {
        match self {
            ColumnType::String => "str",
            ColumnType::ReadOnly => "ro",
        }
    }
}

/// A single task line of a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub uuid: String,
    pub attributes: Vec<String>,
}

/// A parsed report, ready to become a table surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub labels: Vec<String>,
    pub column_types: Vec<ColumnType>,
    pub rows: Vec<ReportRow>,
}

impl Report {
    /// Create an empty report for the given report name
    pub fn empty(name: &str) -> Self {
        Self {
            title: report_title(name),
            labels: Vec::new(),
            column_types: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn column_count(&self) -> usize {
        self.labels.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Title shown above a report table
pub fn report_title(name: &str) -> String {
    format!("{} report", name)
}

/// Errors raised while obtaining or parsing a report
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to run task: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("task invocation with args {args:?} failed with code {code:?}: {stderr}")]
    CommandFailed {
        args: Vec<String>,
        code: Option<i32>,
        stderr: String,
    },

    #[error("unexpected output for {0}")]
    UnexpectedOutput(String),

    #[error("report defines {columns} columns but {labels} labels")]
    LabelMismatch { columns: usize, labels: usize },

    #[error("unknown column label {0}")]
    UnknownLabel(String),

    #[error("unknown report {0}")]
    UnknownReport(String),
}
