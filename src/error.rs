//! Error types for loading, sheet selection, format detection, and
//! configuration resolution.

use std::path::PathBuf;

use thiserror::Error;

/// A single mismatching value found during format consistency validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatMismatch {
    /// Zero-based row index of the value in the source table.
    pub row: usize,
    /// The offending value, as read (trimmed).
    pub value: String,
}

/// A single structural violation in a sheet configuration document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Path to the offending field, e.g. `Sales.date_format`.
    pub path: String,
    /// What is wrong with it.
    pub message: String,
}

/// Errors from sheet selection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectionError {
    #[error(
        "invalid sheet names in {filter} list: {}; available sheets: {}",
        .invalid.join(", "),
        .available.join(", ")
    )]
    UnknownSheets {
        filter: &'static str,
        invalid: Vec<String>,
        available: Vec<String>,
    },

    #[error(
        "no sheets selected for processing after applying filters; \
         check your include/exclude settings and sheet configuration"
    )]
    NoSheetsSelected,
}

/// Errors from date format detection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetectionError {
    #[error("date column '{column}' not found; available columns: {}", .available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    #[error("date column '{column}' contains no valid data for format detection")]
    NoValidData { column: String },

    #[error(
        "inconsistent date formats detected in column '{column}': detected format \
         '{detected}' from the first value, but found {total} values that don't match \
         this format:\n{}{}\nensure all dates in the column use the same format, or \
         provide an explicit format with --date-format",
        render_mismatches(.examples),
        if *.total > 5 { " (showing first 5)" } else { "" }
    )]
    InconsistentFormat {
        column: String,
        detected: String,
        /// Count of values failing the structural check across the whole column.
        total: usize,
        /// The earliest mismatches, at most five.
        examples: Vec<FormatMismatch>,
    },
}

/// Errors from sheet configuration loading and resolution.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "no date column specified for sheet '{sheet}'; \
         provide --date-column or configure it in the sheet config"
    )]
    MissingDateColumn { sheet: String },

    #[error("sheet '{sheet}': {source}")]
    Detection {
        sheet: String,
        #[source]
        source: DetectionError,
    },

    #[error("invalid sheet configuration:\n{}", render_violations(.0))]
    InvalidConfig(Vec<FieldViolation>),

    #[error("invalid JSON in sheet configuration file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("error reading sheet configuration file: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from loading input files into tables.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file format: '{0}' (expected .xlsx, .xls, or .csv)")]
    UnsupportedFormat(String),

    #[error("CSV file is empty or contains no data: {}", .0.display())]
    EmptyFile(PathBuf),

    #[error("workbook contains no sheets with data: {}", .0.display())]
    EmptyWorkbook(PathBuf),

    #[error("date column '{column}' not found; available columns: {}", .available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    #[error("date column '{column}' contains no valid data")]
    NoValidData { column: String },

    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse CSV file: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read workbook: {0}")]
    Excel(#[from] calamine::Error),
}

/// Any error the split pipeline can produce; what the CLI reports.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Detection(#[from] DetectionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Convenience alias for pipeline results.
pub type Result<T> = std::result::Result<T, Error>;

fn render_mismatches(examples: &[FormatMismatch]) -> String {
    examples
        .iter()
        .map(|m| format!("  row {}: '{}'", m.row, m.value))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("  {}: {}", v.path, v.message))
        .collect::<Vec<_>>()
        .join("\n")
}
