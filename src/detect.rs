//! Date format detection.
//!
//! The format of a column is inferred from its first non-null value: the
//! value is tested against a fixed, ordered catalog of format patterns, and
//! the first pattern that both matches structurally and parses strictly is
//! the detected format. Every other value in the column must then conform to
//! it; mixed-format columns are reported as errors with example rows.

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use crate::error::{DetectionError, FormatMismatch};
use crate::table::Table;

/// A candidate date format: a strftime-style directive string paired with a
/// regular expression describing the shape of matching values.
#[derive(Debug, Clone)]
pub struct FormatPattern {
    /// Format directive, e.g. `%Y-%m-%d`.
    pub format: &'static str,
    /// Structural pre-filter; a value must match before a parse is attempted.
    pub regex: Regex,
    /// Whether the format carries time-of-day directives.
    pub has_time: bool,
}

/// The format catalog, in priority order.
///
/// Several shapes are ambiguous — `03/04/2024` matches both `%d/%m/%Y` and
/// `%m/%d/%Y` structurally — and the catalog order is the documented
/// tie-break: day-first layouts are tried before US ones. Do not reorder.
static FORMAT_PATTERNS: Lazy<Vec<FormatPattern>> = Lazy::new(|| {
    let entries: &[(&str, &str, bool)] = &[
        // ISO layouts
        ("%Y-%m-%d", r"^\d{4}-\d{1,2}-\d{1,2}$", false),
        (
            "%Y-%m-%d %H:%M:%S",
            r"^\d{4}-\d{1,2}-\d{1,2} \d{1,2}:\d{2}:\d{2}$",
            true,
        ),
        ("%Y-%m-%d %H:%M", r"^\d{4}-\d{1,2}-\d{1,2} \d{1,2}:\d{2}$", true),
        // Day-first layouts
        ("%d/%m/%Y", r"^\d{1,2}/\d{1,2}/\d{4}$", false),
        ("%d/%m/%y", r"^\d{1,2}/\d{1,2}/\d{2}$", false),
        ("%d-%m-%Y", r"^\d{1,2}-\d{1,2}-\d{4}$", false),
        ("%d-%m-%y", r"^\d{1,2}-\d{1,2}-\d{2}$", false),
        ("%d.%m.%Y", r"^\d{1,2}\.\d{1,2}\.\d{4}$", false),
        ("%d.%m.%y", r"^\d{1,2}\.\d{1,2}\.\d{2}$", false),
        // US layouts
        ("%m/%d/%Y", r"^\d{1,2}/\d{1,2}/\d{4}$", false),
        ("%m/%d/%y", r"^\d{1,2}/\d{1,2}/\d{2}$", false),
        ("%m-%d-%Y", r"^\d{1,2}-\d{1,2}-\d{4}$", false),
        ("%m-%d-%y", r"^\d{1,2}-\d{1,2}-\d{2}$", false),
        // Other year-first layouts
        ("%Y/%m/%d", r"^\d{4}/\d{1,2}/\d{1,2}$", false),
        ("%Y.%m.%d", r"^\d{4}\.\d{1,2}\.\d{1,2}$", false),
        // Month-name layouts
        ("%B %d, %Y", r"^[A-Za-z]+ \d{1,2}, \d{4}$", false),
        ("%b %d, %Y", r"^[A-Za-z]+ \d{1,2}, \d{4}$", false),
        ("%d %B %Y", r"^\d{1,2} [A-Za-z]+ \d{4}$", false),
        ("%d %b %Y", r"^\d{1,2} [A-Za-z]+ \d{4}$", false),
    ];

    entries
        .iter()
        .map(|&(format, pattern, has_time)| FormatPattern {
            format,
            regex: Regex::new(pattern).expect("catalog regexes are valid"),
            has_time,
        })
        .collect()
});

/// The catalog of recognizable formats, in priority order.
pub fn format_patterns() -> &'static [FormatPattern] {
    &FORMAT_PATTERNS
}

/// Detect the date format used by `column` and validate that the whole
/// column conforms to it.
///
/// Returns `Ok(None)` when no catalog pattern matches the first value; the
/// caller must then obtain an explicit format from the user. Fails when the
/// column is missing, holds no non-null values, or mixes formats.
pub fn detect_format(table: &Table, column: &str) -> Result<Option<String>, DetectionError> {
    let index = table
        .column_index(column)
        .ok_or_else(|| DetectionError::MissingColumn {
            column: column.to_string(),
            available: table.columns().to_vec(),
        })?;

    let values: Vec<(usize, String)> = table
        .column_values(index)
        .map(|(row, value)| (row, value.trim().to_string()))
        .collect();
    if values.is_empty() {
        return Err(DetectionError::NoValidData {
            column: column.to_string(),
        });
    }

    let first = &values[0].1;
    let Some(pattern) = detect_from_value(first) else {
        warn!(
            "could not detect date format for column '{column}' from first value '{first}'; \
             consider providing an explicit format with --date-format or in the sheet config"
        );
        return Ok(None);
    };

    validate_consistency(&values, pattern, column)?;

    info!(
        "detected date format '{}' for column '{}' ({} values validated)",
        pattern.format,
        column,
        values.len()
    );
    Ok(Some(pattern.format.to_string()))
}

/// First catalog entry that matches `value` structurally and parses it.
fn detect_from_value(value: &str) -> Option<&'static FormatPattern> {
    FORMAT_PATTERNS
        .iter()
        .find(|pattern| pattern.regex.is_match(value) && parses(value, pattern))
}

/// True when `value` parses completely under the pattern's directive.
fn parses(value: &str, pattern: &FormatPattern) -> bool {
    if pattern.has_time {
        NaiveDateTime::parse_from_str(value, pattern.format).is_ok()
    } else {
        NaiveDate::parse_from_str(value, pattern.format).is_ok()
    }
}

/// Check every value against the detected pattern, collecting up to five of
/// the earliest mismatches for the error report.
fn validate_consistency(
    values: &[(usize, String)],
    pattern: &FormatPattern,
    column: &str,
) -> Result<(), DetectionError> {
    let mut examples = Vec::new();
    for (row, value) in values {
        if !pattern.regex.is_match(value) || !parses(value, pattern) {
            examples.push(FormatMismatch {
                row: *row,
                value: value.clone(),
            });
            if examples.len() >= 5 {
                break;
            }
        }
    }

    if examples.is_empty() {
        return Ok(());
    }

    // The reported total counts structural failures across the whole column;
    // parse-only failures past the example limit are not re-scanned.
    let total = values
        .iter()
        .filter(|(_, value)| !pattern.regex.is_match(value))
        .count();

    Err(DetectionError::InconsistentFormat {
        column: column.to_string(),
        detected: pattern.format.to_string(),
        total,
        examples,
    })
}
