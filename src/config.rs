//! Sheet configuration documents.
//!
//! A sheet configuration file is a JSON object mapping sheet names to
//! per-sheet settings:
//!
//! ```json
//! {
//!   "Sales": { "date_column": "Transaction Date", "date_format": "%d/%m/%Y" },
//!   "Notes": { "include": false }
//! }
//! ```
//!
//! Documents are validated structurally after parsing; every violation is
//! reported at once with the path to the offending field.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::{ConfigError, FieldViolation};

/// Per-sheet settings, from the configuration file or synthesized from
/// global CLI arguments. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SheetConfig {
    /// Name of the column holding date values.
    #[serde(default)]
    pub date_column: Option<String>,
    /// strftime-style date format; must contain at least one `%` directive.
    #[serde(default)]
    pub date_format: Option<String>,
    /// Whether the sheet participates in processing.
    #[serde(default = "default_include")]
    pub include: bool,
}

fn default_include() -> bool {
    true
}

impl Default for SheetConfig {
    fn default() -> Self {
        SheetConfig {
            date_column: None,
            date_format: None,
            include: true,
        }
    }
}

/// A full sheet configuration document: sheet name to settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SheetConfigSet(BTreeMap<String, SheetConfig>);

impl SheetConfigSet {
    /// Load and validate a configuration document from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        info!("loading sheet configuration: {}", path.display());
        let text = fs::read_to_string(path)?;
        let set = Self::from_json(&text)?;
        info!("loaded configuration for {} sheets", set.len());
        Ok(set)
    }

    /// Parse and validate a configuration document from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let mut set: SheetConfigSet = serde_json::from_str(text)?;
        set.normalize();
        set.validate()?;
        Ok(set)
    }

    /// Settings for a sheet, if the document mentions it.
    pub fn get(&self, sheet: &str) -> Option<&SheetConfig> {
        self.0.get(sheet)
    }

    /// True when the document mentions the sheet.
    pub fn contains(&self, sheet: &str) -> bool {
        self.0.contains_key(sheet)
    }

    /// Number of configured sheets.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no sheets are configured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Configured sheet names, in sorted order.
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Sheet name and settings pairs, in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SheetConfig)> {
        self.0.iter().map(|(name, config)| (name.as_str(), config))
    }

    /// Trim the string-valued fields, mirroring what the schema accepts.
    fn normalize(&mut self) {
        for config in self.0.values_mut() {
            if let Some(column) = &mut config.date_column {
                *column = column.trim().to_string();
            }
            if let Some(format) = &mut config.date_format {
                *format = format.trim().to_string();
            }
        }
    }

    /// Structural validation of the whole document. Collects every violation
    /// rather than stopping at the first.
    fn validate(&self) -> Result<(), ConfigError> {
        let mut violations = Vec::new();

        if self.0.is_empty() {
            violations.push(FieldViolation {
                path: "<root>".to_string(),
                message: "sheet configuration cannot be empty".to_string(),
            });
        } else if !self.0.values().any(|config| config.include) {
            violations.push(FieldViolation {
                path: "<root>".to_string(),
                message: "at least one sheet must be included \
                          (have 'include': true or omit the 'include' field)"
                    .to_string(),
            });
        }

        for (name, config) in &self.0 {
            if name.trim().is_empty() {
                violations.push(FieldViolation {
                    path: "<root>".to_string(),
                    message: "sheet names cannot be empty or whitespace only".to_string(),
                });
            }
            if let Some(column) = &config.date_column {
                if column.is_empty() {
                    violations.push(FieldViolation {
                        path: format!("{name}.date_column"),
                        message: "date column name cannot be empty or whitespace only"
                            .to_string(),
                    });
                }
            }
            if let Some(format) = &config.date_format {
                if format.is_empty() {
                    violations.push(FieldViolation {
                        path: format!("{name}.date_format"),
                        message: "date format cannot be empty or whitespace only".to_string(),
                    });
                } else if !format.contains('%') {
                    violations.push(FieldViolation {
                        path: format!("{name}.date_format"),
                        message: "date format must contain format directives (e.g. %Y, %m, %d)"
                            .to_string(),
                    });
                }
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::InvalidConfig(violations))
        }
    }
}
