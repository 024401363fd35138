//! Per-sheet configuration resolution.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::SheetConfigSet;
use crate::detect::detect_format;
use crate::error::ConfigError;
use crate::table::Table;

/// A fully resolved per-sheet configuration.
///
/// Unlike [`SheetConfig`](crate::config::SheetConfig), the date column is
/// guaranteed present. The format stays `None` when neither the caller nor
/// detection produced one; downstream date parsing must then apply its own
/// fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSheet {
    /// Name of the column holding date values.
    pub date_column: String,
    /// strftime-style date format, explicit or detected.
    pub date_format: Option<String>,
}

/// Resolve the final configuration for each sheet.
///
/// Precedence, lowest to highest: global CLI arguments, then per-sheet
/// configuration fields (field-by-field — an unset per-sheet field never
/// clears a global one), then format auto-detection when the format is still
/// unset and the sheet's data is available.
///
/// Fails with [`ConfigError::MissingDateColumn`] when no layer supplies a
/// date column, and wraps any detection failure with the sheet name.
/// Resolution is all-or-nothing: no partial map is returned on failure.
pub fn resolve_sheet_configs(
    sheet_names: &[String],
    tables: Option<&BTreeMap<String, Table>>,
    global_date_column: Option<&str>,
    global_date_format: Option<&str>,
    sheet_config: Option<&SheetConfigSet>,
) -> Result<BTreeMap<String, ResolvedSheet>, ConfigError> {
    let mut resolved = BTreeMap::new();

    for sheet in sheet_names {
        let mut date_column = global_date_column.map(str::to_string);
        let mut date_format = global_date_format.map(str::to_string);

        if let Some(entry) = sheet_config.and_then(|config| config.get(sheet)) {
            if let Some(column) = &entry.date_column {
                date_column = Some(column.clone());
            }
            if let Some(format) = &entry.date_format {
                date_format = Some(format.clone());
            }
        }

        let Some(date_column) = date_column else {
            return Err(ConfigError::MissingDateColumn {
                sheet: sheet.clone(),
            });
        };

        if date_format.is_none() {
            if let Some(table) = tables.and_then(|tables| tables.get(sheet)) {
                date_format = detect_format(table, &date_column).map_err(|source| {
                    ConfigError::Detection {
                        sheet: sheet.clone(),
                        source,
                    }
                })?;
            }
        }

        debug!(
            "resolved config for '{sheet}': date_column='{date_column}', \
             date_format={date_format:?}"
        );
        resolved.insert(
            sheet.clone(),
            ResolvedSheet {
                date_column,
                date_format,
            },
        );
    }

    Ok(resolved)
}
