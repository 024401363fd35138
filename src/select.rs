//! Sheet selection.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::config::SheetConfigSet;
use crate::error::SelectionError;

/// Compute the final, sorted list of sheets to process.
///
/// Starts from all available sheets, then applies the include filter
/// (intersection), the exclude filter (difference), and the sheet
/// configuration's include flags; sheets absent from the configuration are
/// kept. The filters compose freely — restricting the user to one of them at
/// a time is the CLI's policy, not this function's.
pub fn select_sheets(
    available: &[String],
    include: Option<&[String]>,
    exclude: Option<&[String]>,
    sheet_config: Option<&SheetConfigSet>,
) -> Result<Vec<String>, SelectionError> {
    debug!("selecting from {} available sheets", available.len());
    let mut selected: BTreeSet<&str> = available.iter().map(String::as_str).collect();

    if let Some(include) = include {
        validate_names(include, available, "include")?;
        let include: BTreeSet<&str> = include.iter().map(String::as_str).collect();
        selected = selected.intersection(&include).copied().collect();
        debug!("applied include filter: {} sheets remaining", selected.len());
    }

    if let Some(exclude) = exclude {
        validate_names(exclude, available, "exclude")?;
        for name in exclude {
            selected.remove(name.as_str());
        }
        debug!("applied exclude filter: {} sheets remaining", selected.len());
    }

    if let Some(config) = sheet_config {
        // A sheet absent from the config is included by default.
        selected.retain(|name| config.get(name).map_or(true, |entry| entry.include));
        debug!("applied config filter: {} sheets remaining", selected.len());
    }

    if selected.is_empty() {
        return Err(SelectionError::NoSheetsSelected);
    }

    let sheets: Vec<String> = selected.into_iter().map(str::to_string).collect();
    info!("selected {} sheets for processing: {:?}", sheets.len(), sheets);
    Ok(sheets)
}

/// Every name in a filter list must name an available sheet.
fn validate_names(
    names: &[String],
    available: &[String],
    filter: &'static str,
) -> Result<(), SelectionError> {
    let invalid: Vec<String> = names
        .iter()
        .filter(|name| !available.contains(name))
        .cloned()
        .collect();

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(SelectionError::UnknownSheets {
            filter,
            invalid,
            available: available.to_vec(),
        })
    }
}
