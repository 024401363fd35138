//! Loading Excel workbooks and CSV files into [`Table`]s.

use std::collections::BTreeMap;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use tracing::{debug, info, warn};

use crate::error::LoadError;
use crate::table::Table;

/// Synthetic sheet name used when a CSV file is processed.
pub const CSV_SHEET_NAME: &str = "CSV";

/// The contents of a loaded input file.
#[derive(Debug, Clone)]
pub enum LoadedFile {
    /// A CSV file: one anonymous table.
    Csv(Table),
    /// A workbook: named sheets, empty ones already dropped.
    Workbook(BTreeMap<String, Table>),
}

/// Load a `.csv`, `.xlsx`, or `.xls` file. The extension decides the reader.
pub fn load_file(path: &Path) -> Result<LoadedFile, LoadError> {
    info!("loading file: {}", path.display());
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match extension.as_str() {
        "csv" => Ok(LoadedFile::Csv(load_csv(path)?)),
        "xlsx" | "xls" => Ok(LoadedFile::Workbook(load_workbook(path)?)),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }
}

/// Check that `column` exists in `table` and has at least one non-null value.
pub fn validate_date_column(table: &Table, column: &str) -> Result<(), LoadError> {
    let index = table
        .column_index(column)
        .ok_or_else(|| LoadError::MissingColumn {
            column: column.to_string(),
            available: table.columns().to_vec(),
        })?;

    let non_null = table.column_values(index).count();
    if non_null == 0 {
        return Err(LoadError::NoValidData {
            column: column.to_string(),
        });
    }

    debug!("date column '{column}' validated: {non_null} non-null values");
    Ok(())
}

fn load_csv(path: &Path) -> Result<Table, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row: Vec<Option<String>> = (0..columns.len())
            .map(|i| {
                record
                    .get(i)
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
                    .map(str::to_string)
            })
            .collect();

        // Fully blank rows carry no data.
        if row.iter().all(Option::is_none) {
            continue;
        }
        rows.push(row);
    }

    if columns.is_empty() || rows.is_empty() {
        return Err(LoadError::EmptyFile(path.to_path_buf()));
    }

    let table = Table::new(columns, rows);
    info!(
        "loaded CSV with {} rows and {} columns",
        table.row_count(),
        table.columns().len()
    );
    Ok(table)
}

fn load_workbook(path: &Path) -> Result<BTreeMap<String, Table>, LoadError> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_names = workbook.sheet_names();
    if sheet_names.is_empty() {
        return Err(LoadError::EmptyWorkbook(path.to_path_buf()));
    }

    let mut sheets = BTreeMap::new();
    for name in sheet_names {
        let range = workbook.worksheet_range(&name)?;
        match range_to_table(&range) {
            Some(table) => {
                debug!(
                    "sheet '{}': {} rows, {} columns",
                    name,
                    table.row_count(),
                    table.columns().len()
                );
                sheets.insert(name, table);
            }
            None => warn!("sheet '{name}' is empty and will be skipped"),
        }
    }

    if sheets.is_empty() {
        return Err(LoadError::EmptyWorkbook(path.to_path_buf()));
    }

    info!("loaded workbook with {} non-empty sheets", sheets.len());
    Ok(sheets)
}

/// Convert a worksheet range to a table: the first row becomes the header,
/// blank rows are dropped. Returns `None` for sheets without data rows.
fn range_to_table(range: &Range<Data>) -> Option<Table> {
    let mut row_iter = range.rows();
    let header = row_iter.next()?;
    let columns: Vec<String> = header
        .iter()
        .map(|cell| cell_to_string(cell).unwrap_or_default())
        .collect();

    let mut rows = Vec::new();
    for data_row in row_iter {
        let row: Vec<Option<String>> = (0..columns.len())
            .map(|i| data_row.get(i).and_then(cell_to_string))
            .collect();
        if row.iter().all(Option::is_none) {
            continue;
        }
        rows.push(row);
    }

    if columns.iter().all(String::is_empty) || rows.is_empty() {
        return None;
    }
    Some(Table::new(columns, rows))
}

/// Textual representation of a cell; `None` for empty or error cells.
fn cell_to_string(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => format!("{f}"),
        Data::Int(i) => format!("{i}"),
        Data::Bool(b) => format!("{b}"),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => format!("{}", dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_to_string_basic_types() {
        assert_eq!(cell_to_string(&Data::Empty), None);
        assert_eq!(
            cell_to_string(&Data::String("  Sales  ".to_string())),
            Some("Sales".to_string())
        );
        assert_eq!(cell_to_string(&Data::String("   ".to_string())), None);
        assert_eq!(cell_to_string(&Data::Int(42)), Some("42".to_string()));
        assert_eq!(cell_to_string(&Data::Float(1.5)), Some("1.5".to_string()));
        assert_eq!(cell_to_string(&Data::Bool(true)), Some("true".to_string()));
    }
}
