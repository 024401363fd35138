//! End-to-end tests over the public API: load a file, select sheets, resolve
//! per-sheet configuration, and validate the date columns — the full pipeline
//! short of writing output.

use std::collections::BTreeMap;
use std::fs;

use sheetsplit::{
    detect_format, load_file, resolve_sheet_configs, select_sheets, validate_date_column,
    LoadedFile, SheetConfigSet, Table, CSV_SHEET_NAME,
};

fn table(columns: &[&str], rows: &[&[Option<&str>]]) -> Table {
    Table::new(
        columns.iter().map(|c| c.to_string()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|v| v.map(str::to_string)).collect())
            .collect(),
    )
}

// ============================================================================
// CSV pipeline
// ============================================================================

#[test]
fn test_csv_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("transactions.csv");
    fs::write(
        &path,
        "Transaction Date,Amount\n01/15/2024,100\n02/20/2024,250\n12/31/2024,75\n",
    )
    .unwrap();

    let LoadedFile::Csv(table) = load_file(&path).unwrap() else {
        panic!("expected CSV");
    };

    let mut tables = BTreeMap::new();
    tables.insert(CSV_SHEET_NAME.to_string(), table);
    let selected = vec![CSV_SHEET_NAME.to_string()];

    let resolved = resolve_sheet_configs(
        &selected,
        Some(&tables),
        Some("Transaction Date"),
        None,
        None,
    )
    .unwrap();

    let config = &resolved[CSV_SHEET_NAME];
    assert_eq!(config.date_column, "Transaction Date");
    assert_eq!(config.date_format.as_deref(), Some("%m/%d/%Y"));

    validate_date_column(&tables[CSV_SHEET_NAME], &config.date_column).unwrap();
}

// ============================================================================
// Workbook pipeline
// ============================================================================

#[test]
fn test_workbook_pipeline_with_sheet_config() {
    let mut tables = BTreeMap::new();
    tables.insert(
        "Sales".to_string(),
        table(
            &["Transaction Date", "Amount"],
            &[
                &[Some("15/01/2024"), Some("100")],
                &[Some("20/02/2024"), Some("250")],
            ],
        ),
    );
    tables.insert(
        "Inventory".to_string(),
        table(
            &["Date", "Count"],
            &[&[Some("2024-01-15"), Some("7")], &[None, Some("3")]],
        ),
    );
    tables.insert(
        "Notes".to_string(),
        table(&["Text"], &[&[Some("remember the milk")]]),
    );

    let sheet_config = SheetConfigSet::from_json(
        r#"{
            "Sales": { "date_column": "Transaction Date" },
            "Notes": { "include": false }
        }"#,
    )
    .unwrap();

    let available: Vec<String> = tables.keys().cloned().collect();
    let selected = select_sheets(&available, None, None, Some(&sheet_config)).unwrap();
    assert_eq!(selected, vec!["Inventory".to_string(), "Sales".to_string()]);

    let resolved = resolve_sheet_configs(
        &selected,
        Some(&tables),
        Some("Date"),
        None,
        Some(&sheet_config),
    )
    .unwrap();

    // Sales uses its configured column; the day-first format is detected.
    assert_eq!(resolved["Sales"].date_column, "Transaction Date");
    assert_eq!(resolved["Sales"].date_format.as_deref(), Some("%d/%m/%Y"));

    // Inventory falls back to the global column; ISO is detected and the
    // null row is ignored.
    assert_eq!(resolved["Inventory"].date_column, "Date");
    assert_eq!(resolved["Inventory"].date_format.as_deref(), Some("%Y-%m-%d"));

    for sheet in &selected {
        validate_date_column(&tables[sheet], &resolved[sheet].date_column).unwrap();
    }
}

#[test]
fn test_workbook_pipeline_mixed_formats_fail_loudly() {
    let mut tables = BTreeMap::new();
    tables.insert(
        "Sales".to_string(),
        table(
            &["Date"],
            &[&[Some("2024-01-15")], &[Some("20/02/2024")]],
        ),
    );

    let selected = vec!["Sales".to_string()];
    let err = resolve_sheet_configs(&selected, Some(&tables), Some("Date"), None, None)
        .unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("'Sales'"));
    assert!(msg.contains("'%Y-%m-%d'"));
    assert!(msg.contains("20/02/2024"));
    assert!(msg.contains("--date-format"));
}

// ============================================================================
// Detection over loaded data
// ============================================================================

#[test]
fn test_detection_runs_on_loaded_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.csv");
    fs::write(
        &path,
        "When,What\n2024-01-15 10:30:45,start\n2024-06-01 08:00:00,stop\n",
    )
    .unwrap();

    let LoadedFile::Csv(table) = load_file(&path).unwrap() else {
        panic!("expected CSV");
    };
    assert_eq!(
        detect_format(&table, "When").unwrap(),
        Some("%Y-%m-%d %H:%M:%S".to_string())
    );
}
