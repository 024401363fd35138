//! sheetsplit - split spreadsheet data into date-ranged files.
//!
//! The core of this crate is the configuration-resolution and
//! date-format-detection subsystem: given a set of sheets (a CSV file is
//! treated as a single synthetic sheet), it determines for each sheet which
//! date column and date format to use, auto-detecting the format by sampling
//! the first value of the column and validating that every value conforms to
//! it. The surrounding pieces — the file loader, the sheet-config document,
//! and the CLI — are thin collaborators around that core.

pub mod config;
pub mod detect;
pub mod error;
pub mod loader;
pub mod resolve;
pub mod select;
pub mod table;

pub use config::{SheetConfig, SheetConfigSet};
pub use detect::{detect_format, format_patterns, FormatPattern};
pub use error::{
    ConfigError, DetectionError, Error, LoadError, Result, SelectionError,
};
pub use loader::{load_file, validate_date_column, LoadedFile, CSV_SHEET_NAME};
pub use resolve::{resolve_sheet_configs, ResolvedSheet};
pub use select::select_sheets;
pub use table::Table;
