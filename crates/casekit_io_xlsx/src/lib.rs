//! `casekit_io_xlsx` v1:
//! Rust-side test-case spreadsheet export kernel.
//!
//! Architecture mirrors the Python `export/xlsx` modules:
//! - `conf`   : canonical schemas, constants, default presets
//! - `spec`   : models/options/errors
//! - `table`  : record shaping into fixed-schema tables
//! - `util`   : pure helper functions
//! - `writer` : workbook writer kernel
//! - `export` : caller-facing export operations
pub mod conf;
pub mod export;
pub mod spec;
pub mod table;
pub mod util;
pub mod writer;

pub use conf::{
    C_SHEET_NAME_TESTCASES, C_SHEET_NAME_VALIDATION, N_LEN_EXCEL_SHEET_NAME_MAX, TUP_COLS_SCORE,
    TUP_COLS_SCORE_SHEET, TUP_COLS_TESTCASE,
};
pub use export::{export_testcases, export_testcases_with_scores, export_validated_testcases};
pub use spec::{
    EnumCellValue, ExportError, SpecCellFormat, SpecColumnSeries, SpecExportOptions,
    SpecSheetTable, SpecValidatedRecord, TypeRecord,
};
pub use table::{plan_merged_table, plan_score_table, plan_testcase_table};
pub use util::{
    calculate_column_width, derive_timestamp_token, plan_output_path, sanitize_sheet_name,
};
pub use writer::XlsxTableWriter;
