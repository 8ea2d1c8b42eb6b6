//! Canonical schemas, output-naming constants, and default format presets.

use crate::spec::SpecCellFormat;

/// Canonical test-case columns in output order.
pub const TUP_COLS_TESTCASE: [&str; 6] = [
    "Category1",
    "Category2",
    "Category3",
    "Description",
    "Platform",
    "Notes",
];

/// Canonical scoring columns in model order (used by the merged sheet).
pub const TUP_COLS_SCORE: [&str; 7] = [
    "Accuracy",
    "Completeness",
    "Clarity",
    "PlatformFit",
    "TotalScore",
    "ImprovementSuggestion",
    "Passed",
];

/// Scoring columns in the order the standalone validation sheet emits them.
pub const TUP_COLS_SCORE_SHEET: [&str; 7] = [
    "Accuracy",
    "Completeness",
    "Clarity",
    "PlatformFit",
    "TotalScore",
    "Passed",
    "ImprovementSuggestion",
];

/// Sheet holding exported test cases.
pub const C_SHEET_NAME_TESTCASES: &str = "TestCases";
/// Sheet holding validation results (merged or standalone).
pub const C_SHEET_NAME_VALIDATION: &str = "ValidationResults";

/// Filename stem for the plain test-case export.
pub const C_FILE_STEM_TESTCASES: &str = "testcases";
/// Filename stem for the merged validation export.
pub const C_FILE_STEM_VALIDATED: &str = "validated_testcases";
/// Filename stem for the two-sheet validation export.
pub const C_FILE_STEM_TESTCASES_VALIDATED: &str = "testcases_validated";

/// Default output location, joined onto the working directory.
pub const TUP_DIR_OUTPUT_DEFAULT: [&str; 2] = ["data", "output"];

/// Second-precision, lexically sortable filename timestamp token.
pub const C_FMT_TIMESTAMP: &str = "%Y%m%d_%H%M%S";

/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [char; 7] = ['*', ':', '?', '/', '\\', '[', ']'];

/// Width units granted per header character.
pub const F_WIDTH_FACTOR_HEADER: f64 = 1.5;
/// Width units granted per character of the longest body value.
pub const F_WIDTH_FACTOR_BODY: f64 = 1.2;
/// Lower bound for any planned column width.
pub const F_WIDTH_CELL_MIN: f64 = 1.0;
/// Excel's hard upper bound for a column width.
pub const F_WIDTH_CELL_MAX: f64 = 255.0;

fn derive_base_format() -> SpecCellFormat {
    SpecCellFormat {
        font_name: Some("Times New Roman".to_string()),
        font_size: Some(11),
        border: Some(1),
        align: Some("left".to_string()),
        valign: Some("vcenter".to_string()),
        ..Default::default()
    }
}

/// Default body-cell format used by [`crate::writer::XlsxTableWriter`].
pub fn derive_default_text_format() -> SpecCellFormat {
    derive_base_format()
}

/// Default header-row format used by [`crate::writer::XlsxTableWriter`].
pub fn derive_default_header_format() -> SpecCellFormat {
    derive_base_format().with_(SpecCellFormat {
        bold: Some(true),
        align: Some("center".to_string()),
        ..Default::default()
    })
}
