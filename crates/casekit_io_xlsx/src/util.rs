//! Stateless helpers: column widths, sheet names, timestamps, output paths.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::conf::{
    C_FMT_TIMESTAMP, F_WIDTH_CELL_MAX, F_WIDTH_CELL_MIN, F_WIDTH_FACTOR_BODY,
    F_WIDTH_FACTOR_HEADER, N_LEN_EXCEL_SHEET_NAME_MAX, TUP_EXCEL_ILLEGAL,
};
use crate::spec::{EnumCellValue, ExportError};

////////////////////////////////////////////////////////////////////////////////
// #region ColumnWidths

/// Estimate displayed width units for a string (non-ASCII glyphs run wide).
pub fn estimate_display_width(text: &str) -> usize {
    text.chars()
        .map(|chr| if chr.is_ascii() { 1 } else { 2 })
        .sum()
}

/// Displayed length of one normalized cell value.
pub fn estimate_cell_width(value: &EnumCellValue) -> usize {
    match value {
        EnumCellValue::None => 0,
        EnumCellValue::String(val) => estimate_display_width(val),
        EnumCellValue::Number(val) => {
            if val.fract() == 0.0 && val.is_finite() {
                format!("{val:.0}").len()
            } else {
                val.to_string().len()
            }
        }
        EnumCellValue::Boolean(val) => {
            // Excel renders TRUE / FALSE
            if *val { 4 } else { 5 }
        }
    }
}

/// Plan one column's width from header text and body cells.
///
/// `max(header_len * 1.5, longest_value_len * 1.2)`, clamped to Excel's
/// `[1, 255]` width range. Cosmetic only; deterministic for a given input.
pub fn calculate_column_width(header: &str, cells: &[EnumCellValue]) -> f64 {
    let n_len_header = estimate_display_width(header);
    let n_len_body = cells.iter().map(estimate_cell_width).max().unwrap_or(0);
    let f_width = f64::max(
        n_len_header as f64 * F_WIDTH_FACTOR_HEADER,
        n_len_body as f64 * F_WIDTH_FACTOR_BODY,
    );
    f_width.clamp(F_WIDTH_CELL_MIN, F_WIDTH_CELL_MAX)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNames

/// Replace illegal characters and trim to a valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str) -> String {
    let c_replaced: String = name
        .chars()
        .map(|chr| {
            if TUP_EXCEL_ILLEGAL.contains(&chr) {
                '_'
            } else {
                chr
            }
        })
        .collect();

    let c_trimmed = c_replaced.trim();
    if c_trimmed.is_empty() {
        return "Sheet".to_string();
    }
    c_trimmed.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region OutputPaths

/// Format the sortable second-precision filename token for `moment`.
pub fn derive_timestamp_token(moment: &NaiveDateTime) -> String {
    moment.format(C_FMT_TIMESTAMP).to_string()
}

/// Plan `<dir_output>/<stem>_<token>.xlsx`.
///
/// Equal tokens plan equal paths, so two exports within the same second
/// target the same file and the later write wins.
pub fn plan_output_path(dir_output: &Path, stem: &str, token: &str) -> PathBuf {
    dir_output.join(format!("{stem}_{token}.xlsx"))
}

/// Create `dir_output` and any missing parents.
pub fn create_output_dir(dir_output: &Path) -> Result<(), ExportError> {
    fs::create_dir_all(dir_output).map_err(|e| ExportError::DirectoryCreationFailed {
        path: dir_output.to_path_buf(),
        message: e.to_string(),
    })
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
