//! Workbook writer bound to one output file.

use std::collections::BTreeSet;
use std::path::PathBuf;

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};

use crate::conf::{
    N_LEN_EXCEL_SHEET_NAME_MAX, derive_default_header_format, derive_default_text_format,
};
use crate::spec::{EnumCellValue, ExportError, SpecCellFormat, SpecSheetTable};
use crate::util::{calculate_column_width, sanitize_sheet_name};

/// Stateful writer producing one `.xlsx` file from planned sheet tables.
///
/// The workbook is buffered in memory until [`Self::close`] is called.
pub struct XlsxTableWriter {
    path_file_out: PathBuf,
    workbook: Workbook,
    fmt_text: SpecCellFormat,
    fmt_header: SpecCellFormat,
    set_sheet_names_existing: BTreeSet<String>,
    if_closed: bool,
}

impl XlsxTableWriter {
    /// Create a writer bound to `path_file_out` with the default presets.
    pub fn new(path_file_out: PathBuf) -> Self {
        Self::with_formats(
            path_file_out,
            derive_default_text_format(),
            derive_default_header_format(),
        )
    }

    /// Create a writer with explicit body/header format presets.
    pub fn with_formats(
        path_file_out: PathBuf,
        fmt_text: SpecCellFormat,
        fmt_header: SpecCellFormat,
    ) -> Self {
        Self {
            path_file_out,
            workbook: Workbook::new(),
            fmt_text,
            fmt_header,
            set_sheet_names_existing: BTreeSet::new(),
            if_closed: false,
        }
    }

    /// Return output file path as string.
    pub fn file_out(&self) -> String {
        self.path_file_out.to_string_lossy().to_string()
    }

    /// Append one sheet holding `table`.
    ///
    /// The sheet name is sanitized and deduplicated within the workbook.
    /// Column widths follow the header/body width heuristic.
    pub fn write_table(
        &mut self,
        table: &SpecSheetTable,
        sheet_name: &str,
    ) -> Result<(), ExportError> {
        if self.if_closed {
            return Err(ExportError::WorkbookWriteFailed(
                "cannot write after close()".to_string(),
            ));
        }

        let c_sheet_name = self.derive_unique_sheet_name(&sanitize_sheet_name(sheet_name));
        let fmt_header = derive_rust_xlsx_format(&self.fmt_header);
        let fmt_text = derive_rust_xlsx_format(&self.fmt_text);

        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(&c_sheet_name).map_err(derive_xlsx_error)?;

        for (n_idx_col, col) in table.columns.iter().enumerate() {
            let n_col = cast_col_num(n_idx_col)?;
            worksheet
                .write_string_with_format(0, n_col, &col.name, &fmt_header)
                .map_err(derive_xlsx_error)?;

            for (n_idx_row, value) in col.cells.iter().enumerate() {
                write_cell(worksheet, cast_row_num(n_idx_row + 1)?, n_col, value, &fmt_text)?;
            }

            worksheet
                .set_column_width(n_col, calculate_column_width(&col.name, &col.cells))
                .map_err(derive_xlsx_error)?;
        }

        Ok(())
    }

    /// Flush the workbook to disk. Idempotent.
    pub fn close(&mut self) -> Result<(), ExportError> {
        if self.if_closed {
            return Ok(());
        }
        self.workbook
            .save(&self.path_file_out)
            .map_err(derive_xlsx_error)?;
        self.if_closed = true;
        Ok(())
    }

    fn derive_unique_sheet_name(&mut self, name: &str) -> String {
        if self.set_sheet_names_existing.insert(name.to_string()) {
            return name.to_string();
        }

        let c_base: String = name
            .chars()
            .take(usize::max(1, N_LEN_EXCEL_SHEET_NAME_MAX - 3))
            .collect();

        let mut n_idx = 2usize;
        loop {
            let c_candidate: String = format!("{c_base}_{n_idx}")
                .chars()
                .take(N_LEN_EXCEL_SHEET_NAME_MAX)
                .collect();
            if self.set_sheet_names_existing.insert(c_candidate.clone()) {
                return c_candidate;
            }
            n_idx += 1;
        }
    }
}

fn write_cell(
    worksheet: &mut Worksheet,
    n_row: u32,
    n_col: u16,
    value: &EnumCellValue,
    format: &Format,
) -> Result<(), ExportError> {
    match value {
        EnumCellValue::None => {
            worksheet
                .write_blank(n_row, n_col, format)
                .map_err(derive_xlsx_error)?;
        }
        EnumCellValue::String(val) => {
            worksheet
                .write_string_with_format(n_row, n_col, val, format)
                .map_err(derive_xlsx_error)?;
        }
        EnumCellValue::Number(val) => {
            worksheet
                .write_number_with_format(n_row, n_col, *val, format)
                .map_err(derive_xlsx_error)?;
        }
        EnumCellValue::Boolean(val) => {
            worksheet
                .write_boolean_with_format(n_row, n_col, *val, format)
                .map_err(derive_xlsx_error)?;
        }
    }
    Ok(())
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.valign
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = spec.border {
        format = format.set_border(derive_format_border(val));
    }
    if spec.text_wrap.unwrap_or(false) {
        format = format.set_text_wrap();
    }

    format
}

fn derive_format_border(border: i64) -> FormatBorder {
    match border {
        1 => FormatBorder::Thin,
        2 => FormatBorder::Medium,
        _ => FormatBorder::None,
    }
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    match align.trim().to_ascii_lowercase().as_str() {
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "top" => Some(FormatAlign::Top),
        "bottom" => Some(FormatAlign::Bottom),
        "vcenter" => Some(FormatAlign::VerticalCenter),
        _ => None,
    }
}

fn cast_row_num(value: usize) -> Result<u32, ExportError> {
    u32::try_from(value)
        .map_err(|_| ExportError::WorkbookWriteFailed(format!("row index overflow: {value}")))
}

fn cast_col_num(value: usize) -> Result<u16, ExportError> {
    u16::try_from(value)
        .map_err(|_| ExportError::WorkbookWriteFailed(format!("column index overflow: {value}")))
}

fn derive_xlsx_error(err: XlsxError) -> ExportError {
    ExportError::WorkbookWriteFailed(err.to_string())
}

#[cfg(test)]
mod tests {
    use calamine::{Data, Reader, Xlsx, open_workbook};

    use super::*;
    use crate::spec::SpecColumnSeries;

    fn table_of(entries: &[(&str, Vec<EnumCellValue>)]) -> SpecSheetTable {
        SpecSheetTable {
            columns: entries
                .iter()
                .map(|(c_name, l_cells)| SpecColumnSeries {
                    name: c_name.to_string(),
                    cells: l_cells.clone(),
                })
                .collect(),
        }
    }

    #[test]
    fn duplicate_sheet_names_get_numeric_suffixes() {
        let dir_tmp = tempfile::tempdir().unwrap();
        let path_file = dir_tmp.path().join("dup.xlsx");

        let table = table_of(&[("A", vec!["x".into()])]);
        let mut writer = XlsxTableWriter::new(path_file.clone());
        writer.write_table(&table, "Results").unwrap();
        writer.write_table(&table, "Results").unwrap();
        writer.close().unwrap();

        let workbook: Xlsx<_> = open_workbook(&path_file).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Results", "Results_2"]);
    }

    #[test]
    fn close_is_idempotent_and_blocks_later_writes() {
        let dir_tmp = tempfile::tempdir().unwrap();
        let path_file = dir_tmp.path().join("closed.xlsx");

        let table = table_of(&[("A", vec![])]);
        let mut writer = XlsxTableWriter::new(path_file);
        writer.write_table(&table, "Sheet1").unwrap();
        writer.close().unwrap();
        writer.close().unwrap();

        let err = writer.write_table(&table, "Sheet2").unwrap_err();
        assert!(matches!(err, ExportError::WorkbookWriteFailed(_)));
    }

    #[test]
    fn cell_kinds_round_trip_through_a_saved_sheet() {
        let dir_tmp = tempfile::tempdir().unwrap();
        let path_file = dir_tmp.path().join("kinds.xlsx");

        let table = table_of(&[
            ("Text", vec!["hello".into()]),
            ("Score", vec![9.into()]),
            ("Passed", vec![true.into()]),
            ("Blank", vec![EnumCellValue::None]),
        ]);
        let mut writer = XlsxTableWriter::new(path_file.clone());
        writer.write_table(&table, "Kinds").unwrap();
        writer.close().unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path_file).unwrap();
        let range = workbook.worksheet_range("Kinds").unwrap();
        assert_eq!(
            range.get_value((0, 0)),
            Some(&Data::String("Text".to_string()))
        );
        assert_eq!(
            range.get_value((1, 0)),
            Some(&Data::String("hello".to_string()))
        );
        assert_eq!(range.get_value((1, 1)), Some(&Data::Float(9.0)));
        assert_eq!(range.get_value((1, 2)), Some(&Data::Bool(true)));
    }
}
