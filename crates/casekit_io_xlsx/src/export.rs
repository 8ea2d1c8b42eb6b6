//! Caller-facing export operations.

use std::env;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::conf::{
    C_FILE_STEM_TESTCASES, C_FILE_STEM_TESTCASES_VALIDATED, C_FILE_STEM_VALIDATED,
    C_SHEET_NAME_TESTCASES, C_SHEET_NAME_VALIDATION, TUP_DIR_OUTPUT_DEFAULT,
};
use crate::spec::{ExportError, SpecExportOptions, SpecValidatedRecord, TypeRecord};
use crate::table::{plan_merged_table, plan_score_table, plan_testcase_table};
use crate::util::{create_output_dir, derive_timestamp_token, plan_output_path};
use crate::writer::XlsxTableWriter;

/// Resolve the target file for one export call.
///
/// An explicit `path_file_out` is used verbatim. Otherwise the configured
/// output directory (default `<cwd>/data/output`, resolved here, once) is
/// created recursively and a `<stem>_<timestamp>.xlsx` path is planned
/// inside it.
fn resolve_output_file(
    path_file_out: Option<&Path>,
    stem: &str,
    options: &SpecExportOptions,
) -> Result<PathBuf, ExportError> {
    if let Some(path_file) = path_file_out {
        return Ok(path_file.to_path_buf());
    }

    let dir_output = match &options.dir_output {
        Some(dir) => dir.clone(),
        None => env::current_dir()
            .map_err(|e| ExportError::OutputDirUnresolved(e.to_string()))?
            .join(TUP_DIR_OUTPUT_DEFAULT[0])
            .join(TUP_DIR_OUTPUT_DEFAULT[1]),
    };
    create_output_dir(&dir_output)?;

    let c_token = derive_timestamp_token(&Local::now().naive_local());
    Ok(plan_output_path(&dir_output, stem, &c_token))
}

/// Export test-case records to a single-sheet workbook.
///
/// The `TestCases` sheet always carries exactly the six canonical columns;
/// an absent column is filled with empty strings, a non-canonical column is
/// dropped. Returns the written path.
pub fn export_testcases(
    records: &[TypeRecord],
    path_file_out: Option<&Path>,
    options: &SpecExportOptions,
) -> Result<PathBuf, ExportError> {
    let table = plan_testcase_table(records);
    let path_file = resolve_output_file(path_file_out, C_FILE_STEM_TESTCASES, options)?;

    let mut writer = XlsxTableWriter::new(path_file.clone());
    writer.write_table(&table, C_SHEET_NAME_TESTCASES)?;
    writer.close()?;

    log::info!(
        "Exported {} test cases to {}",
        records.len(),
        path_file.display()
    );
    Ok(path_file)
}

/// Export validation results merged with their originating test cases.
///
/// Each result's embedded test case is flattened into the scoring row
/// (scoring fields win on key conflicts) and written to one
/// `ValidationResults` sheet holding the canonical columns present in at
/// least one row. Default filename: `validated_testcases_<timestamp>.xlsx`.
pub fn export_validated_testcases(
    results: &[SpecValidatedRecord],
    path_file_out: Option<&Path>,
    options: &SpecExportOptions,
) -> Result<PathBuf, ExportError> {
    let table = plan_merged_table(results);
    let path_file = resolve_output_file(path_file_out, C_FILE_STEM_VALIDATED, options)?;

    let mut writer = XlsxTableWriter::new(path_file.clone());
    writer.write_table(&table, C_SHEET_NAME_VALIDATION)?;
    writer.close()?;

    log::info!(
        "Exported {} merged validation rows to {}",
        results.len(),
        path_file.display()
    );
    Ok(path_file)
}

/// Export test cases and their standalone scores as a two-sheet workbook.
///
/// Sheet `TestCases` follows the strict six-column schema; sheet
/// `ValidationResults` requires all seven scoring fields in every row and
/// fails with [`ExportError::MissingScoreField`] otherwise. Default
/// filename: `testcases_validated_<timestamp>.xlsx`.
pub fn export_testcases_with_scores(
    records: &[TypeRecord],
    results: &[TypeRecord],
    path_file_out: Option<&Path>,
    options: &SpecExportOptions,
) -> Result<PathBuf, ExportError> {
    let table_testcases = plan_testcase_table(records);
    let table_scores = plan_score_table(results)?;
    let path_file = resolve_output_file(path_file_out, C_FILE_STEM_TESTCASES_VALIDATED, options)?;

    let mut writer = XlsxTableWriter::new(path_file.clone());
    writer.write_table(&table_testcases, C_SHEET_NAME_TESTCASES)?;
    writer.write_table(&table_scores, C_SHEET_NAME_VALIDATION)?;
    writer.close()?;

    log::info!(
        "Exported {} test cases with {} score rows to {}",
        records.len(),
        results.len(),
        path_file.display()
    );
    Ok(path_file)
}
