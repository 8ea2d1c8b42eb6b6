use std::collections::BTreeMap;
use std::path::PathBuf;

use casekit_io_xlsx::spec::{
    EnumCellValue, ExportError, SpecExportOptions, SpecValidatedRecord, TypeRecord,
};
use casekit_io_xlsx::{export_testcases, export_testcases_with_scores, export_validated_testcases};
use pyo3::exceptions::{PyOSError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyAny, PyBool, PyDict, PyList};

/// Key under which the Python caller embeds the originating test case.
const C_KEY_EMBEDDED_TESTCASE: &str = "testcase";

fn parse_cell_value(value: &Bound<'_, PyAny>) -> PyResult<EnumCellValue> {
    if value.is_none() {
        return Ok(EnumCellValue::None);
    }
    // bool first: a Python bool also extracts as int
    if let Ok(val) = value.downcast::<PyBool>() {
        return Ok(EnumCellValue::Boolean(val.is_true()));
    }
    if let Ok(val) = value.extract::<i64>() {
        return Ok(EnumCellValue::Number(val as f64));
    }
    if let Ok(val) = value.extract::<f64>() {
        return Ok(EnumCellValue::Number(val));
    }
    if let Ok(val) = value.extract::<String>() {
        return Ok(EnumCellValue::String(val));
    }
    Err(PyValueError::new_err(format!(
        "Unsupported cell value type: {}",
        value.get_type()
    )))
}

fn parse_record(dict: &Bound<'_, PyDict>) -> PyResult<TypeRecord> {
    let mut dict_record: TypeRecord = BTreeMap::new();
    for (key, value) in dict.iter() {
        let c_key: String = key.extract()?;
        dict_record.insert(c_key, parse_cell_value(&value)?);
    }
    Ok(dict_record)
}

fn parse_records(list: &Bound<'_, PyList>) -> PyResult<Vec<TypeRecord>> {
    let mut l_records = Vec::with_capacity(list.len());
    for item in list.iter() {
        let dict = item.downcast::<PyDict>()?;
        l_records.push(parse_record(dict)?);
    }
    Ok(l_records)
}

/// Split each result dict into its embedded `testcase` mapping and the
/// remaining scoring fields, mirroring the Python caller's shape.
fn parse_validated_records(list: &Bound<'_, PyList>) -> PyResult<Vec<SpecValidatedRecord>> {
    let mut l_results = Vec::with_capacity(list.len());
    for item in list.iter() {
        let dict = item.downcast::<PyDict>()?;

        let mut record_testcase: Option<TypeRecord> = None;
        let mut dict_scores: TypeRecord = BTreeMap::new();
        for (key, value) in dict.iter() {
            let c_key: String = key.extract()?;
            if c_key == C_KEY_EMBEDDED_TESTCASE {
                let dict_testcase = value.downcast::<PyDict>()?;
                record_testcase = Some(parse_record(dict_testcase)?);
                continue;
            }
            dict_scores.insert(c_key, parse_cell_value(&value)?);
        }

        l_results.push(SpecValidatedRecord {
            testcase: record_testcase,
            scores: dict_scores,
        });
    }
    Ok(l_results)
}

fn parse_options(output_dir: Option<String>) -> SpecExportOptions {
    SpecExportOptions {
        dir_output: output_dir.map(PathBuf::from),
    }
}

fn derive_py_error(err: ExportError) -> PyErr {
    match err {
        ExportError::MissingScoreField { .. } => PyValueError::new_err(err.to_string()),
        ExportError::OutputDirUnresolved(_) | ExportError::DirectoryCreationFailed { .. } => {
            PyOSError::new_err(err.to_string())
        }
        ExportError::WorkbookWriteFailed(_) => PyRuntimeError::new_err(err.to_string()),
    }
}

/// Export test cases to a single-sheet workbook; returns the written path.
#[pyfunction]
#[pyo3(signature = (testcases, output_file = None, output_dir = None))]
fn export_to_excel(
    testcases: &Bound<'_, PyList>,
    output_file: Option<String>,
    output_dir: Option<String>,
) -> PyResult<String> {
    let l_records = parse_records(testcases)?;
    let path_file_out = output_file.map(PathBuf::from);
    let path_written = export_testcases(
        &l_records,
        path_file_out.as_deref(),
        &parse_options(output_dir),
    )
    .map_err(derive_py_error)?;
    Ok(path_written.to_string_lossy().to_string())
}

/// Export validation results merged with their embedded test cases.
#[pyfunction]
#[pyo3(signature = (validation_results, output_file = None, output_dir = None))]
fn export_validation_results(
    validation_results: &Bound<'_, PyList>,
    output_file: Option<String>,
    output_dir: Option<String>,
) -> PyResult<String> {
    let l_results = parse_validated_records(validation_results)?;
    let path_file_out = output_file.map(PathBuf::from);
    let path_written = export_validated_testcases(
        &l_results,
        path_file_out.as_deref(),
        &parse_options(output_dir),
    )
    .map_err(derive_py_error)?;
    Ok(path_written.to_string_lossy().to_string())
}

/// Export test cases plus standalone score rows as a two-sheet workbook.
#[pyfunction]
#[pyo3(signature = (testcases, validation_results, output_file = None, output_dir = None))]
fn export_testcases_with_results(
    testcases: &Bound<'_, PyList>,
    validation_results: &Bound<'_, PyList>,
    output_file: Option<String>,
    output_dir: Option<String>,
) -> PyResult<String> {
    let l_records = parse_records(testcases)?;
    let l_results = parse_records(validation_results)?;
    let path_file_out = output_file.map(PathBuf::from);
    let path_written = export_testcases_with_scores(
        &l_records,
        &l_results,
        path_file_out.as_deref(),
        &parse_options(output_dir),
    )
    .map_err(derive_py_error)?;
    Ok(path_written.to_string_lossy().to_string())
}

#[pymodule]
fn _casekit_io_xlsx_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(export_to_excel, m)?)?;
    m.add_function(wrap_pyfunction!(export_validation_results, m)?)?;
    m.add_function(wrap_pyfunction!(export_testcases_with_results, m)?)?;
    Ok(())
}
