//! Record shaping into fixed-schema sheet tables.

use std::collections::BTreeSet;

use crate::conf::{TUP_COLS_SCORE, TUP_COLS_SCORE_SHEET, TUP_COLS_TESTCASE};
use crate::spec::{
    EnumCellValue, ExportError, SpecColumnSeries, SpecSheetTable, SpecValidatedRecord, TypeRecord,
};

/// Build the strict six-column test-case table.
///
/// The result always carries exactly the canonical columns in canonical
/// order: an absent column becomes empty-string cells, a non-canonical key
/// is dropped. Row order follows input order.
pub fn plan_testcase_table(records: &[TypeRecord]) -> SpecSheetTable {
    let mut l_columns = Vec::with_capacity(TUP_COLS_TESTCASE.len());
    for c_col in TUP_COLS_TESTCASE {
        let l_cells = records
            .iter()
            .map(|record| {
                record
                    .get(c_col)
                    .cloned()
                    .unwrap_or_else(EnumCellValue::empty)
            })
            .collect();
        l_columns.push(SpecColumnSeries {
            name: c_col.to_string(),
            cells: l_cells,
        });
    }
    SpecSheetTable { columns: l_columns }
}

/// Flatten one validated record into a single row mapping.
///
/// Scoring fields overwrite same-named test-case fields; the embedded
/// test-case reference itself never survives as a key.
fn derive_merged_row(result: &SpecValidatedRecord) -> TypeRecord {
    let mut dict_row = result.testcase.clone().unwrap_or_default();
    for (c_key, value) in &result.scores {
        dict_row.insert(c_key.clone(), value.clone());
    }
    dict_row
}

/// Build the merged validation table: test-case columns, then scoring
/// columns, keeping only canonical columns present in at least one row.
///
/// A row missing one of the emitted columns gets an empty cell; absence is
/// tolerated here, unlike [`plan_score_table`].
pub fn plan_merged_table(results: &[SpecValidatedRecord]) -> SpecSheetTable {
    let l_rows: Vec<TypeRecord> = results.iter().map(derive_merged_row).collect();

    let set_keys_present: BTreeSet<&str> = l_rows
        .iter()
        .flat_map(|row| row.keys().map(String::as_str))
        .collect();

    let mut l_columns = Vec::new();
    for c_col in TUP_COLS_TESTCASE.iter().chain(TUP_COLS_SCORE.iter()) {
        if !set_keys_present.contains(c_col) {
            continue;
        }
        let l_cells = l_rows
            .iter()
            .map(|row| {
                row.get(*c_col)
                    .cloned()
                    .unwrap_or_else(EnumCellValue::empty)
            })
            .collect();
        l_columns.push(SpecColumnSeries {
            name: (*c_col).to_string(),
            cells: l_cells,
        });
    }
    SpecSheetTable { columns: l_columns }
}

/// Build the strict seven-column score table for the two-sheet workbook.
///
/// Every canonical scoring field must be present in every result row;
/// the first absence aborts with [`ExportError::MissingScoreField`].
pub fn plan_score_table(results: &[TypeRecord]) -> Result<SpecSheetTable, ExportError> {
    let mut l_columns = Vec::with_capacity(TUP_COLS_SCORE_SHEET.len());
    for c_col in TUP_COLS_SCORE_SHEET {
        let mut l_cells = Vec::with_capacity(results.len());
        for (n_idx_row, result) in results.iter().enumerate() {
            let value = result
                .get(c_col)
                .ok_or_else(|| ExportError::MissingScoreField {
                    column: c_col.to_string(),
                    row_idx: n_idx_row,
                })?;
            l_cells.push(value.clone());
        }
        l_columns.push(SpecColumnSeries {
            name: c_col.to_string(),
            cells: l_cells,
        });
    }
    Ok(SpecSheetTable { columns: l_columns })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(entries: &[(&str, EnumCellValue)]) -> TypeRecord {
        entries
            .iter()
            .map(|(c_key, value)| (c_key.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn testcase_table_fills_missing_columns_and_drops_extras() {
        let records = vec![record(&[
            ("Category1", "UI".into()),
            ("Description", "Button click".into()),
            ("Reviewer", "not a canonical column".into()),
        ])];

        let table = plan_testcase_table(&records);

        let l_names: Vec<&str> = table.columns.iter().map(|col| col.name.as_str()).collect();
        assert_eq!(
            l_names,
            vec![
                "Category1",
                "Category2",
                "Category3",
                "Description",
                "Platform",
                "Notes"
            ]
        );
        assert_eq!(table.height(), 1);
        assert_eq!(table.columns[0].cells[0], "UI".into());
        assert_eq!(table.columns[1].cells[0], EnumCellValue::empty());
        assert_eq!(table.columns[3].cells[0], "Button click".into());
        assert_eq!(table.columns[5].cells[0], EnumCellValue::empty());
    }

    #[test]
    fn testcase_table_preserves_row_order() {
        let records: Vec<TypeRecord> = (0..4)
            .map(|n_idx| record(&[("Notes", format!("row {n_idx}").into())]))
            .collect();

        let table = plan_testcase_table(&records);

        let col_notes = &table.columns[5];
        assert_eq!(col_notes.cells.len(), 4);
        for (n_idx, cell) in col_notes.cells.iter().enumerate() {
            assert_eq!(*cell, format!("row {n_idx}").into());
        }
    }

    #[test]
    fn merged_table_joins_testcase_and_scores_without_embedded_key() {
        let results = vec![SpecValidatedRecord {
            testcase: Some(record(&[("Category1", "UI".into())])),
            scores: record(&[("Accuracy", 9.into()), ("Passed", true.into())]),
        }];

        let table = plan_merged_table(&results);

        let l_names: Vec<&str> = table.columns.iter().map(|col| col.name.as_str()).collect();
        assert_eq!(l_names, vec!["Category1", "Accuracy", "Passed"]);
        assert_eq!(table.columns[0].cells[0], "UI".into());
        assert_eq!(table.columns[1].cells[0], 9.into());
        assert_eq!(table.columns[2].cells[0], true.into());
    }

    #[test]
    fn merged_table_emits_union_of_present_columns() {
        let results = vec![
            SpecValidatedRecord {
                testcase: Some(record(&[("Category1", "UI".into())])),
                scores: record(&[("Accuracy", 7.into())]),
            },
            SpecValidatedRecord {
                testcase: None,
                scores: record(&[("TotalScore", 31.into())]),
            },
        ];

        let table = plan_merged_table(&results);

        let l_names: Vec<&str> = table.columns.iter().map(|col| col.name.as_str()).collect();
        assert_eq!(l_names, vec!["Category1", "Accuracy", "TotalScore"]);
        // second row never saw Category1 or Accuracy
        assert_eq!(table.columns[0].cells[1], EnumCellValue::empty());
        assert_eq!(table.columns[1].cells[1], EnumCellValue::empty());
        assert_eq!(table.columns[2].cells[1], 31.into());
    }

    #[test]
    fn merged_table_scores_win_on_key_conflict() {
        let results = vec![SpecValidatedRecord {
            testcase: Some(record(&[("Notes", "from testcase".into())])),
            scores: record(&[("Notes", "from scores".into()), ("Accuracy", 5.into())]),
        }];

        let table = plan_merged_table(&results);

        let col_notes = table
            .columns
            .iter()
            .find(|col| col.name == "Notes")
            .unwrap();
        assert_eq!(col_notes.cells[0], "from scores".into());
    }

    #[test]
    fn score_table_orders_passed_before_improvement_suggestion() {
        let results = vec![record(&[
            ("Accuracy", 9.into()),
            ("Completeness", 8.into()),
            ("Clarity", 7.into()),
            ("PlatformFit", 6.into()),
            ("TotalScore", 30.into()),
            ("ImprovementSuggestion", "tighten wording".into()),
            ("Passed", true.into()),
        ])];

        let table = plan_score_table(&results).unwrap();

        let l_names: Vec<&str> = table.columns.iter().map(|col| col.name.as_str()).collect();
        assert_eq!(
            l_names,
            vec![
                "Accuracy",
                "Completeness",
                "Clarity",
                "PlatformFit",
                "TotalScore",
                "Passed",
                "ImprovementSuggestion"
            ]
        );
    }

    #[test]
    fn score_table_rejects_missing_field() {
        let results = vec![
            record(&[
                ("Accuracy", 9.into()),
                ("Completeness", 8.into()),
                ("Clarity", 7.into()),
                ("PlatformFit", 6.into()),
                ("TotalScore", 30.into()),
                ("ImprovementSuggestion", "".into()),
                ("Passed", true.into()),
            ]),
            record(&[("Accuracy", 4.into())]),
        ];

        let err = plan_score_table(&results).unwrap_err();
        match err {
            ExportError::MissingScoreField { column, row_idx } => {
                assert_eq!(column, "Completeness");
                assert_eq!(row_idx, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_inputs_plan_header_only_tables() {
        assert_eq!(plan_testcase_table(&[]).height(), 0);
        assert_eq!(plan_testcase_table(&[]).width(), 6);
        assert_eq!(plan_merged_table(&[]).width(), 0);
        assert_eq!(plan_score_table(&[]).unwrap().width(), 7);
    }
}
