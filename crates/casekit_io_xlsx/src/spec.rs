//! Shared export models, options, and the top-level error type.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

////////////////////////////////////////////////////////////////////////////////
// #region CellsAndRecords

/// Normalized cell value flowing through shaping and write.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank value.
    None,
    /// Text value.
    String(String),
    /// Numeric value.
    Number(f64),
    /// Pass/fail flag value.
    Boolean(bool),
}

impl EnumCellValue {
    /// Empty-string cell substituted for an absent canonical column.
    pub fn empty() -> Self {
        Self::String(String::new())
    }
}

impl From<&str> for EnumCellValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for EnumCellValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for EnumCellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for EnumCellValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for EnumCellValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// String-keyed flat record supplied by the external caller.
pub type TypeRecord = BTreeMap<String, EnumCellValue>;

/// One validation result with its originating test case attached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecValidatedRecord {
    /// Embedded originating test-case record, when the caller supplied one.
    pub testcase: Option<TypeRecord>,
    /// Scoring fields keyed by canonical column name.
    pub scores: TypeRecord,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region TableSpecification

/// One planned output column: header name plus its cells in row order.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecColumnSeries {
    /// Header text written in row 0.
    pub name: String,
    /// Body cells, one per input record, in input order.
    pub cells: Vec<EnumCellValue>,
}

/// Fixed-schema sheet table: ordered column series of equal height.
///
/// Built directly from input records; never reshaped in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecSheetTable {
    /// Columns in canonical output order.
    pub columns: Vec<SpecColumnSeries>,
}

impl SpecSheetTable {
    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Number of data rows (all series share one height).
    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, |col| col.cells.len())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FormatSpecification

/// Cell format preset applied at write time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: Option<bool>,
    /// Horizontal alignment.
    pub align: Option<String>,
    /// Vertical alignment.
    pub valign: Option<String>,
    /// Border style for all sides.
    pub border: Option<i64>,
    /// Text wrap.
    pub text_wrap: Option<bool>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            align: other.align.clone().or_else(|| self.align.clone()),
            valign: other.valign.clone().or_else(|| self.valign.clone()),
            border: other.border.or(self.border),
            text_wrap: other.text_wrap.or(self.text_wrap),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region OptionsAndErrors

/// Exporter-wide options resolved once at the call boundary.
#[derive(Debug, Clone, Default)]
pub struct SpecExportOptions {
    /// Output directory for synthesized filenames;
    /// `<cwd>/data/output` when `None`.
    pub dir_output: Option<PathBuf>,
}

/// Top-level export failure.
#[derive(Debug)]
pub enum ExportError {
    /// Working directory lookup failed while resolving the default
    /// output location.
    OutputDirUnresolved(String),
    /// Output directory could not be created.
    DirectoryCreationFailed {
        /// Directory that failed creation.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
    /// Workbook serialization or file write failed.
    WorkbookWriteFailed(String),
    /// A required scoring field is absent from a result row.
    MissingScoreField {
        /// Missing canonical scoring column.
        column: String,
        /// Zero-based index of the offending result row.
        row_idx: usize,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutputDirUnresolved(msg) => {
                write!(f, "Failed to resolve working directory: {msg}")
            }
            Self::DirectoryCreationFailed { path, message } => {
                write!(
                    f,
                    "Failed to create output directory {}: {message}",
                    path.display()
                )
            }
            Self::WorkbookWriteFailed(msg) => write!(f, "Workbook write failed: {msg}"),
            Self::MissingScoreField { column, row_idx } => {
                write!(
                    f,
                    "Validation result row {row_idx} is missing required field {column:?}"
                )
            }
        }
    }
}

impl std::error::Error for ExportError {}

// #endregion
////////////////////////////////////////////////////////////////////////////////
