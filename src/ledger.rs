use crate::error::{Result, SalesReportError};
use crate::schema::Platform;
use crate::utils::parse_amount;
use log::debug;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::io::Read;
use std::path::Path;

/// Cell texts that spreadsheet exports use for "no value".
const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-NaN", "-nan", "<NA>", "N/A", "NA", "NULL", "NaN", "None",
    "n/a", "nan", "null",
];

static MISSING: CellValue = CellValue::Missing;

/// A single decoded cell.
///
/// Cells are totally ordered (missing < numbers < text, numbers by
/// `f64::total_cmp`) so a column can be reduced to its mode.
#[derive(Debug, Clone)]
pub enum CellValue {
    Missing,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Interprets raw cell text the way a CSV export is read: trimmed,
    /// missing markers become `Missing`, plain numbers become `Number`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if MISSING_MARKERS.contains(&trimmed) {
            return CellValue::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => CellValue::Number(n),
            _ => CellValue::Text(trimmed.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// Numeric value for summation. Text is accepted when it reads as an
    /// amount (currency symbols, thousands separators, accounting negatives).
    pub fn as_amount(&self) -> Option<f64> {
        match self {
            CellValue::Missing => None,
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Number(_) => None,
            CellValue::Text(s) => parse_amount(s),
        }
    }

    /// String form of a non-missing cell. Whole numbers render without a
    /// fractional part.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            CellValue::Missing => None,
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                Some(Cow::Owned(format!("{}", *n as i64)))
            }
            CellValue::Number(n) => Some(Cow::Owned(n.to_string())),
            CellValue::Text(s) => Some(Cow::Borrowed(s.as_str())),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            CellValue::Missing => 0,
            CellValue::Number(_) => 1,
            CellValue::Text(_) => 2,
        }
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CellValue::Number(a), CellValue::Number(b)) => a.total_cmp(b),
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            CellValue::Missing
        } else {
            CellValue::Text(value.to_string())
        }
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Missing)
    }
}

/// A decoded sales export: named columns and rows of cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Ledger {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row. Short rows are padded with missing cells and extra
    /// cells beyond the header are dropped.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Missing);
        self.rows.push(row);
    }

    pub fn with_row(mut self, row: Vec<CellValue>) -> Self {
        self.push_row(row);
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every cell of the named column in row order, or `None` when the column
    /// does not exist. The first column with a matching header wins.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &CellValue> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row.get(idx).unwrap_or(&MISSING)))
    }

    /// Pairs of cells from two columns, row by row.
    pub fn column_pairs(
        &self,
        first: &str,
        second: &str,
    ) -> Option<impl Iterator<Item = (&CellValue, &CellValue)> + '_> {
        let a = self.column_index(first)?;
        let b = self.column_index(second)?;
        Some(self.rows.iter().map(move |row| {
            (
                row.get(a).unwrap_or(&MISSING),
                row.get(b).unwrap_or(&MISSING),
            )
        }))
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Decodes a CSV export with a header row.
    pub fn from_csv_reader<R: Read>(reader: R, source_name: &str) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        if headers.iter().all(str::is_empty) {
            return Err(SalesReportError::LedgerDecode {
                source_name: source_name.to_string(),
                details: "missing header row".to_string(),
            });
        }

        let mut ledger = Ledger::new(headers.iter());
        for (line_num, result) in csv_reader.records().enumerate() {
            let record = result.map_err(|e| SalesReportError::LedgerDecode {
                source_name: source_name.to_string(),
                details: format!("CSV parse error at line {}: {}", line_num + 2, e),
            })?;
            ledger.push_row(record.iter().map(CellValue::parse).collect());
        }

        debug!(
            "Decoded ledger '{}' with {} columns and {} rows",
            source_name,
            ledger.columns.len(),
            ledger.rows.len()
        );

        Ok(ledger)
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        Ledger::from_csv_reader(file, &path.display().to_string())
    }
}

/// One uploaded ledger together with the slot it was uploaded into.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerUpload {
    pub platform: Platform,
    pub filename: String,
    pub ledger: Ledger,
}

impl LedgerUpload {
    pub fn new(platform: Platform, filename: impl Into<String>, ledger: Ledger) -> Self {
        Self {
            platform,
            filename: filename.into(),
            ledger,
        }
    }

    /// Reads a CSV export from disk. Only the final path component is kept as
    /// the upload's file name.
    pub fn from_csv_path<P: AsRef<Path>>(platform: Platform, path: P) -> Result<Self> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ledger = Ledger::from_csv_path(path)?;
        Ok(Self::new(platform, filename, ledger))
    }
}
