use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

//==============================================================================
// Cells
//==============================================================================

/// A single untyped spreadsheet cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Bool(bool),
    Text(String),
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl CellValue {
    /// Blank means no value at all, or text made only of whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Borrow the text content, if this is a text cell
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Display form with surrounding whitespace removed
    pub fn trimmed(&self) -> String {
        self.to_string().trim().to_string()
    }

    fn hash_into<H: Hasher>(&self, state: &mut H) {
        match self {
            CellValue::Empty => 0u8.hash(state),
            CellValue::Number(n) => {
                1u8.hash(state);
                n.to_bits().hash(state);
            }
            CellValue::Bool(b) => {
                2u8.hash(state);
                b.hash(state);
            }
            CellValue::Text(s) => {
                3u8.hash(state);
                s.hash(state);
            }
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{:.0}", n),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s)
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

//==============================================================================
// Raw grid
//==============================================================================

/// Headerless rows × columns grid, exactly as read from a worksheet.
///
/// Rows may be ragged; missing trailing cells read as [`CellValue::Empty`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawGrid {
    rows: Vec<Vec<CellValue>>,
}

impl RawGrid {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    /// Build a grid from string literals ("" is an empty cell)
    pub fn from_strings(rows: &[&[&str]]) -> Self {
        Self::new(
            rows.iter()
                .map(|row| row.iter().map(|s| CellValue::from(*s)).collect())
                .collect(),
        )
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.iter().all(CellValue::is_blank))
    }

    pub fn get(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn row(&self, row: usize) -> &[CellValue] {
        self.rows.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Content hash used as the cache key for parsed datasets
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.rows.len().hash(&mut hasher);
        for row in &self.rows {
            row.len().hash(&mut hasher);
            for cell in row {
                cell.hash_into(&mut hasher);
            }
        }
        hasher.finish()
    }
}

//==============================================================================
// Parser output
//==============================================================================

/// A vertical slice of the grid that starts at a marker row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBlock {
    /// Row of the marker cell (the table's header row)
    pub start_row: usize,
    /// Exclusive end: next marker row or grid height
    pub end_row: usize,
    pub title: String,
}

impl TableBlock {
    pub fn len(&self) -> usize {
        self.end_row - self.start_row
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named cell of a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: CellValue,
}

/// One data row of a cleaned table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub group: String,
    /// Trimmed representative-name cell
    pub representative: String,
    pub normalized_key: String,
    pub fields: Vec<Field>,
}

impl Record {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|f| f.name == column)
            .map(|f| &f.value)
    }

    /// Numeric value of a column; `None` if the column is absent or not numeric
    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(CellValue::as_number)
    }

    pub fn is_total(&self, total_label: &str) -> bool {
        self.representative == total_label
    }
}

/// A table recovered from one block: trimmed headers plus its records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedTable {
    pub group: String,
    pub headers: Vec<String>,
    pub records: Vec<Record>,
    /// Title of the block that follows this one, when it was read from a cell
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_title: Option<String>,
}

impl CleanedTable {
    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    /// Records without a last row whose name repeats the next block's title.
    ///
    /// That row sits inside this block's range but labels the following table.
    pub fn body(&self) -> &[Record] {
        match (self.records.split_last(), &self.next_title) {
            (Some((last, rest)), Some(title)) if last.representative == *title => rest,
            _ => &self.records,
        }
    }
}

/// Sum of target / actual / remaining over a set of rows
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub target: f64,
    pub actual: f64,
    pub remaining: f64,
}

impl std::ops::AddAssign for Totals {
    fn add_assign(&mut self, other: Self) {
        self.target += other.target;
        self.actual += other.actual;
        self.remaining += other.remaining;
    }
}

/// Totals row of one table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTotals {
    pub group: String,
    /// False when the table had no total row (totals are then zero)
    pub has_total_row: bool,
    pub totals: Totals,
}

/// All tables recovered from one grid, in discovery order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParsedDataset {
    pub tables: Vec<CleanedTable>,
    /// Label that marks a table's totals row
    pub total_label: String,
}
