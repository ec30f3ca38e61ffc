//! Workbook readers (xls, xlsx, xlsb, ods) built on calamine

use crate::error::{SalesboardError, SalesboardResult};
use crate::parser::parse_locale;
use crate::types::{CellValue, RawGrid};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A sheet read with its first row as column headers
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HeaderTable {
    /// Where the table came from, used in error messages
    pub source: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl HeaderTable {
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of a column that must exist
    pub fn require(&self, name: &str) -> SalesboardResult<usize> {
        self.column(name)
            .ok_or_else(|| SalesboardError::MissingColumn {
                column: name.to_string(),
                source_name: self.source.clone(),
            })
    }

    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// Split a headerless grid: row 0 becomes trimmed headers
    pub fn from_grid(source: &str, grid: &RawGrid) -> Self {
        if grid.height() == 0 {
            return Self {
                source: source.to_string(),
                ..Self::default()
            };
        }

        let width = grid.width();
        let headers = (0..width)
            .map(|col| {
                let label = grid.get(0, col).trimmed();
                if label.is_empty() {
                    format!("col_{}", col)
                } else {
                    label
                }
            })
            .collect();

        let rows = (1..grid.height())
            .map(|row| (0..width).map(|col| grid.get(row, col).clone()).collect())
            .collect();

        Self {
            source: source.to_string(),
            headers,
            rows,
        }
    }
}

/// Workbook reader for one input file
pub struct ExcelImporter {
    path: PathBuf,
}

impl ExcelImporter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// First worksheet as a headerless grid, cells at their sheet positions
    pub fn read_grid(&self) -> SalesboardResult<RawGrid> {
        let range = self.first_sheet()?;
        let grid = range_to_grid(&range);
        info!(
            path = %self.path.display(),
            rows = grid.height(),
            cols = grid.width(),
            "worksheet read"
        );
        Ok(grid)
    }

    /// First worksheet with its first used row as headers
    pub fn read_table(&self) -> SalesboardResult<HeaderTable> {
        let range = self.first_sheet()?;
        let used: Vec<Vec<CellValue>> = range
            .rows()
            .map(|row| row.iter().map(convert_cell).collect())
            .collect();
        let table = HeaderTable::from_grid(&self.path.display().to_string(), &RawGrid::new(used));
        info!(
            path = %self.path.display(),
            rows = table.rows.len(),
            "table read"
        );
        Ok(table)
    }

    /// The single figure stored in the first cell of the first sheet.
    ///
    /// Text is read in Turkish notation ("1.234,56"). Any failure, including
    /// a missing or unreadable file, yields 0.
    pub fn read_figure(&self) -> f64 {
        let range = match self.first_sheet() {
            Ok(range) => range,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "figure unavailable, using 0");
                return 0.0;
            }
        };

        match range.get((0, 0)).map(convert_cell) {
            Some(CellValue::Number(n)) if n.is_finite() => n,
            Some(CellValue::Text(s)) => parse_locale(&s).unwrap_or(0.0),
            _ => 0.0,
        }
    }

    fn first_sheet(&self) -> SalesboardResult<Range<Data>> {
        let mut workbook = open_workbook_auto(&self.path).map_err(|e| {
            SalesboardError::Workbook(format!(
                "Failed to open {}: {}",
                self.path.display(),
                e
            ))
        })?;

        match workbook.worksheet_range_at(0) {
            Some(range) => Ok(range?),
            None => Err(SalesboardError::Workbook(format!(
                "{} has no worksheets",
                self.path.display()
            ))),
        }
    }
}

/// Place every cell at its absolute sheet position (column A is column 0)
fn range_to_grid(range: &Range<Data>) -> RawGrid {
    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; col_offset];
        cells.extend(row.iter().map(convert_cell));
        rows.push(cells);
    }
    RawGrid::new(rows)
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::from(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// Read the headerless grid of `path`
pub fn read_grid<P: AsRef<Path>>(path: P) -> SalesboardResult<RawGrid> {
    ExcelImporter::new(path).read_grid()
}

/// Read `path` as a header table
pub fn read_table<P: AsRef<Path>>(path: P) -> SalesboardResult<HeaderTable> {
    ExcelImporter::new(path).read_table()
}

/// Read the debt figure stored in `path` (0 on any failure)
pub fn read_debt_figure<P: AsRef<Path>>(path: P) -> f64 {
    ExcelImporter::new(path).read_figure()
}
