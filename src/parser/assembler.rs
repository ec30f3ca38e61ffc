//! Dataset assembly and the views consumers read from it

use crate::config::ParserConfig;
use crate::parser::{
    blocks::{find_table_blocks, heading_cell},
    cleaner::clean,
    REMAINING_COLUMN, SALES_COLUMN, TARGET_COLUMN,
};
use crate::types::{CleanedTable, GroupTotals, ParsedDataset, RawGrid, Record, Totals};
use tracing::debug;

/// Run discovery and cleaning over the whole grid.
///
/// Tables keep discovery order and rows keep sheet order. An empty grid or a
/// grid without markers yields an empty dataset.
pub fn assemble_with(grid: &RawGrid, config: &ParserConfig) -> ParsedDataset {
    let blocks = find_table_blocks(grid, &config.marker);
    let tables: Vec<_> = blocks
        .iter()
        .enumerate()
        .filter_map(|(i, block)| {
            let mut table = clean(grid, block, config)?;
            table.next_title = blocks
                .get(i + 1)
                .and_then(|next| heading_cell(grid, next.start_row));
            Some(table)
        })
        .collect();

    debug!(
        blocks = blocks.len(),
        tables = tables.len(),
        "sales/target grid assembled"
    );

    ParsedDataset {
        tables,
        total_label: config.total_label.clone(),
    }
}

fn record_totals(record: &Record) -> Totals {
    Totals {
        target: record.number(TARGET_COLUMN).unwrap_or(0.0),
        actual: record.number(SALES_COLUMN).unwrap_or(0.0),
        remaining: record.number(REMAINING_COLUMN).unwrap_or(0.0),
    }
}

impl ParsedDataset {
    /// All records, totals rows included, in table then row order
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.tables.iter().flat_map(|t| t.records.iter())
    }

    pub fn len(&self) -> usize {
        self.tables.iter().map(|t| t.records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Per-representative records.
    ///
    /// Totals rows are excluded, and so is a table's last row when it only
    /// repeats the following table's title.
    pub fn analytic_records(&self) -> impl Iterator<Item = &Record> {
        self.tables
            .iter()
            .flat_map(CleanedTable::body)
            .filter(move |r| !r.is_total(&self.total_label))
    }

    /// One title per table in discovery order; repeated titles stay separate
    pub fn groups(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.group.as_str()).collect()
    }

    /// Records of the table at `index` (empty when out of range)
    pub fn records_in_group(&self, index: usize) -> impl Iterator<Item = &Record> {
        self.tables
            .get(index)
            .into_iter()
            .flat_map(|t| t.records.iter())
    }

    /// Totals row of every table; tables without one report zeros
    pub fn table_totals(&self) -> Vec<GroupTotals> {
        self.tables
            .iter()
            .map(|table| {
                let mut totals = Totals::default();
                let mut has_total_row = false;
                for record in table.records.iter().filter(|r| r.is_total(&self.total_label)) {
                    has_total_row = true;
                    totals += record_totals(record);
                }
                GroupTotals {
                    group: table.group.clone(),
                    has_total_row,
                    totals,
                }
            })
            .collect()
    }

    /// Sum of every table's totals row
    pub fn grand_totals(&self) -> Totals {
        let mut grand = Totals::default();
        for group in self.table_totals() {
            grand += group.totals;
        }
        grand
    }

    /// Analytic records whose normalized key equals `key`
    pub fn find_by_key<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Record> {
        self.analytic_records()
            .filter(move |r| r.normalized_key == key)
    }

    /// Actual sales for a representative key, summed across tables (0 if absent)
    pub fn sales_for(&self, key: &str) -> f64 {
        self.find_by_key(key)
            .filter_map(|r| r.number(SALES_COLUMN))
            .sum()
    }
}
