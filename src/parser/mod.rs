//! Multi-table sheet parser
//!
//! The sales/target export stacks several tables in one headerless sheet.
//! Each table starts with a header row whose first cell is the marker label,
//! has a title row above it and usually ends with a totals row:
//!
//! ```text
//! BÖLGE 1
//! Satış Temsilcisi | HEDEF | SATIŞ | %   | KALAN
//! Ahmet            | 1000  | 800   | 80  | 200
//! TOPLAM           | 1000  | 800   | 80  | 200
//!
//! BÖLGE 2
//! Satış Temsilcisi | HEDEF | SATIŞ | %   | KALAN
//! ...
//! ```
//!
//! Parsing is a pure function of the grid. Malformed input degrades to empty
//! tables and zero values instead of errors.

mod assembler;
mod blocks;
mod cleaner;
mod normalize;
mod numeric;

pub use assembler::assemble_with;
pub use blocks::find_table_blocks;
pub use cleaner::clean;
pub use normalize::{normalize, normalize_opt};
pub use numeric::{coerce, parse_locale, parse_plain};

use crate::config::ParserConfig;
use crate::types::{CleanedTable, ParsedDataset, RawGrid, TableBlock};

/// Column-0 header that opens every embedded table
pub const DEFAULT_MARKER: &str = "Satış Temsilcisi";
/// Representative-name value of a table's totals row
pub const DEFAULT_TOTAL_LABEL: &str = "TOPLAM";

pub const TARGET_COLUMN: &str = "HEDEF";
pub const SALES_COLUMN: &str = "SATIŞ";
pub const PERCENT_COLUMN: &str = "%";
pub const REMAINING_COLUMN: &str = "KALAN";

/// Parser bound to one configuration
#[derive(Debug, Clone, Default)]
pub struct SheetParser {
    config: ParserConfig,
}

impl SheetParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn find_table_blocks(&self, grid: &RawGrid) -> Vec<TableBlock> {
        find_table_blocks(grid, &self.config.marker)
    }

    pub fn clean(&self, grid: &RawGrid, block: &TableBlock) -> Option<CleanedTable> {
        clean(grid, block, &self.config)
    }

    pub fn assemble(&self, grid: &RawGrid) -> ParsedDataset {
        assemble_with(grid, &self.config)
    }
}

/// Assemble with the default configuration
pub fn assemble(grid: &RawGrid) -> ParsedDataset {
    SheetParser::default().assemble(grid)
}
