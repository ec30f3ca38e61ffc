//! Table boundary discovery

use crate::types::{RawGrid, TableBlock};
use tracing::debug;

/// Locate every embedded table by its marker cell in column 0.
///
/// Block `i` spans `[marker_i, marker_{i+1})`; the last one runs to the end
/// of the grid. Rows before the first marker belong to no block.
pub fn find_table_blocks(grid: &RawGrid, marker: &str) -> Vec<TableBlock> {
    let markers: Vec<usize> = (0..grid.height())
        .filter(|&row| grid.get(row, 0).trimmed() == marker)
        .collect();

    debug!(count = markers.len(), "marker rows found");

    markers
        .iter()
        .enumerate()
        .map(|(i, &start_row)| {
            let end_row = markers.get(i + 1).copied().unwrap_or(grid.height());
            TableBlock {
                start_row,
                end_row,
                title: block_title(grid, start_row, i),
            }
        })
        .collect()
}

/// Column-0 cell just above the marker, or "Group {n}" when there is none
fn block_title(grid: &RawGrid, start_row: usize, index: usize) -> String {
    heading_cell(grid, start_row).unwrap_or_else(|| format!("Group {}", index + 1))
}

/// Trimmed text of the column-0 cell above `start_row`, if any
pub(crate) fn heading_cell(grid: &RawGrid, start_row: usize) -> Option<String> {
    let above = start_row.checked_sub(1)?;
    let cell = grid.get(above, 0);
    (!cell.is_blank()).then(|| cell.trimmed())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKER: &str = "Satış Temsilcisi";

    #[test]
    fn test_no_markers() {
        let grid = RawGrid::from_strings(&[&["a", "b"], &["c", "d"]]);
        assert!(find_table_blocks(&grid, MARKER).is_empty());
        assert!(find_table_blocks(&RawGrid::default(), MARKER).is_empty());
    }

    #[test]
    fn test_marker_at_top_gets_placeholder_title() {
        let grid = RawGrid::from_strings(&[
            &["Satış Temsilcisi", "HEDEF"],
            &["Ahmet", "10"],
        ]);
        let blocks = find_table_blocks(&grid, MARKER);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].title, "Group 1");
        assert_eq!((blocks[0].start_row, blocks[0].end_row), (0, 2));
    }

    #[test]
    fn test_marker_matched_after_trim() {
        let grid = RawGrid::from_strings(&[&["  Satış Temsilcisi "], &["x"]]);
        assert_eq!(find_table_blocks(&grid, MARKER).len(), 1);
    }

    #[test]
    fn test_partition_and_titles() {
        let grid = RawGrid::from_strings(&[
            &["BÖLGE 1", "", ""],
            &["Satış Temsilcisi", "HEDEF", "SATIŞ"],
            &["Ahmet", "100", "80"],
            &["TOPLAM", "100", "80"],
            &["", "", ""],
            &["BÖLGE 2", "", ""],
            &["Satış Temsilcisi", "HEDEF", "SATIŞ"],
            &["Ayşe", "50", "60"],
        ]);
        let blocks = find_table_blocks(&grid, MARKER);
        assert_eq!(blocks.len(), 2);

        assert_eq!(blocks[0].title, "BÖLGE 1");
        assert_eq!((blocks[0].start_row, blocks[0].end_row), (1, 6));

        assert_eq!(blocks[1].title, "BÖLGE 2");
        assert_eq!((blocks[1].start_row, blocks[1].end_row), (6, 8));

        // contiguous cover of [first_marker, grid_end)
        assert_eq!(blocks[0].end_row, blocks[1].start_row);
        assert_eq!(blocks.last().unwrap().end_row, grid.height());
    }

    #[test]
    fn test_row_above_marker_stays_in_previous_block() {
        let grid = RawGrid::from_strings(&[
            &["Satış Temsilcisi", "SATIŞ"],
            &["Veli", ""],
            &["Satış Temsilcisi", "SATIŞ"],
            &["Ali", "1"],
        ]);
        let blocks = find_table_blocks(&grid, MARKER);
        assert_eq!(blocks[1].title, "Veli");
        assert_eq!((blocks[0].start_row, blocks[0].end_row), (0, 2));
    }

    #[test]
    fn test_heading_cell() {
        let grid = RawGrid::from_strings(&[&[" EGE "], &["Satış Temsilcisi"], &[""], &["x"]]);
        assert_eq!(heading_cell(&grid, 1), Some("EGE".to_string()));
        assert_eq!(heading_cell(&grid, 0), None);
        assert_eq!(heading_cell(&grid, 3), None);
    }

    #[test]
    fn test_adjacent_markers() {
        let grid = RawGrid::from_strings(&[&["Satış Temsilcisi"], &["Satış Temsilcisi"]]);
        let blocks = find_table_blocks(&grid, MARKER);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].len(), 1);
        assert_eq!(blocks[1].title, "Satış Temsilcisi");
    }

    #[test]
    fn test_deterministic() {
        let grid = RawGrid::from_strings(&[&["T"], &["Satış Temsilcisi"], &["a"]]);
        assert_eq!(
            find_table_blocks(&grid, MARKER),
            find_table_blocks(&grid, MARKER)
        );
    }
}
