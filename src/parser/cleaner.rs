//! Per-table cleaning and numeric coercion

use crate::config::ParserConfig;
use crate::parser::normalize::normalize;
use crate::parser::numeric::coerce;
use crate::types::{CellValue, CleanedTable, Field, RawGrid, Record, TableBlock};
use tracing::debug;

/// Turn one block into a table with headers and typed records.
///
/// Returns `None` when fewer than two non-blank rows remain (no header plus
/// data), which is a normal outcome rather than an error.
pub fn clean(grid: &RawGrid, block: &TableBlock, config: &ParserConfig) -> Option<CleanedTable> {
    let width = grid.width();

    let rows: Vec<usize> = (block.start_row..block.end_row)
        .filter(|&r| (0..width).any(|c| !grid.get(r, c).is_blank()))
        .collect();

    if rows.len() < 2 {
        debug!(title = %block.title, rows = rows.len(), "block skipped, no data rows");
        return None;
    }

    let columns: Vec<usize> = (0..width)
        .filter(|&c| rows.iter().any(|&r| !grid.get(r, c).is_blank()))
        .collect();

    let header_row = rows[0];
    let headers: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(pos, &col)| {
            let label = grid.get(header_row, col).trimmed();
            if label.is_empty() {
                format!("col_{}", pos)
            } else {
                label
            }
        })
        .collect();

    let rules: Vec<_> = headers.iter().map(|h| config.rule_for(h)).collect();
    let name_pos = headers.iter().position(|h| *h == config.marker);

    let records = rows[1..]
        .iter()
        .map(|&row| {
            let fields: Vec<Field> = columns
                .iter()
                .zip(&headers)
                .zip(&rules)
                .map(|((&col, name), rule)| {
                    let cell = grid.get(row, col);
                    let value = match rule {
                        Some(rule) => CellValue::Number(coerce(cell, *rule)),
                        None => cell.clone(),
                    };
                    Field {
                        name: name.clone(),
                        value,
                    }
                })
                .collect();

            let representative = name_pos
                .map(|pos| fields[pos].value.trimmed())
                .unwrap_or_default();

            Record {
                group: block.title.clone(),
                normalized_key: normalize(&representative),
                representative,
                fields,
            }
        })
        .collect();

    Some(CleanedTable {
        group: block.title.clone(),
        headers,
        records,
        next_title: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::find_table_blocks;

    fn clean_first(grid: &RawGrid) -> Option<CleanedTable> {
        let config = ParserConfig::default();
        let blocks = find_table_blocks(grid, &config.marker);
        clean(grid, &blocks[0], &config)
    }

    #[test]
    fn test_header_only_block_is_absent() {
        let grid = RawGrid::from_strings(&[&["Satış Temsilcisi", "HEDEF"], &["", ""]]);
        assert!(clean_first(&grid).is_none());
    }

    #[test]
    fn test_drops_blank_rows_and_columns() {
        let grid = RawGrid::from_strings(&[
            &["Satış Temsilcisi", "", " HEDEF ", "SATIŞ"],
            &["", "", "", ""],
            &["Ahmet", "", "1000", "800"],
        ]);
        let table = clean_first(&grid).unwrap();
        assert_eq!(table.headers, vec!["Satış Temsilcisi", "HEDEF", "SATIŞ"]);
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0].number("HEDEF"), Some(1000.0));
        assert_eq!(table.records[0].number("SATIŞ"), Some(800.0));
    }

    #[test]
    fn test_non_numeric_columns_pass_through() {
        let grid = RawGrid::from_strings(&[
            &["Satış Temsilcisi", "BÖLGE", "KALAN"],
            &["Ayşe", "Ege", "abc"],
        ]);
        let table = clean_first(&grid).unwrap();
        let record = &table.records[0];
        assert_eq!(record.get("BÖLGE"), Some(&CellValue::Text("Ege".to_string())));
        assert_eq!(record.number("KALAN"), Some(0.0));
        assert_eq!(record.normalized_key, "ayse");
        assert_eq!(record.group, "Group 1");
    }

    #[test]
    fn test_missing_numeric_column_is_fine() {
        let grid = RawGrid::from_strings(&[&["Satış Temsilcisi", "HEDEF"], &["Ali", "5"]]);
        let table = clean_first(&grid).unwrap();
        assert!(!table.has_column("SATIŞ"));
        assert_eq!(table.records[0].number("SATIŞ"), None);
    }

    #[test]
    fn test_blank_header_gets_positional_name() {
        let grid = RawGrid::from_strings(&[&["Satış Temsilcisi", ""], &["Ali", "note"]]);
        let table = clean_first(&grid).unwrap();
        assert_eq!(table.headers, vec!["Satış Temsilcisi", "col_1"]);
    }

    #[test]
    fn test_name_with_blank_figures_before_next_marker_is_kept() {
        let grid = RawGrid::from_strings(&[
            &["Satış Temsilcisi", "HEDEF", "SATIŞ"],
            &["Ahmet", "100", "80"],
            &["Veli", "", ""],
            &["Satış Temsilcisi", "HEDEF", "SATIŞ"],
            &["Ayşe", "50", "60"],
        ]);
        let table = clean_first(&grid).unwrap();
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[1].representative, "Veli");
        assert_eq!(table.records[1].number("SATIŞ"), Some(0.0));
    }

    #[test]
    fn test_total_row_is_kept() {
        let grid = RawGrid::from_strings(&[
            &["Satış Temsilcisi", "SATIŞ"],
            &["Ali", "1"],
            &[" TOPLAM ", "1"],
        ]);
        let table = clean_first(&grid).unwrap();
        assert_eq!(table.records.len(), 2);
        assert!(table.records[1].is_total("TOPLAM"));
    }
}
