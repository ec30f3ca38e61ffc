//! Excel import/export tests
//!
//! Workbooks are written with rust_xlsxwriter into a temp dir and read back
//! through calamine.

use pretty_assertions::assert_eq;
use rust_xlsxwriter::Workbook;
use salesboard::excel::{
    export_overdue, read_debt_figure, read_grid, read_table, ExcelExporter, TOTALS_SHEET,
};
use salesboard::parser::assemble;
use salesboard::reports::{Inventory, Ledger, OverdueEntry, WarehouseSelection};
use salesboard::types::CellValue;
use salesboard::SalesboardError;
use std::path::Path;
use tempfile::TempDir;

/// Numbers are written as numbers, everything else as strings
fn write_sheet(path: &Path, rows: &[&[&str]]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            match value.parse::<f64>() {
                Ok(n) => worksheet.write_number(r as u32, c as u16, n).unwrap(),
                Err(_) => worksheet.write_string(r as u32, c as u16, *value).unwrap(),
            };
        }
    }
    workbook.save(path).unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════
// IMPORT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_read_grid_parses_stacked_tables() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("satis-hedef.xlsx");
    write_sheet(
        &path,
        &[
            &["BÖLGE 1", "", ""],
            &["Satış Temsilcisi", "HEDEF", "SATIŞ"],
            &["Ahmet", "1000", "800"],
            &["TOPLAM", "1000", "800"],
            &["", "", ""],
            &["BÖLGE 2", "", ""],
            &["Satış Temsilcisi", "HEDEF", "SATIŞ"],
            &["Ayşe", "500", "450"],
            &["TOPLAM", "500", "450"],
        ],
    );

    let dataset = assemble(&read_grid(&path).unwrap());
    assert_eq!(dataset.groups(), vec!["BÖLGE 1", "BÖLGE 2"]);
    assert_eq!(dataset.grand_totals().actual, 1250.0);
}

#[test]
fn test_read_grid_keeps_sheet_positions() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("offset.xlsx");
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(2, 1, "B3").unwrap();
    workbook.save(&path).unwrap();

    let grid = read_grid(&path).unwrap();
    assert_eq!(grid.height(), 3);
    assert_eq!(grid.get(2, 1), &CellValue::Text("B3".to_string()));
    assert!(grid.get(0, 0).is_blank());
}

#[test]
fn test_read_grid_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = read_grid(dir.path().join("missing.xlsx"));
    assert!(matches!(result, Err(SalesboardError::Workbook(_))));
}

#[test]
fn test_read_table_headers() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("table.xlsx");
    write_sheet(&path, &[&[" ST ", "", "Gün"], &["Ahmet", "x", "3"]]);

    let table = read_table(&path).unwrap();
    assert_eq!(table.headers, vec!["ST", "col_1", "Gün"]);
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.cell(0, 2), &CellValue::Number(3.0));
}

#[test]
fn test_ledger_and_inventory_from_workbooks() {
    let dir = TempDir::new().unwrap();
    let ledger_path = dir.path().join("rapor.xlsx");
    write_sheet(
        &ledger_path,
        &[
            &["ST", "Müşteri", "Gün", "Kalan Tutar Total"],
            &["Ahmet", "Market A", "70", "1.500,50"],
            &["Ahmet", "Market B", "10", "250"],
        ],
    );
    let ledger = Ledger::load(&ledger_path).unwrap();
    assert_eq!(ledger.total_balance(), 1750.5);
    assert_eq!(ledger.aging(&[35, 60]).above(60), 1500.5);

    let stock_path = dir.path().join("stok.xlsx");
    write_sheet(
        &stock_path,
        &[
            &["Depo Adı", "Ürün Kodu", "Ürün", "Miktar", "Fiyat", "Brüt Tutar"],
            &["Merkez", "P1", "Bisküvi", "30", "10", "300"],
        ],
    );
    let inventory = Inventory::load(&stock_path).unwrap();
    assert_eq!(inventory.view(&WarehouseSelection::All).total_gross(), 300.0);
}

#[test]
fn test_ledger_missing_column() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rapor.xlsx");
    write_sheet(&path, &[&["ST", "Müşteri"], &["Ahmet", "Market A"]]);

    match Ledger::load(&path) {
        Err(SalesboardError::MissingColumn { column, .. }) => assert_eq!(column, "Gün"),
        other => panic!("expected MissingColumn, got {:?}", other),
    }
}

#[test]
fn test_debt_figure() {
    let dir = TempDir::new().unwrap();

    let number = dir.path().join("number.xlsx");
    write_sheet(&number, &[&["125000.75"]]);
    assert_eq!(read_debt_figure(&number), 125000.75);

    let text = dir.path().join("text.xlsx");
    let mut workbook = Workbook::new();
    workbook
        .add_worksheet()
        .write_string(0, 0, " 1.234.567,89 ")
        .unwrap();
    workbook.save(&text).unwrap();
    assert_eq!(read_debt_figure(&text), 1234567.89);

    let garbage = dir.path().join("garbage.xlsx");
    write_sheet(&garbage, &[&["yok"]]);
    assert_eq!(read_debt_figure(&garbage), 0.0);

    assert_eq!(read_debt_figure(dir.path().join("missing.xlsx")), 0.0);
}

// ═══════════════════════════════════════════════════════════════════════════
// EXPORT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_export_writes_group_and_totals_sheets() {
    let dir = TempDir::new().unwrap();
    let grid = salesboard::RawGrid::from_strings(&[
        &["EGE", "", ""],
        &["Satış Temsilcisi", "HEDEF", "SATIŞ"],
        &["Ahmet", "1000", "800"],
        &["TOPLAM", "1000", "800"],
    ]);
    let dataset = assemble(&grid);
    let output = dir.path().join("out.xlsx");
    ExcelExporter::new(&dataset).export(&output).unwrap();

    use calamine::{open_workbook_auto, Reader};
    let mut workbook = open_workbook_auto(&output).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["EGE".to_string(), TOTALS_SHEET.to_string()]);

    // the group sheet parses back into the same records
    let group_grid = read_grid(&output).unwrap();
    assert_eq!(group_grid.get(1, 0), &CellValue::Text("Ahmet".to_string()));
    assert_eq!(group_grid.get(1, 2), &CellValue::Number(800.0));
}

#[test]
fn test_export_overdue_listing() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("overdue.xlsx");
    let entries = vec![OverdueEntry {
        representative: "Ahmet".to_string(),
        customer: "Market A".to_string(),
        balance: 1500.0,
        days: 70.0,
    }];
    export_overdue(&output, &entries).unwrap();

    let table = read_table(&output).unwrap();
    assert_eq!(table.headers[1], "Müşteri");
    assert_eq!(table.cell(0, 2), &CellValue::Number(1500.0));
}
