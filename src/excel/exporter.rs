//! Excel exporter: parsed datasets and report listings → .xlsx

use crate::error::SalesboardResult;
use crate::reports::OverdueEntry;
use crate::types::{CellValue, CleanedTable, ParsedDataset};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::collections::HashSet;
use std::path::Path;

/// Excel worksheet names are limited to 31 characters
const MAX_SHEET_NAME: usize = 31;

/// Name of the sheet holding per-group and grand totals
pub const TOTALS_SHEET: &str = "Toplamlar";

pub struct ExcelExporter<'a> {
    dataset: &'a ParsedDataset,
}

impl<'a> ExcelExporter<'a> {
    pub fn new(dataset: &'a ParsedDataset) -> Self {
        Self { dataset }
    }

    /// One worksheet per table, followed by the totals sheet
    pub fn export(&self, output_path: &Path) -> SalesboardResult<()> {
        let mut workbook = Workbook::new();
        let mut used_names = HashSet::new();
        used_names.insert(TOTALS_SHEET.to_lowercase());

        for table in &self.dataset.tables {
            let name = unique_sheet_name(&table.group, &mut used_names);
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&name)?;
            write_table(worksheet, table)?;
        }

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(TOTALS_SHEET)?;
        self.write_totals(worksheet)?;

        workbook.save(output_path)?;
        Ok(())
    }

    fn write_totals(&self, worksheet: &mut Worksheet) -> SalesboardResult<()> {
        let bold = Format::new().set_bold();
        let money = Format::new().set_num_format("#,##0.00");

        for (col, label) in ["Grup", "HEDEF", "SATIŞ", "KALAN"].iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *label, &bold)?;
        }
        worksheet.set_column_width(0, 28)?;

        let per_table = self.dataset.table_totals();
        for (i, group) in per_table.iter().enumerate() {
            let row = (i + 1) as u32;
            worksheet.write_string(row, 0, &group.group)?;
            worksheet.write_number_with_format(row, 1, group.totals.target, &money)?;
            worksheet.write_number_with_format(row, 2, group.totals.actual, &money)?;
            worksheet.write_number_with_format(row, 3, group.totals.remaining, &money)?;
        }

        let grand = self.dataset.grand_totals();
        let row = (per_table.len() + 1) as u32;
        worksheet.write_string_with_format(row, 0, &self.dataset.total_label, &bold)?;
        worksheet.write_number_with_format(row, 1, grand.target, &money)?;
        worksheet.write_number_with_format(row, 2, grand.actual, &money)?;
        worksheet.write_number_with_format(row, 3, grand.remaining, &money)?;
        Ok(())
    }
}

fn write_table(worksheet: &mut Worksheet, table: &CleanedTable) -> SalesboardResult<()> {
    let bold = Format::new().set_bold();

    for (col, header) in table.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &bold)?;
    }
    worksheet.set_column_width(0, 28)?;

    for (i, record) in table.records.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, field) in record.fields.iter().enumerate() {
            let col = col as u16;
            match &field.value {
                CellValue::Empty => {}
                CellValue::Number(n) => {
                    worksheet.write_number(row, col, *n)?;
                }
                CellValue::Bool(b) => {
                    worksheet.write_boolean(row, col, *b)?;
                }
                CellValue::Text(s) => {
                    worksheet.write_string(row, col, s)?;
                }
            }
        }
    }
    Ok(())
}

/// Export an overdue-receivables listing
pub fn export_overdue(output_path: &Path, entries: &[OverdueEntry]) -> SalesboardResult<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Rapor")?;

    let bold = Format::new().set_bold();
    let money = Format::new().set_num_format("#,##0.00");

    for (col, label) in ["Temsilci", "Müşteri", "Bakiye (TL)", "Gecikme Günü"]
        .iter()
        .enumerate()
    {
        worksheet.write_string_with_format(0, col as u16, *label, &bold)?;
    }
    worksheet.set_column_width(0, 24)?;
    worksheet.set_column_width(1, 40)?;

    for (i, entry) in entries.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write_string(row, 0, &entry.representative)?;
        worksheet.write_string(row, 1, &entry.customer)?;
        worksheet.write_number_with_format(row, 2, entry.balance, &money)?;
        worksheet.write_number(row, 3, entry.days)?;
    }

    workbook.save(output_path)?;
    Ok(())
}

/// Make `title` a valid, not yet used worksheet name
fn unique_sheet_name(title: &str, used: &mut HashSet<String>) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            other => other,
        })
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'').to_string();
    let base: String = if cleaned.is_empty() {
        "Sheet".to_string()
    } else {
        cleaned.chars().take(MAX_SHEET_NAME).collect()
    };

    let mut candidate = base.clone();
    let mut n = 2;
    while used.contains(&candidate.to_lowercase()) {
        let suffix = format!(" ({})", n);
        let keep = MAX_SHEET_NAME.saturating_sub(suffix.chars().count());
        candidate = format!("{}{}", base.chars().take(keep).collect::<String>(), suffix);
        n += 1;
    }
    used.insert(candidate.to_lowercase());
    candidate
}
