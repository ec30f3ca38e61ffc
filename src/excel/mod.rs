//! Excel import/export
//!
//! - Import: any calamine-readable workbook → headerless grid, header table
//!   or single figure
//! - Export: parsed datasets and report listings → .xlsx

mod exporter;
mod importer;

pub use exporter::{export_overdue, ExcelExporter, TOTALS_SHEET};
pub use importer::{read_debt_figure, read_grid, read_table, ExcelImporter, HeaderTable};
