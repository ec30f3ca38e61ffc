//! Salesboard - sales dashboard data layer
//!
//! Reads the spreadsheet exports behind a sales dashboard and turns them into
//! typed, queryable data.
//!
//! # Features
//!
//! - Multi-table sales/target sheet parser (tables recovered from one sheet
//!   by their marker header row)
//! - Turkish-aware name normalization for joining representatives across files
//! - Receivables ledger, aging and customer reports
//! - Stock views per warehouse
//! - Excel import (calamine) and export (rust_xlsxwriter)
//!
//! # Example
//!
//! ```no_run
//! use salesboard::excel::read_grid;
//! use salesboard::parser::assemble;
//!
//! let grid = read_grid("satis-hedef.xlsx")?;
//! let dataset = assemble(&grid);
//!
//! println!("Tables: {}", dataset.tables.len());
//! println!("Sales: {}", dataset.grand_totals().actual);
//! # Ok::<(), salesboard::error::SalesboardError>(())
//! ```

pub mod activity;
pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod excel;
pub mod parser;
pub mod reports;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{SalesboardError, SalesboardResult};
pub use types::{CellValue, CleanedTable, ParsedDataset, RawGrid, Record, TableBlock, Totals};
