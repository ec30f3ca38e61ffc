//! CLI command handlers

pub mod commands;

pub use commands::{
    aging, customers, export, normalize_names, overview, parse, rep, stock, totals, watch,
};
