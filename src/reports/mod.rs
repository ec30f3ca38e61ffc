//! Reports consumed by the dashboard views
//!
//! Everything here reads already-loaded data; loading lives in
//! [`DashboardData`].

mod inventory;
mod ledger;

pub use inventory::{Inventory, StockItem, StockView, WarehouseSelection};
pub use ledger::{
    AgingBucket, AgingSummary, CustomerActivity, CustomerBalance, DormantCustomer, Ledger,
    LedgerEntry, OverdueEntry, RepresentativeBalance,
};

use crate::cache::DatasetCache;
use crate::config::Config;
use crate::excel::{read_debt_figure, read_grid};
use crate::parser::normalize;
use crate::types::{ParsedDataset, Totals};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

/// Everything loaded for one render/request cycle.
///
/// A file that fails to load leaves its slot empty so the remaining views
/// still work.
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    pub ledger: Option<Ledger>,
    pub inventory: Option<Inventory>,
    pub sales: Option<Arc<ParsedDataset>>,
    pub debt: f64,
}

impl DashboardData {
    pub fn load(config: &Config, cache: &DatasetCache) -> Self {
        let ledger = Ledger::load(config.ledger_path())
            .map_err(|e| warn!(error = %e, "ledger not loaded"))
            .ok();
        let inventory = Inventory::load(config.stock_path())
            .map_err(|e| warn!(error = %e, "stock list not loaded"))
            .ok();
        let sales = load_sales(config, cache);
        let debt = read_debt_figure(config.debt_path());

        Self {
            ledger,
            inventory,
            sales,
            debt,
        }
    }
}

/// Sales/target dataset through the cache; `None` if the file cannot be read
pub fn load_sales(config: &Config, cache: &DatasetCache) -> Option<Arc<ParsedDataset>> {
    match read_grid(config.sales_target_path()) {
        Ok(grid) => Some(cache.get_or_parse(&grid)),
        Err(e) => {
            warn!(error = %e, "sales/target file not loaded");
            None
        }
    }
}

/// One representative: ledger figures joined with sales by normalized name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepresentativeSummary {
    pub name: String,
    pub key: String,
    pub sales_total: f64,
    pub balance: f64,
    pub customer_count: usize,
    pub aging: AgingSummary,
    pub customers: Vec<CustomerBalance>,
}

pub fn representative_summary(
    name: &str,
    ledger: &Ledger,
    sales: Option<&ParsedDataset>,
    aging_thresholds: &[u32],
) -> RepresentativeSummary {
    let key = normalize(name);
    let rows = ledger.for_key(&key);
    RepresentativeSummary {
        name: name.trim().to_string(),
        sales_total: sales.map(|d| d.sales_for(&key)).unwrap_or(0.0),
        balance: rows.total_balance(),
        customer_count: rows.customer_count(),
        aging: rows.aging(aging_thresholds),
        customers: rows.positive_balances(),
        key,
    }
}

/// Headline figures across all inputs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub total_balance: Option<f64>,
    pub stock_gross: Option<f64>,
    pub debt: f64,
    pub sales_totals: Option<Totals>,
    pub aging: Option<AgingSummary>,
    pub balance_by_representative: Vec<RepresentativeBalance>,
}

pub fn overview(data: &DashboardData, aging_thresholds: &[u32]) -> Overview {
    Overview {
        total_balance: data.ledger.as_ref().map(Ledger::total_balance),
        stock_gross: data.inventory.as_ref().map(Inventory::total_gross),
        debt: data.debt,
        sales_totals: data.sales.as_ref().map(|d| d.grand_totals()),
        aging: data.ledger.as_ref().map(|l| l.aging(aging_thresholds)),
        balance_by_representative: data
            .ledger
            .as_ref()
            .map(Ledger::balance_by_representative)
            .unwrap_or_default(),
    }
}
