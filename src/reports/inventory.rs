//! Stock list (`stok.xls`)

use crate::config::CoercionRule;
use crate::error::SalesboardResult;
use crate::excel::{read_table, HeaderTable};
use crate::parser::coerce;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

pub const CODE_COLUMN: &str = "Ürün Kodu";
pub const PRODUCT_COLUMN: &str = "Ürün";
pub const WAREHOUSE_COLUMN: &str = "Depo Adı";
pub const QUANTITY_COLUMN: &str = "Miktar";
pub const PRICE_COLUMN: &str = "Fiyat";
pub const GROSS_COLUMN: &str = "Brüt Tutar";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockItem {
    pub warehouse: String,
    pub code: String,
    pub product: String,
    pub quantity: f64,
    pub price: f64,
    pub gross: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarehouseSelection {
    All,
    Named(String),
}

impl WarehouseSelection {
    /// `None` or "all" selects every warehouse
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => WarehouseSelection::All,
            Some(v) if v.eq_ignore_ascii_case("all") => WarehouseSelection::All,
            Some(v) => WarehouseSelection::Named(v.to_string()),
        }
    }
}

/// Items shown for one warehouse selection, sorted by product name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockView {
    /// True when items were merged across warehouses
    pub aggregated: bool,
    pub items: Vec<StockItem>,
}

impl StockView {
    pub fn total_gross(&self) -> f64 {
        self.items.iter().map(|i| i.gross).sum()
    }

    pub fn product_count(&self) -> usize {
        self.items
            .iter()
            .map(|i| i.product.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Items whose quantity is below `level`
    pub fn critical(&self, level: f64) -> Vec<&StockItem> {
        self.items.iter().filter(|i| i.quantity < level).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Inventory {
    items: Vec<StockItem>,
}

impl Inventory {
    pub fn new(items: Vec<StockItem>) -> Self {
        Self { items }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> SalesboardResult<Self> {
        Self::from_table(&read_table(path)?)
    }

    /// `Brüt Tutar`, `Miktar` and `Ürün` are required; other columns default to blank
    pub fn from_table(table: &HeaderTable) -> SalesboardResult<Self> {
        let gross_col = table.require(GROSS_COLUMN)?;
        let quantity_col = table.require(QUANTITY_COLUMN)?;
        let product_col = table.require(PRODUCT_COLUMN)?;
        let code_col = table.column(CODE_COLUMN);
        let warehouse_col = table.column(WAREHOUSE_COLUMN);
        let price_col = table.column(PRICE_COLUMN);

        let text = |row: usize, col: Option<usize>| -> String {
            col.map(|c| table.cell(row, c).trimmed()).unwrap_or_default()
        };
        let number = |row: usize, col: Option<usize>| -> f64 {
            col.map(|c| coerce(table.cell(row, c), CoercionRule::Locale))
                .unwrap_or(0.0)
        };

        let items = (0..table.rows.len())
            .filter(|&row| !table.cell(row, product_col).is_blank())
            .map(|row| StockItem {
                warehouse: text(row, warehouse_col),
                code: text(row, code_col),
                product: text(row, Some(product_col)),
                quantity: number(row, Some(quantity_col)),
                price: number(row, price_col),
                gross: number(row, Some(gross_col)),
            })
            .collect();

        Ok(Self { items })
    }

    pub fn items(&self) -> &[StockItem] {
        &self.items
    }

    /// Gross value of every row, in stock or not
    pub fn total_gross(&self) -> f64 {
        self.items.iter().map(|i| i.gross).sum()
    }

    /// Rows with a positive quantity
    pub fn active(&self) -> Inventory {
        Inventory::new(
            self.items
                .iter()
                .filter(|i| i.quantity > 0.0)
                .cloned()
                .collect(),
        )
    }

    pub fn warehouses(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|i| !i.warehouse.is_empty())
            .map(|i| i.warehouse.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Active stock for one warehouse, or merged by code/product/price across all
    pub fn view(&self, selection: &WarehouseSelection) -> StockView {
        let active = self.active();
        let (aggregated, mut items) = match selection {
            WarehouseSelection::Named(name) => (
                false,
                active
                    .items
                    .into_iter()
                    .filter(|i| &i.warehouse == name)
                    .collect::<Vec<_>>(),
            ),
            WarehouseSelection::All => (true, aggregate(active.items)),
        };
        items.sort_by(|a, b| a.product.cmp(&b.product).then_with(|| a.code.cmp(&b.code)));
        StockView { aggregated, items }
    }
}

fn aggregate(items: Vec<StockItem>) -> Vec<StockItem> {
    let mut merged: Vec<StockItem> = Vec::new();
    let mut index: HashMap<(String, String, u64), usize> = HashMap::new();
    for item in items {
        let key = (item.code.clone(), item.product.clone(), item.price.to_bits());
        match index.get(&key) {
            Some(&pos) => {
                merged[pos].quantity += item.quantity;
                merged[pos].gross += item.gross;
            }
            None => {
                index.insert(key, merged.len());
                merged.push(StockItem {
                    warehouse: String::new(),
                    ..item
                });
            }
        }
    }
    merged
}
