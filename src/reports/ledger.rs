//! Receivables ledger (`rapor.xls`) and the reports built on it

use crate::config::CoercionRule;
use crate::error::SalesboardResult;
use crate::excel::{read_table, HeaderTable};
use crate::parser::{coerce, normalize, parse_plain};
use crate::types::CellValue;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

pub const REPRESENTATIVE_COLUMN: &str = "ST";
pub const CUSTOMER_COLUMN: &str = "Müşteri";
pub const DAYS_COLUMN: &str = "Gün";
pub const BALANCE_COLUMN: &str = "Kalan Tutar Total";

/// Upper bound on day counts taken from the sheet
const MAX_DAYS: f64 = 100_000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    pub representative: String,
    /// Normalized representative name, joins against the sales dataset
    pub rep_key: String,
    pub customer: String,
    /// Days past due; `None` when the cell is blank or not a number
    pub days: Option<f64>,
    pub balance: f64,
}

impl LedgerEntry {
    /// Past due with money still owed
    pub fn is_overdue(&self) -> bool {
        self.days.is_some_and(|d| d > 0.0) && self.balance > 0.0
    }
}

/// Row of an overdue listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverdueEntry {
    pub representative: String,
    pub customer: String,
    pub balance: f64,
    pub days: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerBalance {
    pub customer: String,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerActivity {
    pub customer: String,
    pub transactions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DormantCustomer {
    pub customer: String,
    pub days: f64,
    pub last_activity: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepresentativeBalance {
    pub representative: String,
    pub balance: f64,
}

/// One overdue bucket. `max_days: None` means open-ended ("60+").
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgingBucket {
    pub label: String,
    pub min_days_exclusive: u32,
    pub max_days: Option<u32>,
    pub amount: f64,
}

/// Overdue balances split by age. Open-ended buckets overlap: a 70-day
/// item counts in "35+", "45+" and "60+".
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct AgingSummary {
    pub buckets: Vec<AgingBucket>,
}

impl AgingSummary {
    /// Amount of the open-ended bucket starting after `days`
    pub fn above(&self, days: u32) -> f64 {
        self.buckets
            .iter()
            .find(|b| b.max_days.is_none() && b.min_days_exclusive == days)
            .map(|b| b.amount)
            .unwrap_or(0.0)
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.buckets
            .iter()
            .find(|b| b.label == label)
            .map(|b| b.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    pub fn new(entries: Vec<LedgerEntry>) -> Self {
        Self { entries }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> SalesboardResult<Self> {
        Self::from_table(&read_table(path)?)
    }

    /// Build from a header table; rows without a representative are dropped
    pub fn from_table(table: &HeaderTable) -> SalesboardResult<Self> {
        let rep_col = table.require(REPRESENTATIVE_COLUMN)?;
        let customer_col = table.require(CUSTOMER_COLUMN)?;
        let days_col = table.require(DAYS_COLUMN)?;
        let balance_col = table.require(BALANCE_COLUMN)?;

        let entries = (0..table.rows.len())
            .filter(|&row| !table.cell(row, rep_col).is_blank())
            .map(|row| {
                let representative = table.cell(row, rep_col).trimmed();
                LedgerEntry {
                    rep_key: normalize(&representative),
                    representative,
                    customer: table.cell(row, customer_col).trimmed(),
                    days: read_days(table.cell(row, days_col)),
                    balance: coerce(table.cell(row, balance_col), CoercionRule::Locale),
                }
            })
            .collect();

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_balance(&self) -> f64 {
        self.entries.iter().map(|e| e.balance).sum()
    }

    /// Distinct representative names, sorted
    pub fn representatives(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| e.representative.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn customer_count(&self) -> usize {
        self.entries
            .iter()
            .map(|e| e.customer.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Entries of one representative, matched by exact name
    pub fn for_representative(&self, name: &str) -> Ledger {
        Ledger::new(
            self.entries
                .iter()
                .filter(|e| e.representative == name)
                .cloned()
                .collect(),
        )
    }

    /// Entries whose normalized representative name equals `key`
    pub fn for_key(&self, key: &str) -> Ledger {
        Ledger::new(
            self.entries
                .iter()
                .filter(|e| e.rep_key == key)
                .cloned()
                .collect(),
        )
    }

    /// Total balance per representative, largest first
    pub fn balance_by_representative(&self) -> Vec<RepresentativeBalance> {
        let mut sums: Vec<RepresentativeBalance> = sum_by(&self.entries, |e| &e.representative)
            .into_iter()
            .map(|(representative, balance)| RepresentativeBalance {
                representative,
                balance,
            })
            .collect();
        sums.sort_by(|a, b| {
            b.balance
                .total_cmp(&a.balance)
                .then_with(|| a.representative.cmp(&b.representative))
        });
        sums
    }

    /// Overdue amounts: "1-N" for the first threshold, then "T+" per threshold
    pub fn aging(&self, thresholds: &[u32]) -> AgingSummary {
        let overdue: Vec<&LedgerEntry> = self.entries.iter().filter(|e| e.is_overdue()).collect();
        let sum_where = |pred: &dyn Fn(f64) -> bool| -> f64 {
            overdue
                .iter()
                .filter(|e| e.days.is_some_and(pred))
                .map(|e| e.balance)
                .sum()
        };

        let mut buckets = Vec::new();
        match thresholds.first() {
            Some(&first) => buckets.push(AgingBucket {
                label: format!("1-{}", first),
                min_days_exclusive: 0,
                max_days: Some(first),
                amount: sum_where(&|d: f64| d <= f64::from(first)),
            }),
            None => buckets.push(AgingBucket {
                label: "1+".to_string(),
                min_days_exclusive: 0,
                max_days: None,
                amount: sum_where(&|_: f64| true),
            }),
        }
        for &t in thresholds {
            buckets.push(AgingBucket {
                label: format!("{}+", t),
                min_days_exclusive: t,
                max_days: None,
                amount: sum_where(&|d: f64| d > f64::from(t)),
            });
        }

        AgingSummary { buckets }
    }

    /// Overdue entries at least `min_days` late, latest first
    pub fn overdue(&self, min_days: f64) -> Vec<OverdueEntry> {
        let mut rows: Vec<OverdueEntry> = self
            .entries
            .iter()
            .filter(|e| e.is_overdue())
            .filter_map(|e| {
                let days = e.days?;
                (days >= min_days).then(|| OverdueEntry {
                    representative: e.representative.clone(),
                    customer: e.customer.clone(),
                    balance: e.balance,
                    days,
                })
            })
            .collect();
        rows.sort_by(|a, b| b.days.total_cmp(&a.days));
        rows
    }

    /// Positive-balance rows, largest first
    pub fn positive_balances(&self) -> Vec<CustomerBalance> {
        let mut rows: Vec<CustomerBalance> = self
            .entries
            .iter()
            .filter(|e| e.balance > 0.0)
            .map(|e| CustomerBalance {
                customer: e.customer.clone(),
                balance: e.balance,
            })
            .collect();
        rows.sort_by(|a, b| b.balance.total_cmp(&a.balance));
        rows
    }

    /// Customers with the largest total balance
    pub fn top_customers(&self, n: usize) -> Vec<CustomerBalance> {
        let mut sums: Vec<CustomerBalance> = sum_by(&self.entries, |e| &e.customer)
            .into_iter()
            .map(|(customer, balance)| CustomerBalance { customer, balance })
            .collect();
        sums.sort_by(|a, b| {
            b.balance
                .total_cmp(&a.balance)
                .then_with(|| a.customer.cmp(&b.customer))
        });
        sums.truncate(n);
        sums
    }

    /// Customers with the most ledger rows
    pub fn frequent_customers(&self, n: usize) -> Vec<CustomerActivity> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for entry in &self.entries {
            *counts.entry(entry.customer.as_str()).or_default() += 1;
        }
        let mut rows: Vec<CustomerActivity> = counts
            .into_iter()
            .map(|(customer, transactions)| CustomerActivity {
                customer: customer.to_string(),
                transactions,
            })
            .collect();
        rows.sort_by(|a, b| {
            b.transactions
                .cmp(&a.transactions)
                .then_with(|| a.customer.cmp(&b.customer))
        });
        rows.truncate(n);
        rows
    }

    /// Customers whose largest day count is at least `min_days`.
    ///
    /// The last activity date is inferred as `today - days`.
    pub fn dormant_customers(&self, min_days: f64, today: NaiveDate) -> Vec<DormantCustomer> {
        let mut latest: HashMap<&str, f64> = HashMap::new();
        for entry in &self.entries {
            if let Some(days) = entry.days {
                let slot = latest.entry(entry.customer.as_str()).or_insert(days);
                if days > *slot {
                    *slot = days;
                }
            }
        }

        let mut rows: Vec<DormantCustomer> = latest
            .into_iter()
            .filter(|(_, days)| *days >= min_days)
            .map(|(customer, days)| DormantCustomer {
                customer: customer.to_string(),
                days,
                last_activity: today.checked_sub_signed(Duration::days(days.round() as i64)),
            })
            .collect();
        rows.sort_by(|a, b| {
            b.days
                .total_cmp(&a.days)
                .then_with(|| a.customer.cmp(&b.customer))
        });
        rows
    }
}

fn read_days(cell: &CellValue) -> Option<f64> {
    let days = match cell {
        CellValue::Number(n) => Some(*n),
        CellValue::Text(s) => parse_plain(s),
        _ => None,
    }?;
    days.is_finite().then_some(days.clamp(-MAX_DAYS, MAX_DAYS))
}

fn sum_by<'a, F>(entries: &'a [LedgerEntry], key: F) -> Vec<(String, f64)>
where
    F: Fn(&'a LedgerEntry) -> &'a String,
{
    let mut order: Vec<&String> = Vec::new();
    let mut sums: HashMap<&String, f64> = HashMap::new();
    for entry in entries {
        let k = key(entry);
        if !sums.contains_key(k) {
            order.push(k);
        }
        *sums.entry(k).or_default() += entry.balance;
    }
    order
        .into_iter()
        .map(|k| (k.clone(), sums.get(k).copied().unwrap_or(0.0)))
        .collect()
}
