use crate::activity::ActivityLog;
use crate::cache::DatasetCache;
use crate::config::Config;
use crate::error::{SalesboardError, SalesboardResult};
use crate::excel::{export_overdue, read_grid, ExcelExporter};
use crate::parser::{normalize, SheetParser};
use crate::reports::{
    overview as build_overview, representative_summary, AgingSummary, DashboardData, Inventory,
    Ledger, WarehouseSelection,
};
use crate::types::{ParsedDataset, Totals};
use chrono::{Local, NaiveDate};
use colored::Colorize;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;

/// Format a money amount with thousands separators and two decimals
fn format_money(n: f64) -> String {
    let rounded = (n * 100.0).round() / 100.0;
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}{}.{} TL", sign, grouped, frac_part)
}

/// Achievement percentage, `None` when there is no target
fn achievement(totals: &Totals) -> Option<f64> {
    (totals.target > 0.0).then(|| totals.actual / totals.target * 100.0)
}

fn log_activity(config: &Config, action: &str, detail: &str) {
    if let Err(e) = ActivityLog::new(&config.activity_log).record(action, detail) {
        eprintln!(
            "{} could not write activity log {}: {}",
            "⚠️".yellow(),
            config.activity_log.display(),
            e
        );
    }
}

fn sales_path(config: &Config, file: Option<PathBuf>) -> PathBuf {
    file.unwrap_or_else(|| config.sales_target_path())
}

fn load_dataset(config: &Config, path: &Path) -> SalesboardResult<ParsedDataset> {
    let grid = read_grid(path)?;
    Ok(SheetParser::new(config.parser.clone()).assemble(&grid))
}

/// Execute the parse command
pub fn parse(config: &Config, file: Option<PathBuf>, json: bool) -> SalesboardResult<()> {
    let path = sales_path(config, file);
    let dataset = load_dataset(config, &path)?;
    log_activity(config, "parse", &path.display().to_string());

    if json {
        println!("{}", serde_json::to_string_pretty(&dataset)?);
        return Ok(());
    }

    println!("{}", "📊 Salesboard - Sales/Target Tables".bold().green());
    println!("   File: {}\n", path.display());

    if dataset.tables.is_empty() {
        println!("{}", "⚠️  No tables found".yellow());
        return Ok(());
    }

    for table in &dataset.tables {
        println!("{} ({} rows)", table.group.bold().cyan(), table.records.len());
        println!("   {}", table.headers.join(" | ").bold());
        for record in &table.records {
            let cells: Vec<String> = record.fields.iter().map(|f| f.value.to_string()).collect();
            let line = cells.join(" | ");
            if record.is_total(&dataset.total_label) {
                println!("   {}", line.bold());
            } else {
                println!("   {}", line);
            }
        }
        println!();
    }

    println!(
        "{} {} tables, {} records",
        "✅".green(),
        dataset.tables.len(),
        dataset.len()
    );
    Ok(())
}

/// Execute the totals command
pub fn totals(config: &Config, file: Option<PathBuf>) -> SalesboardResult<()> {
    let path = sales_path(config, file);
    let dataset = load_dataset(config, &path)?;
    log_activity(config, "totals", &path.display().to_string());

    println!("{}", "📊 Salesboard - Sales Totals".bold().green());
    println!("   File: {}\n", path.display());
    print_totals(&dataset);
    Ok(())
}

fn print_totals(dataset: &ParsedDataset) {
    for group in dataset.table_totals() {
        let marker = if group.has_total_row {
            String::new()
        } else {
            format!(" {}", "(no total row)".dimmed())
        };
        println!("   {}{}", group.group.bold(), marker);
        print_totals_line(&group.totals);
    }

    let grand = dataset.grand_totals();
    println!("\n   {}", dataset.total_label.bold().green());
    print_totals_line(&grand);
}

fn print_totals_line(totals: &Totals) {
    let pct = achievement(totals)
        .map(|p| format!("{:.1}%", p))
        .unwrap_or_else(|| "-".to_string());
    println!(
        "      Target: {}  Sales: {}  Remaining: {}  ({})",
        format_money(totals.target),
        format_money(totals.actual).bright_blue(),
        format_money(totals.remaining),
        pct
    );
}

/// Execute the rep command: list representatives, or summarize one
pub fn rep(config: &Config, name: Option<String>) -> SalesboardResult<()> {
    let ledger = Ledger::load(config.ledger_path())?;

    let Some(name) = name else {
        log_activity(config, "rep", "list");
        println!("{}", "👥 Salesboard - Representatives".bold().green());
        for rep in ledger.balance_by_representative() {
            println!(
                "   {:<30} {}",
                rep.representative,
                format_money(rep.balance).bright_blue()
            );
        }
        return Ok(());
    };

    let cache = DatasetCache::new(config.parser.clone());
    let sales = crate::reports::load_sales(config, &cache);
    let summary = representative_summary(
        &name,
        &ledger,
        sales.as_deref(),
        &config.reports.aging_thresholds,
    );
    log_activity(config, "rep", &summary.name);

    if summary.customers.is_empty() && summary.balance == 0.0 && summary.sales_total == 0.0 {
        return Err(SalesboardError::NotFound(format!(
            "No ledger or sales rows for representative '{}'",
            name
        )));
    }

    println!("{} {}", "👤 Representative:".bold().green(), summary.name.bold());
    println!("   Key:        {}", summary.key.dimmed());
    println!("   Sales:      {}", format_money(summary.sales_total).bright_blue());
    println!("   Balance:    {}", format_money(summary.balance));
    println!("   Customers:  {}", summary.customer_count);
    print_aging(&summary.aging);

    if !summary.customers.is_empty() {
        println!("\n   {}", "Customer balances".bold());
        for customer in &summary.customers {
            println!("      {:<40} {}", customer.customer, format_money(customer.balance));
        }
    }
    Ok(())
}

fn print_aging(aging: &AgingSummary) {
    for bucket in &aging.buckets {
        let label = format!("{} days", bucket.label);
        let amount = format_money(bucket.amount);
        if bucket.max_days.is_none() && bucket.amount > 0.0 {
            println!("   {:<12}{}", label, amount.red());
        } else {
            println!("   {:<12}{}", label, amount);
        }
    }
}

/// Execute the aging command
pub fn aging(
    config: &Config,
    representative: Option<String>,
    min_days: Option<f64>,
    output: Option<PathBuf>,
) -> SalesboardResult<()> {
    let ledger = Ledger::load(config.ledger_path())?;
    let ledger = match &representative {
        Some(name) => ledger.for_key(&normalize(name)),
        None => ledger,
    };
    log_activity(
        config,
        "aging",
        representative.as_deref().unwrap_or("all"),
    );

    println!("{}", "⏳ Salesboard - Overdue Receivables".bold().green());
    if let Some(name) = &representative {
        println!("   Representative: {}", name);
    }
    print_aging(&ledger.aging(&config.reports.aging_thresholds));

    let Some(min_days) = min_days else {
        return Ok(());
    };

    let rows = ledger.overdue(min_days);
    println!(
        "\n   {} ({} rows, {}+ days)",
        "Overdue listing".bold(),
        rows.len(),
        min_days
    );
    for row in &rows {
        println!(
            "      {:<24} {:<40} {:>16} {:>6}",
            row.representative,
            row.customer,
            format_money(row.balance),
            row.days
        );
    }

    if let Some(output) = output {
        export_overdue(&output, &rows)?;
        println!("\n{} {}", "✅ Listing written to".bold().green(), output.display());
    }
    Ok(())
}

/// Execute the customers command
pub fn customers(config: &Config, top: Option<usize>, dormant_days: Option<u32>) -> SalesboardResult<()> {
    let ledger = Ledger::load(config.ledger_path())?;
    log_activity(config, "customers", "");

    let top = top.unwrap_or(config.reports.top_customers);
    let dormant_days = dormant_days.unwrap_or(config.reports.dormant_days);

    println!("{}", "🏪 Salesboard - Customers".bold().green());
    println!("   Distinct customers: {}\n", ledger.customer_count());

    println!("   {}", format!("Top {} by balance", top).bold());
    for row in ledger.top_customers(top) {
        println!("      {:<40} {}", row.customer, format_money(row.balance));
    }

    println!("\n   {}", format!("Top {} by transactions", top).bold());
    for row in ledger.frequent_customers(top) {
        println!("      {:<40} {}", row.customer, row.transactions);
    }

    let today: NaiveDate = Local::now().date_naive();
    let dormant = ledger.dormant_customers(f64::from(dormant_days), today);
    println!(
        "\n   {} ({})",
        format!("No activity for {}+ days", dormant_days).bold(),
        dormant.len()
    );
    for row in dormant {
        let last = row
            .last_activity
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("      {:<40} {:>6} days  {}", row.customer, row.days, last);
    }
    Ok(())
}

/// Execute the stock command
pub fn stock(config: &Config, warehouse: Option<String>, critical_only: bool) -> SalesboardResult<()> {
    let inventory = Inventory::load(config.stock_path())?;
    let selection = WarehouseSelection::parse(warehouse.as_deref());
    log_activity(config, "stock", warehouse.as_deref().unwrap_or("all"));

    let view = inventory.view(&selection);
    let level = config.reports.critical_stock_level;
    let critical = view.critical(level);

    println!("{}", "📦 Salesboard - Stock".bold().green());
    match &selection {
        WarehouseSelection::All => println!("   Warehouse: all ({})", inventory.warehouses().join(", ")),
        WarehouseSelection::Named(name) => println!("   Warehouse: {}", name),
    }
    println!("   Products:    {}", view.product_count());
    println!("   Gross value: {}", format_money(view.total_gross()).bright_blue());
    println!("   Critical (< {}): {}\n", level, critical.len());

    let items: Vec<_> = if critical_only {
        critical
    } else {
        view.items.iter().collect()
    };
    for item in items {
        let line = format!(
            "   {:<12} {:<40} {:>10} {:>16}",
            item.code,
            item.product,
            item.quantity,
            format_money(item.gross)
        );
        if item.quantity < level {
            println!("{}", line.red());
        } else {
            println!("{}", line);
        }
    }
    Ok(())
}

/// Execute the overview command
pub fn overview(config: &Config) -> SalesboardResult<()> {
    let cache = DatasetCache::new(config.parser.clone());
    let data = DashboardData::load(config, &cache);
    let view = build_overview(&data, &config.reports.aging_thresholds);
    log_activity(config, "overview", "");

    let money = |v: Option<f64>| v.map(format_money).unwrap_or_else(|| "n/a".to_string());

    println!("{}", "📈 Salesboard - Overview".bold().green());
    println!("   Receivables: {}", money(view.total_balance).bright_blue());
    println!("   Stock value: {}", money(view.stock_gross));
    println!("   Debt:        {}", format_money(view.debt));
    match &view.sales_totals {
        Some(t) => print_totals_line(t),
        None => println!("   Sales:       n/a"),
    }
    if let Some(aging) = &view.aging {
        println!();
        print_aging(aging);
    }
    if !view.balance_by_representative.is_empty() {
        println!("\n   {}", "Balance by representative".bold());
        for rep in &view.balance_by_representative {
            println!("      {:<30} {}", rep.representative, format_money(rep.balance));
        }
    }
    Ok(())
}

/// Execute the export command
pub fn export(config: &Config, input: Option<PathBuf>, output: PathBuf) -> SalesboardResult<()> {
    let path = sales_path(config, input);
    println!("{}", "📤 Salesboard - Excel Export".bold().green());
    println!("   Input:  {}", path.display());
    println!("   Output: {}\n", output.display());

    let dataset = load_dataset(config, &path)?;
    ExcelExporter::new(&dataset).export(&output)?;
    log_activity(config, "export", &output.display().to_string());

    println!("{}", "✅ Export Complete!".bold().green());
    println!(
        "   {} group sheets + totals sheet\n",
        dataset.tables.len()
    );
    Ok(())
}

/// Execute the normalize command
pub fn normalize_names(names: &[String]) {
    for name in names {
        println!("{:<30} → {}", name, normalize(name).bright_blue());
    }
}

/// Re-parse the sales/target file whenever it changes
pub fn watch(config: &Config, file: Option<PathBuf>) -> SalesboardResult<()> {
    let path = sales_path(config, file);
    println!("{}", "👁️  Salesboard - Watch Mode".bold().green());
    println!("   Watching: {}", path.display());
    println!("   Press {} to stop\n", "Ctrl+C".bold().yellow());

    if !path.exists() {
        return Err(SalesboardError::NotFound(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let canonical_path = path.canonicalize()?;
    let parent_dir = canonical_path
        .parent()
        .ok_or_else(|| SalesboardError::Config("Cannot determine parent directory".to_string()))?;

    let (tx, rx) = channel();
    let mut debouncer = new_debouncer(Duration::from_millis(200), tx)
        .map_err(|e| SalesboardError::Config(format!("Failed to create file watcher: {}", e)))?;
    debouncer
        .watcher()
        .watch(parent_dir, RecursiveMode::NonRecursive)
        .map_err(|e| SalesboardError::Config(format!("Failed to watch directory: {}", e)))?;

    let cache = DatasetCache::new(config.parser.clone());
    log_activity(config, "watch", &path.display().to_string());

    println!("{}", "🔄 Initial run...".cyan());
    run_watch_action(&canonical_path, &cache);
    println!();

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant = events.iter().any(|event| {
                    event.kind == DebouncedEventKind::Any
                        && event.path.file_name() == canonical_path.file_name()
                });
                if relevant {
                    println!(
                        "\n{} {}",
                        "🔄 Change detected at".cyan(),
                        Local::now().format("%H:%M:%S").to_string().cyan()
                    );
                    run_watch_action(&canonical_path, &cache);
                    println!();
                }
            }
            Ok(Err(error)) => {
                eprintln!("{} Watch error: {}", "❌".red(), error);
            }
            Err(e) => {
                eprintln!("{} Channel error: {}", "❌".red(), e);
                break;
            }
        }
    }

    Ok(())
}

fn run_watch_action(path: &Path, cache: &DatasetCache) {
    match read_grid(path) {
        Ok(grid) => {
            let dataset = cache.get_or_parse(&grid);
            print_totals(&dataset);
        }
        Err(e) => println!("{} {}", "❌ Read failed:".bold().red(), e),
    }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
