use clap::{Parser, Subcommand};
use salesboard::cli;
use salesboard::config::Config;
use salesboard::error::SalesboardResult;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "salesboard")]
#[command(about = "Sales dashboard data from spreadsheet exports")]
#[command(long_about = "Salesboard - sales dashboard data from spreadsheet exports

Reads the sales/target sheet (several tables stacked in one sheet), the
receivables ledger, the stock list and the debt figure.

COMMANDS:
  parse      - Show the tables recovered from the sales/target sheet
  totals     - Per-group and grand sales totals
  rep        - Representatives, or one representative's summary
  aging      - Overdue receivables by age
  customers  - Top, frequent and dormant customers
  stock      - Stock per warehouse and critical items
  overview   - Headline figures across all files
  export     - Sales/target tables to Excel (.xlsx)
  watch      - Re-parse the sales/target sheet on change
  normalize  - Show the join key for representative names

EXAMPLES:
  salesboard totals
  salesboard rep \"Ahmet Kalyoncu\"
  salesboard aging --min-days 60 --output overdue.xlsx
  salesboard stock --warehouse Merkez --critical-only")]
#[command(version)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true, env = "SALESBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the input files (overrides the config)
    #[arg(short = 'd', long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the tables recovered from the sales/target sheet
    Parse {
        /// Sales/target workbook (defaults to the configured file)
        file: Option<PathBuf>,

        /// Print the dataset as JSON
        #[arg(long)]
        json: bool,
    },

    /// Per-group and grand sales totals
    Totals {
        /// Sales/target workbook (defaults to the configured file)
        file: Option<PathBuf>,
    },

    /// List representatives, or summarize one
    Rep {
        /// Representative name (matched after normalization)
        name: Option<String>,
    },

    /// Overdue receivables by age
    Aging {
        /// Only this representative
        #[arg(short, long)]
        rep: Option<String>,

        /// List overdue rows at least this many days late
        #[arg(short, long)]
        min_days: Option<f64>,

        /// Write the overdue listing to an Excel file (needs --min-days)
        #[arg(short, long, requires = "min_days")]
        output: Option<PathBuf>,
    },

    /// Top, frequent and dormant customers
    Customers {
        /// Rows in the top lists
        #[arg(short, long)]
        top: Option<usize>,

        /// Days without activity before a customer counts as dormant
        #[arg(long)]
        dormant_days: Option<u32>,
    },

    /// Stock per warehouse and critical items
    Stock {
        /// Warehouse name, or "all"
        #[arg(short, long)]
        warehouse: Option<String>,

        /// Only items below the critical level
        #[arg(long)]
        critical_only: bool,
    },

    /// Headline figures across all files
    Overview,

    /// Export the sales/target tables to Excel .xlsx
    Export {
        /// Output Excel file path (.xlsx)
        output: PathBuf,

        /// Sales/target workbook (defaults to the configured file)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Re-parse the sales/target sheet whenever it changes
    Watch {
        /// Sales/target workbook (defaults to the configured file)
        file: Option<PathBuf>,
    },

    /// Show the join key for representative names
    Normalize {
        /// Names to normalize
        #[arg(required = true)]
        names: Vec<String>,
    },
}

fn main() -> SalesboardResult<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "salesboard=warn".into()),
        )
        .init();

    let mut config = Config::load_or_default(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    match cli.command {
        Commands::Parse { file, json } => cli::parse(&config, file, json),

        Commands::Totals { file } => cli::totals(&config, file),

        Commands::Rep { name } => cli::rep(&config, name),

        Commands::Aging {
            rep,
            min_days,
            output,
        } => cli::aging(&config, rep, min_days, output),

        Commands::Customers { top, dormant_days } => cli::customers(&config, top, dormant_days),

        Commands::Stock {
            warehouse,
            critical_only,
        } => cli::stock(&config, warehouse, critical_only),

        Commands::Overview => cli::overview(&config),

        Commands::Export { output, input } => cli::export(&config, input, output),

        Commands::Watch { file } => cli::watch(&config, file),

        Commands::Normalize { names } => {
            cli::normalize_names(&names);
            Ok(())
        }
    }
}
