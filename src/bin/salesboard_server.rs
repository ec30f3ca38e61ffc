//! Salesboard API server binary
//!
//! HTTP REST API over the dashboard's spreadsheet exports.

use clap::Parser;
use salesboard::api::{run_api_server, ApiConfig};
use salesboard::config::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "salesboard-server")]
#[command(version)]
#[command(about = "Salesboard API Server - HTTP REST API for sales dashboard data")]
#[command(long_about = r#"
Salesboard API Server - HTTP REST API

Endpoints:
  - POST /api/v1/parse          - Tables recovered from the sales/target sheet
  - POST /api/v1/totals         - Per-group and grand totals
  - POST /api/v1/representative - Ledger and sales summary for one representative
  - POST /api/v1/overview       - Headline figures across all files

Additional endpoints:
  - GET  /health                - Health check
  - GET  /version               - Server version info
  - GET  /                      - API documentation

Example usage:
  salesboard-server --config salesboard.yaml
  salesboard-server --host 0.0.0.0 --port 3000

  curl -X POST http://localhost:8080/api/v1/representative \
    -H "Content-Type: application/json" \
    -d '{"name": "Ahmet Kalyoncu"}'
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "SALESBOARD_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "SALESBOARD_PORT")]
    port: u16,

    /// YAML configuration file
    #[arg(short, long, env = "SALESBOARD_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::load_or_default(args.config.as_deref())?;
    let api = ApiConfig {
        host: args.host,
        port: args.port,
    };

    run_api_server(api, config).await
}
