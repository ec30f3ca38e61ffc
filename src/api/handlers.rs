//! API request handlers
//!
//! Workbook reads are blocking, so each data endpoint runs its work on the
//! blocking pool.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::SalesboardResult;
use crate::excel::read_grid;
use crate::reports::{overview as build_overview, representative_summary, DashboardData, Ledger};
use crate::reports::{Overview, RepresentativeSummary};
use crate::types::{GroupTotals, ParsedDataset, Totals};

use super::server::AppState;

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }

    fn from_result(result: SalesboardResult<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e.to_string()),
        }
    }
}

/// Run blocking work against the shared state
async fn run_blocking<T, F>(state: Arc<AppState>, work: F) -> ApiResponse<T>
where
    T: Serialize + Send + 'static,
    F: FnOnce(&AppState) -> SalesboardResult<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(move || work(&state)).await {
        Ok(result) => ApiResponse::from_result(result),
        Err(e) => ApiResponse::err(format!("worker failed: {}", e)),
    }
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

impl EndpointInfo {
    fn new(path: &str, method: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_string(),
            description: description.to_string(),
        }
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = RootResponse {
        name: "Salesboard API Server".to_string(),
        version: state.version.clone(),
        description: "Sales dashboard data from spreadsheet exports".to_string(),
        endpoints: vec![
            EndpointInfo::new("/health", "GET", "Health check endpoint"),
            EndpointInfo::new("/version", "GET", "Get server version"),
            EndpointInfo::new("/api/v1/parse", "POST", "Parse the sales/target sheet"),
            EndpointInfo::new("/api/v1/totals", "POST", "Per-group and grand sales totals"),
            EndpointInfo::new(
                "/api/v1/representative",
                "POST",
                "Ledger and sales summary for one representative",
            ),
            EndpointInfo::new("/api/v1/overview", "POST", "Headline figures across all files"),
        ],
    };
    Json(ApiResponse::ok(response))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub cached_datasets: usize,
}

/// GET /health - Health check
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        cached_datasets: state.cache.len(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: ["parse", "totals", "representative", "overview"]
            .iter()
            .map(|f| f.to_string())
            .collect(),
    }))
}

/// Sales/target file selection; the configured file when absent
#[derive(Deserialize, Default)]
pub struct SheetRequest {
    #[serde(default)]
    pub file_path: Option<String>,
}

impl SheetRequest {
    fn path(&self, state: &AppState) -> PathBuf {
        self.file_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| state.config.sales_target_path())
    }
}

fn load_dataset(state: &AppState, path: &Path) -> SalesboardResult<Arc<ParsedDataset>> {
    let grid = read_grid(path)?;
    Ok(state.cache.get_or_parse(&grid))
}

/// Parse response
#[derive(Serialize)]
pub struct ParseResponse {
    pub file_path: String,
    pub table_count: usize,
    pub record_count: usize,
    pub dataset: ParsedDataset,
}

/// POST /api/v1/parse - Parse the sales/target sheet
pub async fn parse(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SheetRequest>,
) -> impl IntoResponse {
    Json(
        run_blocking(state, move |state| {
            let path = req.path(state);
            let dataset = load_dataset(state, &path)?;
            info!(file = %path.display(), tables = dataset.tables.len(), "parse");
            Ok(ParseResponse {
                file_path: path.display().to_string(),
                table_count: dataset.tables.len(),
                record_count: dataset.len(),
                dataset: dataset.as_ref().clone(),
            })
        })
        .await,
    )
}

/// Totals response
#[derive(Serialize)]
pub struct TotalsResponse {
    pub groups: Vec<GroupTotals>,
    pub grand: Totals,
}

/// POST /api/v1/totals - Per-group and grand totals
pub async fn totals(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SheetRequest>,
) -> impl IntoResponse {
    Json(
        run_blocking(state, move |state| {
            let dataset = load_dataset(state, &req.path(state))?;
            Ok(TotalsResponse {
                groups: dataset.table_totals(),
                grand: dataset.grand_totals(),
            })
        })
        .await,
    )
}

/// Representative request
#[derive(Deserialize)]
pub struct RepresentativeRequest {
    pub name: String,
}

/// POST /api/v1/representative - One representative's summary
pub async fn representative(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RepresentativeRequest>,
) -> impl IntoResponse {
    Json(
        run_blocking(state, move |state| -> SalesboardResult<RepresentativeSummary> {
            let ledger = Ledger::load(state.config.ledger_path())?;
            let sales = crate::reports::load_sales(&state.config, &state.cache);
            Ok(representative_summary(
                &req.name,
                &ledger,
                sales.as_deref(),
                &state.config.reports.aging_thresholds,
            ))
        })
        .await,
    )
}

/// POST /api/v1/overview - Headline figures
pub async fn overview(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(
        run_blocking(state, |state| -> SalesboardResult<Overview> {
            let data = DashboardData::load(&state.config, &state.cache);
            Ok(build_overview(&data, &state.config.reports.aging_thresholds))
        })
        .await,
    )
}
