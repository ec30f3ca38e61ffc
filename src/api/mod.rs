//! Salesboard API server module
//!
//! JSON over HTTP for the dashboard front end.
//! Run with `salesboard-server`.

pub mod handlers;
pub mod server;

pub use server::{router, run_api_server, ApiConfig, AppState};
