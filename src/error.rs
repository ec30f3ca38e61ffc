use thiserror::Error;

pub type SalesboardResult<T> = Result<T, SalesboardError>;

#[derive(Error, Debug)]
pub enum SalesboardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Column '{column}' not found in {source_name}")]
    MissingColumn { column: String, source_name: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<calamine::Error> for SalesboardError {
    fn from(e: calamine::Error) -> Self {
        SalesboardError::Workbook(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for SalesboardError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        SalesboardError::Export(e.to_string())
    }
}
