//! Error handling tests

use salesboard::config::Config;
use salesboard::error::SalesboardError;

#[test]
fn test_missing_column_display() {
    let err = SalesboardError::MissingColumn {
        column: "Brüt Tutar".to_string(),
        source_name: "stok.xls".to_string(),
    };
    assert_eq!(err.to_string(), "Column 'Brüt Tutar' not found in stok.xls");
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err: SalesboardError = io.into();
    assert!(matches!(err, SalesboardError::Io(_)));
    assert!(err.to_string().contains("gone"));
}

#[test]
fn test_yaml_error_from_config() {
    let err = Config::from_yaml("reports: [unclosed").unwrap_err();
    assert!(matches!(err, SalesboardError::Yaml(_)));
}

#[test]
fn test_config_validation_error() {
    let err = Config::from_yaml("parser:\n  marker: \"  \"\n").unwrap_err();
    match err {
        SalesboardError::Config(msg) => assert!(msg.contains("marker")),
        other => panic!("expected Config error, got {:?}", other),
    }
}

#[test]
fn test_missing_config_file() {
    let err = Config::load(std::path::Path::new("/nonexistent/salesboard.yaml")).unwrap_err();
    assert!(matches!(err, SalesboardError::Io(_)));
}

#[test]
fn test_export_error_from_xlsx_writer() {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let result = workbook.add_worksheet().set_name("bad[name]");
    let err: SalesboardError = result.map(|_| ()).unwrap_err().into();
    assert!(matches!(err, SalesboardError::Export(_)));
}
