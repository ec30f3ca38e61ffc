//! YAML configuration
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration for the standard export names.

use crate::error::{SalesboardError, SalesboardResult};
use crate::parser::{
    DEFAULT_MARKER, DEFAULT_TOTAL_LABEL, PERCENT_COLUMN, REMAINING_COLUMN, SALES_COLUMN,
    TARGET_COLUMN,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// How a numeric column's cells are turned into numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CoercionRule {
    /// Standard decimal notation only; anything else becomes 0
    #[default]
    Plain,
    /// Also accepts thousands-dot / decimal-comma text ("1.234,56")
    Locale,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericColumn {
    pub name: String,
    #[serde(default)]
    pub rule: CoercionRule,
}

impl NumericColumn {
    pub fn new(name: &str, rule: CoercionRule) -> Self {
        Self {
            name: name.to_string(),
            rule,
        }
    }
}

/// Settings for the multi-table sales/target sheet parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Column-0 header label that opens each embedded table
    pub marker: String,
    /// Representative-name value of each table's totals row
    pub total_label: String,
    pub numeric_columns: Vec<NumericColumn>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            total_label: DEFAULT_TOTAL_LABEL.to_string(),
            numeric_columns: [TARGET_COLUMN, SALES_COLUMN, PERCENT_COLUMN, REMAINING_COLUMN]
                .iter()
                .map(|name| NumericColumn::new(name, CoercionRule::Plain))
                .collect(),
        }
    }
}

impl ParserConfig {
    pub fn rule_for(&self, column: &str) -> Option<CoercionRule> {
        self.numeric_columns
            .iter()
            .find(|c| c.name == column)
            .map(|c| c.rule)
    }

    /// Same settings with every numeric column switched to `rule`
    pub fn with_rule(mut self, rule: CoercionRule) -> Self {
        for column in &mut self.numeric_columns {
            column.rule = rule;
        }
        self
    }
}

/// Input file names, resolved against `data_dir`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileNames {
    pub ledger: String,
    pub stock: String,
    pub sales_target: String,
    pub debt: String,
}

impl Default for FileNames {
    fn default() -> Self {
        Self {
            ledger: "rapor.xls".to_string(),
            stock: "stok.xls".to_string(),
            sales_target: "satis-hedef.xlsx".to_string(),
            debt: "solen_borc.xlsx".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Stock quantity below which an item is critical
    pub critical_stock_level: f64,
    /// Overdue-day bucket limits, ascending
    pub aging_thresholds: Vec<u32>,
    pub dormant_days: u32,
    pub top_customers: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            critical_stock_level: 40.0,
            aging_thresholds: vec![35, 45, 60],
            dormant_days: 60,
            top_customers: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub files: FileNames,
    pub parser: ParserConfig,
    pub reports: ReportConfig,
    pub activity_log: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            files: FileNames::default(),
            parser: ParserConfig::default(),
            reports: ReportConfig::default(),
            activity_log: PathBuf::from("activity.log"),
        }
    }
}

impl Config {
    /// Load from a YAML file
    pub fn load(path: &Path) -> SalesboardResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> SalesboardResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> SalesboardResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> SalesboardResult<()> {
        if self.parser.marker.trim().is_empty() {
            return Err(SalesboardError::Config(
                "parser.marker must not be empty".to_string(),
            ));
        }
        if !self.reports.aging_thresholds.windows(2).all(|w| w[0] < w[1]) {
            return Err(SalesboardError::Config(format!(
                "reports.aging_thresholds must be strictly ascending, got {:?}",
                self.reports.aging_thresholds
            )));
        }
        Ok(())
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join(&self.files.ledger)
    }

    pub fn stock_path(&self) -> PathBuf {
        self.data_dir.join(&self.files.stock)
    }

    pub fn sales_target_path(&self) -> PathBuf {
        self.data_dir.join(&self.files.sales_target)
    }

    pub fn debt_path(&self) -> PathBuf {
        self.data_dir.join(&self.files.debt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_numeric_columns() {
        let config = ParserConfig::default();
        assert_eq!(config.numeric_columns.len(), 4);
        assert_eq!(config.rule_for("SATIŞ"), Some(CoercionRule::Plain));
        assert_eq!(config.rule_for("Satış Temsilcisi"), None);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = Config::from_yaml("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
data_dir: Raporlama
parser:
  numeric_columns:
    - name: SATIŞ
      rule: locale
reports:
  critical_stock_level: 25
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("Raporlama"));
        assert_eq!(config.parser.marker, "Satış Temsilcisi");
        assert_eq!(config.parser.rule_for("SATIŞ"), Some(CoercionRule::Locale));
        assert_eq!(config.parser.rule_for("HEDEF"), None);
        assert_eq!(config.reports.critical_stock_level, 25.0);
        assert_eq!(config.reports.dormant_days, 60);
        assert_eq!(
            config.sales_target_path(),
            PathBuf::from("Raporlama").join("satis-hedef.xlsx")
        );
    }

    #[test]
    fn test_rejects_unsorted_thresholds() {
        let yaml = "reports:\n  aging_thresholds: [60, 35]\n";
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("ascending"));
    }

    #[test]
    fn test_rejects_blank_marker() {
        let yaml = "parser:\n  marker: '  '\n";
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_with_rule_switches_all_columns() {
        let config = ParserConfig::default().with_rule(CoercionRule::Locale);
        assert!(config
            .numeric_columns
            .iter()
            .all(|c| c.rule == CoercionRule::Locale));
    }
}
