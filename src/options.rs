use crate::error::{Result, SalesReportError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_REGION_LIMIT: usize = 10;
pub const DEFAULT_UNKNOWN_MONTH_LABEL: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReportOptions {
    #[schemars(description = "How many top regions to keep in each platform's breakdown")]
    #[serde(default = "default_region_limit")]
    pub region_limit: usize,

    #[schemars(description = "Label shown for a ledger whose reporting month could not be resolved")]
    #[serde(default = "default_unknown_month_label")]
    pub unknown_month_label: String,
}

fn default_region_limit() -> usize {
    DEFAULT_REGION_LIMIT
}

fn default_unknown_month_label() -> String {
    DEFAULT_UNKNOWN_MONTH_LABEL.to_string()
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            region_limit: default_region_limit(),
            unknown_month_label: default_unknown_month_label(),
        }
    }
}

impl ReportOptions {
    pub fn validate(&self) -> Result<()> {
        if self.region_limit == 0 {
            return Err(SalesReportError::InvalidRegionLimit(self.region_limit));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: ReportOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let options = ReportOptions::from_json_str("{}").unwrap();
        assert_eq!(options, ReportOptions::default());
        assert_eq!(options.region_limit, 10);
        assert_eq!(options.unknown_month_label, "Unknown");
    }

    #[test]
    fn test_partial_override() {
        let options = ReportOptions::from_json_str(r#"{"region_limit": 5}"#).unwrap();
        assert_eq!(options.region_limit, 5);
        assert_eq!(options.unknown_month_label, "Unknown");
    }

    #[test]
    fn test_zero_region_limit_rejected() {
        let result = ReportOptions::from_json_str(r#"{"region_limit": 0}"#);
        assert!(matches!(
            result,
            Err(SalesReportError::InvalidRegionLimit(0))
        ));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let result = ReportOptions::from_json_str("{region_limit: }");
        assert!(matches!(result, Err(SalesReportError::SerializationError(_))));
    }
}
