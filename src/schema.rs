use crate::error::SalesReportError;
use crate::utils::month_code;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, JsonSchema,
)]
#[serde(rename_all = "PascalCase")]
pub enum Platform {
    #[schemars(description = "Amazon seller GST tax report (B2C/B2B invoice level export)")]
    Amazon,

    #[schemars(description = "Flipkart GSTR sales report (aggregate taxable value per invoice)")]
    Flipkart,

    #[schemars(description = "Meesho tax invoice report (one row per sub-order)")]
    Meesho,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Amazon, Platform::Flipkart, Platform::Meesho];

    /// The fixed sales/tax/region column triple for this platform's export.
    pub fn column_mapping(&self) -> ColumnMapping {
        match self {
            Platform::Amazon => ColumnMapping {
                sales_column: "Invoice Amount",
                tax_column: "Total Tax Amount",
                region_column: "Ship To State",
            },
            Platform::Flipkart => ColumnMapping {
                sales_column: "Aggregate Taxable Value Rs.",
                tax_column: "IGST Amount Rs.",
                region_column: "Delivered State (PoS)",
            },
            Platform::Meesho => ColumnMapping {
                sales_column: "total_invoice_value",
                tax_column: "tax_amount",
                region_column: "end_customer_state_new",
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Platform::Amazon => "Amazon",
            Platform::Flipkart => "Flipkart",
            Platform::Meesho => "Meesho",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Platform {
    type Err = SalesReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SalesReportError::UnknownPlatform(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnMapping {
    pub sales_column: &'static str,
    pub tax_column: &'static str,
    pub region_column: &'static str,
}

/// Which signal a reporting month was taken from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MonthSource {
    /// A month code appeared in the upload's file name
    Filename,
    /// Mode of Meesho's `month_number` column
    MonthNumberColumn,
    /// Mode of Flipkart's `Amended Period` column
    AmendedPeriod,
    /// Mode of the months found in a date column
    DateColumn { column: String },
}

/// A calendar month in 1..=12 together with its three-letter code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ReportingMonth {
    number: u32,
    code: &'static str,
    source: MonthSource,
}

impl ReportingMonth {
    /// Returns `None` when `number` is outside 1..=12.
    pub fn new(number: u32, source: MonthSource) -> Option<Self> {
        let code = month_code(number)?;
        Some(Self {
            number,
            code,
            source,
        })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn source(&self) -> &MonthSource {
        &self.source
    }
}

/// Outcome of month resolution. Number and label are either both known or
/// both absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct MonthResult {
    month: Option<ReportingMonth>,
}

impl MonthResult {
    pub fn absent() -> Self {
        Self { month: None }
    }

    pub fn resolved(month: ReportingMonth) -> Self {
        Self { month: Some(month) }
    }

    pub fn is_resolved(&self) -> bool {
        self.month.is_some()
    }

    pub fn month(&self) -> Option<&ReportingMonth> {
        self.month.as_ref()
    }

    pub fn month_number(&self) -> Option<u32> {
        self.month.as_ref().map(ReportingMonth::number)
    }

    pub fn month_label(&self) -> Option<&'static str> {
        self.month.as_ref().map(ReportingMonth::code)
    }

    pub fn source(&self) -> Option<&MonthSource> {
        self.month.as_ref().map(ReportingMonth::source)
    }

    pub fn label_or<'a>(&self, fallback: &'a str) -> &'a str {
        self.month_label().unwrap_or(fallback)
    }
}

impl From<Option<ReportingMonth>> for MonthResult {
    fn from(month: Option<ReportingMonth>) -> Self {
        Self { month }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct RegionSales {
    pub region: String,
    pub sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct SalesFigures {
    pub total_sales: f64,
    pub total_tax: f64,
    #[schemars(description = "Regions ranked by summed sales, highest first")]
    pub region_breakdown: Vec<RegionSales>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct PlatformSummary {
    pub platform: Platform,
    pub month: MonthResult,
    #[schemars(
        description = "Aggregated figures. Absent when the ledger lacks the platform's sales or tax column."
    )]
    pub figures: Option<SalesFigures>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_columns: Vec<String>,
}

impl PlatformSummary {
    pub fn is_present(&self) -> bool {
        self.figures.is_some()
    }

    pub fn total_sales(&self) -> Option<f64> {
        self.figures.as_ref().map(|f| f.total_sales)
    }

    pub fn total_tax(&self) -> Option<f64> {
        self.figures.as_ref().map(|f| f.total_tax)
    }

    pub fn region_breakdown(&self) -> &[RegionSales] {
        self.figures
            .as_ref()
            .map(|f| f.region_breakdown.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_platform_has_distinct_columns() {
        for platform in Platform::ALL {
            let mapping = platform.column_mapping();
            assert_ne!(mapping.sales_column, mapping.tax_column);
            assert_ne!(mapping.sales_column, mapping.region_column);
            assert_ne!(mapping.tax_column, mapping.region_column);
        }
    }

    #[test]
    fn test_platform_from_str() {
        assert_eq!("amazon".parse::<Platform>().unwrap(), Platform::Amazon);
        assert_eq!(" FLIPKART ".parse::<Platform>().unwrap(), Platform::Flipkart);
        assert_eq!("Meesho".parse::<Platform>().unwrap(), Platform::Meesho);
        assert!("myntra".parse::<Platform>().is_err());
    }

    #[test]
    fn test_reporting_month_bounds() {
        assert!(ReportingMonth::new(0, MonthSource::Filename).is_none());
        assert!(ReportingMonth::new(13, MonthSource::Filename).is_none());

        let dec = ReportingMonth::new(12, MonthSource::AmendedPeriod).unwrap();
        assert_eq!(dec.number(), 12);
        assert_eq!(dec.code(), "DEC");
    }

    #[test]
    fn test_month_result_is_all_or_nothing() {
        let absent = MonthResult::absent();
        assert_eq!(absent.month_number(), None);
        assert_eq!(absent.month_label(), None);
        assert_eq!(absent.label_or("Unknown"), "Unknown");

        let resolved =
            MonthResult::resolved(ReportingMonth::new(4, MonthSource::Filename).unwrap());
        assert_eq!(resolved.month_number(), Some(4));
        assert_eq!(resolved.month_label(), Some("APR"));
        assert_eq!(resolved.label_or("Unknown"), "APR");
    }
}
