use crate::options::ReportOptions;
use crate::schema::{Platform, PlatformSummary};
use schemars::JsonSchema;
use serde::Serialize;

/// Cross-platform view over the per-platform summaries of one run.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct SalesReport {
    summaries: Vec<PlatformSummary>,
    #[serde(skip)]
    unknown_month_label: String,
}

impl SalesReport {
    pub fn new(summaries: Vec<PlatformSummary>, options: &ReportOptions) -> Self {
        Self {
            summaries,
            unknown_month_label: options.unknown_month_label.clone(),
        }
    }

    pub fn summaries(&self) -> &[PlatformSummary] {
        &self.summaries
    }

    pub fn summary(&self, platform: Platform) -> Option<&PlatformSummary> {
        self.summaries.iter().find(|s| s.platform == platform)
    }

    /// `(platform, total_sales)` for every platform that produced figures.
    pub fn sales_series(&self) -> Vec<(Platform, f64)> {
        self.summaries
            .iter()
            .filter_map(|s| s.total_sales().map(|v| (s.platform, v)))
            .collect()
    }

    /// `(platform, total_tax)` for every platform that produced figures.
    pub fn tax_series(&self) -> Vec<(Platform, f64)> {
        self.summaries
            .iter()
            .filter_map(|s| s.total_tax().map(|v| (s.platform, v)))
            .collect()
    }

    /// One message per platform whose required columns were missing.
    pub fn warnings(&self) -> Vec<String> {
        self.summaries
            .iter()
            .filter(|s| !s.is_present())
            .map(|s| {
                let mapping = s.platform.column_mapping();
                format!(
                    "Missing columns in {} data: '{}' or '{}'",
                    s.platform, mapping.sales_column, mapping.tax_column
                )
            })
            .collect()
    }

    pub fn month_label(&self, summary: &PlatformSummary) -> String {
        summary.month.label_or(&self.unknown_month_label).to_string()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// JSON schema of the serialized report, for consumers of `to_json`.
    pub fn json_schema() -> serde_json::Result<serde_json::Value> {
        let root = schemars::schema_for!(SalesReport);
        serde_json::to_value(root)
    }

    pub fn to_csv(&self) -> String {
        let mut output = String::new();
        output.push_str("Platform,Month,Sales,Tax\n");

        for summary in self.summaries.iter().filter(|s| s.is_present()) {
            output.push_str(&format!(
                "{},{},{:.2},{:.2}\n",
                summary.platform,
                self.month_label(summary),
                summary.total_sales().unwrap_or_default(),
                summary.total_tax().unwrap_or_default()
            ));
        }

        output
    }

    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str("# Platform-wise Summary\n\n");

        if self.summaries.is_empty() {
            output.push_str("_No ledgers were uploaded._\n");
            return output;
        }

        for summary in &self.summaries {
            output.push_str(&format!(
                "## {} – {}\n\n",
                summary.platform,
                self.month_label(summary)
            ));

            let Some(figures) = &summary.figures else {
                let mapping = summary.platform.column_mapping();
                output.push_str(&format!(
                    "> ⚠️ Missing columns: '{}' or '{}'\n\n",
                    mapping.sales_column, mapping.tax_column
                ));
                continue;
            };

            output.push_str(&format!("- **Total Sales:** ₹ {:.2}\n", figures.total_sales));
            output.push_str(&format!("- **Total GST:** ₹ {:.2}\n\n", figures.total_tax));

            if !figures.region_breakdown.is_empty() {
                output.push_str("### State-wise Sales Breakdown\n\n");
                output.push_str("| State | Sales |\n|---|---:|\n");
                for region in &figures.region_breakdown {
                    output.push_str(&format!("| {} | {:.2} |\n", region.region, region.sales));
                }
                output.push('\n');
            }
        }

        let sales = self.sales_series();
        if !sales.is_empty() {
            output.push_str("## Total Sales vs GST Tax by Platform\n\n");
            output.push_str("| Platform | Sales | GST Tax |\n|---|---:|---:|\n");
            for ((platform, amount), (_, tax)) in sales.iter().zip(self.tax_series()) {
                output.push_str(&format!("| {} | {:.2} | {:.2} |\n", platform, amount, tax));
            }
            output.push('\n');
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{MonthResult, MonthSource, RegionSales, ReportingMonth, SalesFigures};

    fn present(platform: Platform, month: Option<u32>, sales: f64, tax: f64) -> PlatformSummary {
        PlatformSummary {
            platform,
            month: month
                .and_then(|m| ReportingMonth::new(m, MonthSource::Filename))
                .into(),
            figures: Some(SalesFigures {
                total_sales: sales,
                total_tax: tax,
                region_breakdown: vec![RegionSales {
                    region: "Karnataka".to_string(),
                    sales,
                }],
            }),
            missing_columns: Vec::new(),
        }
    }

    fn absent(platform: Platform) -> PlatformSummary {
        let mapping = platform.column_mapping();
        PlatformSummary {
            platform,
            month: MonthResult::absent(),
            figures: None,
            missing_columns: vec![mapping.sales_column.to_string()],
        }
    }

    fn sample_report() -> SalesReport {
        SalesReport::new(
            vec![
                present(Platform::Amazon, Some(4), 1500.0, 270.0),
                absent(Platform::Flipkart),
                present(Platform::Meesho, None, 800.0, 40.0),
            ],
            &ReportOptions::default(),
        )
    }

    #[test]
    fn test_series_skip_platforms_without_figures() {
        let report = sample_report();
        assert_eq!(
            report.sales_series(),
            vec![(Platform::Amazon, 1500.0), (Platform::Meesho, 800.0)]
        );
        assert_eq!(
            report.tax_series(),
            vec![(Platform::Amazon, 270.0), (Platform::Meesho, 40.0)]
        );
    }

    #[test]
    fn test_warnings() {
        let report = sample_report();
        assert_eq!(
            report.warnings(),
            vec![
                "Missing columns in Flipkart data: 'Aggregate Taxable Value Rs.' or 'IGST Amount Rs.'"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_to_csv() {
        let csv = sample_report().to_csv();
        assert!(csv.starts_with("Platform,Month,Sales,Tax\n"));
        assert!(csv.contains("Amazon,APR,1500.00,270.00"));
        assert!(csv.contains("Meesho,Unknown,800.00,40.00"));
        assert!(!csv.contains("Flipkart"));
    }

    #[test]
    fn test_to_markdown() {
        let markdown = sample_report().to_markdown();
        assert!(markdown.contains("## Amazon – APR"));
        assert!(markdown.contains("## Meesho – Unknown"));
        assert!(markdown.contains("Missing columns: 'Aggregate Taxable Value Rs.'"));
        assert!(markdown.contains("| Karnataka | 1500.00 |"));
        assert!(markdown.contains("| Meesho | 800.00 | 40.00 |"));
    }

    #[test]
    fn test_custom_unknown_label() {
        let options = ReportOptions {
            unknown_month_label: "N/A".to_string(),
            ..ReportOptions::default()
        };
        let report = SalesReport::new(vec![present(Platform::Meesho, None, 1.0, 0.1)], &options);
        assert!(report.to_csv().contains("Meesho,N/A,1.00,0.10"));
    }

    #[test]
    fn test_to_json() {
        let json = sample_report().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let summaries = value["summaries"].as_array().unwrap();
        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0]["platform"], "Amazon");
        assert_eq!(summaries[0]["month"]["code"], "APR");
        assert_eq!(summaries[0]["month"]["source"]["kind"], "filename");
        assert!(summaries[1]["figures"].is_null());
        assert!(summaries[2]["month"].is_null());
    }

    #[test]
    fn test_json_schema_describes_summaries() {
        let schema = SalesReport::json_schema().unwrap();
        let text = schema.to_string();
        assert!(text.contains("summaries"));
        assert!(text.contains("region_breakdown"));
    }
}
