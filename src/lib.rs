//! # GST Sales Analyzer
//!
//! A library for normalizing monthly sales-ledger exports from Amazon,
//! Flipkart and Meesho into a common reporting shape, and for producing
//! per-platform and cross-platform sales and GST summaries.
//!
//! ## Core Concepts
//!
//! - **Ledger**: A decoded tabular export, one per platform upload
//! - **Month Resolution**: The reporting month is inferred from the file name,
//!   then from platform-specific month fields, then from the most common month
//!   in a date column. An unresolved month is reported as "Unknown".
//! - **Column Mapping**: Each platform has one fixed sales/tax/region column
//!   triple. A ledger missing the sales or tax column produces a warning, not
//!   an error.
//! - **Region Breakdown**: Top 10 states by summed sales, per platform
//!
//! ## Example
//!
//! ```rust,ignore
//! use gst_sales_analyzer::*;
//!
//! let amazon = LedgerUpload::from_csv_path(Platform::Amazon, "amazon_APR_2025.csv")?;
//! let meesho = LedgerUpload::from_csv_path(Platform::Meesho, "meesho_tax_invoice.csv")?;
//!
//! let report = process_sales_report(vec![amazon, meesho])?;
//! for warning in report.warnings() {
//!     eprintln!("{}", warning);
//! }
//! println!("{}", report.to_markdown());
//! ```

pub mod aggregator;
pub mod error;
pub mod ledger;
pub mod month;
pub mod options;
pub mod report;
pub mod schema;
pub mod utils;

pub use aggregator::{column_total, rank_regions, summarize, SalesAggregator};
pub use error::{Result, SalesReportError};
pub use ledger::{CellValue, Ledger, LedgerUpload};
pub use month::resolve_month;
pub use options::ReportOptions;
pub use report::SalesReport;
pub use schema::*;

use log::{debug, info, warn};
use std::collections::BTreeMap;

pub struct SalesReportProcessor;

impl SalesReportProcessor {
    /// Resolves the month and summarizes every upload.
    ///
    /// One ledger per platform: a later upload for a platform replaces the
    /// earlier one. Summaries come out in Amazon, Flipkart, Meesho order.
    pub fn process(uploads: Vec<LedgerUpload>, options: &ReportOptions) -> Result<SalesReport> {
        options.validate()?;

        let mut by_platform: BTreeMap<Platform, LedgerUpload> = BTreeMap::new();
        for upload in uploads {
            if let Some(previous) = by_platform.insert(upload.platform, upload) {
                warn!(
                    "{} uploaded more than once; '{}' was replaced",
                    previous.platform, previous.filename
                );
            }
        }

        info!("Processing sales report for {} platform(s)", by_platform.len());

        let aggregator = SalesAggregator::new(options.region_limit);
        let summaries: Vec<PlatformSummary> = by_platform
            .into_values()
            .map(|upload| {
                debug!(
                    "{}: '{}' with {} rows",
                    upload.platform,
                    upload.filename,
                    upload.ledger.row_count()
                );
                let month = resolve_month(&upload.filename, &upload.ledger, upload.platform);
                aggregator.summarize(upload.platform, &upload.ledger, month)
            })
            .collect();

        let report = SalesReport::new(summaries, options);
        for warning in report.warnings() {
            debug!("Report warning: {}", warning);
        }

        Ok(report)
    }
}

pub fn process_sales_report(uploads: Vec<LedgerUpload>) -> Result<SalesReport> {
    SalesReportProcessor::process(uploads, &ReportOptions::default())
}

pub fn process_with_options(
    uploads: Vec<LedgerUpload>,
    options: &ReportOptions,
) -> Result<SalesReport> {
    SalesReportProcessor::process(uploads, options)
}
