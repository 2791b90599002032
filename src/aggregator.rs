use crate::ledger::{CellValue, Ledger};
use crate::options::DEFAULT_REGION_LIMIT;
use crate::schema::{MonthResult, Platform, PlatformSummary, RegionSales, SalesFigures};
use log::{debug, warn};
use std::collections::BTreeMap;

/// Resolves a platform's column triple against a ledger and totals it.
pub struct SalesAggregator {
    region_limit: usize,
}

impl Default for SalesAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_REGION_LIMIT)
    }
}

impl SalesAggregator {
    pub fn new(region_limit: usize) -> Self {
        Self { region_limit }
    }

    pub fn summarize(
        &self,
        platform: Platform,
        ledger: &Ledger,
        month: MonthResult,
    ) -> PlatformSummary {
        let mapping = platform.column_mapping();

        let missing_columns: Vec<String> = [mapping.sales_column, mapping.tax_column]
            .into_iter()
            .filter(|column| !ledger.has_column(column))
            .map(str::to_string)
            .collect();

        if !missing_columns.is_empty() {
            warn!(
                "Missing columns in {} data: '{}' or '{}' (absent: {})",
                platform,
                mapping.sales_column,
                mapping.tax_column,
                missing_columns.join(", ")
            );
            return PlatformSummary {
                platform,
                month,
                figures: None,
                missing_columns,
            };
        }

        let total_sales = column_total(ledger, mapping.sales_column);
        let total_tax = column_total(ledger, mapping.tax_column);

        let region_breakdown = if ledger.has_column(mapping.region_column) {
            rank_regions(
                ledger,
                mapping.region_column,
                mapping.sales_column,
                self.region_limit,
            )
        } else {
            debug!(
                "{}: no '{}' column, skipping region breakdown",
                platform, mapping.region_column
            );
            Vec::new()
        };

        debug!(
            "{}: {} rows, sales {:.2}, tax {:.2}, {} regions",
            platform,
            ledger.row_count(),
            total_sales,
            total_tax,
            region_breakdown.len()
        );

        PlatformSummary {
            platform,
            month,
            figures: Some(SalesFigures {
                total_sales,
                total_tax,
                region_breakdown,
            }),
            missing_columns: Vec::new(),
        }
    }
}

/// Summarizes a ledger keeping the default top-10 regions.
pub fn summarize(platform: Platform, ledger: &Ledger, month: MonthResult) -> PlatformSummary {
    SalesAggregator::default().summarize(platform, ledger, month)
}

/// Sum of a column's numeric cells. Missing or non-numeric cells count as 0.
pub fn column_total(ledger: &Ledger, column: &str) -> f64 {
    ledger
        .column(column)
        .map(|cells| cells.filter_map(CellValue::as_amount).fold(0.0, |acc, v| acc + v))
        .unwrap_or(0.0)
}

/// Sales summed per region, highest first, at most `limit` entries.
///
/// Rows without a region are left out. Regions with equal sales keep
/// ascending name order.
pub fn rank_regions(
    ledger: &Ledger,
    region_column: &str,
    sales_column: &str,
    limit: usize,
) -> Vec<RegionSales> {
    let Some(pairs) = ledger.column_pairs(region_column, sales_column) else {
        return Vec::new();
    };

    let mut groups: BTreeMap<String, f64> = BTreeMap::new();
    for (region, sales) in pairs {
        let Some(region) = region.as_text() else {
            continue;
        };
        *groups.entry(region.into_owned()).or_insert(0.0) += sales.as_amount().unwrap_or(0.0);
    }

    let mut ranked: Vec<RegionSales> = groups
        .into_iter()
        .map(|(region, sales)| RegionSales { region, sales })
        .collect();
    ranked.sort_by(|a, b| b.sales.total_cmp(&a.sales));
    ranked.truncate(limit);
    ranked
}
