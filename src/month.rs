//! Reporting-month inference for uploaded ledgers.
//!
//! Resolution order, first hit wins:
//! 1. a month code in the file name,
//! 2. the platform's structured month field (Meesho `month_number`,
//!    Flipkart `Amended Period`) or the choice of a date column,
//! 3. the most common month in that date column.
//!
//! A step that finds nothing yields `None`; an unresolved month is a valid
//! outcome, not an error.

use crate::ledger::{CellValue, Ledger};
use crate::schema::{MonthResult, MonthSource, Platform, ReportingMonth};
use crate::utils::{find_month_code, mode, parse_date, parse_month_year};
use chrono::Datelike;
use log::debug;

pub const MEESHO_MONTH_NUMBER_COLUMN: &str = "month_number";
pub const MEESHO_ORDER_DATE_COLUMN: &str = "order_date";
pub const AMAZON_DATE_COLUMNS: [&str; 3] = ["Invoice Date", "Order Date", "Shipment Date"];
pub const FLIPKART_PERIOD_COLUMN: &str = "Amended Period";

/// What the platform-specific step produced.
#[derive(Debug, Clone, PartialEq)]
enum StructuredFallback {
    Month(ReportingMonth),
    DateColumn(&'static str),
    Exhausted,
}

/// Determines the calendar month a ledger reports on.
pub fn resolve_month(filename: &str, ledger: &Ledger, platform: Platform) -> MonthResult {
    if let Some(month) = month_from_filename(filename) {
        debug!(
            "{}: month {} taken from file name '{}'",
            platform,
            month.code(),
            filename
        );
        return MonthResult::resolved(month);
    }

    let month = match structured_fallback(ledger, platform) {
        StructuredFallback::Month(month) => Some(month),
        StructuredFallback::DateColumn(column) => month_from_date_column(ledger, column),
        StructuredFallback::Exhausted => None,
    };

    match &month {
        Some(m) => debug!("{}: month {} resolved from {:?}", platform, m.code(), m.source()),
        None => debug!("{}: no reporting month could be resolved", platform),
    }

    MonthResult::from(month)
}

pub fn month_from_filename(filename: &str) -> Option<ReportingMonth> {
    find_month_code(filename).and_then(|n| ReportingMonth::new(n, MonthSource::Filename))
}

fn structured_fallback(ledger: &Ledger, platform: Platform) -> StructuredFallback {
    match platform {
        Platform::Meesho => {
            if ledger.has_column(MEESHO_MONTH_NUMBER_COLUMN) {
                // A present but unusable month_number column ends resolution.
                month_from_month_number(ledger)
                    .map(StructuredFallback::Month)
                    .unwrap_or(StructuredFallback::Exhausted)
            } else if ledger.has_column(MEESHO_ORDER_DATE_COLUMN) {
                StructuredFallback::DateColumn(MEESHO_ORDER_DATE_COLUMN)
            } else {
                StructuredFallback::Exhausted
            }
        }
        Platform::Amazon => AMAZON_DATE_COLUMNS
            .iter()
            .copied()
            .find(|column| ledger.has_column(column))
            .map(StructuredFallback::DateColumn)
            .unwrap_or(StructuredFallback::Exhausted),
        Platform::Flipkart => month_from_amended_period(ledger)
            .map(StructuredFallback::Month)
            .unwrap_or(StructuredFallback::Exhausted),
    }
}

/// Mode of Meesho's `month_number` column, coerced into 1..=12.
pub fn month_from_month_number(ledger: &Ledger) -> Option<ReportingMonth> {
    let values = ledger.column(MEESHO_MONTH_NUMBER_COLUMN)?;
    let modal = mode(values.filter(|cell| !cell.is_missing()))?;
    let number = coerce_month_number(modal)?;
    ReportingMonth::new(number, MonthSource::MonthNumberColumn)
}

/// Mode of Flipkart's `Amended Period` column read as `Mon-YYYY`.
pub fn month_from_amended_period(ledger: &Ledger) -> Option<ReportingMonth> {
    let values = ledger.column(FLIPKART_PERIOD_COLUMN)?;
    let modal = mode(values.filter_map(|cell| cell.as_text()))?;
    let number = parse_month_year(&modal)?;
    ReportingMonth::new(number, MonthSource::AmendedPeriod)
}

/// Most common month among the parseable dates of `column`. Unparseable
/// cells are skipped.
pub fn month_from_date_column(ledger: &Ledger, column: &str) -> Option<ReportingMonth> {
    let months = ledger
        .column(column)?
        .filter_map(|cell| match cell {
            CellValue::Text(s) => parse_date(s),
            _ => None,
        })
        .map(|date| date.month());
    let number = mode(months)?;
    ReportingMonth::new(
        number,
        MonthSource::DateColumn {
            column: column.to_string(),
        },
    )
}

fn coerce_month_number(cell: &CellValue) -> Option<u32> {
    let n = match cell {
        CellValue::Number(n) if n.is_finite() => n.trunc() as i64,
        CellValue::Text(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    u32::try_from(n).ok().filter(|n| (1..=12).contains(n))
}
