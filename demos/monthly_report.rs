//! Builds a cross-platform GST summary from CSV exports.
//!
//! ```text
//! cargo run --example monthly_report -- amazon=amazon_APR.csv meesho=meesho.csv
//! ```
//!
//! Without arguments a small built-in sample is used.

use gst_sales_analyzer::{process_sales_report, Ledger, LedgerUpload, Platform};

const SAMPLE_MEESHO: &str = "\
sub_order_num,month_number,total_invoice_value,tax_amount,end_customer_state_new
SO-1,5,499.00,23.76,Uttar Pradesh
SO-2,5,299.00,14.24,Bihar
";

const SAMPLE_FLIPKART: &str = "\
Amended Period,Aggregate Taxable Value Rs.,IGST Amount Rs.,Delivered State (PoS)
Apr-2025,1000.00,180.00,Tamil Nadu
";

fn parse_arg(arg: &str) -> anyhow::Result<LedgerUpload> {
    let (platform, path) = arg
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("expected PLATFORM=PATH, got '{}'", arg))?;
    let platform: Platform = platform.parse()?;
    Ok(LedgerUpload::from_csv_path(platform, path)?)
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let uploads = if args.is_empty() {
        vec![
            LedgerUpload::new(
                Platform::Meesho,
                "meesho_tax_invoice.csv",
                Ledger::from_csv_reader(SAMPLE_MEESHO.as_bytes(), "sample meesho")?,
            ),
            LedgerUpload::new(
                Platform::Flipkart,
                "flipkart_gstr1.csv",
                Ledger::from_csv_reader(SAMPLE_FLIPKART.as_bytes(), "sample flipkart")?,
            ),
        ]
    } else {
        args.iter()
            .map(|arg| parse_arg(arg))
            .collect::<anyhow::Result<Vec<_>>>()?
    };

    let report = process_sales_report(uploads)?;

    for warning in report.warnings() {
        eprintln!("warning: {}", warning);
    }

    println!("{}", report.to_markdown());
    println!("{}", report.to_csv());

    Ok(())
}
