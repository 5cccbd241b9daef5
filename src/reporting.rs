use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;
use log::info;
use tokio::fs::File;

use crate::types::*;

// The row shape we feed to the csv_async serializer. Totals travel as
// strings because the same column carries Decimal totals, the literal
// 'null' on error rows, and the grand total; the header names come
// from the serde renames.
#[derive(Clone, Debug, serde::Serialize, PartialEq)]
struct ResultRow {
    #[serde(rename = "Product")]
    product: String,
    #[serde(rename = "Total Sales")]
    total_sales: String,
}

// Render the report as a fixed-width console table: one row per
// aggregate line, then one row per diagnostic with a literal 'null'
// in the value column, then the grand total. The column widths and
// rules match the CSV report's sibling format that operators already
// parse by eye, so they are part of the observable output.
pub fn format_sales_table(report: &SalesReport) -> String {
    let rule = "-".repeat(52);
    let mut out = String::new();

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "{:<30} | {:>18}", "Product", "Total Sales");
    let _ = writeln!(out, "{rule}");
    for line in &report.lines {
        let _ = writeln!(
            out,
            "{:<30} | {:>18}",
            line.product,
            line.total_sales.to_string()
        );
    }
    for error in &report.errors {
        let _ = writeln!(out, "{:<30} | {:>18}", error.to_string(), "null");
    }
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        "{:<32} {:>18}",
        "Grand Total",
        report.grand_total().to_string()
    );
    let _ = writeln!(out, "{rule}");

    out
}

// The error-only view for human diagnosis. Returns None when the run
// was clean so the caller prints nothing at all.
pub fn format_error_report(report: &SalesReport) -> Option<String> {
    if report.errors.is_empty() {
        return None;
    }

    let mut out = String::from("Errors:\n");
    for error in &report.errors {
        let _ = writeln!(out, "- {error} not found");
    }
    Some(out)
}

// Persist the report as CSV. Same row order as the console table:
// header, aggregate lines, diagnostics with 'null' totals, then the
// grand total row. The file handle lives only for this write.
pub async fn write_results_csv(report: &SalesReport, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).await?;
    let mut wri = csv_async::AsyncWriterBuilder::new()
        .has_headers(true)
        .create_serializer(file);

    for line in &report.lines {
        wri.serialize(ResultRow {
            product: line.product.clone(),
            total_sales: line.total_sales.to_string(),
        })
        .await?;
    }

    for error in &report.errors {
        wri.serialize(ResultRow {
            product: error.to_string(),
            total_sales: "null".to_string(),
        })
        .await?;
    }

    wri.serialize(ResultRow {
        product: "Grand Total".to_string(),
        total_sales: report.grand_total().to_string(),
    })
    .await?;

    wri.flush().await?;
    info!("Wrote results to {}.", path.display());

    Ok(())
}
