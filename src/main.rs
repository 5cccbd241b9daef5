use std::time::Instant;

use anyhow::Result;
use log::{error, info};

mod loading;
mod processing;
mod reporting;
mod types;


use processing::build_report;
use reporting::{format_error_report, format_sales_table, write_results_csv};

// Name of the report file, written to the current working directory.
const RESULTS_FILE: &str = "SalesResults.csv";

#[tokio::main]
pub async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<_> = std::env::args().collect();
    // Exactly two positional arguments: the catalogue path and the
    // sales path. Anything else is a usage error, and the only
    // condition that exits non-zero; bad data inside the files is
    // reported, not fatal.
    let (catalogue_path, sales_path) = match (args.get(1), args.get(2), args.len()) {
        (Some(catalogue), Some(sales), 3) => (catalogue.to_string(), sales.to_string()),
        _ => {
            error!("Expected exactly two arguments, got {}.", args.len() - 1);
            println!("Usage: sales-recon <priceCatalogue.json> <salesRecord.json>");
            std::process::exit(1);
        }
    };

    info!("Catalogue: {catalogue_path}, sales: {sales_path}");

    let start = Instant::now();

    let report = build_report(&catalogue_path, &sales_path).await;
    info!(
        "Report holds {} line(s), {} error(s).",
        report.lines.len(),
        report.errors.len()
    );

    write_results_csv(&report, RESULTS_FILE).await?;

    println!("\n{}", format_sales_table(&report));
    if let Some(error_report) = format_error_report(&report) {
        print!("{error_report}");
    }

    println!("Time elapsed: {}", start.elapsed().as_secs_f64());

    Ok(())
}
