use std::collections::HashMap;
use std::path::Path;

use log::{debug, info};
use rust_decimal::prelude::*;

use crate::loading::load_records;
use crate::types::*;

// This function wires the stages together: load and validate both
// files, then hand the records to compute_sales and fold everything
// into one SalesReport. From here on the report is immutable; the
// presentation layer only ever reads it.
pub async fn build_report(
    catalogue_path: impl AsRef<Path>,
    sales_path: impl AsRef<Path>,
) -> SalesReport {
    let (catalogue, sales, mut errors) = load_records(catalogue_path, sales_path).await;

    let (lines, aggregation_errors) = compute_sales(&catalogue, &sales);
    errors.extend(aggregation_errors);

    SalesReport { lines, errors }
}

// compute_sales is the core business logic. It joins the sales
// records against the catalogue by product name and accumulates
// revenue per product. The only effects are the two values it
// returns, which makes it trivial to test in isolation.
//
// The price lookup is built first. Duplicate titles overwrite earlier
// prices (last write wins), and entries missing a title or a price
// are left out entirely, so a sale against such an entry falls through
// to the unmatched path rather than multiplying against a value that
// was never really there. The validator has already reported the
// incomplete entry by this point.
//
// Unmatched products are recorded once per occurrence, not
// deduplicated: three sales of an unknown product are three separate
// diagnostics.
pub fn compute_sales(
    catalogue: &[CatalogueEntry],
    sales: &[SaleRecord],
) -> (Vec<AggregateLine>, Vec<DataError>) {
    let mut errors: Vec<DataError> = vec![];

    let price_lookup: HashMap<&str, Decimal> = catalogue
        .iter()
        .filter_map(|entry| match (&entry.title, entry.price) {
            (Some(title), Some(price)) => Some((title.as_str(), price)),
            _ => None,
        })
        .collect();

    debug!("Price lookup holds {} product(s).", price_lookup.len());

    // Running totals per product, plus the order in which products
    // were first seen. A HashMap alone would lose that order, and the
    // report promises first-seen order in its lines.
    let mut totals: HashMap<String, Decimal> = HashMap::from([]);
    let mut first_seen: Vec<String> = vec![];

    for sale in sales {
        // Records the validator flagged as incomplete carry no usable
        // join key or quantity, so they cannot be accumulated.
        let (Some(product), Some(quantity)) = (&sale.product, sale.quantity) else {
            debug!("Skipping incomplete sales record.");
            continue;
        };

        match price_lookup.get(product.as_str()) {
            Some(price) => {
                let revenue = quantity * *price;
                totals
                    .entry(product.clone())
                    .and_modify(|total| *total += revenue)
                    .or_insert_with(|| {
                        first_seen.push(product.clone());
                        revenue
                    });
            }
            None => {
                info!("No catalogue entry for product '{product}'.");
                errors.push(DataError::UnmatchedProduct {
                    product: product.clone(),
                });
            }
        }
    }

    let lines = first_seen
        .into_iter()
        .map(|product| {
            let total_sales = totals[&product].round_dp(2);
            AggregateLine {
                product,
                total_sales,
            }
        })
        .collect();

    (lines, errors)
}
