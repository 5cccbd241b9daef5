use std::path::Path;

use log::{debug, info};
use serde::de::DeserializeOwned;

use crate::types::*;

// Load both input files. Each source is handled independently: a
// missing or malformed catalogue must not stop the sales file from
// loading, and vice versa. A source that fails to load degrades to an
// empty record list plus a diagnostic, so the rest of the pipeline
// always has something well-formed to work with.
//
// The returned error list already contains the load-time and
// validation diagnostics, in the order they were discovered:
// catalogue load, sales load, catalogue validation, sales validation.
pub async fn load_records(
    catalogue_path: impl AsRef<Path>,
    sales_path: impl AsRef<Path>,
) -> (Vec<CatalogueEntry>, Vec<SaleRecord>, Vec<DataError>) {
    let mut errors: Vec<DataError> = vec![];

    let catalogue: Vec<CatalogueEntry> =
        load_source(catalogue_path, RecordSource::Catalogue, &mut errors).await;
    let sales: Vec<SaleRecord> = load_source(sales_path, RecordSource::Sales, &mut errors).await;

    info!(
        "Loaded {} catalogue record(s), {} sales record(s).",
        catalogue.len(),
        sales.len()
    );

    errors.extend(validate_catalogue(&catalogue));
    errors.extend(validate_sales(&sales));

    (catalogue, sales, errors)
}

// Read and parse one JSON array-of-records file. On a missing file or
// a parse failure we record a diagnostic and hand back an empty list;
// the file handle is scoped to the read and released on every path.
async fn load_source<T: DeserializeOwned>(
    path: impl AsRef<Path>,
    source: RecordSource,
    errors: &mut Vec<DataError>,
) -> Vec<T> {
    let path = path.as_ref();

    if !path.is_file() {
        info!("{}: file {} not found.", source.as_str(), path.display());
        errors.push(DataError::MissingFile {
            path: path.display().to_string(),
        });
        return vec![];
    }

    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(err) => {
            // The path existed a moment ago but the read failed
            // (permissions, replaced by a directory). Folded into the
            // format-error diagnostic since both degrade the same way.
            errors.push(DataError::ParseError {
                source,
                message: err.to_string(),
            });
            return vec![];
        }
    };

    match serde_json::from_str::<Vec<T>>(&contents) {
        Ok(records) => records,
        Err(err) => {
            info!("{}: file {} failed to parse.", source.as_str(), path.display());
            errors.push(DataError::ParseError {
                source,
                message: err.to_string(),
            });
            vec![]
        }
    }
}

// Check every catalogue record for its required keys. One diagnostic
// per missing key per record, indexed from 1 to match how a human
// counts entries in the file. Records are never removed here; the
// aggregator decides what to do with incomplete ones.
pub fn validate_catalogue(catalogue: &[CatalogueEntry]) -> Vec<DataError> {
    let mut errors: Vec<DataError> = vec![];
    for (idx, entry) in catalogue.iter().enumerate() {
        if entry.title.is_none() {
            errors.push(missing_field(RecordSource::Catalogue, idx + 1, "title"));
        }
        if entry.price.is_none() {
            errors.push(missing_field(RecordSource::Catalogue, idx + 1, "price"));
        }
    }
    debug!("Catalogue validation found {} error(s).", errors.len());
    errors
}

// Same contract as validate_catalogue, for the sales file. Note the
// required keys carry the file's capitalized spelling.
pub fn validate_sales(sales: &[SaleRecord]) -> Vec<DataError> {
    let mut errors: Vec<DataError> = vec![];
    for (idx, sale) in sales.iter().enumerate() {
        if sale.product.is_none() {
            errors.push(missing_field(RecordSource::Sales, idx + 1, "Product"));
        }
        if sale.quantity.is_none() {
            errors.push(missing_field(RecordSource::Sales, idx + 1, "Quantity"));
        }
    }
    debug!("Sales validation found {} error(s).", errors.len());
    errors
}

fn missing_field(source: RecordSource, line: usize, key: &'static str) -> DataError {
    DataError::MissingField { source, line, key }
}
