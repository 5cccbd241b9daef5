use std::fmt;

use rust_decimal::Decimal;

// Raw shape of one catalogue record as it appears in the JSON file.
// Both fields are Options on purpose: a record that is missing a key
// still has to flow through the pipeline so the validator can report
// it, rather than being rejected at deserialization time. serde fills
// an absent key with None, and unknown keys in the file are ignored.
#[derive(Clone, Debug, serde::Deserialize, PartialEq)]
pub struct CatalogueEntry {
    pub title: Option<String>,
    pub price: Option<Decimal>,
}

// Raw shape of one sales record. The JSON uses capitalized keys
// ('Product', 'Quantity'), which we rename down to Rust-style field
// names. Quantity is a Decimal rather than an integer because the
// sales feed makes no promise about it being whole, and negative
// quantities (returns) are accepted arithmetically.
#[derive(Clone, Debug, serde::Deserialize, PartialEq)]
pub struct SaleRecord {
    #[serde(rename = "Product")]
    pub product: Option<String>,
    #[serde(rename = "Quantity")]
    pub quantity: Option<Decimal>,
}

// Which of the two input files a diagnostic refers to. The Display
// impl below needs both the capitalized and the lowercase spelling,
// so we keep a helper for each.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RecordSource {
    Catalogue,
    Sales,
}

impl RecordSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordSource::Catalogue => "Catalogue",
            RecordSource::Sales => "Sales",
        }
    }

    pub fn as_lower_str(&self) -> &'static str {
        match self {
            RecordSource::Catalogue => "catalogue",
            RecordSource::Sales => "sales",
        }
    }
}

// Every way a run can go partially wrong. None of these abort the
// pipeline; they accumulate in order into one list and are surfaced
// at the end of the run, both on the console and in the CSV. The
// Display strings are observable output formats, shared with the
// report file, so they must not drift.
#[derive(Clone, Debug, PartialEq)]
pub enum DataError {
    // The input path does not resolve to an existing file.
    MissingFile { path: String },
    // The input file exists but is not a well-formed JSON array of records.
    ParseError {
        source: RecordSource,
        message: String,
    },
    // A record lacks one of its required keys.
    MissingField {
        source: RecordSource,
        line: usize,
        key: &'static str,
    },
    // A sales record names a product with no catalogue entry. Rendered
    // as the bare product name, one entry per occurrence.
    UnmatchedProduct { product: String },
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::MissingFile { path } => write!(f, "File {path} does not exist."),
            DataError::ParseError { source, message } => {
                write!(f, "{} file format error: {message}", source.as_str())
            }
            DataError::MissingField { source, line, key } => {
                write!(
                    f,
                    "Line {line}: Missing key '{key}' in {} file.",
                    source.as_lower_str()
                )
            }
            DataError::UnmatchedProduct { product } => write!(f, "{product}"),
        }
    }
}

// One product's revenue across every sale that matched it, rounded to
// two places. Lines keep the order in which products were first seen
// while walking the sales records; nothing sorts them afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregateLine {
    pub product: String,
    pub total_sales: Decimal,
}

// The finished computation: aggregate lines plus the full ordered
// diagnostic list. Built once by the pipeline and handed immutably to
// the presentation layer, rather than letting every stage poke at a
// shared error list.
#[derive(Clone, Debug, PartialEq)]
pub struct SalesReport {
    pub lines: Vec<AggregateLine>,
    pub errors: Vec<DataError>,
}

impl SalesReport {
    // The grand total is recomputed from the lines on every call
    // rather than cached, so it can never disagree with the lines it
    // was derived from. The sum is rounded to two places the same way
    // as the individual lines.
    pub fn grand_total(&self) -> Decimal {
        self.lines
            .iter()
            .map(|line| line.total_sales)
            .sum::<Decimal>()
            .round_dp(2)
    }
}
