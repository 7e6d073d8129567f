//! CSV sales order loader.
//!
//! Reads order-line exports (one row per order line) into `SaleRecord`s.
//! Upstream column names are mapped onto canonical ones:
//!
//!   ORDERDATE -> date, QUANTITYORDERED -> units_sold, PRICEEACH -> price,
//!   SALES -> sales, PRODUCTLINE -> product_line, STATUS -> status,
//!   YEAR_ID -> year, MONTH_ID -> month
//!
//! Canonical names are accepted as headers too. Any other column is ignored.

use std::io::Read;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::{LoadError, LoadResult};

/// Product line assigned when the export has no product line column.
pub const UNKNOWN_PRODUCT_LINE: &str = "Unknown";

const DATETIME_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"];

/// One order line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleRecord {
    pub date: NaiveDate,
    pub units_sold: f64,
    pub price: f64,
    pub sales: f64,
    pub product_line: String,
    pub status: String,
    /// `YEAR_ID` and `MONTH_ID` as exported. Carried through for JSON
    /// consumers; aggregation always buckets by `date`.
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// Header positions of the columns we read.
#[derive(Debug, Default)]
struct SalesColumns {
    date: Option<usize>,
    units_sold: Option<usize>,
    price: Option<usize>,
    sales: Option<usize>,
    product_line: Option<usize>,
    status: Option<usize>,
    year: Option<usize>,
    month: Option<usize>,
}

impl SalesColumns {
    fn resolve(headers: &csv::StringRecord) -> Self {
        let find = |upstream: &str, canonical: &str| {
            headers.iter().position(|h| {
                let h = h.trim_start_matches('\u{feff}');
                h.eq_ignore_ascii_case(upstream) || h.eq_ignore_ascii_case(canonical)
            })
        };
        Self {
            date: find("ORDERDATE", "date"),
            units_sold: find("QUANTITYORDERED", "units_sold"),
            price: find("PRICEEACH", "price"),
            sales: find("SALES", "sales"),
            product_line: find("PRODUCTLINE", "product_line"),
            status: find("STATUS", "status"),
            year: find("YEAR_ID", "year"),
            month: find("MONTH_ID", "month"),
        }
    }

    /// `Ok(None)` when the row has no parseable date.
    ///
    /// An empty cell or a missing numeric column reads as `0.0`; a numeric
    /// cell that does not parse is an error for the whole load.
    fn parse(&self, row: &csv::StringRecord, line: usize) -> LoadResult<Option<SaleRecord>> {
        let field = |idx: Option<usize>| idx.and_then(|i| row.get(i)).map(str::trim);
        let number = |idx: Option<usize>, column: &str| -> LoadResult<f64> {
            match field(idx) {
                None | Some("") => Ok(0.0),
                Some(raw) => raw
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| LoadError::Row {
                        line,
                        reason: format!("{} is not a number: '{}'", column, raw),
                    }),
            }
        };

        let Some(date) = field(self.date).and_then(parse_date) else {
            return Ok(None);
        };
        let product_line = match field(self.product_line) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => UNKNOWN_PRODUCT_LINE.to_string(),
        };

        Ok(Some(SaleRecord {
            date,
            units_sold: number(self.units_sold, "QUANTITYORDERED")?,
            price: number(self.price, "PRICEEACH")?,
            sales: number(self.sales, "SALES")?,
            product_line,
            status: field(self.status).unwrap_or_default().to_string(),
            year: field(self.year).and_then(|v| v.parse().ok()),
            month: field(self.month).and_then(|v| v.parse().ok()),
        }))
    }
}

/// Parse an order date in any of the accepted formats.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok().map(|dt| dt.date()))
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        })
}

/// Decode raw bytes as UTF-8, falling back to ISO-8859-1.
pub fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            log::debug!("sales data is not valid UTF-8, decoding as ISO-8859-1");
            // every Latin-1 byte maps to the code point of the same value
            err.into_bytes().into_iter().map(char::from).collect()
        }
    }
}

/// Parse decoded CSV text. Rows without a usable date are dropped; the
/// rest are returned sorted by date, ties kept in file order.
pub fn parse_sales(text: &str) -> LoadResult<Vec<SaleRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = csv_reader
        .headers()
        .map_err(|e| LoadError::Csv { line: 1, source: e })?
        .clone();
    let columns = SalesColumns::resolve(&headers);
    if columns.date.is_none() {
        log::warn!("sales data has no ORDERDATE/date column; every row will be dropped");
    }

    let mut records = Vec::new();
    let mut dropped = 0usize;
    for (line_num, result) in csv_reader.records().enumerate() {
        let line = line_num + 2;
        let row = result.map_err(|e| LoadError::Csv { line, source: e })?;
        match columns.parse(&row, line)? {
            Some(record) => records.push(record),
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        log::warn!("dropped {} sales row(s) without a parseable date", dropped);
    }

    records.sort_by_key(|r| r.date);
    Ok(records)
}

/// Load sales records from a reader.
pub fn load_sales<R: Read>(mut reader: R) -> LoadResult<Vec<SaleRecord>> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| LoadError::io("<reader>", e))?;
    parse_sales(&decode(bytes))
}

/// Load sales records from a file. A file with no dated rows is an error.
pub fn load_sales_file(path: &str) -> LoadResult<Vec<SaleRecord>> {
    let bytes = std::fs::read(path).map_err(|e| LoadError::io(path, e))?;
    let records = parse_sales(&decode(bytes))?;
    if records.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_string(),
        });
    }
    log::info!("loaded {} sales row(s) from {}", records.len(), path);
    Ok(records)
}
