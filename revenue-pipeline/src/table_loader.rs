//! CSV loaders and writers for the portfolio tables.
//!
//! Expected headers:
//!   products:   product_name, revenue, growth_rate, units_sold
//!   inventory:  product_name, stock, reorder_threshold
//!   financials: date, revenue, expenses, net_cash  (date as YYYY-MM-DD)
//!
//! Rows are validated against the engine's input rules on load, so a bad
//! row is reported with its line number instead of surfacing later.

use std::io::{Read, Write};
use std::path::Path;

use revenue_engine::{EngineResult, FinancialRow, InventoryRow, ProductRow};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{LoadError, LoadResult};

/// A table row that can be checked after deserialization.
pub trait TableRow: DeserializeOwned + Serialize {
    fn check(&self) -> EngineResult<()>;
}

impl TableRow for ProductRow {
    fn check(&self) -> EngineResult<()> {
        self.validate()
    }
}

impl TableRow for InventoryRow {
    fn check(&self) -> EngineResult<()> {
        self.validate()
    }
}

impl TableRow for FinancialRow {
    fn check(&self) -> EngineResult<()> {
        self.validate()
    }
}

/// Read every row of a table.
pub fn load_table<T: TableRow, R: Read>(reader: R) -> LoadResult<Vec<T>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (line_num, result) in csv_reader.deserialize().enumerate() {
        let line = line_num + 2;
        let row: T = result.map_err(|e| LoadError::Csv { line, source: e })?;
        row.check().map_err(|e| LoadError::Row {
            line,
            reason: e.to_string(),
        })?;
        rows.push(row);
    }
    Ok(rows)
}

pub fn load_table_file<T: TableRow>(path: &str) -> LoadResult<Vec<T>> {
    let file = std::fs::File::open(path).map_err(|e| LoadError::io(path, e))?;
    let rows = load_table(file)?;
    log::info!("loaded {} row(s) from {}", rows.len(), path);
    Ok(rows)
}

pub fn load_products_file(path: &str) -> LoadResult<Vec<ProductRow>> {
    load_table_file(path)
}

pub fn load_inventory_file(path: &str) -> LoadResult<Vec<InventoryRow>> {
    load_table_file(path)
}

/// Financial rows sorted by date, as the portfolio rules expect.
pub fn load_financials_file(path: &str) -> LoadResult<Vec<FinancialRow>> {
    let mut rows: Vec<FinancialRow> = load_table_file(path)?;
    rows.sort_by_key(|r| r.date);
    Ok(rows)
}

/// Write rows with a header line.
pub fn write_table<T: Serialize, W: Write>(writer: W, rows: &[T]) -> LoadResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (idx, row) in rows.iter().enumerate() {
        csv_writer.serialize(row).map_err(|e| LoadError::Csv {
            line: idx + 2,
            source: e,
        })?;
    }
    csv_writer
        .flush()
        .map_err(|e| LoadError::io("<writer>", e))?;
    Ok(())
}

/// Replace the file's contents with `rows`.
///
/// The table is written to a sibling temporary file first and renamed over
/// the original, so a failed write leaves the old table intact.
pub fn write_table_file<T: Serialize>(path: &str, rows: &[T]) -> LoadResult<()> {
    let target = Path::new(path);
    let tmp = target.with_extension("csv.tmp");
    let tmp_display = tmp.display().to_string();

    let file = std::fs::File::create(&tmp).map_err(|e| LoadError::io(&tmp_display, e))?;
    write_table(file, rows)?;
    std::fs::rename(&tmp, target).map_err(|e| LoadError::io(path, e))?;
    log::info!("rewrote {} with {} row(s)", path, rows.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const PRODUCTS_CSV: &str = "\
product_name,revenue,growth_rate,units_sold
Classic Cars,52000.5,0.21,140
Motorcycles,18000,0.12,210
";

    #[test]
    fn load_products() {
        let rows: Vec<ProductRow> = load_table(PRODUCTS_CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].product_name, "Classic Cars");
        assert!((rows[0].revenue - 52000.5).abs() < 0.01);
        assert_eq!(rows[1].units_sold, 210);
    }

    #[test]
    fn negative_stock_is_rejected_with_line_number() {
        let csv_data = "\
product_name,stock,reorder_threshold
Ships,12,10
Trains,-3,10
";
        let err = load_table::<InventoryRow, _>(csv_data.as_bytes()).unwrap_err();
        match err {
            LoadError::Row { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("Trains.stock"), "{}", reason);
            }
            other => panic!("expected row error, got {:?}", other),
        }
    }

    #[test]
    fn malformed_number_is_csv_error() {
        let csv_data = "\
product_name,stock,reorder_threshold
Ships,lots,10
";
        let err = load_table::<InventoryRow, _>(csv_data.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Csv { line: 2, .. }));
    }

    #[test]
    fn financial_dates_parse() {
        let csv_data = "\
date,revenue,expenses,net_cash
2024-02-29,1000,700,300
";
        let rows: Vec<FinancialRow> = load_table(csv_data.as_bytes()).unwrap();
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn write_then_read_back_inventory() {
        let rows = vec![InventoryRow {
            product_name: "Vintage Cars".into(),
            stock: 35,
            reorder_threshold: 20,
        }];
        let mut buf = Vec::new();
        write_table(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("product_name,stock,reorder_threshold\n"));
        let back: Vec<InventoryRow> = load_table(text.as_bytes()).unwrap();
        assert_eq!(back, rows);
    }
}
