use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use calamine::{Data, Reader, Xlsx};
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{SalesDataset, SalesRecord, CANONICAL_HEADERS, COLUMN_ALIASES};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Everything that can go wrong while loading a dataset.
///
/// Schema and value errors are fatal: the original data file is expected to
/// be well-formed, so a missing column or unparsable cell aborts the load
/// rather than dropping rows.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("required column '{0}' not found in input")]
    SchemaMismatch(&'static str),
    #[error("row {row}: unparsable order date '{value}'")]
    MalformedDate { row: usize, value: String },
    #[error("row {row}: unparsable sales amount '{value}'")]
    MalformedAmount { row: usize, value: String },
    #[error("workbook contains no sheets")]
    NoSheet,
    #[error("expected a top-level JSON array of record objects")]
    JsonShape,
    #[error("row {0}: expected a JSON object")]
    JsonRow(usize),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Xlsx(#[from] calamine::XlsxError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a sales dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` – Excel workbook, first sheet (the original data file)
/// * `.csv`  – header row plus one record per line
/// * `.json` – `[{ "Country": ..., "Product": ..., ... }, ...]`
///
/// Source column headers may be either the canonical English names or the
/// original Arabic ones; both resolve through the alias table.
pub fn load_file(path: &Path) -> Result<SalesDataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" => read_xlsx(BufReader::new(File::open(path)?)),
        "csv" => read_csv(File::open(path)?),
        "json" => read_json(File::open(path)?),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Header resolution
// ---------------------------------------------------------------------------

/// Map a source header to its canonical column name, if it is one we know.
fn canonical_name(header: &str) -> Option<&'static str> {
    let header = header.trim();
    if let Some(&name) = CANONICAL_HEADERS.iter().find(|&&c| c == header) {
        return Some(name);
    }
    COLUMN_ALIASES
        .iter()
        .find(|(alias, _)| *alias == header)
        .map(|&(_, name)| name)
}

/// Resolve the four required column positions from a header row.
/// Returned in [`CANONICAL_HEADERS`] order.
fn resolve_columns(headers: &[String]) -> Result<[usize; 4], LoadError> {
    let mut positions = [0usize; 4];
    for (slot, &wanted) in CANONICAL_HEADERS.iter().enumerate() {
        positions[slot] = headers
            .iter()
            .position(|h| canonical_name(h) == Some(wanted))
            .ok_or(LoadError::SchemaMismatch(wanted))?;
    }
    Ok(positions)
}

// ---------------------------------------------------------------------------
// Value parsing
// ---------------------------------------------------------------------------

/// Parse an order date from text.  ISO dates first, then the `d/m/Y`
/// convention used by regional exports.
fn parse_date(value: &str, row: usize) -> Result<NaiveDate, LoadError> {
    let value = value.trim();
    if let Ok(d) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(d);
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(dt.date());
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(value, "%d/%m/%Y") {
        return Ok(d);
    }
    Err(LoadError::MalformedDate {
        row,
        value: value.to_string(),
    })
}

/// Parse a sales amount from text, tolerating thousands separators.
fn parse_amount(value: &str, row: usize) -> Result<f64, LoadError> {
    let cleaned = value.trim().replace(',', "");
    cleaned
        .parse::<f64>()
        .map_err(|_| LoadError::MalformedAmount {
            row,
            value: value.trim().to_string(),
        })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: a header row naming the four required columns (canonical or
/// aliased), then one record per line.  Extra columns are ignored.
pub(crate) fn read_csv<R: Read>(reader: R) -> Result<SalesDataset, LoadError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let [country_idx, product_idx, sales_idx, date_idx] = resolve_columns(&headers)?;

    let mut records = Vec::new();
    for (row_no, result) in rdr.records().enumerate() {
        let row = result?;
        records.push(SalesRecord {
            country: row.get(country_idx).unwrap_or("").trim().to_string(),
            product: row.get(product_idx).unwrap_or("").trim().to_string(),
            total_sales: parse_amount(row.get(sales_idx).unwrap_or(""), row_no)?,
            order_date: parse_date(row.get(date_idx).unwrap_or(""), row_no)?,
        });
    }

    Ok(SalesDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// XLSX loader
// ---------------------------------------------------------------------------

/// Read the first sheet of an Excel workbook.  Row 0 is the header row;
/// date cells may be native Excel datetimes or text.
pub(crate) fn read_xlsx<RS: Read + Seek>(reader: RS) -> Result<SalesDataset, LoadError> {
    let mut workbook = Xlsx::new(reader)?;
    let range = workbook.worksheet_range_at(0).ok_or(LoadError::NoSheet)??;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(|c| c.to_string().trim().to_string()).collect())
        .unwrap_or_default();
    let [country_idx, product_idx, sales_idx, date_idx] = resolve_columns(&headers)?;

    let mut records = Vec::new();
    for (row_no, row) in rows.enumerate() {
        let country = cell_text(row.get(country_idx));
        let product = cell_text(row.get(product_idx));
        let total_sales = cell_amount(row.get(sales_idx), row_no)?;
        let order_date = cell_date(row.get(date_idx), row_no)?;
        records.push(SalesRecord {
            country,
            product,
            total_sales,
            order_date,
        });
    }

    Ok(SalesDataset::from_records(records))
}

fn cell_text(cell: Option<&Data>) -> String {
    match cell {
        Some(Data::String(s)) => s.trim().to_string(),
        Some(Data::Empty) | None => String::new(),
        Some(other) => other.to_string().trim().to_string(),
    }
}

fn cell_amount(cell: Option<&Data>, row: usize) -> Result<f64, LoadError> {
    match cell {
        Some(Data::Float(f)) => Ok(*f),
        Some(Data::Int(i)) => Ok(*i as f64),
        Some(Data::String(s)) => parse_amount(s, row),
        other => Err(LoadError::MalformedAmount {
            row,
            value: other.map(|c| c.to_string()).unwrap_or_default(),
        }),
    }
}

fn cell_date(cell: Option<&Data>, row: usize) -> Result<NaiveDate, LoadError> {
    match cell {
        Some(Data::DateTime(dt)) => {
            dt.as_datetime()
                .map(|ndt| ndt.date())
                .ok_or(LoadError::MalformedDate {
                    row,
                    value: dt.as_f64().to_string(),
                })
        }
        Some(Data::DateTimeIso(s)) | Some(Data::String(s)) => parse_date(s, row),
        other => Err(LoadError::MalformedDate {
            row,
            value: other.map(|c| c.to_string()).unwrap_or_default(),
        }),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   {
///     "Country": "Egypt",
///     "Product": "Widget",
///     "Total Sales": 100.0,
///     "Order Date": "2024-01-01"
///   },
///   ...
/// ]
/// ```
pub(crate) fn read_json<R: Read>(mut reader: R) -> Result<SalesDataset, LoadError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let rows = root.as_array().ok_or(LoadError::JsonShape)?;

    let mut records = Vec::with_capacity(rows.len());
    for (row_no, value) in rows.iter().enumerate() {
        let obj = value.as_object().ok_or(LoadError::JsonRow(row_no))?;

        let field = |wanted: &'static str| -> Result<&JsonValue, LoadError> {
            obj.iter()
                .find(|(key, _)| canonical_name(key) == Some(wanted))
                .map(|(_, v)| v)
                .ok_or(LoadError::SchemaMismatch(wanted))
        };

        let total_sales = match field("Total Sales")? {
            JsonValue::Number(n) => n.as_f64().unwrap_or(f64::NAN),
            JsonValue::String(s) => parse_amount(s, row_no)?,
            other => {
                return Err(LoadError::MalformedAmount {
                    row: row_no,
                    value: other.to_string(),
                })
            }
        };
        let order_date = match field("Order Date")? {
            JsonValue::String(s) => parse_date(s, row_no)?,
            other => {
                return Err(LoadError::MalformedDate {
                    row: row_no,
                    value: other.to_string(),
                })
            }
        };

        records.push(SalesRecord {
            country: field("Country")?.as_str().unwrap_or("").trim().to_string(),
            product: field("Product")?.as_str().unwrap_or("").trim().to_string(),
            total_sales,
            order_date,
        });
    }

    Ok(SalesDataset::from_records(records))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn csv_with_canonical_headers() {
        let csv = "Country,Product,Total Sales,Order Date\n\
                   Egypt,Widget,100,2024-01-01\n\
                   UAE,Gadget,200.5,2024-02-01\n";
        let ds = read_csv(Cursor::new(csv)).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].country, "Egypt");
        assert_eq!(ds.records[1].total_sales, 200.5);
        assert_eq!(ds.records[1].order_date, "2024-02-01".parse().unwrap());
    }

    #[test]
    fn csv_with_arabic_headers_maps_to_canonical_schema() {
        let csv = "الدولة,المنتج,إجمالي المبيعات,تاريخ الطلب\n\
                   Egypt,Widget,100,2024-01-01\n";
        let ds = read_csv(Cursor::new(csv)).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].product, "Widget");
        assert_eq!(ds.records[0].total_sales, 100.0);
    }

    #[test]
    fn csv_column_order_does_not_matter() {
        let csv = "Order Date,Total Sales,Product,Country\n\
                   2024-01-01,100,Widget,Egypt\n";
        let ds = read_csv(Cursor::new(csv)).unwrap();
        assert_eq!(ds.records[0].country, "Egypt");
        assert_eq!(ds.records[0].order_date, "2024-01-01".parse().unwrap());
    }

    #[test]
    fn missing_column_is_a_schema_mismatch() {
        let csv = "Country,Total Sales,Order Date\nEgypt,100,2024-01-01\n";
        let err = read_csv(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, LoadError::SchemaMismatch("Product")));
    }

    #[test]
    fn unparsable_date_fails_the_load() {
        let csv = "Country,Product,Total Sales,Order Date\n\
                   Egypt,Widget,100,2024-01-01\n\
                   Egypt,Widget,100,not-a-date\n";
        let err = read_csv(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, LoadError::MalformedDate { row: 1, .. }));
    }

    #[test]
    fn unparsable_amount_fails_the_load() {
        let csv = "Country,Product,Total Sales,Order Date\nEgypt,Widget,lots,2024-01-01\n";
        let err = read_csv(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, LoadError::MalformedAmount { row: 0, .. }));
    }

    #[test]
    fn date_formats_accepted() {
        assert_eq!(
            parse_date("2024-03-05", 0).unwrap(),
            "2024-03-05".parse().unwrap()
        );
        assert_eq!(
            parse_date("2024-03-05 13:45:00", 0).unwrap(),
            "2024-03-05".parse().unwrap()
        );
        assert_eq!(
            parse_date("05/03/2024", 0).unwrap(),
            "2024-03-05".parse().unwrap()
        );
        assert!(parse_date("March 5th", 0).is_err());
    }

    #[test]
    fn amounts_tolerate_thousands_separators() {
        assert_eq!(parse_amount("1,234.5", 0).unwrap(), 1234.5);
    }

    #[test]
    fn json_records_load() {
        let json = r#"[
            {"Country": "Egypt", "Product": "Widget", "Total Sales": 100.0, "Order Date": "2024-01-01"},
            {"الدولة": "UAE", "المنتج": "Gadget", "إجمالي المبيعات": "200", "تاريخ الطلب": "2024-02-01"}
        ]"#;
        let ds = read_json(Cursor::new(json)).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[1].country, "UAE");
        assert_eq!(ds.records[1].total_sales, 200.0);
    }

    #[test]
    fn json_must_be_an_array() {
        let err = read_json(Cursor::new(r#"{"Country": "Egypt"}"#)).unwrap_err();
        assert!(matches!(err, LoadError::JsonShape));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("sales.txt")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedExtension(ext) if ext == "txt"));
    }
}
