use anyhow::{Context, Result};
use rust_xlsxwriter::Workbook;

use super::model::{SalesDataset, CANONICAL_HEADERS};

// ---------------------------------------------------------------------------
// Download metadata
// ---------------------------------------------------------------------------

/// Suggested filename for the delimited-text download.
pub const CSV_FILE_NAME: &str = "filtered_sales_data.csv";
/// Suggested filename for the workbook download.
pub const XLSX_FILE_NAME: &str = "filtered_sales_data.xlsx";

pub const CSV_CONTENT_TYPE: &str = "text/csv";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Sheet name used in the exported workbook.
pub const SHEET_NAME: &str = "Filtered Data";

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// Serialize the selected rows as UTF-8 CSV: canonical header line first,
/// then one line per row in the given order, dates in ISO form.
///
/// An empty selection still produces a valid header-only document.
pub fn to_csv(dataset: &SalesDataset, indices: &[usize]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer
        .write_record(CANONICAL_HEADERS)
        .context("writing CSV header")?;
    for &idx in indices {
        writer
            .serialize(&dataset.records[idx])
            .with_context(|| format!("writing CSV row {idx}"))?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV buffer: {e}"))
}

// ---------------------------------------------------------------------------
// XLSX export
// ---------------------------------------------------------------------------

/// Serialize the selected rows as a single-sheet XLSX workbook, entirely in
/// memory.  Same header and row order as the CSV form; dates are written as
/// ISO text so both exports re-parse identically.
pub fn to_xlsx(dataset: &SalesDataset, indices: &[usize]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME).context("naming sheet")?;

    for (col, header) in CANONICAL_HEADERS.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .context("writing XLSX header")?;
    }

    for (out_row, &idx) in indices.iter().enumerate() {
        let rec = &dataset.records[idx];
        let row = (out_row + 1) as u32;
        worksheet.write_string(row, 0, &rec.country)?;
        worksheet.write_string(row, 1, &rec.product)?;
        worksheet.write_number(row, 2, rec.total_sales)?;
        worksheet.write_string(row, 3, rec.order_date.format("%Y-%m-%d").to_string())?;
    }

    workbook
        .save_to_buffer()
        .context("building XLSX buffer")
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::data::loader::{read_csv, read_xlsx};
    use crate::data::model::tests::sample_dataset;

    #[test]
    fn csv_round_trips_through_the_loader() {
        let ds = sample_dataset();
        let indices = vec![0, 2];
        let bytes = to_csv(&ds, &indices).unwrap();

        let reloaded = read_csv(Cursor::new(bytes)).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.records[0], ds.records[0]);
        assert_eq!(reloaded.records[1], ds.records[2]);
    }

    #[test]
    fn csv_of_empty_selection_is_header_only() {
        let ds = sample_dataset();
        let bytes = to_csv(&ds, &[]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "Country,Product,Total Sales,Order Date\n");
    }

    #[test]
    fn csv_preserves_row_order() {
        let ds = sample_dataset();
        let bytes = to_csv(&ds, &[2, 0]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "Egypt,Gadget,50.0,2024-01-15");
        assert_eq!(lines[2], "Egypt,Widget,100.0,2024-01-01");
    }

    #[test]
    fn xlsx_round_trips_through_the_loader() {
        let ds = sample_dataset();
        let indices: Vec<usize> = (0..ds.len()).collect();
        let bytes = to_xlsx(&ds, &indices).unwrap();

        let reloaded = read_xlsx(Cursor::new(bytes)).unwrap();
        assert_eq!(reloaded.records, ds.records);
    }

    #[test]
    fn xlsx_of_empty_selection_is_still_a_valid_workbook() {
        let ds = sample_dataset();
        let bytes = to_xlsx(&ds, &[]).unwrap();
        let reloaded = read_xlsx(Cursor::new(bytes)).unwrap();
        assert!(reloaded.is_empty());
    }
}
