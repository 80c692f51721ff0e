use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Canonical schema
// ---------------------------------------------------------------------------

/// Canonical column names, in export order.
pub const CANONICAL_HEADERS: [&str; 4] = ["Country", "Product", "Total Sales", "Order Date"];

/// Source-header aliases mapped to their canonical column name.
/// The original data file carries Arabic headers.
pub const COLUMN_ALIASES: [(&str, &str); 4] = [
    ("الدولة", "Country"),
    ("المنتج", "Product"),
    ("إجمالي المبيعات", "Total Sales"),
    ("تاريخ الطلب", "Order Date"),
];

// ---------------------------------------------------------------------------
// SalesRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// A single sales record (one row of the source spreadsheet).
///
/// `total_sales` is expected to be non-negative in well-formed input but is
/// passed through unchecked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRecord {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Product")]
    pub product: String,
    #[serde(rename = "Total Sales")]
    pub total_sales: f64,
    #[serde(rename = "Order Date")]
    pub order_date: NaiveDate,
}

// ---------------------------------------------------------------------------
// SalesDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full loaded dataset with pre-computed value indices.
///
/// Built once at load time and treated as immutable afterwards; the unique
/// country/product sets and the min–max date span seed the default filter
/// selection.
#[derive(Debug, Clone, Default)]
pub struct SalesDataset {
    /// All records, in source-file order.
    pub records: Vec<SalesRecord>,
    /// Sorted set of distinct countries.
    pub countries: BTreeSet<String>,
    /// Sorted set of distinct products.
    pub products: BTreeSet<String>,
    /// Earliest and latest order date, `None` for an empty dataset.
    pub date_span: Option<(NaiveDate, NaiveDate)>,
}

impl SalesDataset {
    /// Build the value indices from the loaded records.
    pub fn from_records(records: Vec<SalesRecord>) -> Self {
        let mut countries = BTreeSet::new();
        let mut products = BTreeSet::new();
        let mut date_span: Option<(NaiveDate, NaiveDate)> = None;

        for rec in &records {
            countries.insert(rec.country.clone());
            products.insert(rec.product.clone());
            date_span = Some(match date_span {
                None => (rec.order_date, rec.order_date),
                Some((lo, hi)) => (lo.min(rec.order_date), hi.max(rec.order_date)),
            });
        }

        SalesDataset {
            records,
            countries,
            products,
            date_span,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Shorthand record constructor shared by the data-layer tests.
    pub(crate) fn record(
        country: &str,
        product: &str,
        total_sales: f64,
        date: &str,
    ) -> SalesRecord {
        SalesRecord {
            country: country.to_string(),
            product: product.to_string(),
            total_sales,
            order_date: date.parse().unwrap(),
        }
    }

    /// The three-row dataset used across the data-layer tests.
    pub(crate) fn sample_dataset() -> SalesDataset {
        SalesDataset::from_records(vec![
            record("Egypt", "Widget", 100.0, "2024-01-01"),
            record("UAE", "Gadget", 200.0, "2024-02-01"),
            record("Egypt", "Gadget", 50.0, "2024-01-15"),
        ])
    }

    #[test]
    fn from_records_builds_indices_and_span() {
        let ds = sample_dataset();

        assert_eq!(ds.len(), 3);
        assert_eq!(
            ds.countries.iter().collect::<Vec<_>>(),
            ["Egypt", "UAE"].iter().collect::<Vec<_>>()
        );
        assert_eq!(
            ds.products.iter().collect::<Vec<_>>(),
            ["Gadget", "Widget"].iter().collect::<Vec<_>>()
        );
        assert_eq!(
            ds.date_span,
            Some(("2024-01-01".parse().unwrap(), "2024-02-01".parse().unwrap()))
        );
    }

    #[test]
    fn empty_dataset_has_no_span() {
        let ds = SalesDataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert_eq!(ds.date_span, None);
    }
}
