use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::model::SalesDataset;

// ---------------------------------------------------------------------------
// FilterSelection – the user-chosen constraints
// ---------------------------------------------------------------------------

/// The constraints applied to the dataset: selected countries, selected
/// products, and an inclusive date range.  All three are conjunctive.
///
/// An empty country or product set means "nothing selected" and yields an
/// empty result.  The "show everything" state is an explicit
/// [`FilterSelection::select_all`] construction, not an implicit fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSelection {
    pub countries: BTreeSet<String>,
    pub products: BTreeSet<String>,
    /// Inclusive start of the date range.
    pub start: NaiveDate,
    /// Inclusive end of the date range.
    pub end: NaiveDate,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self {
            countries: BTreeSet::new(),
            products: BTreeSet::new(),
            start: NaiveDate::default(),
            end: NaiveDate::default(),
        }
    }
}

impl FilterSelection {
    /// The default selection for a freshly loaded dataset: every country,
    /// every product, and the dataset's full min–max date span.
    pub fn select_all(dataset: &SalesDataset) -> Self {
        let (start, end) = dataset
            .date_span
            .unwrap_or((NaiveDate::default(), NaiveDate::default()));
        Self {
            countries: dataset.countries.clone(),
            products: dataset.products.clone(),
            start,
            end,
        }
    }

    /// Whether a record with these attributes passes the selection.
    pub fn matches(&self, country: &str, product: &str, order_date: NaiveDate) -> bool {
        self.countries.contains(country)
            && self.products.contains(product)
            && self.start <= order_date
            && order_date <= self.end
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return indices of records that pass the selection, in original row order.
///
/// A record passes when its country and product are both selected and its
/// order date falls inside the inclusive range.  An inverted range
/// (`start > end`) matches nothing; that is a legitimate empty result, not
/// an error.
pub fn filtered_indices(dataset: &SalesDataset, selection: &FilterSelection) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| selection.matches(&rec.country, &rec.product, rec.order_date))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sample_dataset;
    use crate::data::model::SalesDataset;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn select_all_covers_the_whole_dataset() {
        let ds = sample_dataset();
        let sel = FilterSelection::select_all(&ds);
        assert_eq!(filtered_indices(&ds, &sel), vec![0, 1, 2]);
        assert_eq!(sel.start, date("2024-01-01"));
        assert_eq!(sel.end, date("2024-02-01"));
    }

    #[test]
    fn conjunctive_country_and_date_filter() {
        // Egypt only, January only: rows 0 and 2 survive.
        let ds = sample_dataset();
        let mut sel = FilterSelection::select_all(&ds);
        sel.countries = ["Egypt".to_string()].into();
        sel.end = date("2024-01-31");

        let idx = filtered_indices(&ds, &sel);
        assert_eq!(idx, vec![0, 2]);
        for &i in &idx {
            let rec = &ds.records[i];
            assert!(sel.matches(&rec.country, &rec.product, rec.order_date));
        }
        // Every excluded row violates at least one predicate.
        for (i, rec) in ds.records.iter().enumerate() {
            if !idx.contains(&i) {
                assert!(!sel.matches(&rec.country, &rec.product, rec.order_date));
            }
        }
    }

    #[test]
    fn empty_country_selection_yields_nothing() {
        let ds = sample_dataset();
        let mut sel = FilterSelection::select_all(&ds);
        sel.countries.clear();
        assert!(filtered_indices(&ds, &sel).is_empty());
    }

    #[test]
    fn empty_product_selection_yields_nothing() {
        let ds = sample_dataset();
        let mut sel = FilterSelection::select_all(&ds);
        sel.products.clear();
        assert!(filtered_indices(&ds, &sel).is_empty());
    }

    #[test]
    fn inverted_date_range_yields_nothing() {
        let ds = sample_dataset();
        let mut sel = FilterSelection::select_all(&ds);
        sel.start = date("2024-02-01");
        sel.end = date("2024-01-01");
        assert!(filtered_indices(&ds, &sel).is_empty());
    }

    #[test]
    fn date_range_is_inclusive_on_both_ends() {
        let ds = sample_dataset();
        let mut sel = FilterSelection::select_all(&ds);
        sel.start = date("2024-01-15");
        sel.end = date("2024-02-01");
        assert_eq!(filtered_indices(&ds, &sel), vec![1, 2]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let ds = sample_dataset();
        let mut sel = FilterSelection::select_all(&ds);
        sel.countries = ["Egypt".to_string()].into();

        let once = filtered_indices(&ds, &sel);
        let survivors: Vec<_> = once.iter().map(|&i| ds.records[i].clone()).collect();
        let refiltered = SalesDataset::from_records(survivors.clone());
        let twice = filtered_indices(&refiltered, &sel);

        assert_eq!(twice.len(), once.len());
        for (j, &i) in twice.iter().zip(once.iter()) {
            assert_eq!(refiltered.records[*j], ds.records[i]);
        }
    }
}
