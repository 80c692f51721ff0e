use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::model::SalesDataset;

/// Label shown for the top-product / top-country KPIs when nothing matches
/// the current filters.
pub const NO_DATA: &str = "N/A";

// ---------------------------------------------------------------------------
// AggregateResult – summary statistics over the filtered rows
// ---------------------------------------------------------------------------

/// Group-by sums and scalar KPIs derived from a filtered set of rows.
/// Recomputed from scratch on every filter change; never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateResult {
    /// product → summed sales.
    pub sales_by_product: BTreeMap<String, f64>,
    /// country → summed sales.
    pub sales_by_country: BTreeMap<String, f64>,
    /// order date → summed sales.
    pub sales_over_time: BTreeMap<NaiveDate, f64>,
    /// Sum of `total_sales` over all filtered rows.
    pub total_sales: f64,
    /// Number of filtered rows.
    pub order_count: usize,
    /// Product with the largest summed sales, `None` when empty.
    pub top_product: Option<String>,
    /// Country with the largest summed sales, `None` when empty.
    pub top_country: Option<String>,
}

impl AggregateResult {
    pub fn top_product_label(&self) -> &str {
        self.top_product.as_deref().unwrap_or(NO_DATA)
    }

    pub fn top_country_label(&self) -> &str {
        self.top_country.as_deref().unwrap_or(NO_DATA)
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Compute the aggregates for the rows selected by `indices`.
///
/// Ties for the top keys break to the lexicographically smallest key, so the
/// result is deterministic regardless of row order.
pub fn aggregate(dataset: &SalesDataset, indices: &[usize]) -> AggregateResult {
    let mut result = AggregateResult::default();

    for &idx in indices {
        let rec = &dataset.records[idx];
        *result
            .sales_by_product
            .entry(rec.product.clone())
            .or_insert(0.0) += rec.total_sales;
        *result
            .sales_by_country
            .entry(rec.country.clone())
            .or_insert(0.0) += rec.total_sales;
        *result
            .sales_over_time
            .entry(rec.order_date)
            .or_insert(0.0) += rec.total_sales;
        result.total_sales += rec.total_sales;
    }
    result.order_count = indices.len();

    result.top_product = top_key(&result.sales_by_product);
    result.top_country = top_key(&result.sales_by_country);
    result
}

/// Key with the maximal sum.  `BTreeMap` iterates in ascending key order and
/// the comparison is strict, so the smallest key wins among tied maxima.
fn top_key(sums: &BTreeMap<String, f64>) -> Option<String> {
    let mut best: Option<(&String, f64)> = None;
    for (key, &sum) in sums {
        match best {
            Some((_, best_sum)) if sum <= best_sum => {}
            _ => best = Some((key, sum)),
        }
    }
    best.map(|(key, _)| key.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filtered_indices, FilterSelection};
    use crate::data::model::tests::{record, sample_dataset};
    use crate::data::model::SalesDataset;

    #[test]
    fn egypt_in_january_scenario() {
        let ds = sample_dataset();
        let mut sel = FilterSelection::select_all(&ds);
        sel.countries = ["Egypt".to_string()].into();
        sel.end = "2024-01-31".parse().unwrap();

        let agg = aggregate(&ds, &filtered_indices(&ds, &sel));
        assert_eq!(agg.total_sales, 150.0);
        assert_eq!(agg.order_count, 2);
        assert_eq!(agg.top_product_label(), "Widget");
        assert_eq!(agg.top_country_label(), "Egypt");
        assert_eq!(agg.sales_by_product["Widget"], 100.0);
        assert_eq!(agg.sales_by_product["Gadget"], 50.0);
        assert_eq!(agg.sales_over_time.len(), 2);
    }

    #[test]
    fn empty_input_gives_sentinels() {
        let ds = sample_dataset();
        let agg = aggregate(&ds, &[]);
        assert_eq!(agg.total_sales, 0.0);
        assert_eq!(agg.order_count, 0);
        assert_eq!(agg.top_product, None);
        assert_eq!(agg.top_product_label(), NO_DATA);
        assert_eq!(agg.top_country_label(), NO_DATA);
        assert!(agg.sales_by_product.is_empty());
    }

    #[test]
    fn repeated_keys_are_summed_not_overwritten() {
        let ds = SalesDataset::from_records(vec![
            record("Egypt", "Widget", 10.0, "2024-01-01"),
            record("Egypt", "Widget", 15.0, "2024-01-01"),
        ]);
        let all: Vec<usize> = (0..ds.len()).collect();
        let agg = aggregate(&ds, &all);
        assert_eq!(agg.sales_by_product["Widget"], 25.0);
        assert_eq!(agg.sales_over_time.len(), 1);
    }

    #[test]
    fn scalar_total_matches_group_sums() {
        let ds = sample_dataset();
        let all: Vec<usize> = (0..ds.len()).collect();
        let agg = aggregate(&ds, &all);

        let by_product: f64 = agg.sales_by_product.values().sum();
        let by_country: f64 = agg.sales_by_country.values().sum();
        let over_time: f64 = agg.sales_over_time.values().sum();
        assert_eq!(agg.total_sales, by_product);
        assert_eq!(agg.total_sales, by_country);
        assert_eq!(agg.total_sales, over_time);
        assert_eq!(agg.order_count, ds.len());
    }

    #[test]
    fn top_key_ties_break_lexicographically() {
        let ds = SalesDataset::from_records(vec![
            record("UAE", "Zeta", 100.0, "2024-01-01"),
            record("Egypt", "Alpha", 100.0, "2024-01-02"),
        ]);
        let all: Vec<usize> = (0..ds.len()).collect();
        let agg = aggregate(&ds, &all);
        assert_eq!(agg.top_product.as_deref(), Some("Alpha"));
        assert_eq!(agg.top_country.as_deref(), Some("Egypt"));
    }
}
