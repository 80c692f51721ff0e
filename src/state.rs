use std::collections::BTreeSet;

use crate::color::ColorMap;
use crate::data::aggregate::{aggregate, AggregateResult};
use crate::data::filter::{filtered_indices, FilterSelection};
use crate::data::model::SalesDataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The two filterable dimensions of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    Country,
    Product,
}

impl Facet {
    pub fn label(self) -> &'static str {
        match self {
            Facet::Country => "Country",
            Facet::Product => "Product",
        }
    }
}

/// The full UI state, independent of rendering.
///
/// The dataset is loaded once and never mutated; every selection change
/// recomputes the visible indices and the aggregates from scratch.
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<SalesDataset>,

    /// The live filter selection.
    pub selection: FilterSelection,

    /// Indices of records passing the current selection (cached).
    pub visible_indices: Vec<usize>,

    /// KPIs and group-by sums over the visible records (cached).
    pub aggregates: AggregateResult,

    /// Chart colours per product.
    pub product_colors: ColorMap,

    /// Chart colours per country.
    pub country_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            selection: FilterSelection::default(),
            visible_indices: Vec::new(),
            aggregates: AggregateResult::default(),
            product_colors: ColorMap::default(),
            country_colors: ColorMap::default(),
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset: select everything, colour the chart
    /// dimensions, and compute the initial aggregates.
    pub fn set_dataset(&mut self, dataset: SalesDataset) {
        self.selection = FilterSelection::select_all(&dataset);
        self.product_colors = ColorMap::new(&dataset.products);
        self.country_colors = ColorMap::new(&dataset.countries);

        self.dataset = Some(dataset);
        self.status_message = None;
        self.loading = false;
        self.refilter();
    }

    /// Recompute visible indices and aggregates after a selection change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.selection);
            self.aggregates = aggregate(ds, &self.visible_indices);
        }
    }

    /// All distinct values of a facet in the loaded dataset.
    pub fn facet_values(&self, facet: Facet) -> BTreeSet<String> {
        match (&self.dataset, facet) {
            (Some(ds), Facet::Country) => ds.countries.clone(),
            (Some(ds), Facet::Product) => ds.products.clone(),
            (None, _) => BTreeSet::new(),
        }
    }

    /// The mutable selected-value set for a facet.
    pub fn selected_mut(&mut self, facet: Facet) -> &mut BTreeSet<String> {
        match facet {
            Facet::Country => &mut self.selection.countries,
            Facet::Product => &mut self.selection.products,
        }
    }

    /// Toggle a single value in a facet's selection.
    pub fn toggle_value(&mut self, facet: Facet, value: &str) {
        let selected = self.selected_mut(facet);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.refilter();
    }

    /// Select every value of a facet.
    pub fn select_all(&mut self, facet: Facet) {
        let all = self.facet_values(facet);
        *self.selected_mut(facet) = all;
        self.refilter();
    }

    /// Deselect every value of a facet.
    pub fn select_none(&mut self, facet: Facet) {
        self.selected_mut(facet).clear();
        self.refilter();
    }

    /// Reset the date range to the dataset's full span.
    pub fn reset_date_range(&mut self) {
        if let Some(ds) = &self.dataset {
            if let Some((start, end)) = ds.date_span {
                self.selection.start = start;
                self.selection.end = end;
                self.refilter();
            }
        }
    }
}
