use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::color::ColorMap;
use crate::data::model::CANONICAL_HEADERS;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Central panel – KPIs, charts, raw data
// ---------------------------------------------------------------------------

/// Render the dashboard body in the central panel.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a sales data file to begin  (File → Open…)");
            });
            return;
        }
    };

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            kpi_row(ui, state);
            ui.add_space(8.0);

            ui.columns(2, |cols: &mut [Ui]| {
                grouped_bar_chart(
                    &mut cols[0],
                    "sales_by_product",
                    "Sales by Product",
                    &state.aggregates.sales_by_product,
                    &state.product_colors,
                );
                grouped_bar_chart(
                    &mut cols[1],
                    "sales_by_country",
                    "Sales by Country",
                    &state.aggregates.sales_by_country,
                    &state.country_colors,
                );
            });
            ui.add_space(8.0);

            time_series_chart(ui, state);
            ui.add_space(8.0);

            egui::CollapsingHeader::new(RichText::new("Raw Data").strong())
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    raw_data_table(ui, state, dataset);
                });
        });
}

// ---------------------------------------------------------------------------
// KPI row
// ---------------------------------------------------------------------------

fn kpi_row(ui: &mut Ui, state: &AppState) {
    let agg = &state.aggregates;
    ui.columns(4, |cols: &mut [Ui]| {
        kpi(&mut cols[0], "Total Sales", &format_amount(agg.total_sales));
        kpi(&mut cols[1], "Orders", &agg.order_count.to_string());
        kpi(&mut cols[2], "Top Product", agg.top_product_label());
        kpi(&mut cols[3], "Top Country", agg.top_country_label());
    });
}

fn kpi(ui: &mut Ui, label: &str, value: &str) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(label);
        ui.heading(RichText::new(value).strong());
    });
}

/// Format a sales amount the way the KPI tiles show it: `$1,234`.
pub fn format_amount(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

// ---------------------------------------------------------------------------
// Group-by bar charts
// ---------------------------------------------------------------------------

/// One coloured bar per key, keys along the x-axis.
fn grouped_bar_chart(
    ui: &mut Ui,
    id: &str,
    title: &str,
    sums: &BTreeMap<String, f64>,
    colors: &ColorMap,
) {
    ui.strong(title);
    if sums.is_empty() {
        ui.label("No data for the current filters.");
        return;
    }

    let keys: Vec<String> = sums.keys().cloned().collect();
    Plot::new(id.to_string())
        .legend(Legend::default())
        .height(220.0)
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() > 1e-6 || i < 0.0 {
                return String::new();
            }
            keys.get(i as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for (i, (key, &sum)) in sums.iter().enumerate() {
                let chart = BarChart::new(vec![Bar::new(i as f64, sum).width(0.6)])
                    .name(key)
                    .color(colors.color_for(key));
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

/// Total sales per order date, x-axis in days so the scale stays linear.
fn time_series_chart(ui: &mut Ui, state: &AppState) {
    ui.strong("Sales Over Time");
    let sums = &state.aggregates.sales_over_time;
    if sums.is_empty() {
        ui.label("No data for the current filters.");
        return;
    }

    let series: Vec<[f64; 2]> = sums
        .iter()
        .map(|(date, &sum)| [date.num_days_from_ce() as f64, sum])
        .collect();

    Plot::new("sales_over_time")
        .height(220.0)
        .x_axis_formatter(|mark, _range| {
            NaiveDate::from_num_days_from_ce_opt(mark.value.round() as i32)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        })
        .y_axis_label("Total Sales")
        .show(ui, |plot_ui| {
            let line_points: PlotPoints = series.clone().into();
            plot_ui.line(Line::new(line_points).name("Total Sales").width(1.5));
            let marker_points: PlotPoints = series.into();
            plot_ui.points(Points::new(marker_points).radius(2.5));
        });
}

// ---------------------------------------------------------------------------
// Raw data table
// ---------------------------------------------------------------------------

fn raw_data_table(ui: &mut Ui, state: &AppState, dataset: &crate::data::model::SalesDataset) {
    if state.visible_indices.is_empty() {
        ui.label("No rows match the current filters.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(100.0))
        .column(Column::auto().at_least(100.0))
        .column(Column::auto().at_least(90.0))
        .column(Column::remainder().at_least(90.0))
        .header(20.0, |mut header| {
            for name in CANONICAL_HEADERS {
                header.col(|ui: &mut Ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, state.visible_indices.len(), |mut row| {
                let rec = &dataset.records[state.visible_indices[row.index()]];
                row.col(|ui: &mut Ui| {
                    ui.label(&rec.country);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(&rec.product);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format!("{:.2}", rec.total_sales));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(rec.order_date.format("%Y-%m-%d").to_string());
                });
            });
        });
}

#[cfg(test)]
mod tests {
    use super::format_amount;

    #[test]
    fn amounts_group_thousands() {
        assert_eq!(format_amount(0.0), "$0");
        assert_eq!(format_amount(150.0), "$150");
        assert_eq!(format_amount(1234.4), "$1,234");
        assert_eq!(format_amount(1_234_567.0), "$1,234,567");
        assert_eq!(format_amount(-5000.0), "-$5,000");
    }
}
