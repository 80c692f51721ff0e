use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::export;
use crate::state::{AppState, Facet};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            facet_section(ui, state, Facet::Country);
            facet_section(ui, state, Facet::Product);
            ui.separator();
            date_section(ui, state);
        });

    // Recompute visible rows and aggregates after any widget changes.
    state.refilter();
}

/// Collapsible checkbox list for one facet, with All/None shortcuts.
fn facet_section(ui: &mut Ui, state: &mut AppState, facet: Facet) {
    let all_values = state.facet_values(facet);
    let n_selected = state.selected_mut(facet).len();
    let n_total = all_values.len();
    let header_text = format!("{}  ({n_selected}/{n_total})", facet.label());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(facet.label())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(facet);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(facet);
                }
            });

            let selected = state.selected_mut(facet);
            for value in &all_values {
                let mut checked = selected.contains(value);
                if ui.checkbox(&mut checked, value).changed() {
                    if checked {
                        selected.insert(value.clone());
                    } else {
                        selected.remove(value);
                    }
                }
            }
        });
}

/// Two-endpoint date picker with a full-range reset.
fn date_section(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Order date range");

    ui.horizontal(|ui: &mut Ui| {
        ui.label("From");
        ui.add(DatePickerButton::new(&mut state.selection.start).id_salt("start_date"));
    });
    ui.horizontal(|ui: &mut Ui| {
        ui.label("To");
        ui.add(DatePickerButton::new(&mut state.selection.end).id_salt("end_date"));
    });

    if state.selection.start > state.selection.end {
        ui.label(
            RichText::new("Start is after end: no rows match.").color(Color32::LIGHT_RED),
        );
    }

    if ui.small_button("Full range").clicked() {
        state.reset_date_range();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Export CSV…").clicked() {
                save_export(state, ExportKind::Csv);
                ui.close_menu();
            }
            if ui.button("Export Excel…").clicked() {
                save_export(state, ExportKind::Xlsx);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} match filters",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sales data")
        .add_filter("Supported files", &["xlsx", "csv", "json"])
        .add_filter("Excel", &["xlsx"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} records, {} countries, {} products",
                    dataset.len(),
                    dataset.countries.len(),
                    dataset.products.len()
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                state.status_message = Some(format!("Error: {e}"));
                state.loading = false;
            }
        }
    }
}

#[derive(Clone, Copy)]
enum ExportKind {
    Csv,
    Xlsx,
}

/// Serialize the filtered rows and write them to a user-chosen path.
/// The export itself is an in-memory buffer; only this dialog touches disk.
fn save_export(state: &mut AppState, kind: ExportKind) {
    let Some(dataset) = &state.dataset else {
        state.status_message = Some("Nothing to export: no dataset loaded.".to_string());
        return;
    };

    let (result, suggested_name) = match kind {
        ExportKind::Csv => (
            export::to_csv(dataset, &state.visible_indices),
            export::CSV_FILE_NAME,
        ),
        ExportKind::Xlsx => (
            export::to_xlsx(dataset, &state.visible_indices),
            export::XLSX_FILE_NAME,
        ),
    };

    let bytes = match result {
        Ok(bytes) => bytes,
        Err(e) => {
            log::error!("Export failed: {e:#}");
            state.status_message = Some(format!("Export failed: {e:#}"));
            return;
        }
    };

    let file = rfd::FileDialog::new()
        .set_title("Save filtered data")
        .set_file_name(suggested_name)
        .save_file();

    if let Some(path) = file {
        match std::fs::write(&path, &bytes) {
            Ok(()) => {
                log::info!(
                    "Exported {} filtered rows to {}",
                    state.visible_indices.len(),
                    path.display()
                );
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to write {}: {e}", path.display());
                state.status_message = Some(format!("Export failed: {e}"));
            }
        }
    }
}
