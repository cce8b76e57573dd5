use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use case_browser::data::compose::Combinator;
use case_browser::data::filter::{Diagnostic, DiagnosticLevel, MatchMode};
use case_browser::state::{BrowserState, FilterWidget};

// ---------------------------------------------------------------------------
// Left side panel – file input and filter widgets
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut BrowserState) {
    ui.heading("File");
    file_input(ui, state);
    ui.separator();

    ui.heading("Filters");
    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            service_filter(ui, state);
            ui.separator();

            combinator_choice(ui, state);
            ui.add_space(4.0);

            let field_title = state.config.columns.field.clone();
            let tags_title = state.config.columns.tags.clone();
            multiselect(ui, state, FilterWidget::Field, &field_title);
            ui.separator();
            multiselect(ui, state, FilterWidget::Tags, &tags_title);
        });
}

fn file_input(ui: &mut Ui, state: &mut BrowserState) {
    ui.label("Path to dataset (.parquet, .json, .csv)");
    let response = ui.text_edit_singleline(&mut state.path_input);
    let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Load").clicked() || submitted {
            state.load_path();
        }
        if ui.button("Reload").clicked() {
            state.reload();
        }
    });

    if let Some(msg) = &state.status_message {
        ui.label(RichText::new(msg).color(Color32::RED));
    }
}

fn diagnostic_label(ui: &mut Ui, diagnostic: &Diagnostic) {
    let color = match diagnostic.level {
        DiagnosticLevel::Info => Color32::LIGHT_BLUE,
        DiagnosticLevel::Warning => Color32::from_rgb(230, 160, 40),
    };
    ui.label(RichText::new(&diagnostic.message).color(color));
}

/// Specialist / municipal checkboxes for the service-type column.
fn service_filter(ui: &mut Ui, state: &mut BrowserState) {
    let Some(result) = &state.result else {
        return;
    };
    let service = result.service.clone();

    ui.strong(&state.config.columns.service);
    if let Some(diag) = &service.diagnostic {
        diagnostic_label(ui, diag);
        return;
    }

    let mut toggles = state.filters.service;
    let mut changed = ui
        .checkbox(
            &mut toggles.specialist,
            format!("Specialist ({})", service.specialist_count),
        )
        .changed();
    changed |= ui
        .checkbox(
            &mut toggles.municipal,
            format!(
                "Municipal health and care services ({})",
                service.municipal_count
            ),
        )
        .changed();
    if changed {
        state.set_service_toggles(toggles);
    }
}

/// OR / AND between the two multiselect filters.
fn combinator_choice(ui: &mut Ui, state: &mut BrowserState) {
    ui.strong("Combine filters");
    let current = state.filters.combinator;
    let mut picked = current;
    ui.radio_value(&mut picked, Combinator::Or, "OR (rows matching at least one filter)");
    ui.radio_value(&mut picked, Combinator::And, "AND (rows matching both filters)");
    if picked != current {
        state.set_combinator(picked);
    }
    if picked == Combinator::And {
        ui.label(
            RichText::new("AND is active: the options of the second filter follow the first.")
                .small()
                .weak(),
        );
    }
}

/// A multiselect over a column's options, each labelled with its row count.
fn multiselect(ui: &mut Ui, state: &mut BrowserState, widget: FilterWidget, title: &str) {
    let Some(outcome) = state.outcome(widget).cloned() else {
        return;
    };

    let n_selected = state.widget(widget).selection.len();
    let n_total = outcome.counts.len();
    ui.strong(format!("{title}  ({n_selected}/{n_total})"));

    if let Some(diag) = &outcome.diagnostic {
        diagnostic_label(ui, diag);
    }
    if outcome.counts.is_empty() {
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        let mut match_all = state.widget(widget).mode == MatchMode::All;
        if ui
            .toggle_value(&mut match_all, "Match all selected (AND)")
            .changed()
        {
            let mode = if match_all {
                MatchMode::All
            } else {
                MatchMode::Any
            };
            state.set_match_mode(widget, mode);
        }
        if ui.small_button("Clear").clicked() {
            state.clear_selection(widget);
        }
    });

    ScrollArea::vertical()
        .id_salt(title)
        .max_height(220.0)
        .show(ui, |ui: &mut Ui| {
            for (label, count) in &outcome.counts {
                let mut checked = state.widget(widget).selection.contains(label);
                if ui
                    .checkbox(&mut checked, format!("{label} ({count})"))
                    .changed()
                {
                    state.toggle_label(widget, label);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut BrowserState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} cases loaded, {} visible",
                ds.len(),
                state.visible_count()
            ));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut BrowserState) {
    let file = rfd::FileDialog::new()
        .set_title("Open case dataset")
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.path_input = path.display().to_string();
        state.load_path();
    }
}
