use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use case_browser::state::BrowserState;

/// Longest cell text shown in the table; the row details show everything.
const MAX_CELL_CHARS: usize = 80;

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_CHARS {
        return text.to_string();
    }
    let mut short: String = text.chars().take(MAX_CELL_CHARS).collect();
    short.push('…');
    short
}

// ---------------------------------------------------------------------------
// Case table (central panel)
// ---------------------------------------------------------------------------

/// Render the filtered view. Clicking a cell selects it.
pub fn case_table(ui: &mut Ui, state: &mut BrowserState) {
    let Some(dataset) = state.dataset.clone() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Load a dataset to browse cases  (File → Open…)");
        });
        return;
    };
    let visible: Vec<usize> = state
        .result
        .as_ref()
        .map(|r| r.visible.clone())
        .unwrap_or_default();
    let columns = &dataset.columns;
    let selected = state.selected_cell.clone();

    ui.label(
        RichText::new(format!(
            "Showing {} rows × {} columns",
            visible.len(),
            columns.len()
        ))
        .small(),
    );

    let mut clicked: Option<(usize, String)> = None;
    let row_height = ui.text_style_height(&egui::TextStyle::Body) + 4.0;

    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .columns(
                Column::initial(140.0).at_least(40.0).clip(true),
                columns.len(),
            )
            .header(22.0, |mut header| {
                for col in columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(col);
                    });
                }
            })
            .body(|body| {
                body.rows(row_height, visible.len(), |mut row| {
                    let position = row.index();
                    let record = &dataset.rows[visible[position]];
                    for col in columns {
                        let is_selected = selected
                            .as_ref()
                            .is_some_and(|c| c.position == position && &c.column == col);
                        row.col(|ui: &mut Ui| {
                            let text = truncate(&record.get(col).to_string());
                            if ui.selectable_label(is_selected, text).clicked() {
                                clicked = Some((position, col.clone()));
                            }
                        });
                    }
                });
            });
    });

    if let Some((position, column)) = clicked {
        state.select_cell(position, &column);
    }
}

// ---------------------------------------------------------------------------
// Row details (bottom panel)
// ---------------------------------------------------------------------------

/// Show the selected cell and every column of its row.
pub fn row_details(ui: &mut Ui, state: &BrowserState) {
    let detail = match state.selected_row() {
        None => {
            ui.label(RichText::new("Click a cell to inspect its row.").weak());
            return;
        }
        Some(Err(e)) => {
            ui.label(RichText::new(e.to_string()).color(Color32::RED));
            return;
        }
        Some(Ok(detail)) => detail,
    };

    egui::CollapsingHeader::new(RichText::new("🔎 Row details").strong())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.label(format!("Selected cell: {} = {}", detail.column, detail.value));
            ui.separator();
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    for (column, value) in &detail.fields {
                        ui.strong(format!("{column}:"));
                        ui.label(value.to_string());
                        ui.add_space(4.0);
                    }
                });
        });
}
