use std::path::PathBuf;
use std::sync::Arc;

use crate::config::BrowserConfig;
use crate::data::compose::Combinator;
use crate::data::filter::{FilterOutcome, MatchMode, Selection};
use crate::data::loader::DatasetCache;
use crate::data::model::CaseDataset;
use crate::data::pipeline::{run_pipeline, FilterState, PipelineResult, WidgetState};
use crate::data::resolve::{resolve_row, ResolveError, RowDetail};
use crate::data::service::ServiceToggles;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The two multiselect widgets of the fagområde/tags stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterWidget {
    Field,
    Tags,
}

/// A clicked table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedCell {
    /// Position in the final view at the time of the last recomputation.
    pub position: usize,
    /// Dataset row the position pointed to when clicked.
    pub source_row: usize,
    pub column: String,
}

/// The full UI state, independent of rendering.
pub struct BrowserState {
    pub config: BrowserConfig,

    /// Contents of the dataset path field.
    pub path_input: String,

    cache: DatasetCache,

    /// Loaded dataset (None until a file loads).
    pub dataset: Option<Arc<CaseDataset>>,

    /// Widget selections, owned here and fed to the pipeline.
    pub filters: FilterState,

    /// Output of the last recomputation.
    pub result: Option<PipelineResult>,

    pub selected_cell: Option<SelectedCell>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl BrowserState {
    pub fn new(config: BrowserConfig) -> Self {
        let mode = if config.filters.and_mode_default {
            MatchMode::All
        } else {
            MatchMode::Any
        };
        let filters = FilterState {
            combinator: config.filters.default_combinator,
            field: WidgetState {
                selection: Selection::new(),
                mode,
            },
            tags: WidgetState {
                selection: Selection::new(),
                mode,
            },
            ..FilterState::default()
        };
        Self {
            path_input: config.data.default_path.clone(),
            config,
            cache: DatasetCache::default(),
            dataset: None,
            filters,
            result: None,
            selected_cell: None,
            status_message: None,
        }
    }

    /// Load (or fetch from cache) the dataset named in `path_input`.
    pub fn load_path(&mut self) {
        let trimmed = self.path_input.trim();
        if trimmed.is_empty() {
            self.status_message = Some("Enter a path to a dataset file.".into());
            return;
        }
        let path = PathBuf::from(trimmed);
        match self.cache.get_or_load(&path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
                self.dataset = None;
                self.result = None;
                self.selected_cell = None;
            }
        }
    }

    /// Force the next load to re-read the file.
    pub fn reload(&mut self) {
        self.cache.invalidate();
        self.load_path();
    }

    /// Ingest a newly loaded dataset and recompute.
    pub fn set_dataset(&mut self, dataset: Arc<CaseDataset>) {
        self.dataset = Some(dataset);
        self.selected_cell = None;
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the filtered view after any state change.
    ///
    /// Selections are pruned to labels still offered by their widget; when
    /// pruning changes anything the pipeline runs again so every stage sees
    /// the final selections.
    pub fn refilter(&mut self) {
        let Some(dataset) = self.dataset.clone() else {
            self.result = None;
            return;
        };

        let result = loop {
            let result = run_pipeline(
                &dataset,
                &self.filters,
                &self.config.columns,
                &self.config.service,
            );
            let pruned_field = prune_selection(&mut self.filters.field.selection, &result.field);
            let pruned_tags = prune_selection(&mut self.filters.tags.selection, &result.tags);
            if !pruned_field && !pruned_tags {
                break result;
            }
        };

        self.selected_cell = self.selected_cell.take().and_then(|cell| {
            let position = result.visible.iter().position(|&i| i == cell.source_row)?;
            Some(SelectedCell { position, ..cell })
        });
        self.result = Some(result);
    }

    pub fn widget(&self, widget: FilterWidget) -> &WidgetState {
        match widget {
            FilterWidget::Field => &self.filters.field,
            FilterWidget::Tags => &self.filters.tags,
        }
    }

    fn widget_mut(&mut self, widget: FilterWidget) -> &mut WidgetState {
        match widget {
            FilterWidget::Field => &mut self.filters.field,
            FilterWidget::Tags => &mut self.filters.tags,
        }
    }

    /// The last outcome for a widget, if a dataset is loaded.
    pub fn outcome(&self, widget: FilterWidget) -> Option<&FilterOutcome> {
        self.result.as_ref().map(|r| match widget {
            FilterWidget::Field => &r.field,
            FilterWidget::Tags => &r.tags,
        })
    }

    /// Toggle a single label in a widget's selection.
    pub fn toggle_label(&mut self, widget: FilterWidget, label: &str) {
        let selection = &mut self.widget_mut(widget).selection;
        if !selection.remove(label) {
            selection.insert(label.to_string());
        }
        self.refilter();
    }

    /// Deselect all labels of a widget.
    pub fn clear_selection(&mut self, widget: FilterWidget) {
        self.widget_mut(widget).selection.clear();
        self.refilter();
    }

    pub fn set_match_mode(&mut self, widget: FilterWidget, mode: MatchMode) {
        self.widget_mut(widget).mode = mode;
        self.refilter();
    }

    pub fn set_combinator(&mut self, combinator: Combinator) {
        self.filters.combinator = combinator;
        self.refilter();
    }

    pub fn set_service_toggles(&mut self, toggles: ServiceToggles) {
        self.filters.service = toggles;
        self.refilter();
    }

    /// Number of rows in the final view.
    pub fn visible_count(&self) -> usize {
        self.result.as_ref().map_or(0, |r| r.visible.len())
    }

    /// Remember a clicked cell. Ignored when `position` is outside the view.
    pub fn select_cell(&mut self, position: usize, column: &str) {
        let Some(source_row) = self
            .result
            .as_ref()
            .and_then(|r| r.visible.get(position).copied())
        else {
            log::debug!("ignoring click on stale row {position}");
            return;
        };
        self.selected_cell = Some(SelectedCell {
            position,
            source_row,
            column: column.to_string(),
        });
    }

    /// Resolve the selected cell to its full row.
    pub fn selected_row(&self) -> Option<Result<RowDetail, ResolveError>> {
        let cell = self.selected_cell.as_ref()?;
        let dataset = self.dataset.as_ref()?;
        let result = self.result.as_ref()?;
        let view = result.view(dataset);
        Some(resolve_row(&view, cell.position, &cell.column))
    }
}

/// Drop selected labels that the widget no longer offers. Returns whether
/// anything was removed.
fn prune_selection(selection: &mut Selection, outcome: &FilterOutcome) -> bool {
    let before = selection.len();
    selection.retain(|label| outcome.counts.contains_key(label));
    before != selection.len()
}
