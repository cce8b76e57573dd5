use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::model::{DatasetView, Mask};
use super::normalize;
use super::options::unique_labels;

// ---------------------------------------------------------------------------
// Filter predicate: which labels are selected for one column
// ---------------------------------------------------------------------------

/// Labels the user picked for one column. Empty means "no filter".
pub type Selection = BTreeSet<String>;

/// Label → number of rows in the evaluated view that carry it.
pub type LabelCounts = BTreeMap<String, usize>;

/// How the labels of a selection combine for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Row matches if it has at least one selected label.
    #[default]
    Any,
    /// Row must have every selected label.
    All,
}

/// One column filter as requested by a widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFilter {
    pub column: String,
    pub selection: Selection,
    pub mode: MatchMode,
}

impl ColumnFilter {
    pub fn new(column: impl Into<String>, selection: Selection, mode: MatchMode) -> Self {
        Self {
            column: column.into(),
            selection,
            mode,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Info,
    Warning,
}

/// A non-fatal message for the caller to display next to a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
}

impl Diagnostic {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            message: message.into(),
        }
    }
}

/// Result of evaluating one [`ColumnFilter`] against a view.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub column: String,
    /// Aligned with the view the filter was evaluated against.
    pub mask: Mask,
    /// Every option of the view with its row count, independent of the
    /// selection. Keys are the widget's option set.
    pub counts: LabelCounts,
    /// The selection that actually restricted rows (empty if none did).
    pub active: Selection,
    pub diagnostic: Option<Diagnostic>,
}

impl FilterOutcome {
    /// Whether this filter restricts anything.
    pub fn is_active(&self) -> bool {
        !self.active.is_empty()
    }

    /// Number of rows the mask keeps.
    pub fn matched(&self) -> usize {
        self.mask.iter().filter(|m| **m).count()
    }

    fn pass_through(view: &DatasetView<'_>, column: &str, diagnostic: Option<Diagnostic>) -> Self {
        Self {
            column: column.to_string(),
            mask: view.all_true(),
            counts: LabelCounts::new(),
            active: Selection::new(),
            diagnostic,
        }
    }
}

/// Whether a row with `labels` satisfies `selection` under `mode`.
///
/// An empty selection matches everything; an empty label set matches no
/// non-empty selection.
pub fn row_matches(labels: &BTreeSet<String>, selection: &Selection, mode: MatchMode) -> bool {
    if selection.is_empty() {
        return true;
    }
    match mode {
        MatchMode::All => selection.is_subset(labels),
        MatchMode::Any => !selection.is_disjoint(labels),
    }
}

/// Count, for every option of `column` in `view`, how many rows carry it.
pub fn label_counts(view: &DatasetView<'_>, column: &str) -> LabelCounts {
    let mut counts: LabelCounts = unique_labels(view, column)
        .into_iter()
        .map(|label| (label, 0))
        .collect();
    for cell in view.cells(column) {
        for label in normalize::label_set(cell) {
            if let Some(n) = counts.get_mut(&label) {
                *n += 1;
            }
        }
    }
    counts
}

/// Build the inclusion mask of `filter` over `view`.
pub fn evaluate(view: &DatasetView<'_>, filter: &ColumnFilter) -> FilterOutcome {
    let column = filter.column.as_str();

    if !view.has_column(column) {
        log::warn!("filter column '{column}' is not in the dataset");
        return FilterOutcome::pass_through(
            view,
            column,
            Some(Diagnostic::warning(format!(
                "Column «{column}» does not exist in the data."
            ))),
        );
    }

    let counts = label_counts(view, column);
    if counts.is_empty() {
        return FilterOutcome::pass_through(
            view,
            column,
            Some(Diagnostic::info(format!(
                "No values to filter on in column «{column}»."
            ))),
        );
    }

    if filter.selection.is_empty() {
        return FilterOutcome {
            column: column.to_string(),
            mask: view.all_true(),
            counts,
            active: Selection::new(),
            diagnostic: None,
        };
    }

    let mask = view
        .cells(column)
        .map(|cell| row_matches(&normalize::label_set(cell), &filter.selection, filter.mode))
        .collect();

    FilterOutcome {
        column: column.to_string(),
        mask,
        counts,
        active: filter.selection.clone(),
        diagnostic: None,
    }
}
