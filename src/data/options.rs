use std::collections::BTreeSet;

use super::model::DatasetView;
use super::normalize;

/// Sorted, de-duplicated labels offered by a filter widget.
pub type OptionSet = BTreeSet<String>;

/// How the cells of a column are shaped. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Every non-missing cell is a single value.
    Scalar,
    /// At least one non-missing cell is a collection.
    MultiValued,
}

/// Classify `column` over the rows of `view`. `None` if the column does not
/// exist.
pub fn classify_column(view: &DatasetView<'_>, column: &str) -> Option<ColumnKind> {
    if !view.has_column(column) {
        return None;
    }
    let multi = view
        .cells(column)
        .any(|cell| !cell.is_missing() && cell.is_collection());
    Some(if multi {
        ColumnKind::MultiValued
    } else {
        ColumnKind::Scalar
    })
}

/// All distinct labels of `column` in `view`, sorted.
///
/// A missing column yields an empty set: the caller treats that as "nothing
/// to filter on".
pub fn unique_labels(view: &DatasetView<'_>, column: &str) -> OptionSet {
    match classify_column(view, column) {
        None => OptionSet::new(),
        Some(ColumnKind::MultiValued) => view
            .cells(column)
            .flat_map(normalize::labels)
            .collect(),
        Some(ColumnKind::Scalar) => view
            .cells(column)
            .filter(|cell| !cell.is_missing())
            .map(|cell| cell.render().trim().to_string())
            .filter(|label| !label.is_empty())
            .collect(),
    }
}
