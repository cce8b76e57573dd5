use serde::{Deserialize, Serialize};

use super::filter::{evaluate, ColumnFilter, FilterOutcome};
use super::model::{DatasetView, Mask};

/// Top-level operator between column filters.
///
/// `And` is realised by cascading: each filter narrows the view the next one
/// is evaluated (and its options counted) against. `Or` evaluates every
/// filter against the same view and unions the active masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combinator {
    Or,
    #[default]
    And,
}

/// The view after all filters plus each filter's outcome, in filter order.
#[derive(Debug, Clone)]
pub struct Composed<'a, const N: usize> {
    pub view: DatasetView<'a>,
    pub stages: [FilterOutcome; N],
}

pub fn compose<'a, const N: usize>(
    view: &DatasetView<'a>,
    filters: &[ColumnFilter; N],
    combinator: Combinator,
) -> Composed<'a, N> {
    match combinator {
        Combinator::And => cascade(view, filters),
        Combinator::Or => compose_or(view, filters),
    }
}

/// Apply filters in sequence; filter *n* sees only rows kept by filters
/// `0..n`.
pub fn cascade<'a, const N: usize>(
    view: &DatasetView<'a>,
    filters: &[ColumnFilter; N],
) -> Composed<'a, N> {
    let mut current = view.clone();
    let stages = filters.each_ref().map(|filter| {
        let outcome = evaluate(&current, filter);
        current = current.apply_mask(&outcome.mask);
        log::debug!(
            "cascade stage '{}': {} rows remain",
            filter.column,
            current.len()
        );
        outcome
    });
    Composed {
        view: current,
        stages,
    }
}

/// Evaluate every filter against `view` and keep rows matched by any active
/// one. With no active filter every row is kept.
pub fn compose_or<'a, const N: usize>(
    view: &DatasetView<'a>,
    filters: &[ColumnFilter; N],
) -> Composed<'a, N> {
    let stages = filters.each_ref().map(|f| evaluate(view, f));
    let active: Vec<&Mask> = stages
        .iter()
        .filter(|s| s.is_active())
        .map(|s| &s.mask)
        .collect();
    let mask = if active.is_empty() {
        view.all_true()
    } else {
        union_masks(&active, view.len())
    };
    Composed {
        view: view.apply_mask(&mask),
        stages,
    }
}

/// Element-wise OR of equally long masks.
pub fn union_masks(masks: &[&Mask], len: usize) -> Mask {
    let mut out = vec![false; len];
    for mask in masks {
        debug_assert_eq!(mask.len(), len);
        for (acc, m) in out.iter_mut().zip(mask.iter()) {
            *acc |= *m;
        }
    }
    out
}
