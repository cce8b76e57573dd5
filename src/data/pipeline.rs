use crate::config::ColumnsConfig;

use super::compose::{compose, Combinator, Composed};
use super::filter::{ColumnFilter, FilterOutcome, MatchMode, Selection};
use super::model::{CaseDataset, DatasetView};
use super::service::{evaluate_service, ServiceKeywords, ServiceOutcome, ServiceToggles};

// ---------------------------------------------------------------------------
// Filter state → filtered view
// ---------------------------------------------------------------------------

/// Selection and match mode of one multiselect widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetState {
    pub selection: Selection,
    pub mode: MatchMode,
}

/// Everything the user has chosen, owned by the caller between recomputations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub service: ServiceToggles,
    pub combinator: Combinator,
    pub field: WidgetState,
    pub tags: WidgetState,
}

/// Output of one recomputation.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Dataset indices of the final view, in view order.
    pub visible: Vec<usize>,
    /// Rows left after the service-type stage.
    pub after_service: usize,
    pub service: ServiceOutcome,
    pub field: FilterOutcome,
    pub tags: FilterOutcome,
}

impl PipelineResult {
    pub fn view<'a>(&self, dataset: &'a CaseDataset) -> DatasetView<'a> {
        DatasetView::from_indices(dataset, self.visible.clone())
    }
}

/// Run the service-type stage, then the fagområde/tags stage under the
/// chosen combinator. The service stage always comes first.
pub fn run_pipeline(
    dataset: &CaseDataset,
    state: &FilterState,
    columns: &ColumnsConfig,
    keywords: &ServiceKeywords,
) -> PipelineResult {
    let full = DatasetView::full(dataset);
    let service = evaluate_service(&full, &columns.service, state.service, keywords);
    let working = full.apply_mask(&service.mask);

    let field_filter = ColumnFilter::new(
        columns.field.as_str(),
        state.field.selection.clone(),
        state.field.mode,
    );
    let tags_filter = ColumnFilter::new(
        columns.tags.as_str(),
        state.tags.selection.clone(),
        state.tags.mode,
    );
    let Composed {
        view,
        stages: [field, tags],
    } = compose(&working, &[field_filter, tags_filter], state.combinator);

    log::debug!(
        "recomputed: {} rows → {} after service → {} visible",
        dataset.len(),
        working.len(),
        view.len()
    );

    PipelineResult {
        visible: view.row_indices().to_vec(),
        after_service: working.len(),
        service,
        field,
        tags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CaseRecord, CellValue};

    fn list(items: &[&str]) -> CellValue {
        CellValue::List(items.iter().map(|s| CellValue::String(s.to_string())).collect())
    }

    fn sel(labels: &[&str]) -> Selection {
        labels.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> CaseDataset {
        let rows = [
            ("Spesialisthelsetjeneste", "Psykiatri", list(&["tvang"])),
            ("Spesialisthelsetjeneste", "Barn", list(&["samtykke", "tvang"])),
            ("Kommunal omsorgstjeneste", "Geriatri", list(&["samtykke"])),
            ("Annet", "Barn", list(&[])),
        ]
        .into_iter()
        .map(|(helse, fag, tags)| {
            CaseRecord::new(
                [
                    ("helsetjeneste".to_string(), CellValue::String(helse.into())),
                    ("fagområde".to_string(), CellValue::String(fag.into())),
                    ("tags".to_string(), tags),
                ]
                .into_iter()
                .collect(),
            )
        })
        .collect();
        CaseDataset::new(
            vec!["helsetjeneste".into(), "fagområde".into(), "tags".into()],
            rows,
        )
    }

    fn run(ds: &CaseDataset, state: &FilterState) -> PipelineResult {
        run_pipeline(ds, state, &ColumnsConfig::default(), &ServiceKeywords::default())
    }

    #[test]
    fn default_state_shows_everything() {
        let ds = sample();
        let result = run(&ds, &FilterState::default());
        assert_eq!(result.visible, vec![0, 1, 2, 3]);
        assert_eq!(result.service.specialist_count, 2);
        assert_eq!(result.tags.counts.get("tvang"), Some(&2));
    }

    #[test]
    fn service_stage_runs_before_tags() {
        let ds = sample();
        let state = FilterState {
            service: ServiceToggles {
                specialist: true,
                municipal: false,
            },
            tags: WidgetState {
                selection: sel(&["samtykke"]),
                mode: MatchMode::Any,
            },
            ..FilterState::default()
        };
        let result = run(&ds, &state);
        assert_eq!(result.after_service, 2);
        assert_eq!(result.visible, vec![1]);
        // Counts are taken after the service stage.
        assert_eq!(result.tags.counts.get("samtykke"), Some(&1));
    }

    #[test]
    fn or_combinator_unions_field_and_tags() {
        let ds = sample();
        let state = FilterState {
            combinator: Combinator::Or,
            field: WidgetState {
                selection: sel(&["Geriatri"]),
                mode: MatchMode::Any,
            },
            tags: WidgetState {
                selection: sel(&["tvang"]),
                mode: MatchMode::Any,
            },
            ..FilterState::default()
        };
        assert_eq!(run(&ds, &state).visible, vec![0, 1, 2]);
    }

    #[test]
    fn and_combinator_cascades() {
        let ds = sample();
        let state = FilterState {
            combinator: Combinator::And,
            field: WidgetState {
                selection: sel(&["Barn"]),
                mode: MatchMode::Any,
            },
            tags: WidgetState {
                selection: sel(&["tvang"]),
                mode: MatchMode::Any,
            },
            ..FilterState::default()
        };
        let result = run(&ds, &state);
        assert_eq!(result.visible, vec![1]);
        assert_eq!(
            result.tags.counts.keys().collect::<Vec<_>>(),
            vec!["samtykke", "tvang"]
        );
    }

    #[test]
    fn view_round_trips_visible_rows() {
        let ds = sample();
        let result = run(&ds, &FilterState::default());
        assert_eq!(result.view(&ds).len(), 4);
    }
}
