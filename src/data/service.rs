use serde::{Deserialize, Serialize};

use super::compose::union_masks;
use super::filter::Diagnostic;
use super::model::{CellValue, DatasetView, Mask};

// ---------------------------------------------------------------------------
// Service-type (helsetjeneste) classification
// ---------------------------------------------------------------------------

/// Substrings that mark a row as specialist or municipal care. Matched
/// case-insensitively against the rendered cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceKeywords {
    #[serde(default = "default_specialist")]
    pub specialist: Vec<String>,
    #[serde(default = "default_municipal")]
    pub municipal: Vec<String>,
}

fn default_specialist() -> Vec<String> {
    vec!["spesialist".into()]
}
fn default_municipal() -> Vec<String> {
    vec!["komm".into(), "omsorg".into()]
}

impl Default for ServiceKeywords {
    fn default() -> Self {
        Self {
            specialist: default_specialist(),
            municipal: default_municipal(),
        }
    }
}

/// The two checkboxes of the service-type filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServiceToggles {
    pub specialist: bool,
    pub municipal: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceOutcome {
    /// Aligned with the evaluated view.
    pub mask: Mask,
    /// Rows of the view flagged specialist / municipal, regardless of toggles.
    pub specialist_count: usize,
    pub municipal_count: usize,
    pub diagnostic: Option<Diagnostic>,
}

fn contains_any(haystack: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .any(|k| haystack.contains(k.to_lowercase().as_str()))
}

fn rendered_lower(cell: &CellValue) -> String {
    cell.render().to_lowercase()
}

/// Classify every row of `view` by `column` and build the mask for `toggles`.
///
/// Both toggles → rows flagged by either indicator; one toggle → rows with
/// that indicator; none → every row.
pub fn evaluate_service(
    view: &DatasetView<'_>,
    column: &str,
    toggles: ServiceToggles,
    keywords: &ServiceKeywords,
) -> ServiceOutcome {
    if !view.has_column(column) {
        log::warn!("service column '{column}' is not in the dataset");
        return ServiceOutcome {
            mask: view.all_true(),
            specialist_count: 0,
            municipal_count: 0,
            diagnostic: Some(Diagnostic::info(format!(
                "Column «{column}» not found in the dataset."
            ))),
        };
    }

    let (specialist, municipal): (Mask, Mask) = view
        .cells(column)
        .map(|cell| {
            let text = rendered_lower(cell);
            (
                contains_any(&text, &keywords.specialist),
                contains_any(&text, &keywords.municipal),
            )
        })
        .unzip();

    let specialist_count = specialist.iter().filter(|m| **m).count();
    let municipal_count = municipal.iter().filter(|m| **m).count();

    let mask = match (toggles.specialist, toggles.municipal) {
        (true, true) => union_masks(&[&specialist, &municipal], view.len()),
        (true, false) => specialist,
        (false, true) => municipal,
        (false, false) => view.all_true(),
    };

    ServiceOutcome {
        mask,
        specialist_count,
        municipal_count,
        diagnostic: None,
    }
}
