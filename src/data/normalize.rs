use std::collections::BTreeSet;

use super::model::CellValue;

// ---------------------------------------------------------------------------
// Cell → labels
// ---------------------------------------------------------------------------

/// Turn a cell into the labels it contributes to filtering.
///
/// * Missing (`Null`, NaN) → no labels.
/// * A list → one trimmed label per element; missing and blank elements are
///   dropped, nested lists are rendered as text.
/// * Any other scalar → its trimmed rendering, or nothing if that is blank.
pub fn labels(value: &CellValue) -> Vec<String> {
    match value {
        v if v.is_missing() => Vec::new(),
        CellValue::List(items) => items
            .iter()
            .filter(|item| !item.is_missing())
            .filter_map(scalar_label)
            .collect(),
        scalar => scalar_label(scalar).into_iter().collect(),
    }
}

/// The labels of a cell as a set, for membership tests.
pub fn label_set(value: &CellValue) -> BTreeSet<String> {
    labels(value).into_iter().collect()
}

fn scalar_label(value: &CellValue) -> Option<String> {
    let rendered = value.render();
    let trimmed = rendered.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    #[test]
    fn missing_cells_have_no_labels() {
        assert!(labels(&CellValue::Null).is_empty());
        assert!(labels(&CellValue::Float(f64::NAN)).is_empty());
    }

    #[test]
    fn scalar_is_one_trimmed_label() {
        assert_eq!(labels(&s("  Psykiatri ")), vec!["Psykiatri"]);
        assert_eq!(labels(&CellValue::Integer(7)), vec!["7"]);
        assert_eq!(labels(&CellValue::Bool(true)), vec!["true"]);
    }

    #[test]
    fn blank_scalar_has_no_labels() {
        assert!(labels(&s("   ")).is_empty());
    }

    #[test]
    fn list_elements_are_trimmed_and_blanks_dropped() {
        let cell = CellValue::List(vec![
            s(" samtykke"),
            CellValue::Null,
            s(""),
            CellValue::Integer(3),
            s("autonomi "),
        ]);
        assert_eq!(labels(&cell), vec!["samtykke", "3", "autonomi"]);
    }

    #[test]
    fn nested_lists_are_stringified() {
        let cell = CellValue::List(vec![CellValue::List(vec![s("a"), s("b")])]);
        assert_eq!(labels(&cell), vec!["[a, b]"]);
    }

    #[test]
    fn empty_list_has_no_labels() {
        assert!(labels(&CellValue::List(Vec::new())).is_empty());
    }

    #[test]
    fn label_set_collapses_duplicates() {
        let cell = CellValue::List(vec![s("a"), s(" a"), s("b")]);
        let set = label_set(&cell);
        assert_eq!(set.len(), 2);
        assert!(set.contains("a") && set.contains("b"));
    }
}
