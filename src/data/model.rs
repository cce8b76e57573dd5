use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the case table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the dtypes of a loosely typed
/// table. `List` holds multi-valued cells (tags).
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// ISO-8601 date string kept as text for simplicity.
    Date(String),
    List(Vec<CellValue>),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_missing() {
            return write!(f, "<null>");
        }
        write!(f, "{}", self.render())
    }
}

impl CellValue {
    /// True for `Null` and for NaN floats.
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, CellValue::List(_))
    }

    /// Plain string rendering used for labels and keyword matching.
    /// Missing values render as the empty string.
    pub fn render(&self) -> String {
        match self {
            CellValue::String(s) | CellValue::Date(s) => s.clone(),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(v) if v.is_nan() => String::new(),
            // Keep a trailing ".0" on whole floats so 2.0 and 2 stay distinct labels.
            CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 => {
                format!("{v:.1}")
            }
            CellValue::Float(v) => v.to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::List(items) => {
                let inner: Vec<String> = items.iter().map(CellValue::render).collect();
                format!("[{}]", inner.join(", "))
            }
            CellValue::Null => String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// CaseRecord – one row of the table
// ---------------------------------------------------------------------------

/// A single case note (one row of the source table).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseRecord {
    /// Dynamic columns: column_name → value. Absent keys read as `Null`.
    pub fields: BTreeMap<String, CellValue>,
}

static MISSING: CellValue = CellValue::Null;

impl CaseRecord {
    pub fn new(fields: BTreeMap<String, CellValue>) -> Self {
        Self { fields }
    }

    /// The value in `column`, or `Null` when the row has no such cell.
    pub fn get(&self, column: &str) -> &CellValue {
        self.fields.get(column).unwrap_or(&MISSING)
    }
}

// ---------------------------------------------------------------------------
// CaseDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset. Immutable once loaded.
#[derive(Debug, Clone, Default)]
pub struct CaseDataset {
    /// All rows in source order.
    pub rows: Vec<CaseRecord>,
    /// Column names in source order.
    pub columns: Vec<String>,
}

impl CaseDataset {
    /// Build a dataset with an explicit column order. Columns present in rows
    /// but missing from `columns` are appended in sorted order.
    pub fn new(columns: Vec<String>, rows: Vec<CaseRecord>) -> Self {
        let known: BTreeSet<String> = columns.iter().cloned().collect();
        let mut columns = columns;
        let mut extra: BTreeSet<String> = BTreeSet::new();
        for row in &rows {
            for col in row.fields.keys() {
                if !known.contains(col) {
                    extra.insert(col.clone());
                }
            }
        }
        columns.extend(extra);
        CaseDataset { rows, columns }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

// ---------------------------------------------------------------------------
// DatasetView – an ordered subset of rows
// ---------------------------------------------------------------------------

/// One boolean per row of the view it was computed against.
pub type Mask = Vec<bool>;

/// A filtered window onto a [`CaseDataset`]. Rows are referenced by their
/// original index so identity survives any number of filter stages.
#[derive(Debug, Clone)]
pub struct DatasetView<'a> {
    dataset: &'a CaseDataset,
    rows: Vec<usize>,
}

impl<'a> DatasetView<'a> {
    /// A view over every row of the dataset.
    pub fn full(dataset: &'a CaseDataset) -> Self {
        Self {
            dataset,
            rows: (0..dataset.len()).collect(),
        }
    }

    /// A view over the given original row indices. Out-of-range indices are
    /// dropped.
    pub fn from_indices(dataset: &'a CaseDataset, rows: Vec<usize>) -> Self {
        let rows = rows.into_iter().filter(|&i| i < dataset.len()).collect();
        Self { dataset, rows }
    }

    /// Original dataset indices of the rows in this view, in view order.
    pub fn row_indices(&self) -> &[usize] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &'a [String] {
        &self.dataset.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.dataset.has_column(column)
    }

    /// The record at view position `pos`.
    pub fn record(&self, pos: usize) -> Option<&'a CaseRecord> {
        let dataset = self.dataset;
        self.rows.get(pos).map(|&i| &dataset.rows[i])
    }

    /// Cells of `column` in view order.
    pub fn cells<'b>(&'b self, column: &'b str) -> impl Iterator<Item = &'a CellValue> + 'b {
        let dataset = self.dataset;
        self.rows.iter().map(move |&i| dataset.rows[i].get(column))
    }

    /// A mask that keeps every row of this view.
    pub fn all_true(&self) -> Mask {
        vec![true; self.rows.len()]
    }

    /// Keep the rows whose mask entry is true.
    pub fn apply_mask(&self, mask: &[bool]) -> DatasetView<'a> {
        debug_assert_eq!(mask.len(), self.rows.len(), "mask not aligned with view");
        let rows = self
            .rows
            .iter()
            .zip(mask)
            .filter(|(_, keep)| **keep)
            .map(|(i, _)| *i)
            .collect();
        DatasetView {
            dataset: self.dataset,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, CellValue)]) -> CaseRecord {
        CaseRecord::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn nan_is_missing_and_renders_empty() {
        let v = CellValue::Float(f64::NAN);
        assert!(v.is_missing());
        assert_eq!(v.render(), "");
        assert_eq!(v.to_string(), "<null>");
    }

    #[test]
    fn whole_floats_keep_decimal() {
        assert_eq!(CellValue::Float(2.0).render(), "2.0");
        assert_eq!(CellValue::Float(2.5).render(), "2.5");
        assert_eq!(CellValue::Integer(2).render(), "2");
        assert_eq!(CellValue::Float(1e15).render(), "1000000000000000.0");
        assert_ne!(
            CellValue::Float(1e15).render(),
            CellValue::Integer(1_000_000_000_000_000).render()
        );
    }

    #[test]
    fn cells_compare_by_variant_and_value() {
        assert_eq!(CellValue::Float(0.5), CellValue::Float(0.5));
        assert_ne!(CellValue::Float(2.0), CellValue::Integer(2));
        assert_ne!(CellValue::Float(f64::NAN), CellValue::Float(f64::NAN));
        assert_eq!(
            CellValue::List(vec![CellValue::String("a".into())]),
            CellValue::List(vec![CellValue::String("a".into())])
        );
    }

    #[test]
    fn unknown_columns_are_appended_sorted() {
        let rows = vec![
            record(&[("b", CellValue::Integer(1)), ("z", CellValue::Null)]),
            record(&[("a", CellValue::Integer(2))]),
        ];
        let ds = CaseDataset::new(vec!["b".into()], rows);
        assert_eq!(ds.columns, vec!["b", "a", "z"]);
    }

    #[test]
    fn apply_mask_keeps_original_indices() {
        let rows = (0..4)
            .map(|i| record(&[("n", CellValue::Integer(i))]))
            .collect();
        let ds = CaseDataset::new(vec!["n".into()], rows);
        let view = DatasetView::full(&ds);
        let narrowed = view.apply_mask(&[false, true, false, true]);
        assert_eq!(narrowed.row_indices(), &[1, 3]);

        let again = narrowed.apply_mask(&[false, true]);
        assert_eq!(again.row_indices(), &[3]);
        assert_eq!(again.record(0).unwrap().get("n"), &CellValue::Integer(3));
    }

    #[test]
    fn absent_cell_reads_as_null() {
        let r = record(&[("a", CellValue::Integer(1))]);
        assert_eq!(r.get("missing"), &CellValue::Null);
    }
}
