use thiserror::Error;

use super::model::{CellValue, DatasetView};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("row {row} is out of range for a view of {len} rows")]
    RowOutOfRange { row: usize, len: usize },

    #[error("unknown column «{0}»")]
    UnknownColumn(String),
}

/// The full row behind a selected cell.
#[derive(Debug, Clone, PartialEq)]
pub struct RowDetail {
    /// Position in the view the cell was picked from.
    pub position: usize,
    /// Index of the row in the loaded dataset.
    pub source_row: usize,
    pub column: String,
    pub value: CellValue,
    /// Every dataset column with its value, in dataset column order.
    pub fields: Vec<(String, CellValue)>,
}

/// Map a (row, column) coordinate in `view` back to its full row.
pub fn resolve_row(
    view: &DatasetView<'_>,
    row: usize,
    column: &str,
) -> Result<RowDetail, ResolveError> {
    let record = view.record(row).ok_or(ResolveError::RowOutOfRange {
        row,
        len: view.len(),
    })?;
    if !view.has_column(column) {
        return Err(ResolveError::UnknownColumn(column.to_string()));
    }

    let fields = view
        .columns()
        .iter()
        .map(|col| (col.clone(), record.get(col).clone()))
        .collect();

    Ok(RowDetail {
        position: row,
        source_row: view.row_indices()[row],
        column: column.to_string(),
        value: record.get(column).clone(),
        fields,
    })
}
