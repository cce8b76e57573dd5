use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CaseDataset, CaseRecord, CellValue};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a case dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – any flat table; `List`/`LargeList` columns become tag cells
/// * `.json`    – `[{ "tittel": "...", "tags": ["a", "b"], ... }, ...]`
/// * `.csv`     – header row; a cell written as `[a, b]` is a tag list
pub fn load_file(path: &Path) -> Result<CaseDataset> {
    if !path.exists() {
        bail!("File not found: {}", path.display());
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("Could not read {}", path.display()))?;

    log::info!(
        "Loaded {} rows with columns {:?} from {}",
        dataset.len(),
        dataset.columns,
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Load-once cache
// ---------------------------------------------------------------------------

/// Holds the last loaded dataset so repeated interactions do not re-read the
/// file. Keyed by path.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entry: Option<(PathBuf, Arc<CaseDataset>)>,
}

impl DatasetCache {
    /// Return the cached dataset for `path`, loading it on first use or when
    /// the path changes. Failures are not cached.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<CaseDataset>> {
        if let Some((cached, dataset)) = &self.entry {
            if cached == path {
                log::debug!("dataset cache hit for {}", path.display());
                return Ok(Arc::clone(dataset));
            }
        }
        let dataset = Arc::new(load_file(path)?);
        self.entry = Some((path.to_path_buf(), Arc::clone(&dataset)));
        Ok(dataset)
    }

    /// Forget the cached dataset so the next request re-reads the file.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, one object per case):
///
/// ```json
/// [
///   {
///     "tittel": "Tvangsbehandling",
///     "helsetjeneste": "Spesialisthelsetjeneste",
///     "fagområde": "Psykiatri",
///     "tags": ["tvang", "samtykke"]
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<CaseDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut fields = BTreeMap::new();
        for (key, val) in obj {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
            fields.insert(key.clone(), json_to_cell(val));
        }
        rows.push(CaseRecord::new(fields));
    }

    Ok(CaseDataset::new(columns, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        JsonValue::Array(items) => CellValue::List(items.iter().map(json_to_cell).collect()),
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one case per record.
/// A cell wrapped in brackets is a tag list; elements are comma separated and
/// may be quoted: `"[tvang, samtykke]"` or `"['tvang', 'samtykke']"`.
fn load_csv(path: &Path) -> Result<CaseDataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let fields = headers
            .iter()
            .zip(record.iter())
            .map(|(col, value)| (col.clone(), guess_cell_type(value)))
            .collect();

        rows.push(CaseRecord::new(fields));
    }

    Ok(CaseDataset::new(headers, rows))
}

fn guess_cell_type(s: &str) -> CellValue {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return CellValue::Null;
    }
    if let Some(inner) = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        return parse_bracket_list(inner);
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return CellValue::Float(f);
    }
    if trimmed == "true" || trimmed == "false" {
        return CellValue::Bool(trimmed == "true");
    }
    CellValue::String(s.to_string())
}

fn parse_bracket_list(inner: &str) -> CellValue {
    let items = inner
        .split(',')
        .map(|tok| tok.trim().trim_matches(|c: char| c == '\'' || c == '"').trim())
        .filter(|tok| !tok.is_empty())
        .map(|tok| CellValue::String(tok.to_string()))
        .collect();
    CellValue::List(items)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing case notes.
///
/// Every column is kept. Scalars map to the matching [`CellValue`] variant,
/// `List` / `LargeList` columns to [`CellValue::List`]. Works with files
/// written by both **Pandas** (`df.to_parquet()`) and **Polars**
/// (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<CaseDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        for row in 0..batch.num_rows() {
            let mut fields = BTreeMap::new();
            for (col_idx, field) in schema.fields().iter().enumerate() {
                let value = extract_cell(batch.column(col_idx), row)
                    .with_context(|| format!("Row {row}: failed to read '{}'", field.name()))?;
                fields.insert(field.name().clone(), value);
            }
            rows.push(CaseRecord::new(fields));
        }
    }

    Ok(CaseDataset::new(columns, rows))
}

// -- Parquet / Arrow helpers --

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => CellValue::Float(widen_f32(col.as_primitive::<Float32Type>().value(row))),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
            CellValue::Date(array_value_to_string(col.as_ref(), row)?)
        }
        DataType::List(_) => list_cell(&col.as_list::<i32>().value(row))?,
        DataType::LargeList(_) => list_cell(&col.as_list::<i64>().value(row))?,
        _ => CellValue::String(array_value_to_string(col.as_ref(), row)?),
    };
    Ok(value)
}

/// Widen through the shortest decimal form so `0.1f32` stays `0.1`.
fn widen_f32(v: f32) -> f64 {
    v.to_string().parse::<f64>().unwrap_or(v as f64)
}

fn list_cell(values: &ArrayRef) -> Result<CellValue> {
    let items = (0..values.len())
        .map(|i| extract_cell(values, i))
        .collect::<Result<Vec<_>>>()?;
    Ok(CellValue::List(items))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_cell_types() {
        assert_eq!(guess_cell_type(""), CellValue::Null);
        assert_eq!(guess_cell_type("12"), CellValue::Integer(12));
        assert_eq!(guess_cell_type("1.5"), CellValue::Float(1.5));
        assert_eq!(guess_cell_type("false"), CellValue::Bool(false));
        assert_eq!(
            guess_cell_type("Psykiatri"),
            CellValue::String("Psykiatri".into())
        );
    }

    #[test]
    fn csv_bracket_lists() {
        let expected = CellValue::List(vec![
            CellValue::String("tvang".into()),
            CellValue::String("samtykke".into()),
        ]);
        assert_eq!(guess_cell_type("[tvang, samtykke]"), expected);
        assert_eq!(guess_cell_type("['tvang', 'samtykke']"), expected);
        assert_eq!(guess_cell_type("[]"), CellValue::List(Vec::new()));
    }

    #[test]
    fn float32_cells_keep_their_decimal_form() {
        let col: ArrayRef = Arc::new(arrow::array::Float32Array::from(vec![0.1f32, 2.5f32]));
        let cell = extract_cell(&col, 0).unwrap();
        assert_eq!(cell, CellValue::Float(0.1));
        assert_eq!(cell.render(), "0.1");
        assert_eq!(extract_cell(&col, 1).unwrap().render(), "2.5");
    }

    #[test]
    fn json_arrays_become_lists() {
        let v: JsonValue = serde_json::json!(["a", 1, null]);
        assert_eq!(
            json_to_cell(&v),
            CellValue::List(vec![
                CellValue::String("a".into()),
                CellValue::Integer(1),
                CellValue::Null,
            ])
        );
    }
}
