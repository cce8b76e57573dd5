use std::io::Write;
use std::sync::Arc;

use arrow::array::{Float64Array, ListBuilder, StringArray, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use case_browser::data::filter::{evaluate, ColumnFilter, MatchMode};
use case_browser::data::loader::{load_file, DatasetCache};
use case_browser::data::model::{CellValue, DatasetView};
use case_browser::data::options::{classify_column, unique_labels, ColumnKind};
use parquet::arrow::ArrowWriter;
use tempfile::NamedTempFile;

fn write_parquet_fixture() -> NamedTempFile {
    let tmp = tempfile::Builder::new()
        .suffix(".parquet")
        .tempfile()
        .unwrap();

    let mut tags = ListBuilder::new(StringBuilder::new());
    for row in [vec!["a", "b"], vec!["b"], vec![]] {
        for tag in row {
            tags.values().append_value(tag);
        }
        tags.append(true);
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("helsetjeneste", DataType::Utf8, true),
        Field::new("score", DataType::Float64, true),
        Field::new(
            "tags",
            DataType::List(Arc::new(Field::new("item", DataType::Utf8, true))),
            true,
        ),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(vec![
                Some("Spesialisthelsetjeneste"),
                Some("Kommunal omsorgstjeneste"),
                None,
            ])),
            Arc::new(Float64Array::from(vec![Some(1.0), None, Some(f64::NAN)])),
            Arc::new(tags.finish()),
        ],
    )
    .unwrap();
    let mut writer = ArrowWriter::try_new(tmp.as_file(), schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
    tmp
}

fn write_text_fixture(suffix: &str, content: &str) -> NamedTempFile {
    let mut tmp = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    tmp.write_all(content.as_bytes()).unwrap();
    tmp.flush().unwrap();
    tmp
}

#[test]
fn parquet_list_column_loads_as_tags() {
    let tmp = write_parquet_fixture();
    let ds = load_file(tmp.path()).unwrap();
    assert_eq!(ds.len(), 3);
    assert_eq!(ds.columns, vec!["helsetjeneste", "score", "tags"]);
    assert_eq!(ds.rows[2].get("helsetjeneste"), &CellValue::Null);
    assert!(ds.rows[2].get("score").is_missing());

    let view = DatasetView::full(&ds);
    assert_eq!(classify_column(&view, "tags"), Some(ColumnKind::MultiValued));
    let any = evaluate(
        &view,
        &ColumnFilter::new("tags", ["b".to_string()].into(), MatchMode::Any),
    );
    assert_eq!(any.mask, vec![true, true, false]);
    let all = evaluate(
        &view,
        &ColumnFilter::new(
            "tags",
            ["a".to_string(), "b".to_string()].into(),
            MatchMode::All,
        ),
    );
    assert_eq!(all.mask, vec![true, false, false]);
}

#[test]
fn json_records_keep_first_seen_column_order() {
    let tmp = write_text_fixture(
        ".json",
        r#"[
            {"tittel": "Sak 1", "tags": ["tvang", " samtykke "]},
            {"tittel": "Sak 2", "tags": null, "fagområde": "Barn"}
        ]"#,
    );
    let ds = load_file(tmp.path()).unwrap();
    assert_eq!(ds.len(), 2);
    assert!(ds.has_column("fagområde"));
    assert_eq!(ds.rows[0].get("fagområde"), &CellValue::Null);

    let view = DatasetView::full(&ds);
    let opts: Vec<_> = unique_labels(&view, "tags").into_iter().collect();
    assert_eq!(opts, vec!["samtykke", "tvang"]);
}

#[test]
fn csv_bracket_cells_become_lists() {
    let tmp = write_text_fixture(
        ".csv",
        "tittel,fagområde,tags\nSak 1,Psykiatri,\"['tvang', 'samtykke']\"\nSak 2,,[]\n",
    );
    let ds = load_file(tmp.path()).unwrap();
    assert_eq!(ds.columns, vec!["tittel", "fagområde", "tags"]);
    assert_eq!(ds.rows[1].get("fagområde"), &CellValue::Null);
    assert_eq!(ds.rows[1].get("tags"), &CellValue::List(Vec::new()));

    let view = DatasetView::full(&ds);
    let opts: Vec<_> = unique_labels(&view, "tags").into_iter().collect();
    assert_eq!(opts, vec!["samtykke", "tvang"]);
}

#[test]
fn missing_file_is_descriptive() {
    let err = load_file(std::path::Path::new("no/such/cases.parquet")).unwrap_err();
    assert!(err.to_string().contains("File not found"));
}

#[test]
fn unsupported_extension_fails() {
    let tmp = write_text_fixture(".pkl", "not a table");
    let err = load_file(tmp.path()).unwrap_err();
    assert!(format!("{err:#}").contains("Unsupported file extension"));
}

#[test]
fn malformed_json_fails() {
    let tmp = write_text_fixture(".json", "{\"not\": \"an array\"}");
    assert!(load_file(tmp.path()).is_err());
}

#[test]
fn cache_loads_once_per_path() {
    let tmp = write_text_fixture(".json", r#"[{"tittel": "Sak 1"}]"#);
    let mut cache = DatasetCache::default();
    let first = cache.get_or_load(tmp.path()).unwrap();
    let second = cache.get_or_load(tmp.path()).unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    cache.invalidate();
    let third = cache.get_or_load(tmp.path()).unwrap();
    assert!(!Arc::ptr_eq(&first, &third));
}
