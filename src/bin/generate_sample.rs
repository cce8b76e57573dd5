use std::sync::Arc;

use anyhow::Context;
use arrow::array::{Int64Array, ListBuilder, StringArray, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const SERVICES: [&str; 4] = [
    "Spesialisthelsetjeneste",
    "Kommunal helse- og omsorgstjeneste",
    "Spesialisthelsetjeneste (privat)",
    "Annet",
];

const FIELDS: [&str; 5] = ["Psykiatri", "Barn og unge", "Geriatri", "Intensiv", "Rus"];

const TAGS: [&str; 7] = [
    "samtykke",
    "tvang",
    "autonomi",
    "taushetsplikt",
    "pårørende",
    "prioritering",
    "livets slutt",
];

/// Deterministic tag pick: 0 to 3 distinct tags per case.
fn tags_for(case: usize) -> Vec<&'static str> {
    let n = case % 4;
    (0..n)
        .map(|k| TAGS[(case * 3 + k * 5) % TAGS.len()])
        .collect()
}

fn main() -> anyhow::Result<()> {
    let n_cases = 60;

    let mut ids = Vec::with_capacity(n_cases);
    let mut titles = Vec::with_capacity(n_cases);
    let mut services = Vec::with_capacity(n_cases);
    let mut fields = Vec::with_capacity(n_cases);
    let mut notes = Vec::with_capacity(n_cases);
    let mut tags_builder = ListBuilder::new(StringBuilder::new());

    for case in 0..n_cases {
        let field = FIELDS[case % FIELDS.len()];
        let service = SERVICES[(case / 2) % SERVICES.len()];
        let tags = tags_for(case);

        ids.push(case as i64 + 1);
        titles.push(format!("Sak {:03}: {field}", case + 1));
        services.push(service);
        // Every seventh case has no field recorded.
        fields.push((case % 7 != 6).then_some(field));
        notes.push(format!(
            "Syntetisk drøftingsnotat for {} innen {field}. Tema: {}.",
            service.to_lowercase(),
            if tags.is_empty() {
                "ikke angitt".to_string()
            } else {
                tags.join(", ")
            }
        ));

        for tag in &tags {
            tags_builder.values().append_value(tag);
        }
        tags_builder.append(true);
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("sak_id", DataType::Int64, false),
        Field::new("tittel", DataType::Utf8, false),
        Field::new("helsetjeneste", DataType::Utf8, false),
        Field::new("fagområde", DataType::Utf8, true),
        Field::new(
            "tags",
            DataType::List(Arc::new(Field::new("item", DataType::Utf8, true))),
            true,
        ),
        Field::new("notat", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(ids)),
            Arc::new(StringArray::from(titles)),
            Arc::new(StringArray::from(services)),
            Arc::new(StringArray::from(fields)),
            Arc::new(tags_builder.finish()),
            Arc::new(StringArray::from(notes)),
        ],
    )
    .context("building record batch")?;

    let output_path = "cases_sample.parquet";
    let file = std::fs::File::create(output_path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;

    println!("Wrote {n_cases} synthetic cases to {output_path}");
    Ok(())
}
