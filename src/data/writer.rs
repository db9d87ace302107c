//! Feature table output: CSV and JSON records

use crate::error::Result;
use crate::table::FeatureTable;
use csv::WriterBuilder;
use serde_json::{Map, Number, Value};
use std::io::Write;
use std::path::Path;

fn format_cell(value: f64) -> String {
    if value.is_finite() {
        value.to_string()
    } else {
        String::new()
    }
}

/// Write `date` followed by every column in insertion order.
/// Non-finite cells are written empty.
pub fn write_features<W: Write>(table: &FeatureTable, sink: W) -> Result<()> {
    let mut writer = WriterBuilder::new().from_writer(sink);
    let names = table.column_names();
    let columns = names
        .iter()
        .map(|name| table.column(name))
        .collect::<Result<Vec<_>>>()?;

    let mut header = Vec::with_capacity(names.len() + 1);
    header.push("date");
    header.extend(names.iter().map(|s| s.as_str()));
    writer.write_record(&header)?;

    for (i, date) in table.dates().iter().enumerate() {
        let mut record = Vec::with_capacity(columns.len() + 1);
        record.push(date.format("%Y-%m-%d").to_string());
        record.extend(columns.iter().map(|col| format_cell(col[i])));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write features to a CSV file
pub fn write_features_to_path(table: &FeatureTable, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)?;
    write_features(table, std::io::BufWriter::new(file))?;
    log::info!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

/// One JSON object per row; non-finite cells become `null`
pub fn to_records(table: &FeatureTable) -> Result<Value> {
    let names = table.column_names();
    let columns = names
        .iter()
        .map(|name| table.column(name))
        .collect::<Result<Vec<_>>>()?;

    let records = table
        .dates()
        .iter()
        .enumerate()
        .map(|(i, date)| {
            let mut record = Map::with_capacity(names.len() + 1);
            record.insert("date".to_string(), Value::String(date.to_string()));
            for (name, col) in names.iter().zip(&columns) {
                let cell = Number::from_f64(col[i]).map_or(Value::Null, Value::Number);
                record.insert(name.clone(), cell);
            }
            Value::Object(record)
        })
        .collect();

    Ok(Value::Array(records))
}

/// Write JSON records
pub fn write_json<W: Write>(table: &FeatureTable, sink: W) -> Result<()> {
    serde_json::to_writer_pretty(sink, &to_records(table)?)?;
    Ok(())
}
