use serde_json::Value;
use std::io;

use super::{flatten_fields, format_value, payload, record_arrays};

/// Write output as CSV to stdout.
///
/// A result holding records (schedule periods, screening rows) is written as
/// one row per record; anything else as two-column `field,value` rows.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match payload(value) {
        Value::Object(result) => {
            if let Some((_, records)) = record_arrays(result).into_iter().next() {
                write_records(&mut wtr, records);
            } else {
                let mut rows = Vec::new();
                flatten_fields("", result, &mut rows);
                let _ = wtr.write_record(["field", "value"]);
                for (field, val) in rows {
                    let _ = wtr.write_record([field, val]);
                }
            }
        }
        Value::Array(records) => write_records(&mut wtr, records),
        other => {
            let _ = wtr.write_record([format_value(other)]);
        }
    }

    let _ = wtr.flush();
}

fn write_records(wtr: &mut csv::Writer<io::StdoutLock<'_>>, records: &[Value]) {
    let Some(Value::Object(first)) = records.first() else {
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for item in records {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_value).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}
