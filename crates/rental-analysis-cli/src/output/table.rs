use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{flatten_fields, format_value, payload, record_arrays};

/// Format output as tables: one field/value table for scalars, then one
/// table per array of records, then warnings and methodology.
pub fn print_table(value: &Value) {
    match payload(value) {
        Value::Object(result) => {
            let mut rows = Vec::new();
            flatten_fields("", result, &mut rows);
            if !rows.is_empty() {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                for (field, val) in rows {
                    builder.push_record([field, val]);
                }
                println!("{}", Table::from(builder));
            }

            for (name, records) in record_arrays(result) {
                println!("\n{name}:");
                print_record_table(records);
            }
        }
        Value::Array(records) => print_record_table(records),
        other => println!("{}", format_value(other)),
    }

    if let Some(envelope) = value.as_object() {
        if let Some(Value::Array(warnings)) = envelope.get("warnings") {
            if !warnings.is_empty() {
                println!("\nWarnings:");
                for w in warnings.iter().filter_map(Value::as_str) {
                    println!("  - {}", w);
                }
            }
        }
        if let Some(Value::String(meth)) = envelope.get("methodology") {
            println!("\nMethodology: {}", meth);
        }
    }
}

fn print_record_table(records: &[Value]) {
    let Some(Value::Object(first)) = records.first() else {
        println!("(empty)");
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());

    for item in records {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h).map(format_value).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }

    println!("{}", Table::from(builder));
}
