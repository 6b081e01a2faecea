use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{cell, flatten};

/// Format output as tables using the tabled crate.
///
/// An envelope's `result` is shown as a field/value table (nested objects
/// flattened to dotted keys) or, when it is a list, one row per item. Extra
/// sections such as `blocks` or `retirement` follow, then warnings and the
/// methodology line.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) if map.contains_key("result") => print_envelope(map),
        Value::Object(map) if map.len() == 1 => {
            // e.g. {"questions": [...]}
            if let Some(inner) = map.values().next() {
                print_section(inner);
            }
        }
        other => print_section(other),
    }
}

fn print_envelope(envelope: &Map<String, Value>) {
    if let Some(result) = envelope.get("result") {
        print_section(result);
    }

    for (key, extra) in envelope {
        if matches!(
            key.as_str(),
            "result" | "warnings" | "methodology" | "assumptions" | "metadata"
        ) {
            continue;
        }
        println!("\n{}:", key);
        match extra {
            // A nested envelope, e.g. the retirement projection
            Value::Object(inner) if inner.contains_key("result") => {
                if let Some(r) = inner.get("result") {
                    print_section(r);
                }
            }
            other => print_section(other),
        }
    }

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

fn print_section(value: &Value) {
    match value {
        Value::Array(items) => print_rows(items),
        Value::Object(_) => print_fields(value),
        other => println!("{}", cell(other)),
    }
}

fn print_fields(value: &Value) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in flatten(value) {
        builder.push_record([key, cell(&val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_rows(items: &[Value]) {
    if items.is_empty() {
        println!("(empty)");
        return;
    }
    let Some(first) = items.first().filter(|v| v.is_object()) else {
        for item in items {
            println!("{}", cell(item));
        }
        return;
    };

    // Headers come from the first row, flattened like the field view
    let headers: Vec<String> = flatten(first).into_iter().map(|(k, _)| k).collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for item in items {
        let flat: Map<String, Value> = flatten(item).into_iter().collect();
        let row: Vec<String> = headers
            .iter()
            .map(|h| flat.get(h).map(cell).unwrap_or_default())
            .collect();
        builder.push_record(row);
    }
    println!("{}", Table::from(builder));
}
