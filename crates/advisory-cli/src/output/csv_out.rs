use serde_json::{Map, Value};
use std::io;

use super::{cell, flatten};

/// Write output as CSV to stdout.
///
/// List results (model comparisons, block weights, the questionnaire) become
/// one record per item; object results become `field,value` records with
/// dotted keys for nested objects.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let body = match value {
        Value::Object(map) => map
            .get("result")
            .or_else(|| map.get("questions"))
            .unwrap_or(value),
        other => other,
    };

    match body {
        Value::Array(items) => write_rows(&mut wtr, items),
        Value::Object(_) => {
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in flatten(body) {
                let _ = wtr.write_record([key, cell(&val)]);
            }
        }
        other => {
            let _ = wtr.write_record([cell(other)]);
        }
    }

    let _ = wtr.flush();
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, items: &[Value]) {
    let Some(first) = items.first() else {
        return;
    };
    if !first.is_object() {
        for item in items {
            let _ = wtr.write_record([cell(item)]);
        }
        return;
    }

    let headers: Vec<String> = flatten(first).into_iter().map(|(k, _)| k).collect();
    let _ = wtr.write_record(&headers);
    for item in items {
        let flat: Map<String, Value> = flatten(item).into_iter().collect();
        let row: Vec<String> = headers
            .iter()
            .map(|h| flat.get(h).map(cell).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&row);
    }
}
