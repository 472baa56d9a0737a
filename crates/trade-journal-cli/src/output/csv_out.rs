use serde_json::{Map, Value};
use std::io;

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write command output as CSV to stdout.
///
/// Array results become one record per element. For a summary only the
/// equity curve is written, since statistics are a single row of fields.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Array(arr) => write_rows(&mut wtr, arr),
        Value::Object(map) => match map.get("equity_curve") {
            Some(Value::Array(curve)) if map.contains_key("statistics") => {
                write_rows(&mut wtr, curve)
            }
            _ => write_fields(&mut wtr, map),
        },
        other => {
            let _ = wtr.write_record([csv_cell(other)]);
        }
    }

    let _ = wtr.flush();
}

fn write_fields(wtr: &mut StdoutWriter<'_>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.clone(), csv_cell(val)]);
    }
}

fn write_rows(wtr: &mut StdoutWriter<'_>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([csv_cell(item)]);
        }
        return;
    };

    let headers: Vec<&String> = first.keys().collect();
    let _ = wtr.write_record(&headers);
    for item in arr.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| item.get(h.as_str()).map(csv_cell).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&row);
    }
}

fn csv_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
