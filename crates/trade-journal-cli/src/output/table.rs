use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

/// Render command output as tables.
///
/// Object results print as field/value pairs, array results (equity curve,
/// normalized trade batches) print one row per element, and a summary prints
/// its statistics followed by its curve.
pub fn print_table(value: &Value) {
    let Value::Object(envelope) = value else {
        print_value(value);
        return;
    };

    match envelope.get("result") {
        Some(result) => {
            print_value(result);
            print_footer(envelope);
        }
        None => print_value(value),
    }
}

fn print_value(value: &Value) {
    match value {
        Value::Object(map) if is_summary(map) => {
            if let Some(stats) = map.get("statistics") {
                println!("Statistics");
                print_value(stats);
            }
            if let Some(Value::Array(curve)) = map.get("equity_curve") {
                println!("\nEquity curve");
                print_rows(curve);
            }
        }
        Value::Object(map) => print_fields(map),
        Value::Array(arr) => print_rows(arr),
        other => println!("{}", format_cell(other)),
    }
}

fn is_summary(map: &Map<String, Value>) -> bool {
    map.contains_key("statistics") && map.contains_key("equity_curve")
}

fn print_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.clone(), format_cell(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_rows(arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        if arr.is_empty() {
            println!("(no rows)");
        }
        for item in arr {
            println!("{}", format_cell(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for item in arr.iter().filter_map(Value::as_object) {
        builder.push_record(
            headers
                .iter()
                .map(|h| item.get(h).map(format_cell).unwrap_or_default()),
        );
    }
    println!("{}", Table::from(builder));
}

fn print_footer(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        let lines: Vec<&str> = warnings.iter().filter_map(Value::as_str).collect();
        if !lines.is_empty() {
            println!("\nWarnings:");
            for w in lines {
                println!("  - {}", w);
            }
        }
    }
    if let Some(Value::String(m)) = envelope.get("methodology") {
        println!("\nMethodology: {}", m);
    }
}

fn format_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) if arr.iter().all(|v| !v.is_object()) => arr
            .iter()
            .map(format_cell)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
