use serde_json::Value;

/// Headline figures, in the order they are looked for.
const HEADLINE_KEYS: [&str; 5] = [
    "net_pnl",
    "win_rate",
    "profit_factor",
    "expectancy",
    "max_drawdown",
];

/// Print the single most useful number from the output.
///
/// Summaries report their total net P&L, curves their final cumulative
/// value, and trade batches their count.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let result = match result.get("statistics") {
        Some(stats) => stats,
        None => result,
    };

    match result {
        Value::Object(map) => {
            let headline = HEADLINE_KEYS
                .iter()
                .find_map(|k| map.get(*k).filter(|v| !v.is_null()).map(|v| (*k, v)));
            match headline {
                Some((_, val)) => println!("{}", plain(val)),
                None => match map.iter().next() {
                    Some((key, val)) => println!("{}: {}", key, plain(val)),
                    None => println!("{{}}"),
                },
            }
        }
        Value::Array(arr) => match arr.last().and_then(|p| p.get("cumulative_pnl")) {
            Some(cumulative) => println!("{}", plain(cumulative)),
            None => println!("{}", arr.len()),
        },
        other => println!("{}", plain(other)),
    }
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
