use serde_json::Value;

use super::format_scalar;

/// Key answers, most specific first.
const PRIORITY_KEYS: [&str; 6] = [
    "pricePerSession",
    "newProfitMargin",
    "position",
    "total",
    "targetRevenue",
    "isValid",
];

/// Print just the key answer value from the output.
///
/// Looks for the first priority key anywhere in the result (depth-first),
/// then falls back to the first field of the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    for key in PRIORITY_KEYS {
        if let Some(found) = find_key(result_obj, key) {
            println!("{}", format_scalar(found));
            return;
        }
    }

    if let Value::Object(map) = result_obj {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_scalar(val));
            return;
        }
    }

    println!("{}", format_scalar(result_obj));
}

fn find_key<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    let map = value.as_object()?;
    if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
        return Some(val);
    }
    map.values().find_map(|child| find_key(child, key))
}
