use serde_json::Value;

use super::cell;

/// Headline field of each command's result, in priority order.
const HEADLINE_KEYS: [&str; 8] = [
    "profile_label",
    "band",
    "label",
    "asset_class",
    "required_capital",
    "annualised_volatility",
    "total_value",
    "life_expectancy",
];

/// Print just the key answer value from the output.
///
/// Looks for a headline field in the result, then falls back to the first
/// field. List results print one headline per item.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Array(items) => {
            for item in items {
                println!("{}", headline(item));
            }
        }
        other => println!("{}", headline(other)),
    }
}

fn headline(value: &Value) -> String {
    let Value::Object(map) = value else {
        return cell(value);
    };
    if let Some(val) = HEADLINE_KEYS
        .iter()
        .filter_map(|k| map.get(*k))
        .find(|v| !v.is_null())
    {
        // Tilt rows read better with their block
        return match map.get("block_label").and_then(Value::as_str) {
            Some(block) => format!("{}: {}", block, cell(val)),
            None => cell(val),
        };
    }
    match map.iter().next() {
        Some((key, val)) => format!("{}: {}", key, cell(val)),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_headline_prefers_profile_label() {
        let v = json!({"global": "72.3", "band": "Growth", "profile_label": "Growth"});
        assert_eq!(headline(&v), "Growth");
    }

    #[test]
    fn test_tilt_row_headline() {
        let v = json!({"block": "equity_usa", "block_label": "US Equities", "label": "Neutral"});
        assert_eq!(headline(&v), "US Equities: Neutral");
    }
}
