use serde_json::{Map, Value};

use super::{format_value, payload};

/// Headline fields, most important first.
const PRIORITY_KEYS: [&str; 7] = [
    "grade",
    "monthly_payment",
    "net_monthly_cash_flow",
    "dscr",
    "one_percent_rule",
    "matched",
    "total_score",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result = payload(value);

    match result {
        Value::Object(map) => match headline(map) {
            Some(val) => println!("{}", format_value(val)),
            None => match map.iter().next() {
                Some((key, val)) => println!("{}: {}", key, format_value(val)),
                None => println!("(empty)"),
            },
        },
        other => println!("{}", format_value(other)),
    }
}

/// First priority key present, descending into nested objects so that
/// `{"grade": {"grade": "A", ..}}` and `{"loan_details": {"monthly_payment": ..}}`
/// both resolve to a scalar.
fn headline(map: &Map<String, Value>) -> Option<&Value> {
    for key in PRIORITY_KEYS {
        match map.get(key) {
            Some(Value::Object(inner)) => {
                if let Some(val) = headline(inner) {
                    return Some(val);
                }
            }
            Some(Value::Null) | None => {}
            Some(val) => return Some(val),
        }
    }

    map.values()
        .filter_map(Value::as_object)
        .find_map(|inner| headline(inner))
}
