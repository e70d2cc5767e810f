use serde_json::Value;

use super::format_scalar;

/// Key output fields, most specific first.
const PRIORITY_KEYS: [&str; 5] = [
    "rounded_payment",
    "periodic_payment",
    "periods_saved",
    "interest_saved",
    "total_payment",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

fn minimal_line(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in &PRIORITY_KEYS {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    return format_scalar(val);
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_scalar(val));
        }
    }

    format_scalar(result_obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prefers_rounded_payment() {
        let value = json!({"result": {"periodic_payment": "4027.9659", "rounded_payment": "4027.97"}});
        assert_eq!(minimal_line(&value), "4027.97");
    }

    #[test]
    fn test_what_if_reports_periods_saved() {
        let value = json!({"result": {"interest_saved": "1000", "periods_saved": 12}});
        assert_eq!(minimal_line(&value), "12");
    }

    #[test]
    fn test_falls_back_to_first_field() {
        let value = json!({"result": {"answer": 42}});
        assert_eq!(minimal_line(&value), "answer: 42");
    }
}
