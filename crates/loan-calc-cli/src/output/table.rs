use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::format_scalar;

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    print!("{}", render_table(value));
}

fn render_table(value: &Value) -> String {
    let mut out = String::new();
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => render_result(result, map, &mut out),
            _ => push_block(&mut out, field_table(map)),
        },
        Value::Array(arr) => push_block(&mut out, rows_table(arr)),
        _ => push_block(&mut out, value.to_string()),
    }
    out
}

fn render_result(result: &Map<String, Value>, envelope: &Map<String, Value>, out: &mut String) {
    push_block(out, field_table(result));

    for (key, val) in result {
        match val {
            // Summaries: scalar figures, then the per-year breakdown.
            Value::Object(section) => {
                push_block(out, format!("\n{}:", title(key)));
                push_block(out, field_table(section));
                if let Some(Value::Array(yearly)) = section.get("yearly") {
                    if !yearly.is_empty() {
                        push_block(out, rows_table(yearly));
                    }
                }
            }
            Value::Array(rows) if key == "periods" => {
                push_block(out, "\nSchedule:".to_string());
                push_block(out, rows_table(rows));
            }
            _ => {}
        }
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            push_block(out, "\nWarnings:".to_string());
            for w in warnings {
                if let Value::String(s) = w {
                    push_block(out, format!("  - {}", s));
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        push_block(out, format!("\nMethodology: {}", meth));
    }
}

fn push_block(out: &mut String, block: String) {
    out.push_str(&block);
    out.push('\n');
}

fn title(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Two-column table of the scalar fields in `map`.
fn field_table(map: &Map<String, Value>) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        if val.is_array() || val.is_object() {
            continue;
        }
        builder.push_record([key.as_str(), &format_scalar(val)]);
    }
    Table::from(builder).to_string()
}

fn rows_table(arr: &[Value]) -> String {
    let Some(Value::Object(first)) = arr.first() else {
        if arr.is_empty() {
            return "(empty)".to_string();
        }
        return arr.iter().map(format_scalar).collect::<Vec<_>>().join("\n");
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(format_scalar).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    Table::from(builder).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schedule_renders_summary_and_rows() {
        let value = json!({
            "result": {
                "periodic_payment": "4027.97",
                "summary": {
                    "number_of_periods": 1,
                    "yearly": [{"year": 2025, "interest": "3125.00"}]
                },
                "periods": [{"period": 1, "date": "2025-01-01", "balance": "0"}]
            },
            "warnings": ["watch out"],
            "methodology": "Level-payment amortisation"
        });
        let out = render_table(&value);
        assert!(out.contains("4027.97"));
        assert!(out.contains("Summary:"));
        assert!(out.contains("number_of_periods"));
        assert!(out.contains("2025-01-01"));
        assert!(out.contains("Schedule:"));
        assert!(out.contains("  - watch out"));
        assert!(out.contains("Methodology: Level-payment amortisation"));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title("baseline"), "Baseline");
        assert_eq!(title("over_payoff"), "Over payoff");
    }

    #[test]
    fn test_empty_rows() {
        assert_eq!(rows_table(&[]), "(empty)");
    }
}
