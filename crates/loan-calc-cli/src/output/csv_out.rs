use serde_json::Value;
use std::io::{self, Write};

use super::format_scalar;

/// Write output as CSV to stdout.
///
/// A result carrying a `periods` table is exported row by row (the
/// amortization schedule download); anything else becomes `field,value`
/// pairs with nested sections flattened to dotted keys.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    if let Err(e) = write_csv(&mut wtr, value) {
        eprintln!("CSV output error: {}", e);
    }
}

pub(crate) fn write_csv<W: Write>(wtr: &mut csv::Writer<W>, value: &Value) -> csv::Result<()> {
    let result = value.get("result").unwrap_or(value);

    match result {
        Value::Object(map) => {
            if let Some(Value::Array(periods)) = map.get("periods") {
                write_rows(wtr, periods)?;
            } else {
                wtr.write_record(["field", "value"])?;
                write_fields(wtr, "", map)?;
            }
        }
        Value::Array(arr) => write_rows(wtr, arr)?,
        _ => wtr.write_record([format_scalar(result)])?,
    }

    wtr.flush()?;
    Ok(())
}

fn write_fields<W: Write>(
    wtr: &mut csv::Writer<W>,
    prefix: &str,
    map: &serde_json::Map<String, Value>,
) -> csv::Result<()> {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(nested) => write_fields(wtr, &name, nested)?,
            // Per-year and cumulative series belong in their own export.
            Value::Array(_) => {}
            _ => wtr.write_record([name.as_str(), &format_scalar(val)])?,
        }
    }
    Ok(())
}

fn write_rows<W: Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) -> csv::Result<()> {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            wtr.write_record([format_scalar(item)])?;
        }
        return Ok(());
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    wtr.write_record(&headers)?;
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_scalar).unwrap_or_default())
                .collect();
            wtr.write_record(&row)?;
        }
    }
    Ok(())
}
