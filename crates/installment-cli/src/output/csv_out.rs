use serde_json::Value;
use std::io;

use super::scalar_text;

type StdoutCsv<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            if let Some(Value::Object(result)) = map.get("result") {
                write_fields(&mut wtr, result);
            } else if let Some(Value::Array(plans)) = map.get("plans") {
                // One row per plan; the shared price is repeated for loaders
                // that expect flat rows.
                let price = map.get("cashPrice").map(|p| scalar_text(p, "")).unwrap_or_default();
                write_array_csv(&mut wtr, plans, Some(("cashPrice", price)));
            } else {
                write_fields(&mut wtr, map);
            }
        }
        Value::Array(arr) => write_array_csv(&mut wtr, arr, None),
        _ => {
            let _ = wtr.write_record([&scalar_text(value, "")]);
        }
    }

    let _ = wtr.flush();
}

fn write_fields(wtr: &mut StdoutCsv<'_>, map: &serde_json::Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &scalar_text(val, "")]);
    }
}

fn write_array_csv(wtr: &mut StdoutCsv<'_>, arr: &[Value], leading: Option<(&str, String)>) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([&scalar_text(item, "")]);
        }
        return;
    };

    let mut headers: Vec<&str> = leading.iter().map(|(k, _)| *k).collect();
    headers.extend(first.keys().map(|k| k.as_str()));
    let _ = wtr.write_record(&headers);

    for item in arr {
        if let Value::Object(map) = item {
            let mut row: Vec<String> = leading.iter().map(|(_, v)| v.clone()).collect();
            row.extend(first.keys().map(|h| {
                map.get(h.as_str())
                    .map(|v| scalar_text(v, ""))
                    .unwrap_or_default()
            }));
            let _ = wtr.write_record(&row);
        }
    }
}
