use serde_json::Value;

use super::scalar_text;

/// Priority list of headline fields, checked in order.
const PRIORITY_KEYS: [&str; 4] = [
    "monthlyInstallment",
    "lowestTotalCostIndex",
    "totalCostToCustomer",
    "effectiveRatePercent",
];

/// Print just the key answer value from the output.
///
/// A plan set prints one monthly installment per plan; anything else
/// prints the first priority field found, then falls back to the first
/// field of the result object.
pub fn print_minimal(value: &Value) {
    if let Some(Value::Array(plans)) = value.get("plans") {
        for plan in plans {
            let installment = plan.get("monthlyInstallment").unwrap_or(&Value::Null);
            println!("{}", scalar_text(installment, "null"));
        }
        return;
    }

    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in &PRIORITY_KEYS {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", scalar_text(val, "null"));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, scalar_text(val, "null"));
            return;
        }
    }

    println!("{}", scalar_text(result_obj, "null"));
}
