use serde_json::Value;

use super::cell;

/// Key answer fields, most specific first.
const PRIORITY_KEYS: [&str; 7] = [
    "message",
    "loan_id",
    "emi",
    "final_amount",
    "selected_total",
    "transaction_id",
    "id",
];

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields in priority order, then falls back to
/// the first field of the result object.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

fn minimal_line(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                return cell(val);
            }
        }
        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, cell(val));
        }
    }

    if let Value::Array(rows) = result_obj {
        return format!("{} rows", rows.len());
    }

    cell(result_obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_emi_preferred_over_totals() {
        let v = json!({"result": {"total_payable": "106618.56", "emi": "8884.88"}});
        assert_eq!(minimal_line(&v), "8884.88");
    }

    #[test]
    fn test_receipt_prints_message() {
        let v = json!({
            "transaction_id": "TXN1",
            "message": "Your payment of ₹10.00 has been completed successfully!"
        });
        assert_eq!(
            minimal_line(&v),
            "Your payment of ₹10.00 has been completed successfully!"
        );
    }
}
