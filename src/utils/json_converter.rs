use serde_json::Value;

/// Short display form of a JSON value. Embedded records collapse to their
/// `name` when they have one.
pub fn value_to_short_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(arr) => arr
            .iter()
            .map(value_to_short_string)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(obj) => match obj.get("name").and_then(|n| n.as_str()) {
            Some(name) => name.to_string(),
            None => obj
                .iter()
                .map(|(k, v)| format!("{}: {}", k, value_to_short_string(v)))
                .collect::<Vec<_>>()
                .join(", "),
        },
        Value::Null => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn embedded_records_show_their_name() {
        assert_eq!(value_to_short_string(&json!({"id": 2, "name": "Harbour St"})), "Harbour St");
        assert_eq!(value_to_short_string(&json!({"qty": 3})), "qty: 3");
        assert_eq!(value_to_short_string(&json!([1, "a", null])), "1, a, ");
        assert_eq!(value_to_short_string(&Value::Null), "");
    }
}
