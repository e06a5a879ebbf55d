//! Lenient deserializers for backend payloads, which mix numbers and strings freely.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Any scalar as a string; `null` and missing become `""`.
pub fn scalar_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    Ok(match v {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    })
}

/// Status flags arrive as `1`/`0`, `true`/`false` or `"active"`; normalize to a label.
pub fn status_label<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    Ok(match v {
        None | Some(Value::Null) => String::new(),
        Some(Value::Bool(true)) => "Active".into(),
        Some(Value::Bool(false)) => "Inactive".into(),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(1) => "Active".into(),
            Some(0) => "Inactive".into(),
            _ => n.to_string(),
        },
        Some(Value::String(s)) => capitalize(&s),
        Some(other) => other.to_string(),
    })
}

fn capitalize(s: &str) -> String {
    let s = s.trim().replace('_', " ");
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "scalar_string")]
        id: String,
        #[serde(default, deserialize_with = "status_label")]
        status: String,
    }

    #[test]
    fn numbers_and_nulls_become_strings() {
        let p: Sample = serde_json::from_str(r#"{"id": 42, "status": null}"#).unwrap();
        assert_eq!(p.id, "42");
        assert_eq!(p.status, "");
    }

    #[test]
    fn status_flags_are_normalized() {
        let p: Sample = serde_json::from_str(r#"{"status": 1}"#).unwrap();
        assert_eq!(p.status, "Active");
        let p: Sample = serde_json::from_str(r#"{"status": "in_transit"}"#).unwrap();
        assert_eq!(p.status, "In transit");
        let p: Sample = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(p.id, "");
    }
}
