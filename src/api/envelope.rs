//! Helpers for the backend's `{ success, message, data }` response envelope.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ApiError;
use crate::list::ListQuery;
use crate::models::{Page, Pagination};

/// True when the payload explicitly reports `success: false`.
pub fn is_rejected(payload: &Value) -> bool {
    matches!(payload.get("success"), Some(Value::Bool(false)))
}

/// Best human-readable message carried by an error payload.
///
/// Prefers `message`, then the first entry of a validation `errors` map,
/// then `error`.
pub fn error_message(payload: &Value) -> Option<String> {
    if let Some(msg) = payload.get("message").and_then(|m| m.as_str()) {
        if !msg.trim().is_empty() {
            return Some(msg.trim().to_string());
        }
    }
    if let Some(errors) = payload.get("errors").and_then(|e| e.as_object()) {
        for value in errors.values() {
            let first = match value {
                Value::Array(arr) => arr.iter().find_map(|v| v.as_str()),
                Value::String(s) => Some(s.as_str()),
                _ => None,
            };
            if let Some(s) = first {
                return Some(s.to_string());
            }
        }
    }
    payload
        .get("error")
        .and_then(|e| e.as_str())
        .map(|s| s.to_string())
}

/// Success message of a write envelope, or `fallback`.
pub fn success_message(payload: &Value, fallback: &str) -> String {
    payload
        .get("message")
        .and_then(|m| m.as_str())
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(fallback)
        .to_string()
}

fn lenient_u64(v: Option<&Value>) -> Option<u64> {
    let v = v?;
    v.as_u64()
        .or_else(|| v.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
}

fn find_rows<'a>(payload: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    if let Some(arr) = payload.get(key).and_then(|v| v.as_array()) {
        return Some(arr);
    }
    let data = payload.get("data")?;
    if let Some(arr) = data.as_array() {
        return Some(arr);
    }
    // Paginator objects nest rows one level deeper: { data: { <key>|data: [...] } }
    data.get(key)
        .and_then(|v| v.as_array())
        .or_else(|| data.get("data").and_then(|v| v.as_array()))
}

fn find_pagination(payload: &Value) -> Option<&Value> {
    for candidate in [
        payload.get("pagination"),
        payload.get("meta"),
        payload.get("data").and_then(|d| d.get("pagination")),
    ]
    .into_iter()
    .flatten()
    {
        if candidate.is_object() {
            return Some(candidate);
        }
    }
    // Flat paginator: pagination fields beside the rows
    payload
        .get("data")
        .filter(|d| d.get("current_page").is_some())
        .or_else(|| payload.get("current_page").map(|_| payload))
}

/// Decode one page of a list response.
///
/// Missing pagination fields fall back to what was requested.
pub fn parse_page<T: DeserializeOwned>(payload: &Value, key: &str, query: &ListQuery) -> Result<Page<T>, ApiError> {
    let raw_rows = find_rows(payload, key)
        .ok_or_else(|| ApiError::Decode(format!("missing '{}' list in response", key)))?;
    let mut rows = Vec::with_capacity(raw_rows.len());
    for raw in raw_rows {
        rows.push(serde_json::from_value::<T>(raw.clone())?);
    }
    let meta = find_pagination(payload);
    let current_page = meta
        .and_then(|m| lenient_u64(m.get("current_page")))
        .map(|n| u32::try_from(n.max(1)).unwrap_or(u32::MAX))
        .unwrap_or(query.page);
    let per_page = meta
        .and_then(|m| lenient_u64(m.get("per_page")))
        .filter(|n| *n > 0)
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
        .unwrap_or(query.per_page);
    let total = meta
        .and_then(|m| lenient_u64(m.get("total")))
        .unwrap_or(rows.len() as u64);
    Ok(Page {
        rows,
        pagination: Pagination { current_page, per_page, total },
    })
}

/// Decode a single record from `{ data: {...} }` or `{ <key>: {...} }`.
pub fn parse_record(payload: &Value, key: &str) -> Result<Value, ApiError> {
    payload
        .get("data")
        .filter(|v| v.is_object())
        .or_else(|| payload.get(key).filter(|v| v.is_object()))
        .cloned()
        .ok_or_else(|| ApiError::Decode(format!("missing '{}' record in response", key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query() -> ListQuery {
        ListQuery::new(10)
    }

    #[test]
    fn page_from_keyed_collection() {
        let payload = json!({
            "employees": [{"id": 1}, {"id": 2}],
            "pagination": {"current_page": 2, "per_page": 2, "total": 7}
        });
        let page: Page<Value> = parse_page(&payload, "employees", &query()).unwrap();
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.pagination, Pagination { current_page: 2, per_page: 2, total: 7 });
    }

    #[test]
    fn page_from_nested_paginator_with_string_numbers() {
        let payload = json!({
            "success": true,
            "data": {"data": [{"id": 3}], "current_page": "1", "per_page": "25", "total": "1"}
        });
        let page: Page<Value> = parse_page(&payload, "items", &query()).unwrap();
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.pagination.per_page, 25);
        assert_eq!(page.pagination.total, 1);
    }

    #[test]
    fn page_without_pagination_falls_back_to_request() {
        let payload = json!({"branches": [{"id": 1}]});
        let page: Page<Value> = parse_page(&payload, "branches", &query()).unwrap();
        assert_eq!(page.pagination, Pagination { current_page: 1, per_page: 10, total: 1 });
    }

    #[test]
    fn oversized_pagination_numbers_saturate() {
        let payload = json!({
            "orders": [],
            "pagination": {"current_page": 5_000_000_000u64, "per_page": 9_000_000_000u64, "total": 3}
        });
        let page: Page<Value> = parse_page(&payload, "orders", &query()).unwrap();
        assert_eq!(page.pagination.current_page, u32::MAX);
        assert_eq!(page.pagination.per_page, u32::MAX);
        assert_eq!(page.pagination.total, 3);
    }

    #[test]
    fn page_missing_rows_is_decode_error() {
        let err = parse_page::<Value>(&json!({"success": true}), "orders", &query()).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn error_message_prefers_message_then_validation_errors() {
        assert_eq!(error_message(&json!({"message": "Nope"})).as_deref(), Some("Nope"));
        let v = json!({"message": "", "errors": {"email": ["The email has already been taken."]}});
        assert_eq!(error_message(&v).as_deref(), Some("The email has already been taken."));
        assert_eq!(error_message(&json!({"error": "boom"})).as_deref(), Some("boom"));
        assert_eq!(error_message(&json!({})), None);
    }

    #[test]
    fn rejection_requires_explicit_false() {
        assert!(is_rejected(&json!({"success": false})));
        assert!(!is_rejected(&json!({"success": true})));
        assert!(!is_rejected(&json!({"employees": []})));
    }
}
