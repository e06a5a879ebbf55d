use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::{Map, Value};

use super::resource::{FieldKind, FieldSpec, Resource};
use crate::api::ApiError;
use crate::list::Filters;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Whether a form creates a record or edits one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update,
}

pub fn parse_date(label: &str, raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| ApiError::validation(format!("{} must be a date in YYYY-MM-DD format", label)))
}

fn coerce(spec: &FieldSpec, raw: &str) -> Result<Value, ApiError> {
    match spec.kind {
        FieldKind::Integer => raw
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| ApiError::validation(format!("{} must be a whole number", spec.label))),
        FieldKind::Number => {
            let n = raw
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| ApiError::validation(format!("{} must be a number", spec.label)))?;
            Ok(Value::from(n))
        }
        FieldKind::Date => {
            parse_date(spec.label, raw)?;
            Ok(Value::String(raw.to_string()))
        }
        FieldKind::Email => {
            let valid = raw
                .split_once('@')
                .map(|(user, domain)| !user.is_empty() && domain.contains('.'))
                .unwrap_or(false);
            if valid {
                Ok(Value::String(raw.to_string()))
            } else {
                Err(ApiError::validation(format!("{} must be a valid email address", spec.label)))
            }
        }
        FieldKind::Select if !spec.options.is_empty() && !spec.options.contains(&raw) => Err(ApiError::validation(
            format!("{} must be one of: {}", spec.label, spec.options.join(", ")),
        )),
        FieldKind::Text | FieldKind::Password | FieldKind::Select => Ok(Value::String(raw.to_string())),
    }
}

/// Validate submitted form values and build the JSON body for a write request.
///
/// On create every required field must be present. On update an empty field
/// means "leave unchanged" and is omitted from the body.
pub fn validate_record(
    resource: Resource,
    input: &BTreeMap<String, String>,
    mode: FormMode,
) -> Result<Map<String, Value>, ApiError> {
    if !resource.is_writable() {
        return Err(ApiError::validation(format!("{} are read-only", resource.label())));
    }
    let fields = resource.fields();
    if let Some(unknown) = input.keys().find(|k| !fields.iter().any(|f| f.name == k.as_str())) {
        return Err(ApiError::validation(format!("Unknown field '{}' for {}", unknown, resource.slug())));
    }
    let mut body = Map::new();
    for spec in fields {
        let raw = input.get(spec.name).map(|v| v.trim()).unwrap_or("");
        if raw.is_empty() {
            if spec.required && mode == FormMode::Create {
                return Err(ApiError::validation(format!("{} is required", spec.label)));
            }
            continue;
        }
        body.insert(spec.name.to_string(), coerce(spec, raw)?);
    }
    if body.is_empty() {
        return Err(ApiError::validation("Nothing to save"));
    }
    Ok(body)
}

/// Check a single list filter before it is committed.
pub fn validate_filter(resource: Resource, key: &str, value: &str) -> Result<(), ApiError> {
    if key == "q" {
        return Ok(());
    }
    let spec = resource
        .filter_spec(key)
        .ok_or_else(|| ApiError::validation(format!("{} cannot be filtered by '{}'", resource.label(), key)))?;
    let value = value.trim();
    if value.is_empty() {
        return Ok(());
    }
    match spec.kind {
        FieldKind::Date => parse_date(spec.label, value).map(|_| ()),
        FieldKind::Integer => value
            .parse::<i64>()
            .map(|_| ())
            .map_err(|_| ApiError::validation(format!("{} must be a whole number", spec.label))),
        FieldKind::Select if !spec.options.is_empty() && !spec.options.contains(&value) => Err(
            ApiError::validation(format!("{} must be one of: {}", spec.label, spec.options.join(", "))),
        ),
        _ => Ok(()),
    }
}

/// Validate every filter plus the `from <= to` date range.
pub fn validate_filters(resource: Resource, filters: &Filters) -> Result<(), ApiError> {
    for (key, value) in filters.iter() {
        validate_filter(resource, key, value)?;
    }
    if let (Some(from), Some(to)) = (filters.get("from"), filters.get("to")) {
        if parse_date("From", from)? > parse_date("To", to)? {
            return Err(ApiError::validation("From date must not be after To date"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn create_requires_required_fields() {
        let err = validate_record(Resource::Branches, &input(&[("name", "Central")]), FormMode::Create).unwrap_err();
        assert_eq!(err, ApiError::validation("Code is required"));
    }

    #[test]
    fn update_skips_empty_fields() {
        let body = validate_record(Resource::Branches, &input(&[("name", ""), ("phone", "555-0101")]), FormMode::Update)
            .unwrap();
        assert_eq!(body.len(), 1);
        assert_eq!(body["phone"], "555-0101");
    }

    #[test]
    fn numbers_are_coerced() {
        let body = validate_record(
            Resource::Items,
            &input(&[("name", "Rye loaf"), ("unit", "pc"), ("price", "4.50")]),
            FormMode::Create,
        )
        .unwrap();
        assert_eq!(body["price"], Value::from(4.5));
        let err = validate_record(
            Resource::Items,
            &input(&[("name", "Rye loaf"), ("unit", "pc"), ("price", "cheap")]),
            FormMode::Create,
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn unknown_fields_and_read_only_resources_are_refused() {
        assert!(validate_record(Resource::Designations, &input(&[("colour", "red")]), FormMode::Update).is_err());
        assert!(validate_record(Resource::AuditLogs, &input(&[]), FormMode::Create).is_err());
    }

    #[test]
    fn filter_dates_and_ranges() {
        assert!(validate_filter(Resource::Orders, "from", "2024-02-30").is_err());
        assert!(validate_filter(Resource::Orders, "status", "pending").is_ok());
        assert!(validate_filter(Resource::Orders, "status", "lost").is_err());
        assert!(validate_filter(Resource::Designations, "status", "active").is_err());

        let mut filters = Filters::default();
        filters.set("from", "2024-03-10");
        filters.set("to", "2024-03-01");
        assert!(validate_filters(Resource::Orders, &filters).is_err());
        filters.set("to", "2024-03-31");
        assert!(validate_filters(Resource::Orders, &filters).is_ok());
    }
}
