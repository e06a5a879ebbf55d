use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::{json, Value};

use bakehouse::list::Filters;
use bakehouse::models::Resource;
use bakehouse::session::store::TOKEN_KEY;
use bakehouse::session::{decode_claims, Role, SessionError, SessionStore};

fn token(payload: Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{}.{}.signature", header, body)
}

#[test]
fn test_claims_from_top_level() {
    let claims = decode_claims(&token(json!({
        "sub": 7,
        "role": "super_admin",
        "name": "Mara",
        "exp": 2_000_000_000i64
    })))
    .unwrap();
    assert_eq!(claims.role, Role::SuperAdmin);
    assert_eq!(claims.subject.as_deref(), Some("7"));
    assert_eq!(claims.display_name(), "Mara");
    assert!(!claims.is_expired_at(1_700_000_000));
    assert!(claims.is_expired_at(2_000_000_000));
}

#[test]
fn test_claims_from_nested_user() {
    let claims = decode_claims(&token(json!({
        "user": {"role": "Branch", "branch_id": 4, "email": "north@bakery.test"}
    })))
    .unwrap();
    assert_eq!(claims.role, Role::Branch);
    assert_eq!(claims.branch_id.as_deref(), Some("4"));
    assert_eq!(claims.display_name(), "north@bakery.test");
    assert_eq!(claims.exp, None);
}

#[test]
fn test_malformed_tokens_are_refused() {
    assert!(matches!(decode_claims("not-a-jwt"), Err(SessionError::MalformedToken(_))));
    assert!(matches!(decode_claims("a.!!!.c"), Err(SessionError::MalformedToken(_))));
    assert!(matches!(
        decode_claims(&token(json!({"role": "baker"}))),
        Err(SessionError::MalformedToken(_))
    ));
    assert!(matches!(decode_claims(&token(json!({"sub": 1}))), Err(SessionError::MalformedToken(_))));
}

#[test]
fn test_role_menus() {
    let labels = |role: Role| role.menu().iter().map(|m| m.label).collect::<Vec<_>>();
    assert_eq!(labels(Role::Branch), vec!["Dashboard", "Orders", "Stock Entries"]);
    assert_eq!(labels(Role::SuperAdmin).len(), 1 + Resource::ALL.len());

    assert!(Role::Admin.allows(Resource::EmailLogs));
    assert!(!Role::Admin.allows(Resource::Users));
    assert!(!Role::Admin.allows(Resource::AuditLogs));
    assert!(!Role::Branch.allows(Resource::Employees));
    assert_eq!(Role::Branch.menu()[1].href, "/r/orders");
}

#[test]
fn test_branch_scope_overrides_requested_branch() {
    let claims = decode_claims(&token(json!({"role": "branch", "branch_id": "4"}))).unwrap();
    let mut filters = Filters::default();
    filters.set("branch_id", "9");
    filters.set("status", "pending");
    claims.scope_filters(&mut filters);
    assert_eq!(filters.get("branch_id"), Some("4"));
    assert_eq!(filters.get("status"), Some("pending"));

    let admin = decode_claims(&token(json!({"role": "admin"}))).unwrap();
    let mut untouched = Filters::default();
    admin.scope_filters(&mut untouched);
    assert!(untouched.is_empty());
}

#[test]
fn test_store_reports_expired_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let mut store = SessionStore::open(&path).unwrap();
    store.set(TOKEN_KEY, Value::String(token(json!({"role": "admin", "exp": 100}))));
    store.save().unwrap();

    let store = SessionStore::open(&path).unwrap();
    assert!(store.active(50).is_ok());
    assert!(matches!(store.active(100), Err(SessionError::Expired)));
}
