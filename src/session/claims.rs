use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::Value;

use super::error::SessionError;
use super::role::Role;
use crate::list::Filters;

/// Claims read from the token payload. The signature is NOT verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub role: Role,
    pub branch_id: Option<String>,
    pub subject: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    /// Expiry as a unix timestamp.
    pub exp: Option<i64>,
}

fn claim_string(payload: &Value, key: &str) -> Option<String> {
    match payload.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decode the claims of a JWT-shaped token.
///
/// Role and branch may sit at the top level or under a `user` object.
pub fn decode_claims(token: &str) -> Result<Claims, SessionError> {
    let mut parts = token.trim().split('.');
    let payload_b64 = match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(payload), Some(_)) => payload,
        _ => return Err(SessionError::MalformedToken("expected three dot-separated segments".into())),
    };
    let bytes = URL_SAFE_NO_PAD
        .decode(payload_b64.trim_end_matches('='))
        .map_err(|e| SessionError::MalformedToken(e.to_string()))?;
    let payload: Value =
        serde_json::from_slice(&bytes).map_err(|e| SessionError::MalformedToken(e.to_string()))?;

    let user = payload.get("user").cloned().unwrap_or(Value::Null);
    let lookup = |key: &str| claim_string(&payload, key).or_else(|| claim_string(&user, key));

    let role_raw = lookup("role").ok_or_else(|| SessionError::MalformedToken("missing role claim".into()))?;
    let role = Role::parse(&role_raw)
        .ok_or_else(|| SessionError::MalformedToken(format!("unknown role '{}'", role_raw)))?;

    Ok(Claims {
        role,
        branch_id: lookup("branch_id"),
        subject: claim_string(&payload, "sub"),
        name: lookup("name"),
        email: lookup("email"),
        exp: payload.get("exp").and_then(|v| v.as_i64()),
    })
}

impl Claims {
    pub fn is_expired_at(&self, now: i64) -> bool {
        matches!(self.exp, Some(exp) if exp <= now)
    }

    /// Filters forced onto every list for this identity.
    pub fn scope_filters(&self, filters: &mut Filters) {
        if self.role.is_branch_scoped() {
            match &self.branch_id {
                Some(branch) => {
                    filters.set("branch_id", branch);
                }
                None => tracing::warn!("Branch role without branch_id claim; lists are not scoped"),
            }
        }
    }

    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.email.clone())
            .or_else(|| self.subject.clone())
            .unwrap_or_else(|| self.role.label().to_string())
    }
}
