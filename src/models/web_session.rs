use crate::session::Claims;

/// A logged-in panel session.
#[derive(Clone, Debug)]
pub struct WebSession {
    pub token: String,
    pub claims: Claims,
    pub display_name: String,
    pub password_reset_required: bool,
    /// Unix time of the last request made with this session.
    pub last_seen: i64,
}

impl WebSession {
    pub fn new(token: String, claims: Claims, display_name: String, password_reset_required: bool) -> Self {
        Self {
            token,
            claims,
            display_name,
            password_reset_required,
            last_seen: chrono::Utc::now().timestamp(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.claims.is_expired_at(chrono::Utc::now().timestamp())
    }

    /// Expired token, or no request for longer than `max_idle` seconds.
    pub fn is_stale_at(&self, now: i64, max_idle: i64) -> bool {
        self.claims.is_expired_at(now) || now.saturating_sub(self.last_seen) > max_idle
    }
}
