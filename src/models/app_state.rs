use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::api::ApiClient;
use crate::list::Toast;
use crate::models::web_session::WebSession;

#[derive(Clone)]
pub struct AppState {
    /// Unauthenticated client; handlers derive a token-bearing copy per session.
    pub api: ApiClient,
    /// Panel sessions keyed by the session cookie value.
    pub sessions: Arc<Mutex<HashMap<String, WebSession>>>,
    pub flash_store: Arc<Mutex<HashMap<String, Vec<Toast>>>>,
    pub public_base_url: String,
    pub default_per_page: u32,
}

impl AppState {
    pub fn new(api: ApiClient, public_base_url: String, default_per_page: u32) -> Self {
        Self {
            api,
            sessions: Arc::new(Mutex::new(HashMap::new())),
            flash_store: Arc::new(Mutex::new(HashMap::new())),
            public_base_url,
            default_per_page,
        }
    }

    pub fn session(&self, sid: &str) -> Option<WebSession> {
        self.sessions.lock().unwrap().get(sid).cloned()
    }

    pub fn touch_session(&self, sid: &str, now: i64) {
        if let Some(session) = self.sessions.lock().unwrap().get_mut(sid) {
            session.last_seen = now;
        }
    }

    /// Remove stale sessions and any flashes not tied to a live session.
    /// Returns how many sessions were removed.
    pub fn sweep_sessions(&self, now: i64, max_idle: i64) -> usize {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_stale_at(now, max_idle));
        self.flash_store
            .lock()
            .unwrap()
            .retain(|sid, _| sessions.contains_key(sid));
        before - sessions.len()
    }

    pub fn drop_session(&self, sid: &str) {
        self.sessions.lock().unwrap().remove(sid);
        self.flash_store.lock().unwrap().remove(sid);
    }

    pub fn push_flash(&self, sid: &str, toast: Toast) {
        self.flash_store
            .lock()
            .unwrap()
            .entry(sid.to_string())
            .or_default()
            .push(toast);
    }

    pub fn take_flashes(&self, sid: &str) -> Vec<Toast> {
        self.flash_store.lock().unwrap().remove(sid).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::session::{Claims, Role};

    fn session(exp: Option<i64>, last_seen: i64) -> WebSession {
        let claims = Claims {
            role: Role::Admin,
            branch_id: None,
            subject: None,
            name: None,
            email: None,
            exp,
        };
        WebSession {
            last_seen,
            ..WebSession::new("a.b.c".into(), claims, "Admin".into(), false)
        }
    }

    #[test]
    fn sweep_drops_expired_and_idle_sessions() {
        let api = ApiClient::new("http://127.0.0.1:9/api", Duration::from_secs(1)).unwrap();
        let state = AppState::new(api, String::new(), 10);
        {
            let mut sessions = state.sessions.lock().unwrap();
            sessions.insert("live".into(), session(Some(2_000), 990));
            sessions.insert("expired".into(), session(Some(900), 990));
            sessions.insert("idle".into(), session(None, 100));
            sessions.insert("no-exp".into(), session(None, 995));
        }
        state.push_flash("idle", Toast::info("left behind"));
        state.push_flash("live", Toast::info("still here"));

        assert_eq!(state.sweep_sessions(1_000, 60), 2);
        assert!(state.session("live").is_some());
        assert!(state.session("no-exp").is_some());
        assert!(state.session("expired").is_none());
        assert!(state.session("idle").is_none());
        assert!(state.take_flashes("idle").is_empty());
        assert_eq!(state.take_flashes("live").len(), 1);
    }

    #[test]
    fn touching_a_session_keeps_it_alive() {
        let api = ApiClient::new("http://127.0.0.1:9/api", Duration::from_secs(1)).unwrap();
        let state = AppState::new(api, String::new(), 10);
        state.sessions.lock().unwrap().insert("sid".into(), session(None, 0));
        state.touch_session("sid", 500);
        assert_eq!(state.sweep_sessions(520, 60), 0);
        assert!(state.session("sid").is_some());
    }
}
