use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::claims::{decode_claims, Claims};
use super::error::SessionError;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// Small persistent key-value store for the CLI session (token and user).
pub struct SessionStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl SessionStore {
    /// Open the store at `path`; a missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => Map::new(),
            Ok(text) => match serde_json::from_str::<Value>(&text)? {
                Value::Object(map) => map,
                _ => Map::new(),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn token(&self) -> Option<&str> {
        self.get(TOKEN_KEY).and_then(|v| v.as_str()).filter(|t| !t.is_empty())
    }

    /// A non-empty field of the user profile saved at login.
    pub fn user_field(&self, key: &str) -> Option<String> {
        match self.get(USER_KEY)?.get(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Token and decoded claims of a live session.
    pub fn active(&self, now: i64) -> Result<(String, Claims), SessionError> {
        let token = self.token().ok_or(SessionError::NotLoggedIn)?;
        let claims = decode_claims(token)?;
        if claims.is_expired_at(now) {
            return Err(SessionError::Expired);
        }
        Ok((token.to_string(), claims))
    }

    /// Write atomically: temp file in the same directory, then rename.
    pub fn save(&self) -> Result<(), SessionError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(serde_json::to_string_pretty(&self.values)?.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| SessionError::Io(e.error))?;
        Ok(())
    }
}
