use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

// Default configuration constants
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "";
pub const DEFAULT_SESSION_FILE: &str = ".bakehouse-session.json";
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_PER_PAGE: u32 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const SESSION_COOKIE: &str = "bakehouse_sid";
/// Lifetime of the panel cookie; sessions idle longer than this are swept.
pub const SESSION_MAX_AGE_SECS: i64 = 12 * 60 * 60;

pub fn load_env_file(env_file: Option<&str>) {
    if let Some(path) = env_file {
        dotenvy::from_path(Path::new(path)).ok();
    } else {
        dotenvy::dotenv().ok();
    }
}

pub fn get_api_base_url() -> String {
    sanitize_base_url(&env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()))
}

pub fn get_public_base_url() -> String {
    env::var("PUBLIC_BASE_URL")
        .unwrap_or_else(|_| DEFAULT_PUBLIC_BASE_URL.to_string())
        .trim()
        .trim_end_matches('/')
        .to_string()
}

pub fn get_session_file() -> PathBuf {
    match env::var("SESSION_FILE") {
        Ok(p) if !p.trim().is_empty() => PathBuf::from(p.trim()),
        _ => PathBuf::from(DEFAULT_SESSION_FILE),
    }
}

pub fn get_search_debounce() -> Duration {
    Duration::from_millis(parse_env_or("SEARCH_DEBOUNCE_MS", DEFAULT_SEARCH_DEBOUNCE_MS))
}

pub fn get_default_per_page() -> u32 {
    let n = parse_env_or("DEFAULT_PER_PAGE", DEFAULT_PER_PAGE);
    if n == 0 {
        DEFAULT_PER_PAGE
    } else {
        n
    }
}

pub fn get_request_timeout() -> Duration {
    Duration::from_secs(parse_env_or("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS))
}

fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring unparsable configuration value");
            default
        }),
        Err(_) => default,
    }
}

pub fn sanitize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_API_BASE_URL.to_string()
    } else {
        trimmed.to_string()
    }
}
