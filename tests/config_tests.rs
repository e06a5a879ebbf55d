use bakehouse::config;
use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;
use std::time::Duration;

// Tests in this file share the process environment.
static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

#[test]
fn test_sanitize_base_url_removes_trailing_slash() {
    assert_eq!(
        config::sanitize_base_url("https://bakery.example.com/api/"),
        "https://bakery.example.com/api"
    );
}

#[test]
fn test_sanitize_base_url_multiple_trailing_slashes() {
    assert_eq!(
        config::sanitize_base_url("https://bakery.example.com/api///"),
        "https://bakery.example.com/api"
    );
}

#[test]
fn test_sanitize_base_url_with_whitespace() {
    assert_eq!(
        config::sanitize_base_url("  https://bakery.example.com/api/  "),
        "https://bakery.example.com/api"
    );
}

#[test]
fn test_sanitize_base_url_empty_falls_back_to_default() {
    assert_eq!(config::sanitize_base_url(""), config::DEFAULT_API_BASE_URL);
    assert_eq!(config::sanitize_base_url("   "), config::DEFAULT_API_BASE_URL);
}

#[test]
fn test_get_api_base_url_with_trailing_slash() {
    let _guard = ENV_LOCK.lock().unwrap();
    env::set_var("API_BASE_URL", "https://bakery.example.com/api/");

    assert_eq!(config::get_api_base_url(), "https://bakery.example.com/api");

    env::remove_var("API_BASE_URL");
}

#[test]
fn test_get_api_base_url_uses_default() {
    let _guard = ENV_LOCK.lock().unwrap();
    env::remove_var("API_BASE_URL");

    assert_eq!(config::get_api_base_url(), "http://localhost:8000/api");
}

#[test]
fn test_search_debounce_defaults_and_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    env::remove_var("SEARCH_DEBOUNCE_MS");
    assert_eq!(config::get_search_debounce(), Duration::from_millis(500));

    env::set_var("SEARCH_DEBOUNCE_MS", "250");
    assert_eq!(config::get_search_debounce(), Duration::from_millis(250));

    env::set_var("SEARCH_DEBOUNCE_MS", "soon");
    assert_eq!(config::get_search_debounce(), Duration::from_millis(500));

    env::remove_var("SEARCH_DEBOUNCE_MS");
}

#[test]
fn test_default_per_page_rejects_zero() {
    let _guard = ENV_LOCK.lock().unwrap();
    env::set_var("DEFAULT_PER_PAGE", "0");
    assert_eq!(config::get_default_per_page(), config::DEFAULT_PER_PAGE);

    env::set_var("DEFAULT_PER_PAGE", "25");
    assert_eq!(config::get_default_per_page(), 25);

    env::remove_var("DEFAULT_PER_PAGE");
}

#[test]
fn test_session_file_override() {
    let _guard = ENV_LOCK.lock().unwrap();
    env::remove_var("SESSION_FILE");
    assert_eq!(config::get_session_file(), std::path::PathBuf::from(".bakehouse-session.json"));

    env::set_var("SESSION_FILE", "/tmp/bh.json");
    assert_eq!(config::get_session_file(), std::path::PathBuf::from("/tmp/bh.json"));

    env::remove_var("SESSION_FILE");
}
