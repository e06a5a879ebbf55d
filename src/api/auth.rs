use serde::Deserialize;
use serde_json::{json, Value};

use super::client::ApiClient;
use super::envelope::success_message;
use super::error::ApiError;
use crate::models::de::scalar_string;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginUser {
    #[serde(default, deserialize_with = "scalar_string")]
    pub id: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub name: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub email: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub user: Option<LoginUser>,
    #[serde(default)]
    pub password_reset_required: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// `POST /login`. Empty credentials are refused before any request.
pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(ApiError::validation("Email and password are required"));
    }
    let payload = client
        .post("/login", &json!({"email": email, "password": password}))
        .await?;
    let resp: LoginResponse = serde_json::from_value(payload)?;
    if resp.token.is_empty() {
        return Err(ApiError::Decode("login response carried no token".into()));
    }
    Ok(resp)
}

/// `POST /change-password` with the current token.
pub async fn change_password(
    client: &ApiClient,
    current_password: &str,
    new_password: &str,
    confirmation: &str,
) -> Result<String, ApiError> {
    if current_password.is_empty() || new_password.is_empty() {
        return Err(ApiError::validation("Current and new password are required"));
    }
    if new_password != confirmation {
        return Err(ApiError::validation("New password and confirmation do not match"));
    }
    if new_password.chars().count() < 8 {
        return Err(ApiError::validation("New password must be at least 8 characters"));
    }
    let body: Value = json!({
        "current_password": current_password,
        "new_password": new_password,
        "new_password_confirmation": confirmation,
    });
    let payload = client.post("/change-password", &body).await?;
    Ok(success_message(&payload, "Password changed"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_credentials_never_hit_the_network() {
        let client = ApiClient::from_http(reqwest::Client::new(), "http://127.0.0.1:9");
        let err = login(&client, "  ", "secret").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn mismatched_confirmation_is_refused() {
        let client = ApiClient::from_http(reqwest::Client::new(), "http://127.0.0.1:9");
        let err = change_password(&client, "old-pass", "new-password", "new-passw0rd").await.unwrap_err();
        assert_eq!(err, ApiError::validation("New password and confirmation do not match"));
    }

    #[test]
    fn login_response_decodes_reset_flag() {
        let resp: LoginResponse = serde_json::from_value(serde_json::json!({
            "success": true, "token": "a.b.c",
            "user": {"id": 1, "name": "Mia", "email": "mia@bakery.test", "role": "admin"},
            "password_reset_required": true
        }))
        .unwrap();
        assert!(resp.password_reset_required);
        assert_eq!(resp.user.unwrap().id, "1");
    }
}
