use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use rand::RngCore;

use crate::api::{ApiClient, ApiError};
use crate::config::SESSION_COOKIE;
use crate::list::Toast;
use crate::models::{AppState, CurrentUser, Resource, WebSession};
use crate::templates::TemplateGlobals;

/// The logged-in session of a protected request, put in place by
/// [`super::middleware::auth_middleware`].
#[derive(Clone)]
pub struct SessionContext {
    pub sid: String,
    pub session: WebSession,
}

impl SessionContext {
    /// Token-bearing client for this session.
    pub fn client(&self, state: &AppState) -> ApiClient {
        state.api.with_token(self.session.token.clone())
    }
}

pub fn random_session_id() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn session_id_from_jar(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

/// Live session of the request. An expired token ends the session.
pub fn current_session(state: &AppState, jar: &CookieJar) -> Option<SessionContext> {
    let sid = session_id_from_jar(jar)?;
    let session = state.session(&sid)?;
    if session.is_expired() {
        tracing::info!("Panel session expired");
        state.drop_session(&sid);
        state.push_flash(&sid, Toast::warning("Your session has expired. Please log in again."));
        return None;
    }
    state.touch_session(&sid, chrono::Utc::now().timestamp());
    Some(SessionContext { sid, session })
}

pub fn build_template_globals(state: &AppState, jar: &CookieJar) -> TemplateGlobals {
    let ctx = current_session(state, jar);
    let flash_messages = session_id_from_jar(jar)
        .map(|sid| state.take_flashes(&sid))
        .unwrap_or_default();
    let menu = match &ctx {
        Some(c) if !c.session.password_reset_required => c.session.claims.role.menu(),
        _ => Vec::new(),
    };
    TemplateGlobals {
        current_user: ctx.as_ref().map(|c| CurrentUser::from(&c.session)),
        api_hostname: crate::utils::hostname_from_url(state.api.base_url()),
        menu,
        has_flash_messages: !flash_messages.is_empty(),
        flash_messages,
    }
}

pub fn render_template<T: Template>(t: T) -> Response {
    match t.render() {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            tracing::error!(%e, "Template render error");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

/// A rejected token ends the panel session; anything else is for the page to show.
pub fn handle_api_error(state: &AppState, ctx: &SessionContext, err: &ApiError) -> Option<Response> {
    if err.is_unauthorized() {
        tracing::warn!("Backend rejected the session token");
        state.drop_session(&ctx.sid);
        state.push_flash(&ctx.sid, Toast::warning("Your session is no longer valid. Please log in again."));
        return Some(Redirect::to("/login").into_response());
    }
    None
}

/// Resolve `/r/:resource` and check the role may open it.
pub fn ensure_resource_allowed(state: &AppState, ctx: &SessionContext, slug: &str) -> Result<Resource, Response> {
    let Some(resource) = Resource::from_slug(slug) else {
        return Err((StatusCode::NOT_FOUND, "Unknown resource").into_response());
    };
    if !ctx.session.claims.role.allows(resource) {
        state.push_flash(
            &ctx.sid,
            Toast::error(format!("{} is not available to your role", resource.label())),
        );
        return Err(Redirect::to("/dashboard").into_response());
    }
    Ok(resource)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_are_random_hex() {
        let a = random_session_id();
        let b = random_session_id();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
