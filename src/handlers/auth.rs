use axum::{
    extract::{Extension, Form, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;

use crate::api;
use crate::config::{SESSION_COOKIE, SESSION_MAX_AGE_SECS};
use crate::list::Toast;
use crate::models::{AppState, WebSession};
use crate::session::decode_claims;
use crate::templates::{ChangePasswordTemplate, LoginTemplate};

use super::helpers::{
    build_template_globals, current_session, handle_api_error, random_session_id, render_template, session_id_from_jar,
    SessionContext,
};

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ChangePasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub new_password_confirmation: String,
}

fn login_page(state: &AppState, jar: &CookieJar, email: String, error: Option<String>) -> Response {
    render_template(LoginTemplate {
        globals: build_template_globals(state, jar),
        email,
        error,
    })
}

pub async fn root_get(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if current_session(&state, &jar).is_some() {
        return Redirect::to("/dashboard").into_response();
    }
    Redirect::to("/login").into_response()
}

pub async fn login_get(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if current_session(&state, &jar).is_some() {
        return Redirect::to("/").into_response();
    }
    login_page(&state, &jar, String::new(), None)
}

pub async fn login_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> impl IntoResponse {
    let email = form.email.trim().to_string();
    let resp = match api::login(&state.api, &email, &form.password).await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::info!(%e, "Login refused");
            return login_page(&state, &jar, email, Some(e.to_string()));
        }
    };
    let claims = match decode_claims(&resp.token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::error!(%e, "Login token could not be read");
            return login_page(&state, &jar, email, Some("The server returned a token this panel cannot use".into()));
        }
    };

    let display_name = resp
        .user
        .as_ref()
        .map(|u| u.name.clone())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| claims.display_name());
    let reset = resp.password_reset_required;
    tracing::info!(role = %claims.role, "Panel login");

    let swept = state.sweep_sessions(chrono::Utc::now().timestamp(), SESSION_MAX_AGE_SECS);
    if swept > 0 {
        tracing::debug!(swept, "Removed stale panel sessions");
    }
    let sid = random_session_id();
    state.sessions.lock().unwrap().insert(
        sid.clone(),
        WebSession::new(resp.token, claims, display_name.clone(), reset),
    );
    let mut cookie = Cookie::new(SESSION_COOKIE, sid.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(time::Duration::seconds(SESSION_MAX_AGE_SECS));

    let target = if reset {
        state.push_flash(&sid, Toast::warning("Please choose a new password"));
        "/change-password"
    } else {
        state.push_flash(&sid, Toast::info(format!("Welcome, {}", display_name)));
        "/dashboard"
    };
    (jar.add(cookie), Redirect::to(target)).into_response()
}

pub async fn logout_post(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(sid) = session_id_from_jar(&jar) {
        state.drop_session(&sid);
    }
    let mut removal = Cookie::from(SESSION_COOKIE);
    removal.set_path("/");
    (jar.remove(removal), Redirect::to("/login")).into_response()
}

pub async fn change_password_get(
    State(state): State<AppState>,
    jar: CookieJar,
    Extension(ctx): Extension<SessionContext>,
) -> impl IntoResponse {
    render_template(ChangePasswordTemplate {
        globals: build_template_globals(&state, &jar),
        forced: ctx.session.password_reset_required,
        error: None,
    })
}

pub async fn change_password_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Extension(ctx): Extension<SessionContext>,
    Form(form): Form<ChangePasswordForm>,
) -> impl IntoResponse {
    let result = api::change_password(
        &ctx.client(&state),
        &form.current_password,
        &form.new_password,
        &form.new_password_confirmation,
    )
    .await;
    match result {
        Ok(message) => {
            if let Some(session) = state.sessions.lock().unwrap().get_mut(&ctx.sid) {
                session.password_reset_required = false;
            }
            state.push_flash(&ctx.sid, Toast::success(message));
            Redirect::to("/dashboard").into_response()
        }
        Err(e) => {
            if let Some(resp) = handle_api_error(&state, &ctx, &e) {
                return resp;
            }
            render_template(ChangePasswordTemplate {
                globals: build_template_globals(&state, &jar),
                forced: ctx.session.password_reset_required,
                error: Some(e.to_string()),
            })
        }
    }
}
