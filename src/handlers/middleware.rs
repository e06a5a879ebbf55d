use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::handlers::helpers::current_session;
use crate::models::AppState;

const RESET_ALLOWED: &[&str] = &["/change-password", "/logout"];

pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(ctx) = current_session(&state, &jar) else {
        return Redirect::to("/login").into_response();
    };
    // Until the password is changed only the change form is reachable.
    if ctx.session.password_reset_required && !RESET_ALLOWED.contains(&request.uri().path()) {
        return Redirect::to("/change-password").into_response();
    }
    request.extensions_mut().insert(ctx);
    next.run(request).await
}
