use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::HeaderValue;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::models::AppState;

// Embed the default stylesheet in the binary
pub const DEFAULT_STYLESHEET: &str = include_str!("../static/styles.css");

/// The admin panel. `stylesheet` replaces the embedded default when given.
pub fn build_app(state: AppState, stylesheet: Option<String>) -> Router {
    let protected_routes = Router::new()
        .route("/dashboard", get(handlers::dashboard::dashboard_get))
        .route(
            "/change-password",
            get(handlers::auth::change_password_get).post(handlers::auth::change_password_post),
        )
        .route("/r/:resource", get(handlers::records::list_get))
        .route(
            "/r/:resource/new",
            get(handlers::records::new_get).post(handlers::records::new_post),
        )
        .route(
            "/r/:resource/:id/edit",
            get(handlers::records::edit_get).post(handlers::records::edit_post),
        )
        .route("/r/:resource/:id/delete", post(handlers::records::delete_post))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            handlers::middleware::auth_middleware,
        ));

    let stylesheet_content = stylesheet.unwrap_or_else(|| DEFAULT_STYLESHEET.to_string());
    let static_routes = Router::new()
        .route(
            "/static/styles.css",
            get(move || {
                let css = stylesheet_content.clone();
                async move { ([(CONTENT_TYPE, "text/css")], css) }
            }),
        )
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=3600"),
        ));

    Router::new()
        .route("/", get(handlers::auth::root_get))
        .route("/login", get(handlers::auth::login_get).post(handlers::auth::login_post))
        .route("/logout", post(handlers::auth::logout_post))
        .merge(protected_routes)
        .merge(static_routes)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
