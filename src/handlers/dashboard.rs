use axum::{
    extract::{Extension, State},
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;
use futures_util::future::join_all;

use crate::api::fetch_table;
use crate::list::{Filters, ListQuery};
use crate::templates::{DashboardCard, DashboardTemplate};
use crate::models::AppState;

use super::helpers::{build_template_globals, handle_api_error, render_template, SessionContext};

/// One card per resource the role may open, each with the collection total.
pub async fn dashboard_get(
    State(state): State<AppState>,
    jar: CookieJar,
    Extension(ctx): Extension<SessionContext>,
) -> impl IntoResponse {
    let client = ctx.client(&state);
    let claims = &ctx.session.claims;
    let mut filters = Filters::default();
    claims.scope_filters(&mut filters);
    // per_page=1: only the pagination total is wanted.
    let query = ListQuery::new(1).with_filters(filters);

    let resources = claims.role.resources();
    let results = join_all(resources.iter().map(|r| fetch_table(&client, *r, &query))).await;

    let mut cards = Vec::with_capacity(resources.len());
    for (resource, result) in resources.iter().zip(results) {
        let (total, error) = match result {
            Ok(table) => (Some(table.pagination.total), None),
            Err(e) => {
                if let Some(resp) = handle_api_error(&state, &ctx, &e) {
                    return resp;
                }
                tracing::warn!(resource = %resource, %e, "Dashboard total unavailable");
                (None, Some(e.to_string()))
            }
        };
        cards.push(DashboardCard {
            label: resource.label().to_string(),
            href: format!("/r/{}", resource.slug()),
            total,
            error,
        });
    }

    render_template(DashboardTemplate {
        globals: build_template_globals(&state, &jar),
        role_label: claims.role.label().to_string(),
        cards,
    })
}
