use std::collections::BTreeMap;

use axum::{
    extract::{Extension, Form, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::api::{self, ApiError};
use crate::list::{Filters, ListQuery, Toast, SEARCH_KEY};
use crate::models::{validate_filters, validate_record, AppState, FieldKind, FormMode, Resource, TablePage, Pagination};
use crate::output::pagination_footer;
use crate::templates::{FilterInput, FormInput, FormTemplate, ListTemplate, SelectOption};
use crate::utils::{link_with_query, value_to_short_string};

use super::helpers::{build_template_globals, ensure_resource_allowed, handle_api_error, render_template, SessionContext};

const PER_PAGE_CHOICES: &[u32] = &[10, 25, 50, 100];

/// Page, page size and filters read from the list URL. Unknown keys are ignored.
fn list_query_from_params(state: &AppState, ctx: &SessionContext, resource: Resource, params: &BTreeMap<String, String>) -> ListQuery {
    let number = |key: &str| params.get(key).and_then(|v| v.trim().parse::<u32>().ok()).filter(|n| *n > 0);
    let mut filters: Filters = params
        .iter()
        .filter(|(k, _)| k.as_str() == SEARCH_KEY || resource.filter_spec(k).is_some())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    ctx.session.claims.scope_filters(&mut filters);
    ListQuery::new(number("per_page").unwrap_or(state.default_per_page))
        .with_filters(filters)
        .with_page(number("page").unwrap_or(1))
}

fn page_link(resource: Resource, query: &ListQuery, page: u32) -> String {
    let mut pairs = query.filter_params();
    pairs.push(("per_page".into(), query.per_page.to_string()));
    pairs.push(("page".into(), page.to_string()));
    link_with_query(&format!("/r/{}", resource.slug()), &pairs)
}

fn per_page_options(current: u32) -> Vec<SelectOption> {
    let mut choices = PER_PAGE_CHOICES.to_vec();
    if !choices.contains(&current) {
        choices.push(current);
        choices.sort_unstable();
    }
    let choices: Vec<String> = choices.iter().map(|n| n.to_string()).collect();
    SelectOption::list(&choices, &current.to_string())
}

pub async fn list_get(
    State(state): State<AppState>,
    jar: CookieJar,
    Extension(ctx): Extension<SessionContext>,
    Path(slug): Path<String>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Response {
    let resource = match ensure_resource_allowed(&state, &ctx, &slug) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    let query = list_query_from_params(&state, &ctx, resource, &params);

    let fetched = match validate_filters(resource, &query.filters) {
        Ok(()) => api::fetch_table(&ctx.client(&state), resource, &query).await,
        Err(e) => Err(e),
    };
    let (table, error) = match fetched {
        Ok(table) => (table, None),
        Err(e) => {
            if let Some(resp) = handle_api_error(&state, &ctx, &e) {
                return resp;
            }
            tracing::warn!(resource = %resource, %e, "List request failed");
            let empty = TablePage {
                headers: api::table_headers(resource),
                rows: Vec::new(),
                pagination: Pagination { current_page: query.page, per_page: query.per_page, total: 0 },
            };
            (empty, Some(e.to_string()))
        }
    };

    let scoped = ctx.session.claims.role.is_branch_scoped();
    let filters = resource
        .filters()
        .iter()
        .map(|spec| {
            let value = query.filters.get(spec.key).unwrap_or("").to_string();
            FilterInput {
                key: spec.key.to_string(),
                label: spec.label.to_string(),
                input_type: spec.kind.input_type().to_string(),
                options: SelectOption::list(spec.options, &value),
                value,
                locked: scoped && spec.key == "branch_id",
            }
        })
        .collect();

    let p = table.pagination;
    let writable = resource.is_writable();
    render_template(ListTemplate {
        globals: build_template_globals(&state, &jar),
        title: resource.label().to_string(),
        slug: resource.slug().to_string(),
        writable,
        search: query.filters.search().unwrap_or("").to_string(),
        filters,
        per_page_options: per_page_options(query.per_page),
        column_count: table.headers.len() + usize::from(writable),
        footer: pagination_footer(&p, table.rows.len()),
        prev_link: p.has_prev().then(|| page_link(resource, &query, p.current_page - 1)),
        next_link: p.has_next().then(|| page_link(resource, &query, p.current_page + 1)),
        headers: table.headers,
        rows: table.rows,
        error,
    })
}

fn form_inputs(resource: Resource, values: &BTreeMap<String, String>) -> Vec<FormInput> {
    resource
        .fields()
        .iter()
        .map(|spec| {
            let value = match spec.kind {
                FieldKind::Password => String::new(),
                _ => values.get(spec.name).cloned().unwrap_or_default(),
            };
            FormInput {
                name: spec.name.to_string(),
                label: spec.label.to_string(),
                input_type: spec.kind.input_type().to_string(),
                options: SelectOption::list(spec.options, &value),
                value,
                required: spec.required,
            }
        })
        .collect()
}

struct FormPage<'a> {
    resource: Resource,
    id: Option<&'a str>,
    values: &'a BTreeMap<String, String>,
    error: Option<String>,
}

fn render_form(state: &AppState, jar: &CookieJar, page: FormPage<'_>) -> Response {
    let r = page.resource;
    let (title, action, submit_label) = match page.id {
        Some(id) => (
            format!("Edit {} {}", r.singular().to_lowercase(), id),
            format!("/r/{}/{}/edit", r.slug(), id),
            "Save",
        ),
        None => (format!("New {}", r.singular().to_lowercase()), format!("/r/{}/new", r.slug()), "Create"),
    };
    render_template(FormTemplate {
        globals: build_template_globals(state, jar),
        title,
        action,
        back_link: format!("/r/{}", r.slug()),
        submit_label: submit_label.to_string(),
        fields: form_inputs(r, page.values),
        error: page.error,
    })
}

/// Resource for a write route; read-only logs bounce back to their list.
fn writable_resource(state: &AppState, ctx: &SessionContext, slug: &str) -> Result<Resource, Response> {
    let resource = ensure_resource_allowed(state, ctx, slug)?;
    if !resource.is_writable() {
        state.push_flash(&ctx.sid, Toast::error(format!("{} are read-only", resource.label())));
        return Err(Redirect::to(&format!("/r/{}", resource.slug())).into_response());
    }
    Ok(resource)
}

/// Branch users write records of their own branch only.
fn scope_form(ctx: &SessionContext, resource: Resource, values: &mut BTreeMap<String, String>) {
    let claims = &ctx.session.claims;
    if claims.role.is_branch_scoped() && resource.fields().iter().any(|f| f.name == "branch_id") {
        if let Some(branch) = &claims.branch_id {
            values.insert("branch_id".into(), branch.clone());
        }
    }
}

fn after_write(state: &AppState, ctx: &SessionContext, resource: Resource, result: Result<String, ApiError>) -> Result<Response, ApiError> {
    let message = result?;
    tracing::info!(resource = %resource, %message, "Record written");
    state.push_flash(&ctx.sid, Toast::success(message));
    Ok(Redirect::to(&format!("/r/{}", resource.slug())).into_response())
}

pub async fn new_get(
    State(state): State<AppState>,
    jar: CookieJar,
    Extension(ctx): Extension<SessionContext>,
    Path(slug): Path<String>,
) -> Response {
    let resource = match writable_resource(&state, &ctx, &slug) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    let mut values = BTreeMap::new();
    scope_form(&ctx, resource, &mut values);
    render_form(&state, &jar, FormPage { resource, id: None, values: &values, error: None })
}

pub async fn new_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Extension(ctx): Extension<SessionContext>,
    Path(slug): Path<String>,
    Form(mut values): Form<BTreeMap<String, String>>,
) -> Response {
    let resource = match writable_resource(&state, &ctx, &slug) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    scope_form(&ctx, resource, &mut values);
    let result = match validate_record(resource, &values, FormMode::Create) {
        Ok(body) => api::create_record(&ctx.client(&state), resource, body).await,
        Err(e) => Err(e),
    };
    match after_write(&state, &ctx, resource, result) {
        Ok(resp) => resp,
        Err(e) => handle_api_error(&state, &ctx, &e).unwrap_or_else(|| {
            render_form(&state, &jar, FormPage { resource, id: None, values: &values, error: Some(e.to_string()) })
        }),
    }
}

pub async fn edit_get(
    State(state): State<AppState>,
    jar: CookieJar,
    Extension(ctx): Extension<SessionContext>,
    Path((slug, id)): Path<(String, String)>,
) -> Response {
    let resource = match writable_resource(&state, &ctx, &slug) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    match api::fetch_record(&ctx.client(&state), resource, &id).await {
        Ok(record) => {
            let values: BTreeMap<String, String> = resource
                .fields()
                .iter()
                .filter_map(|f| record.get(f.name).map(|v| (f.name.to_string(), value_to_short_string(v))))
                .collect();
            render_form(&state, &jar, FormPage { resource, id: Some(&id), values: &values, error: None })
        }
        Err(e) => {
            if let Some(resp) = handle_api_error(&state, &ctx, &e) {
                return resp;
            }
            state.push_flash(&ctx.sid, Toast::error(e.to_string()));
            Redirect::to(&format!("/r/{}", resource.slug())).into_response()
        }
    }
}

pub async fn edit_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Extension(ctx): Extension<SessionContext>,
    Path((slug, id)): Path<(String, String)>,
    Form(mut values): Form<BTreeMap<String, String>>,
) -> Response {
    let resource = match writable_resource(&state, &ctx, &slug) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    scope_form(&ctx, resource, &mut values);
    let result = match validate_record(resource, &values, FormMode::Update) {
        Ok(body) => api::update_record(&ctx.client(&state), resource, &id, body).await,
        Err(e) => Err(e),
    };
    match after_write(&state, &ctx, resource, result) {
        Ok(resp) => resp,
        Err(e) => handle_api_error(&state, &ctx, &e).unwrap_or_else(|| {
            render_form(&state, &jar, FormPage { resource, id: Some(&id), values: &values, error: Some(e.to_string()) })
        }),
    }
}

pub async fn delete_post(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path((slug, id)): Path<(String, String)>,
) -> Response {
    let resource = match writable_resource(&state, &ctx, &slug) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    let result = api::delete_record(&ctx.client(&state), resource, &id).await;
    match after_write(&state, &ctx, resource, result) {
        Ok(resp) => resp,
        Err(e) => handle_api_error(&state, &ctx, &e).unwrap_or_else(|| {
            state.push_flash(&ctx.sid, Toast::error(e.to_string()));
            Redirect::to(&format!("/r/{}", resource.slug())).into_response()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_page_options_include_the_current_size() {
        let opts = per_page_options(25);
        assert_eq!(opts.len(), 4);
        assert!(opts.iter().any(|o| o.value == "25" && o.selected));
        let opts = per_page_options(7);
        assert_eq!(opts[0].value, "7");
        assert!(opts[0].selected);
    }

    #[test]
    fn page_links_keep_filters_and_size() {
        let mut filters = Filters::default();
        filters.set("q", "rye");
        filters.set("status", "active");
        let query = ListQuery::new(25).with_filters(filters);
        assert_eq!(page_link(Resource::Items, &query, 3), "/r/items?q=rye&status=active&per_page=25&page=3");
    }

    #[test]
    fn password_fields_are_never_prefilled() {
        let values: BTreeMap<String, String> =
            [("name".to_string(), "Ana".to_string()), ("password".to_string(), "secret".to_string())].into();
        let inputs = form_inputs(Resource::Users, &values);
        let pw = inputs.iter().find(|f| f.name == "password").unwrap();
        assert!(pw.value.is_empty());
        assert_eq!(inputs.iter().find(|f| f.name == "name").unwrap().value, "Ana");
    }
}
