use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::client::ApiClient;
use super::envelope::{parse_page, parse_record, success_message};
use super::error::ApiError;
use crate::list::{ListQuery, PageSource};
use crate::models::{
    AuditLog, Branch, Designation, EmailLog, Employee, Item, Order, Page, Resource, RowView, StockEntry, TablePage,
    TableRow, User,
};

/// One typed page of `resource`.
pub async fn fetch_page<T: DeserializeOwned>(
    client: &ApiClient,
    resource: Resource,
    query: &ListQuery,
) -> Result<Page<T>, ApiError> {
    let payload = client.get(resource.list_endpoint(), &query.to_params()).await?;
    parse_page(&payload, resource.collection_key(), query)
}

async fn fetch_rows<T: DeserializeOwned + TableRow>(
    client: &ApiClient,
    resource: Resource,
    query: &ListQuery,
) -> Result<TablePage, ApiError> {
    fetch_page::<T>(client, resource, query).await.map(TablePage::from_page)
}

/// One page of `resource` rendered to table rows.
pub async fn fetch_table(client: &ApiClient, resource: Resource, query: &ListQuery) -> Result<TablePage, ApiError> {
    match resource {
        Resource::Employees => fetch_rows::<Employee>(client, resource, query).await,
        Resource::Branches => fetch_rows::<Branch>(client, resource, query).await,
        Resource::Designations => fetch_rows::<Designation>(client, resource, query).await,
        Resource::Items => fetch_rows::<Item>(client, resource, query).await,
        Resource::Orders => fetch_rows::<Order>(client, resource, query).await,
        Resource::Stocks => fetch_rows::<StockEntry>(client, resource, query).await,
        Resource::Users => fetch_rows::<User>(client, resource, query).await,
        Resource::AuditLogs => fetch_rows::<AuditLog>(client, resource, query).await,
        Resource::EmailLogs => fetch_rows::<EmailLog>(client, resource, query).await,
    }
}

/// Headers of `resource`'s table, without fetching.
pub fn table_headers(resource: Resource) -> Vec<String> {
    let headers: &[&str] = match resource {
        Resource::Employees => Employee::headers(),
        Resource::Branches => Branch::headers(),
        Resource::Designations => Designation::headers(),
        Resource::Items => Item::headers(),
        Resource::Orders => Order::headers(),
        Resource::Stocks => StockEntry::headers(),
        Resource::Users => User::headers(),
        Resource::AuditLogs => AuditLog::headers(),
        Resource::EmailLogs => EmailLog::headers(),
    };
    headers.iter().map(|h| h.to_string()).collect()
}

fn write_slug(resource: Resource) -> Result<&'static str, ApiError> {
    resource
        .record_slug()
        .ok_or_else(|| ApiError::validation(format!("{} are read-only", resource.label())))
}

fn check_id(id: &str) -> Result<&str, ApiError> {
    let id = id.trim();
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(ApiError::validation(format!("Invalid record id '{}'", id)));
    }
    Ok(id)
}

/// `GET /admin/<slug>/{id}` as a flat JSON object.
pub async fn fetch_record(client: &ApiClient, resource: Resource, id: &str) -> Result<Map<String, Value>, ApiError> {
    let slug = write_slug(resource)?;
    let id = check_id(id)?;
    let payload = client.get(&format!("/admin/{}/{}", slug, id), &[]).await?;
    match parse_record(&payload, slug)? {
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::Decode(format!("{} {} is not an object", slug, id))),
    }
}

pub async fn create_record(client: &ApiClient, resource: Resource, body: Map<String, Value>) -> Result<String, ApiError> {
    let slug = write_slug(resource)?;
    let payload = client.post(&format!("/admin/create/{}", slug), &Value::Object(body)).await?;
    Ok(success_message(&payload, &format!("{} created", resource.singular())))
}

pub async fn update_record(
    client: &ApiClient,
    resource: Resource,
    id: &str,
    body: Map<String, Value>,
) -> Result<String, ApiError> {
    let slug = write_slug(resource)?;
    let id = check_id(id)?;
    let payload = client
        .put(&format!("/admin/update/{}/{}", slug, id), &Value::Object(body))
        .await?;
    Ok(success_message(&payload, &format!("{} updated", resource.singular())))
}

pub async fn delete_record(client: &ApiClient, resource: Resource, id: &str) -> Result<String, ApiError> {
    let slug = write_slug(resource)?;
    let id = check_id(id)?;
    let payload = client.delete(&format!("/admin/delete/{}/{}", slug, id)).await?;
    Ok(success_message(&payload, &format!("{} deleted", resource.singular())))
}

/// Feeds a [`crate::list::ListController`] from the backend.
pub struct ResourceSource {
    client: ApiClient,
    resource: Resource,
}

impl ResourceSource {
    pub fn new(client: ApiClient, resource: Resource) -> Arc<Self> {
        Arc::new(Self { client, resource })
    }
}

impl PageSource<RowView> for ResourceSource {
    fn fetch(&self, query: ListQuery) -> BoxFuture<'static, Result<Page<RowView>, ApiError>> {
        let client = self.client.clone();
        let resource = self.resource;
        async move {
            let table = fetch_table(&client, resource, &query).await?;
            Ok::<_, ApiError>(table.into_page().1)
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_checked_before_building_paths() {
        assert_eq!(check_id(" 42 ").unwrap(), "42");
        assert!(check_id("../users").is_err());
        assert!(check_id("").is_err());
    }

    #[tokio::test]
    async fn logs_cannot_be_written() {
        let client = ApiClient::from_http(reqwest::Client::new(), "http://127.0.0.1:9");
        let err = delete_record(&client, Resource::AuditLogs, "1").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn headers_match_row_width() {
        assert_eq!(table_headers(Resource::Employees).len(), Employee::default().cells().len());
        assert_eq!(table_headers(Resource::Stocks).len(), StockEntry::default().cells().len());
    }
}
