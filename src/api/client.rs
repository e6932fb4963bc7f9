//! GraphQL/REST client for the on-call backend
//!
//! Every list and create document aliases its root field as `data`, so responses
//! share one envelope: `{ "data": { "data": ... }, "errors": [...] }`.

use super::traits::{ListSource, LogoutTransport, RecordSink, SessionSource};
use crate::config::ClientConfig;
use crate::error::{FetchError, MutationError};
use crate::state::{AppContext, ConfigValues, CreatedRecord, FieldError, Identity, ListQuery, Page};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

const SESSION_QUERY: &str = r#"
query sessionInfo {
  user {
    id
    role
  }
  config {
    id
    value
  }
}
"#;

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
    #[serde(default)]
    extensions: Option<ErrorExtensions>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorExtensions {
    #[serde(default)]
    is_field_error: bool,
    field_name: Option<String>,
}

/// The `data: root(...)` alias
#[derive(Debug, Deserialize)]
struct Aliased<T> {
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct SessionData {
    user: Option<SessionUser>,
    #[serde(default)]
    config: Vec<ConfigEntry>,
}

#[derive(Debug, Deserialize)]
struct SessionUser {
    id: String,
    role: String,
}

#[derive(Debug, Deserialize)]
struct ConfigEntry {
    id: String,
    value: Value,
}

/// `input.timeoutMinutes` → `timeoutMinutes`, `Name` → `name`
fn field_key(name: &str) -> String {
    let last = name.rsplit('.').next().unwrap_or(name);
    let mut chars = last.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn join_messages(errors: &[GraphQlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Decode a list response body
pub fn parse_page(body: Value) -> Result<Page, FetchError> {
    let response: GraphQlResponse<Aliased<Page>> = serde_json::from_value(body)?;
    if !response.errors.is_empty() {
        return Err(FetchError::Server(join_messages(&response.errors)));
    }
    response
        .data
        .and_then(|d| d.data)
        .ok_or_else(|| FetchError::Decode("response has no data".to_string()))
}

/// Decode a create mutation response body
pub fn parse_created(body: Value) -> Result<CreatedRecord, MutationError> {
    let response: GraphQlResponse<Aliased<CreatedRecord>> =
        serde_json::from_value(body).map_err(FetchError::from)?;

    if !response.errors.is_empty() {
        let field_errors: Vec<FieldError> = response
            .errors
            .iter()
            .filter_map(|e| {
                let ext = e.extensions.as_ref()?;
                let field = ext.field_name.as_deref()?;
                ext.is_field_error
                    .then(|| FieldError::new(&field_key(field), e.message.clone()))
            })
            .collect();
        if field_errors.len() == response.errors.len() {
            return Err(MutationError::Fields(field_errors));
        }
        return Err(FetchError::Server(join_messages(&response.errors)).into());
    }

    response
        .data
        .and_then(|d| d.data)
        .ok_or_else(|| FetchError::Decode("mutation returned no record".to_string()).into())
}

/// Decode the session query body
pub fn parse_context(body: Value) -> Result<AppContext, FetchError> {
    let response: GraphQlResponse<SessionData> = serde_json::from_value(body)?;
    if !response.errors.is_empty() {
        return Err(FetchError::Server(join_messages(&response.errors)));
    }
    let data = response
        .data
        .ok_or_else(|| FetchError::Decode("response has no data".to_string()))?;
    let user = data
        .user
        .ok_or_else(|| FetchError::Decode("no current user".to_string()))?;

    let values: BTreeMap<String, Value> = data.config.into_iter().map(|c| (c.id, c.value)).collect();

    Ok(AppContext::ready(
        Identity {
            user_id: user.id,
            is_admin: user.role == "admin",
        },
        ConfigValues::new(values),
    ))
}

/// Client for the on-call backend
pub struct ApiClient {
    http: Client,
    base_url: String,
    path_prefix: String,
}

impl ApiClient {
    /// Create a new client; the cookie store carries the session like a browser would
    pub fn new(config: &ClientConfig) -> Result<Self, FetchError> {
        let http = Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base_url: config.api_url(),
            path_prefix: config.path_prefix().to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, self.path_prefix, path)
    }

    async fn post_graphql(&self, query: &str, variables: Value) -> Result<Value, FetchError> {
        let response = self
            .http
            .post(self.url("/api/graphql"))
            .json(&GraphQlRequest { query, variables })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl ListSource for ApiClient {
    async fn fetch_page(&self, query: &ListQuery) -> Result<Page, FetchError> {
        tracing::debug!(cursor = ?query.cursor(), "fetching list page");
        let body = self.post_graphql(query.document(), query.variables()).await?;
        parse_page(body)
    }
}

#[async_trait]
impl RecordSink for ApiClient {
    async fn create(&self, mutation: &str, input: Value) -> Result<CreatedRecord, MutationError> {
        let body = self
            .post_graphql(mutation, json!({ "input": input }))
            .await?;
        parse_created(body)
    }
}

#[async_trait]
impl SessionSource for ApiClient {
    async fn fetch_context(&self) -> Result<AppContext, FetchError> {
        let body = self.post_graphql(SESSION_QUERY, json!({})).await?;
        parse_context(body)
    }
}

#[async_trait]
impl LogoutTransport for ApiClient {
    async fn end_session(&self) -> Result<(), FetchError> {
        let response = self
            .http
            .post(self.url("/api/v2/identity/logout"))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(())
    }
}
