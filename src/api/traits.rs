//! Backend capabilities consumed by the list and form cores
//!
//! Each trait is a narrow seam so tests can swap in mocks and the cores never
//! depend on a concrete transport.

use crate::error::{FetchError, MutationError};
use crate::state::{AppContext, CreatedRecord, ListQuery, Page};
use async_trait::async_trait;
use serde_json::Value;

/// Paged list queries
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListSource: Send + Sync {
    /// Fetch one page for `query`
    async fn fetch_page(&self, query: &ListQuery) -> Result<Page, FetchError>;
}

/// Create mutations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Run `mutation` with `input` and return the created record
    async fn create(&self, mutation: &str, input: Value) -> Result<CreatedRecord, MutationError>;
}

/// Session identity and configuration values
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionSource: Send + Sync {
    async fn fetch_context(&self) -> Result<AppContext, FetchError>;
}

/// Server-side session termination
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LogoutTransport: Send + Sync {
    /// End the current session on the server
    async fn end_session(&self) -> Result<(), FetchError>;
}
