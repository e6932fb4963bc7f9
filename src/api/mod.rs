//! Backend access: capability traits and the HTTP client implementing them

mod client;
mod traits;

pub use client::{parse_context, parse_created, parse_page, ApiClient};
pub use traits::{ListSource, LogoutTransport, RecordSink, SessionSource};

#[cfg(test)]
pub use traits::{MockListSource, MockLogoutTransport, MockRecordSink, MockSessionSource};
