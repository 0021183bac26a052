//! Domain errors rendered as GraphQL errors.
//!
//! Each error carries `{code, statusCode, timestamp, traceId?, details?}` in
//! its extensions so clients can branch on the same codes the HTTP adapter
//! uses.

use async_graphql::{ErrorExtensions, Value};
use chrono::Utc;
use tracing::error;

use crate::domain::{Error, ErrorCode};

/// Convert a domain error into a GraphQL error, redacting internal failures.
pub fn graphql_error(error: Error) -> async_graphql::Error {
    if error.code() == ErrorCode::InternalError {
        error!(message = error.message(), trace_id = error.trace_id(), "internal error");
    }
    let error = error.redacted();
    async_graphql::Error::new(error.message().to_owned()).extend_with(move |_, extensions| {
        extensions.set("code", error.code().as_str());
        extensions.set("statusCode", i32::from(error.code().http_status()));
        extensions.set("timestamp", Utc::now().to_rfc3339());
        if let Some(trace_id) = error.trace_id() {
            extensions.set("traceId", trace_id);
        }
        if let Some(details) = error.details().cloned() {
            if let Ok(details) = Value::from_json(details) {
                extensions.set("details", details);
            }
        }
    })
}

/// `?`-friendly conversion of domain results inside resolvers.
pub(crate) trait IntoGraphql<T> {
    fn into_graphql(self) -> async_graphql::Result<T>;
}

impl<T> IntoGraphql<T> for Result<T, Error> {
    fn into_graphql(self) -> async_graphql::Result<T> {
        self.map_err(graphql_error)
    }
}
