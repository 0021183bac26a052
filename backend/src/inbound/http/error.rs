//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into consistent JSON responses of the
//! shape `{code, message, statusCode, timestamp, path?, traceId?, details?}`.

use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::error;

use crate::domain::{Error, ErrorCode};
use crate::middleware::TRACE_ID_HEADER;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
    code: &'static str,
    message: &'a str,
    status_code: u16,
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a Value>,
}

fn status_for(code: ErrorCode) -> StatusCode {
    StatusCode::from_u16(code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Render `error` as JSON, optionally naming the request path.
pub fn error_response(error: &Error, path: Option<&str>) -> HttpResponse {
    if error.code() == ErrorCode::InternalError {
        error!(message = error.message(), trace_id = error.trace_id(), "internal error");
    }
    let error = error.redacted();
    let status = status_for(error.code());
    let mut builder = HttpResponse::build(status);
    if let Some(id) = error.trace_id() {
        builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
    }
    builder.json(ErrorBody {
        code: error.code().as_str(),
        message: error.message(),
        status_code: status.as_u16(),
        timestamp: Utc::now().to_rfc3339(),
        path,
        trace_id: error.trace_id(),
        details: error.details(),
    })
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        error_response(self, None)
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

/// Fallback for unmatched routes.
pub async fn route_not_found(req: HttpRequest) -> HttpResponse {
    error_response(
        &Error::not_found(format!("Cannot {} {}", req.method(), req.path())),
        Some(req.path()),
    )
}
