//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error HTTP-agnostic while turning failures into JSON
//! bodies with consistent status codes. Internal messages are redacted and
//! error bodies are never cached.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use super::cache_control::no_store_header;
use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

const REDACTED_MESSAGE: &str = "Internal server error";

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Body sent to clients: internal failures keep only their trace id.
fn client_body(error: &Error) -> Error {
    match (error.code(), error.trace_id()) {
        (ErrorCode::InternalError, Some(id)) => {
            Error::new(ErrorCode::InternalError, REDACTED_MESSAGE).with_trace_id(id)
        }
        (ErrorCode::InternalError, None) => Error::new(ErrorCode::InternalError, REDACTED_MESSAGE),
        _ => error.clone(),
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        response.insert_header(no_store_header());
        if let Some(id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, id));
        }
        response.json(client_body(self))
    }
}
