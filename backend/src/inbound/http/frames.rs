//! Frame HTTP handlers.
//!
//! ```text
//! GET|POST {base}/
//! POST     {base}/check[?cursor=]
//! GET|POST {base}/view-nfts?cursor=
//! ```
//!
//! Every handler answers with a frame document. Degraded lookups render as
//! frames; only a malformed cursor is reported as a JSON error.

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, route, web};
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use utoipa::IntoParams;

use super::ApiResult;
use super::cache_control::no_store_header;
use super::frame_html::render_document;
use super::payload::FrameActionPayload;
use super::state::HttpState;
use crate::domain::ports::{CheckRequest, GalleryRequest};
use crate::domain::{Error, FrameView, FrameViewError, GalleryCursor};

/// Optional cursor carried in button targets.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CursorQuery {
    /// Opaque gallery cursor.
    pub cursor: Option<String>,
}

fn frame_response(view: Result<FrameView, FrameViewError>, state: &HttpState) -> ApiResult<HttpResponse> {
    let view = view.map_err(|err| {
        error!(error = %err, "frame view could not be built");
        Error::internal(format!("frame view could not be built: {err}"))
    })?;
    Ok(HttpResponse::Ok()
        .insert_header(no_store_header())
        .content_type(ContentType::html())
        .body(render_document(&view, &state.links)))
}

fn decode_cursor(raw: &str) -> ApiResult<GalleryCursor> {
    GalleryCursor::decode(raw).map_err(|err| {
        Error::invalid_request("cursor is not valid").with_details(json!({
            "field": "cursor",
            "reason": err.to_string(),
        }))
    })
}

/// Landing frame.
#[utoipa::path(
    method(get, post),
    path = "/api/",
    tags = ["frames"],
    responses(
        (status = 200, description = "Initial frame document", content_type = "text/html", body = String)
    )
)]
#[route("/", method = "GET", method = "POST")]
pub async fn initial(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    frame_response(state.presenter.initial(), &state)
}

/// Ownership check for the presser, or for the cursor's owner when returning
/// from the gallery.
#[utoipa::path(
    post,
    path = "/api/check",
    tags = ["frames"],
    params(CursorQuery),
    request_body(content = FrameActionPayload, content_type = "application/json"),
    responses(
        (status = 200, description = "Result frame document", content_type = "text/html", body = String),
        (status = 400, description = "Malformed cursor", body = Error)
    )
)]
#[route("/check", method = "POST")]
pub async fn check(
    state: web::Data<HttpState>,
    query: web::Query<CursorQuery>,
    payload: Option<web::Json<FrameActionPayload>>,
) -> ApiResult<HttpResponse> {
    let request = match query.cursor.as_deref() {
        Some(raw) => {
            let cursor = decode_cursor(raw)?;
            CheckRequest {
                identity: None,
                verified_address: Some(cursor.owner),
            }
        }
        None => payload
            .map(|body| body.into_inner().check_request())
            .unwrap_or_default(),
    };

    let outcome = state.check.check(request).await;
    frame_response(state.presenter.result(&outcome), &state)
}

/// One page of the owner's tokens.
#[utoipa::path(
    method(get, post),
    path = "/api/view-nfts",
    tags = ["frames"],
    params(CursorQuery),
    responses(
        (status = 200, description = "Gallery frame document", content_type = "text/html", body = String),
        (status = 400, description = "Missing or malformed cursor", body = Error)
    )
)]
#[route("/view-nfts", method = "GET", method = "POST")]
pub async fn view_nfts(
    state: web::Data<HttpState>,
    query: web::Query<CursorQuery>,
) -> ApiResult<HttpResponse> {
    let raw = query.cursor.as_deref().ok_or_else(|| {
        Error::invalid_request("cursor is required").with_details(json!({ "field": "cursor" }))
    })?;
    let cursor = decode_cursor(raw)?;
    let outcome = state
        .check
        .gallery(GalleryRequest {
            owner: cursor.owner,
            page: cursor.page,
        })
        .await;
    frame_response(state.presenter.gallery(&outcome), &state)
}

/// Register the frame routes on a scope or app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(initial).service(check).service(view_nfts);
}

#[cfg(test)]
#[path = "frames_tests.rs"]
mod tests;
