//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] lists the frame routes and the health probes. Frame routes
//! answer with HTML documents; only malformed cursors produce the JSON
//! [`Error`](crate::domain::Error) body. The document is served by Swagger UI
//! in debug builds and exported via `cargo run --bin openapi-dump`.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::payload::{FrameActionPayload, TrustedData, UntrustedData};

/// OpenAPI document for the frame server.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "NFT ownership frames",
        description = "Frame endpoints answering collection ownership checks, plus health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::frames::initial,
        crate::inbound::http::frames::check,
        crate::inbound::http::frames::view_nfts,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(FrameActionPayload, UntrustedData, TrustedData, Error, ErrorCode)),
    tags(
        (name = "frames", description = "Frame documents for ownership checks"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn schema_fields(name: &str) -> Vec<String> {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get(name) {
            Some(RefOr::T(Schema::Object(obj))) => obj.properties.keys().cloned().collect(),
            _ => panic!("expected object schema for {name}"),
        }
    }

    #[test]
    fn lists_frame_and_health_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/api/", "/api/check", "/api/view-nfts", "/health/ready", "/health/live"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn payload_schema_uses_wire_names() {
        let fields = schema_fields("FrameActionPayload");
        assert!(fields.contains(&"untrustedData".to_owned()));
        assert!(fields.contains(&"trustedData".to_owned()));
    }

    #[test]
    fn error_schema_has_code_and_message() {
        let fields = schema_fields("Error");
        assert!(fields.contains(&"code".to_owned()));
        assert!(fields.contains(&"message".to_owned()));
    }
}
