//! Collection ownership frames.
//!
//! A social client posts frame button presses to this service. Each press
//! resolves the presser's identity to a wallet, asks an ownership provider
//! which tokens of the configured collection that wallet holds, and answers
//! with a new frame showing the result or a page of the owned tokens.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
