//! Social-graph identity resolution over GraphQL.

mod dto;
mod http_source;

pub use http_source::AirstackIdentityResolver;
