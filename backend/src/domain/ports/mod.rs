//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod identity_resolver;
mod lookup_metrics;
mod ownership_check;
mod ownership_source;
mod token_metadata_source;

#[cfg(test)]
pub use identity_resolver::MockIdentityResolver;
pub use identity_resolver::{
    FixtureIdentityResolver, IdentityResolver, IdentityResolverError, StaticIdentityResolver,
};
#[cfg(test)]
pub use lookup_metrics::MockLookupMetrics;
pub use lookup_metrics::{
    LookupMetrics, LookupMetricsError, LookupOutcome, LookupStage, LookupStatus,
    NoOpLookupMetrics,
};
pub(crate) use lookup_metrics::record_lookup;
#[cfg(test)]
pub use ownership_check::MockOwnershipCheck;
pub use ownership_check::{
    CheckOutcome, CheckRequest, FixtureOwnershipCheck, GalleryOutcome, GalleryPage,
    GalleryRequest, OwnershipCheck,
};
#[cfg(test)]
pub use ownership_source::MockOwnershipSource;
pub use ownership_source::{
    FixtureOwnershipSource, OwnershipSource, OwnershipSourceError, OwnershipSourceKind,
    StaticOwnershipSource,
};
#[cfg(test)]
pub use token_metadata_source::MockTokenMetadataSource;
pub use token_metadata_source::{
    FixtureTokenMetadataSource, TokenMetadataSource, TokenMetadataSourceError,
};
