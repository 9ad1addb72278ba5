//! Cache-control policy for frame responses.

/// Frames reflect live ownership and must never be reused.
pub const NO_STORE: &str = "no-store";

/// The standard cache-control header tuple for frame and probe responses.
pub const fn no_store_header() -> (&'static str, &'static str) {
    ("Cache-Control", NO_STORE)
}
