//! Page window arithmetic and opaque cursor primitives.
//!
//! Galleries render a fixed-size slice of an owned-token list. This crate
//! owns the arithmetic for that slice (how many pages exist, which indices
//! are visible, whether Previous/Next should be offered) and the opaque
//! cursor encoding used to carry the requested page through frame button
//! targets.
//!
//! Two cursor movement policies are supported:
//!
//! - [`PaginationPolicy::Clamp`] keeps the page index inside `[0, last]` and
//!   hides navigation at the boundaries.
//! - [`PaginationPolicy::Wrap`] maps the page index modulo the page count so
//!   navigation is circular.
//!
//! # Examples
//!
//! ```
//! use pagination::{PageSize, PaginationPolicy, window};
//!
//! let size = PageSize::new(2).expect("non-zero page size");
//! let page = window(5, size, 2, PaginationPolicy::Clamp);
//! assert_eq!(page.page(), 2);
//! assert_eq!(page.page_count(), 3);
//! assert_eq!(page.range(), 4..5);
//! assert!(page.has_previous());
//! assert!(!page.has_next());
//! ```

mod cursor;
mod window;

pub use cursor::{Cursor, CursorError};
pub use window::{
    PageSize, PageSizeError, PageWindow, PaginationPolicy, ParsePolicyError, page_count, window,
};
