//! Page window computation.

use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of items shown on one page. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct PageSize(usize);

/// Validation errors raised when constructing a [`PageSize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageSizeError {
    /// A page must hold at least one item.
    #[error("page size must be at least 1")]
    Zero,
}

impl PageSize {
    /// Validate and wrap a page size.
    ///
    /// # Errors
    ///
    /// Returns [`PageSizeError::Zero`] when `size` is zero.
    pub const fn new(size: usize) -> Result<Self, PageSizeError> {
        if size == 0 {
            Err(PageSizeError::Zero)
        } else {
            Ok(Self(size))
        }
    }

    /// Return the raw size.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl TryFrom<usize> for PageSize {
    type Error = PageSizeError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageSize> for usize {
    fn from(value: PageSize) -> Self {
        value.0
    }
}

/// How a requested page index outside `[0, last]` is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaginationPolicy {
    /// Clamp into range and hide navigation at the first and last page.
    #[default]
    Clamp,
    /// Map the index modulo the page count; navigation wraps around.
    Wrap,
}

/// Error raised when parsing an unknown policy name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown pagination policy '{0}'; expected clamp|wrap")]
pub struct ParsePolicyError(pub String);

impl FromStr for PaginationPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clamp" => Ok(Self::Clamp),
            "wrap" | "circular" => Ok(Self::Wrap),
            _ => Err(ParsePolicyError(s.to_owned())),
        }
    }
}

/// Number of pages needed to show `total` items, `ceil(total / size)`.
///
/// # Examples
///
/// ```
/// use pagination::{PageSize, page_count};
///
/// let size = PageSize::new(4).expect("non-zero page size");
/// assert_eq!(page_count(0, size), 0);
/// assert_eq!(page_count(4, size), 1);
/// assert_eq!(page_count(5, size), 2);
/// ```
#[must_use]
pub const fn page_count(total: usize, size: PageSize) -> usize {
    total.div_ceil(size.get())
}

/// Visible slice of a paginated list together with its navigation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    page: usize,
    page_count: usize,
    start: usize,
    end: usize,
    previous: Option<usize>,
    next: Option<usize>,
}

impl PageWindow {
    /// Zero-based index of the page being shown.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Total number of pages. Zero when the list is empty.
    #[must_use]
    pub const fn page_count(&self) -> usize {
        self.page_count
    }

    /// Item index range covered by this page, `[page*size, page*size+size)`
    /// truncated to the list length.
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Number of items shown on this page.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the page shows nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Page index targeted by a Previous action, if one is offered.
    #[must_use]
    pub const fn previous(&self) -> Option<usize> {
        self.previous
    }

    /// Page index targeted by a Next action, if one is offered.
    #[must_use]
    pub const fn next(&self) -> Option<usize> {
        self.next
    }

    /// Whether a Previous action should be offered.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Whether a Next action should be offered.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Borrow the items visible on this page.
    ///
    /// Returns an empty slice when `items` is shorter than the window assumes.
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        items.get(self.range()).unwrap_or(&[])
    }
}

/// Compute the window for `requested` over a list of `total` items.
#[must_use]
pub fn window(
    total: usize,
    size: PageSize,
    requested: usize,
    policy: PaginationPolicy,
) -> PageWindow {
    let pages = page_count(total, size);
    let Some(last) = pages.checked_sub(1) else {
        return PageWindow {
            page: 0,
            page_count: 0,
            start: 0,
            end: 0,
            previous: None,
            next: None,
        };
    };

    let (page, previous, next) = match policy {
        PaginationPolicy::Clamp => {
            let page = requested.min(last);
            let previous = page.checked_sub(1);
            let next = (page < last).then(|| page.saturating_add(1));
            (page, previous, next)
        }
        PaginationPolicy::Wrap => {
            let page = requested.checked_rem(pages).unwrap_or(0);
            if pages == 1 {
                (page, None, None)
            } else {
                let previous = page.checked_sub(1).unwrap_or(last);
                let next = if page == last {
                    0
                } else {
                    page.saturating_add(1)
                };
                (page, Some(previous), Some(next))
            }
        }
    };

    let start = page.saturating_mul(size.get());
    let end = start.saturating_add(size.get()).min(total);
    PageWindow {
        page,
        page_count: pages,
        start,
        end,
        previous,
        next,
    }
}
