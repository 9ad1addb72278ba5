//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` and depend only on the
//! [`OwnershipCheck`] driving port and the pure presenter, so they are
//! testable without any outbound I/O.

use std::sync::Arc;

use crate::domain::FramePresenter;
use crate::domain::ports::OwnershipCheck;

use super::frame_html::FrameLinks;

/// Dependency bundle for frame handlers.
#[derive(Clone)]
pub struct HttpState {
    pub check: Arc<dyn OwnershipCheck>,
    pub presenter: Arc<FramePresenter>,
    pub links: FrameLinks,
}

impl HttpState {
    pub fn new(check: Arc<dyn OwnershipCheck>, presenter: FramePresenter, links: FrameLinks) -> Self {
        Self {
            check,
            presenter: Arc::new(presenter),
            links,
        }
    }
}
