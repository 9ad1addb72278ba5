//! HTTP inbound adapter serving frame documents.

pub mod cache_control;
pub mod error;
pub mod frame_html;
pub mod frames;
pub mod health;
pub mod payload;
pub mod state;

pub use error::ApiResult;
pub use frame_html::FrameLinks;
pub use state::HttpState;
