//! Shared utility functions.
//!
//! - `html`: HTML escaping for safe rendering
//! - `format`: Display shortening for progress labels

mod format;
mod html;

pub use format::truncate_url;
pub use html::html_escape;
