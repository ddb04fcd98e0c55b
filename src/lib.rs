//! Notion post sync library.
//!
//! Turns collected social posts into Notion database pages and reads page
//! block trees back into flat text, which is also used to anchor comments
//! on names inside a page.

pub mod config;
pub mod constants;
pub mod notion;
pub mod post;
pub mod registry;
pub mod source;
