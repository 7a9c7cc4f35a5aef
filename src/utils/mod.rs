//! Shared helpers: paths, slugs, and message formatting.

pub mod path;
pub mod plural;
pub mod slug;
