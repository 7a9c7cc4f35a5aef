//! Core types - pure abstractions shared across the codebase.

mod error;
mod id;
mod link;
mod reference;

pub use error::XrefError;
pub use id::DocumentId;
pub use link::LinkKind;
pub use reference::{Reference, normalize};

/// Anchor identifier inside one document.
pub type Anchor = String;
