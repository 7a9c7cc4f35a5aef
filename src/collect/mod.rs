//! Early-pass collectors.
//!
//! Both collectors walk a rendered tree exactly once and never mutate it.

mod anchors;
mod references;

pub use anchors::collect_anchors;
pub use references::{collect_references, is_local_target};
