//! Path and link utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`fs`]: Filesystem path normalization (`normalize_path`, `resolve_path`, `relative_id_path`)
//! - [`route`]: Link utilities (`is_external_link`, `split_path_fragment`)

pub mod fs;
pub mod route;

pub use fs::{normalize_path, relative_id_path, resolve_path};
