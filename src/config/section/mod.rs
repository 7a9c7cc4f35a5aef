//! Configuration section definitions.
//!
//! Each module corresponds to a section in `manref.toml`:
//!
//! | Module     | TOML Section  | Purpose                                  |
//! |------------|---------------|------------------------------------------|
//! | `source`   | `[source]`    | Document root and recognised extensions  |
//! | `output`   | `[output]`    | Output directory, href extension         |
//! | `validate` | `[validate]`  | Failure reporting                        |

mod output;
mod source;
mod validate;

pub use output::OutputConfig;
pub use source::SourceConfig;
pub use validate::ValidateConfig;
