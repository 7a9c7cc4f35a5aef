//! `[validate]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [validate]
//! keep_going = false   # `check` lists every dangling reference before failing
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidateConfig {
    /// Report every dangling reference instead of stopping at the first.
    pub keep_going: bool,
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_keep_going() {
        assert!(!test_parse_config("").validate.keep_going);
        assert!(test_parse_config("[validate]\nkeep_going = true").validate.keep_going);
    }
}
