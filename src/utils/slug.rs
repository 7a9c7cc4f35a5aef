//! Heading slugification.
//!
//! Converts heading text to anchor-safe identifiers.

use deunicode::deunicode;
use rustc_hash::FxHashMap;

/// Fallback for headings whose slug comes out empty.
const EMPTY_SLUG: &str = "section";

/// Convert heading text to an anchor id.
///
/// Unicode is transliterated to ASCII, then lowercased; runs of anything
/// that is not alphanumeric (or `_`) collapse into a single `-`.
///
/// # Examples
///
/// - `"Using Hooks"` -> `"using-hooks"`
/// - `"Größe & Maße"` -> `"grosse-masse"`
/// - `"???"` -> `"section"`
pub fn slugify_fragment(text: &str) -> String {
    let ascii = deunicode(text);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        EMPTY_SLUG.to_string()
    } else {
        slug
    }
}

/// Hands out document-unique slugs: `usage`, `usage-1`, `usage-2`, ...
#[derive(Debug, Default)]
pub struct SlugAllocator {
    seen: FxHashMap<String, usize>,
}

impl SlugAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve an id that was given explicitly so later slugs avoid it.
    pub fn reserve(&mut self, id: &str) {
        self.seen.entry(id.to_string()).or_insert(0);
    }

    /// Slugify `text` and make it unique within this allocator.
    pub fn allocate(&mut self, text: &str) -> String {
        let base = slugify_fragment(text);
        let Some(count) = self.seen.get(&base).copied() else {
            self.seen.insert(base.clone(), 0);
            return base;
        };

        let mut n = count + 1;
        loop {
            let candidate = format!("{base}-{n}");
            if !self.seen.contains_key(&candidate) {
                self.seen.insert(base, n);
                self.seen.insert(candidate.clone(), 0);
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify_fragment("Using Hooks"), "using-hooks");
        assert_eq!(slugify_fragment("  API -- Reference!  "), "api-reference");
        assert_eq!(slugify_fragment("snake_case name"), "snake_case-name");
    }

    #[test]
    fn test_slugify_transliterates() {
        assert_eq!(slugify_fragment("Größe"), "grosse");
        assert_eq!(slugify_fragment("Café au lait"), "cafe-au-lait");
    }

    #[test]
    fn test_slugify_empty_falls_back() {
        assert_eq!(slugify_fragment(""), "section");
        assert_eq!(slugify_fragment("???"), "section");
    }

    #[test]
    fn test_allocator_dedups() {
        let mut slugs = SlugAllocator::new();
        assert_eq!(slugs.allocate("Usage"), "usage");
        assert_eq!(slugs.allocate("Usage"), "usage-1");
        assert_eq!(slugs.allocate("usage!"), "usage-2");
        assert_eq!(slugs.allocate("Other"), "other");
    }

    #[test]
    fn test_allocator_skips_reserved() {
        let mut slugs = SlugAllocator::new();
        slugs.reserve("usage-1");
        assert_eq!(slugs.allocate("Usage"), "usage");
        assert_eq!(slugs.allocate("Usage"), "usage-2");

        slugs.reserve("install");
        assert_eq!(slugs.allocate("Install"), "install-1");
    }
}
