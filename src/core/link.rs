//! Link classification utilities.

use crate::utils::path::route::is_external_link;

/// Syntactic classification of hyperlink targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind<'a> {
    /// External link with URL scheme (https://, mailto:, etc.) or `//host`.
    External(&'a str),
    /// Pure fragment link into the current document. Value is anchor without `#`.
    Fragment(&'a str),
    /// Link to another document (or `/self.md#x`), optionally with a fragment.
    Document(&'a str),
}

impl<'a> LinkKind<'a> {
    /// Parse a link string into its syntactic kind.
    #[inline]
    pub fn parse(link: &'a str) -> Self {
        if is_external_link(link) || link.starts_with("//") {
            Self::External(link)
        } else if let Some(anchor) = link.strip_prefix('#') {
            Self::Fragment(anchor)
        } else {
            Self::Document(link)
        }
    }

    /// Whether the link is handled by the cross-reference resolver.
    #[inline]
    pub fn is_local(&self) -> bool {
        !matches!(self, Self::External(_))
    }
}
