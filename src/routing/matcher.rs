//! Route matching module
//!
//! Implements exact and prefix path matching for the route table.

/// Path rule of a single route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRule {
    /// Matches only this exact path
    Exact(&'static str),
    /// Matches this path and everything below it, the pattern ends with '/'
    Prefix(&'static str),
}

impl PathRule {
    /// Check if a path matches this rule
    pub fn matches(self, path: &str) -> bool {
        match self {
            Self::Exact(exact) => path == exact,
            Self::Prefix(prefix) => path.starts_with(prefix),
        }
    }

    /// Length of the pattern, longer patterns are more specific
    pub const fn specificity(self) -> usize {
        match self {
            Self::Exact(p) | Self::Prefix(p) => p.len(),
        }
    }

    /// Path remaining after the pattern for prefix rules
    pub fn remainder(self, path: &str) -> &str {
        match self {
            Self::Exact(_) => "",
            Self::Prefix(prefix) => path.strip_prefix(prefix).unwrap_or(""),
        }
    }

    pub const fn is_exact(self) -> bool {
        matches!(self, Self::Exact(_))
    }

    /// True if `path` is this prefix without its trailing slash,
    /// e.g. "/timeout" for the "/timeout/" subtree
    pub fn is_bare_subtree(self, path: &str) -> bool {
        match self {
            Self::Exact(_) => false,
            Self::Prefix(prefix) => {
                prefix.len() > 1 && prefix.strip_suffix('/') == Some(path)
            }
        }
    }
}
