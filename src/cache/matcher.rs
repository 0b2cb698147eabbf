//! Key Matcher Module
//!
//! Selects which keys an invalidation removes: one exact key, or every key
//! matching a regular expression.

use std::fmt;

use regex::Regex;
use tracing::debug;

// == Key Pattern ==
/// A regular expression over cache keys that remembers its source text.
///
/// A source that fails to compile is kept as-is and matches no key.
#[derive(Debug, Clone)]
pub struct KeyPattern {
    source: String,
    regex: Option<Regex>,
}

impl KeyPattern {
    /// Compiles `source`. Never fails; an invalid expression matches nothing.
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let regex = match Regex::new(&source) {
            Ok(regex) => Some(regex),
            Err(err) => {
                debug!(pattern = %source, error = %err, "invalid key pattern, it will match no keys");
                None
            }
        };

        Self { source, regex }
    }

    /// The pattern text exactly as supplied.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns false if the source did not compile.
    pub fn is_valid(&self) -> bool {
        self.regex.is_some()
    }

    /// Tests a single key.
    pub fn is_match(&self, key: &str) -> bool {
        self.regex.as_ref().is_some_and(|regex| regex.is_match(key))
    }
}

impl From<Regex> for KeyPattern {
    fn from(regex: Regex) -> Self {
        Self {
            source: regex.as_str().to_string(),
            regex: Some(regex),
        }
    }
}

// == Key Matcher ==
/// Invalidation target.
#[derive(Debug, Clone)]
pub enum KeyMatcher {
    /// Exactly one key.
    Exact(String),
    /// Every key the pattern matches.
    Pattern(KeyPattern),
}

impl KeyMatcher {
    /// Builds a pattern matcher from regex source text.
    pub fn pattern(source: impl Into<String>) -> Self {
        KeyMatcher::Pattern(KeyPattern::new(source))
    }

    /// The key or pattern text passed to subscribers.
    pub fn as_str(&self) -> &str {
        match self {
            KeyMatcher::Exact(key) => key,
            KeyMatcher::Pattern(pattern) => pattern.as_str(),
        }
    }
}

impl fmt::Display for KeyMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for KeyMatcher {
    fn from(key: &str) -> Self {
        KeyMatcher::Exact(key.to_string())
    }
}

impl From<String> for KeyMatcher {
    fn from(key: String) -> Self {
        KeyMatcher::Exact(key)
    }
}

impl From<&String> for KeyMatcher {
    fn from(key: &String) -> Self {
        KeyMatcher::Exact(key.clone())
    }
}

impl From<KeyPattern> for KeyMatcher {
    fn from(pattern: KeyPattern) -> Self {
        KeyMatcher::Pattern(pattern)
    }
}

impl From<Regex> for KeyMatcher {
    fn from(regex: Regex) -> Self {
        KeyMatcher::Pattern(regex.into())
    }
}
