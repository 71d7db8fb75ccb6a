//! LIKE pattern matching.
//!
//! `%` matches any run of characters (including none) and `_` matches
//! exactly one character. Every other character matches itself, compared
//! case-insensitively, and the pattern must cover the whole string.

use regex::Regex;

/// A compiled LIKE pattern.
#[derive(Debug, Clone)]
pub struct LikePattern {
    source: String,
    regex: Regex,
}

impl LikePattern {
    /// Compiles `pattern` into an anchored, case-insensitive matcher.
    ///
    /// # Examples
    ///
    /// ```
    /// use rowql::LikePattern;
    ///
    /// let pattern = LikePattern::new("A_").unwrap();
    /// assert!(pattern.is_match("al"));
    /// assert!(!pattern.is_match("Ann"));
    /// ```
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let mut regex_pattern = String::with_capacity(pattern.len() + 8);
        regex_pattern.push_str("(?is)^");

        let mut buf = [0u8; 4];
        for ch in pattern.chars() {
            match ch {
                '%' => regex_pattern.push_str(".*"),
                '_' => regex_pattern.push('.'),
                c => regex_pattern.push_str(&regex::escape(c.encode_utf8(&mut buf))),
            }
        }
        regex_pattern.push('$');

        Ok(LikePattern {
            source: pattern.to_string(),
            regex: Regex::new(&regex_pattern)?,
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// The pattern as written
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl PartialEq for LikePattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// One-shot LIKE test.
pub fn like(text: &str, pattern: &str) -> Result<bool, regex::Error> {
    Ok(LikePattern::new(pattern)?.is_match(text))
}
