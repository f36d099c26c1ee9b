//! Name patterns
//!
//! Compiles user supplied filter expressions into reusable matchers.
//! Matching uses search semantics: a pattern hits if it matches anywhere in
//! the name, so `J` matches `"Jane"` and `"Ojai"` alike. Anchor with `^`/`$`
//! for whole-name matches.

use regex::{Regex, RegexBuilder};

/// Default cap on the compiled size of a pattern (1 MiB)
pub const DEFAULT_SIZE_LIMIT: usize = 1 << 20;

/// A filter expression could not be compiled
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid regular expression: {message}")]
pub struct PatternError {
    /// The rejected pattern, as supplied
    pub pattern: String,
    /// Diagnostic from the regex engine
    pub message: String,
}

impl PatternError {
    fn from_regex(pattern: &str, err: regex::Error) -> Self {
        Self {
            pattern: pattern.to_string(),
            message: err.to_string(),
        }
    }
}

/// Compiles filter expressions.
///
/// Holds compile options only; compiling has no side effects.
#[derive(Debug, Clone, Copy)]
pub struct PatternCompiler {
    size_limit: usize,
}

impl PatternCompiler {
    pub fn new(size_limit: usize) -> Self {
        Self { size_limit }
    }

    /// Compile a pattern, failing fast on invalid syntax or oversized programs
    pub fn compile(&self, pattern: &str) -> Result<NameMatcher, PatternError> {
        let regex = RegexBuilder::new(pattern)
            .size_limit(self.size_limit)
            .build()
            .map_err(|e| PatternError::from_regex(pattern, e))?;

        Ok(NameMatcher { regex })
    }
}

impl Default for PatternCompiler {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE_LIMIT)
    }
}

/// A compiled name pattern
#[derive(Debug, Clone)]
pub struct NameMatcher {
    regex: Regex,
}

impl NameMatcher {
    /// True if the pattern matches anywhere within `name`
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_valid_pattern() {
        let matcher = PatternCompiler::default().compile("^J.*").unwrap();
        assert!(matcher.matches("Jane"));
        assert!(!matcher.matches("Bob"));
    }

    #[test]
    fn test_compile_unbalanced_class_fails() {
        let err = PatternCompiler::default().compile("[").unwrap_err();
        assert_eq!(err.pattern, "[");
        assert!(!err.message.is_empty());
        assert!(err.to_string().starts_with("invalid regular expression: "));
    }

    #[test]
    fn test_compile_unbalanced_group_fails() {
        assert!(PatternCompiler::default().compile("(abc").is_err());
    }

    #[test]
    fn test_size_limit_enforced() {
        let tiny = PatternCompiler::new(64);
        assert!(tiny.compile(r"\w{500}").is_err());
        assert!(PatternCompiler::default().compile(r"\w{5}").is_ok());
    }

    #[test]
    fn test_matches_anywhere_in_name() {
        let matcher = PatternCompiler::default().compile("an").unwrap();
        assert!(matcher.matches("Jane"));
        assert!(matcher.matches("Dan"));
        assert!(!matcher.matches("Bob"));
    }

    #[test]
    fn test_anchored_pattern() {
        let matcher = PatternCompiler::default().compile("^J.*").unwrap();
        assert!(matcher.matches("Jane"));
        assert!(matcher.matches("Jack"));
        assert!(!matcher.matches("Bob"));
        assert!(!matcher.matches("Ojai"));
    }
}
