use crate::dependency_resolution::domain::ComponentId;
use crate::shared::error::ResolverError;

/// Maximum length of a single wildcard pattern to prevent DoS attacks
pub const MAX_PATTERN_LENGTH: usize = 255;

/// A component id pattern where `*` matches zero or more characters,
/// including `/`. Matching is anchored at both ends and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardPattern {
    original: String,
    matcher: PatternMatcher,
}

impl WildcardPattern {
    /// Validates and compiles a pattern string
    pub fn parse(pattern: &str) -> Result<Self, ResolverError> {
        validate_pattern(pattern)?;
        Ok(Self {
            original: pattern.to_string(),
            matcher: compile_pattern(pattern),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }

    pub fn has_wildcard(&self) -> bool {
        !matches!(self.matcher, PatternMatcher::Exact(_))
    }

    pub fn matches_str(&self, value: &str) -> bool {
        self.matcher.matches(value)
    }

    /// Matches the id without version, or its name without scope
    pub fn matches_id(&self, id: &ComponentId) -> bool {
        self.matches_str(&id.to_string_without_version()) || self.matches_str(id.name())
    }

    /// Number of `/` separated namespaces beyond the first
    pub fn namespace_count(&self) -> usize {
        self.original.matches('/').count()
    }

    pub fn wildcard_count(&self) -> usize {
        self.original.matches('*').count()
    }

    pub fn first_wildcard_index(&self) -> Option<usize> {
        self.original.find('*')
    }
}

/// Pattern matcher types for efficient matching
#[derive(Debug, Clone, PartialEq, Eq)]
enum PatternMatcher {
    /// No wildcard: "utils/is-string"
    Exact(String),
    /// Trailing wildcard: "utils/*"
    StartsWith(String),
    /// Leading wildcard: "*/is-string"
    EndsWith(String),
    /// Wildcards on both ends: "*string*"
    Contains(String),
    /// Any other combination, split on `*`; first and last parts are anchored
    Multiple(Vec<String>),
}

impl PatternMatcher {
    fn matches(&self, value: &str) -> bool {
        match self {
            PatternMatcher::Exact(s) => value == s,
            PatternMatcher::StartsWith(prefix) => value.starts_with(prefix.as_str()),
            PatternMatcher::EndsWith(suffix) => value.ends_with(suffix.as_str()),
            PatternMatcher::Contains(middle) => value.contains(middle.as_str()),
            PatternMatcher::Multiple(parts) => match_parts(parts, value),
        }
    }
}

fn match_parts(parts: &[String], value: &str) -> bool {
    let (first, rest) = match parts.split_first() {
        Some(split) => split,
        None => return true,
    };
    let (last, middle) = match rest.split_last() {
        Some(split) => split,
        None => return value == first,
    };
    if !value.starts_with(first.as_str()) {
        return false;
    }
    if value.len() < first.len() + last.len() || !value.ends_with(last.as_str()) {
        return false;
    }
    let inner = &value[first.len()..value.len() - last.len()];
    let mut current_pos = 0;
    for part in middle.iter().filter(|p| !p.is_empty()) {
        match inner[current_pos..].find(part.as_str()) {
            Some(pos) => current_pos += pos + part.len(),
            None => return false,
        }
    }
    true
}

fn validate_pattern(pattern: &str) -> Result<(), ResolverError> {
    let invalid = |reason: String| ResolverError::InvalidOverrides {
        rule: pattern.chars().take(64).collect(),
        reason,
    };
    if pattern.trim().is_empty() {
        return Err(invalid("pattern cannot be empty".to_string()));
    }
    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(invalid(format!(
            "pattern is too long ({} chars). Maximum: {} chars",
            pattern.len(),
            MAX_PATTERN_LENGTH
        )));
    }
    if let Some(ch) = pattern.chars().find(|c| c.is_control() || c.is_whitespace()) {
        return Err(invalid(format!(
            "pattern contains invalid character {:?}",
            ch
        )));
    }
    Ok(())
}

fn compile_pattern(pattern: &str) -> PatternMatcher {
    let wildcard_count = pattern.matches('*').count();
    if wildcard_count == 0 {
        return PatternMatcher::Exact(pattern.to_string());
    }
    let starts = pattern.starts_with('*');
    let ends = pattern.ends_with('*');
    if wildcard_count == 1 && ends {
        return PatternMatcher::StartsWith(pattern.trim_end_matches('*').to_string());
    }
    if wildcard_count == 1 && starts {
        return PatternMatcher::EndsWith(pattern.trim_start_matches('*').to_string());
    }
    if wildcard_count == 2 && starts && ends {
        return PatternMatcher::Contains(pattern.trim_matches('*').to_string());
    }
    PatternMatcher::Multiple(pattern.split('*').map(String::from).collect())
}
