use crate::shared::error::ResolverError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length of a component id string (security limit)
const MAX_ID_LENGTH: usize = 512;

/// Identity of a component: optional scope, name and optional version.
///
/// The string form is `scope/name@version`. When parsing, the first path
/// segment is taken as the scope only if it contains a `.`, which is how
/// remote scopes are named (`owner.scope`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ComponentId {
    scope: Option<String>,
    name: String,
    version: Option<String>,
}

impl ComponentId {
    pub fn new(
        scope: Option<String>,
        name: impl Into<String>,
        version: Option<String>,
    ) -> Result<Self, ResolverError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ResolverError::InvalidComponentId {
                value: name,
                reason: "name cannot be empty".to_string(),
            });
        }
        if name.contains('@') {
            return Err(ResolverError::InvalidComponentId {
                value: name,
                reason: "name cannot contain '@'".to_string(),
            });
        }
        Ok(Self {
            scope: scope.filter(|s| !s.is_empty()),
            name,
            version: version.filter(|v| !v.is_empty()),
        })
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn has_version(&self) -> bool {
        self.version.is_some()
    }

    /// `scope/name`, or just `name` when there is no scope
    pub fn to_string_without_version(&self) -> String {
        match &self.scope {
            Some(scope) => format!("{}/{}", scope, self.name),
            None => self.name.clone(),
        }
    }

    /// Returns a copy of this id carrying `version`
    pub fn change_version(&self, version: impl Into<String>) -> Self {
        let version = version.into();
        Self {
            scope: self.scope.clone(),
            name: self.name.clone(),
            version: if version.is_empty() {
                None
            } else {
                Some(version)
            },
        }
    }

    pub fn without_version(&self) -> Self {
        Self {
            scope: self.scope.clone(),
            name: self.name.clone(),
            version: None,
        }
    }

    pub fn is_equal_without_version(&self, other: &ComponentId) -> bool {
        self.scope == other.scope && self.name == other.name
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}@{}", self.to_string_without_version(), version),
            None => write!(f, "{}", self.to_string_without_version()),
        }
    }
}

impl FromStr for ComponentId {
    type Err = ResolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() > MAX_ID_LENGTH {
            return Err(ResolverError::InvalidComponentId {
                value: s.chars().take(32).collect(),
                reason: format!("id is longer than {} bytes", MAX_ID_LENGTH),
            });
        }
        let (without_version, version) = match s.rsplit_once('@') {
            Some((rest, version)) if !rest.is_empty() => (rest, Some(version.to_string())),
            _ => (s, None),
        };
        let (scope, name) = match without_version.split_once('/') {
            Some((first, rest)) if first.contains('.') => (Some(first.to_string()), rest),
            _ => (None, without_version),
        };
        ComponentId::new(scope, name, version)
    }
}

impl TryFrom<String> for ComponentId {
    type Error = ResolverError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ComponentId> for String {
    fn from(id: ComponentId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_scope_and_version() {
        let id: ComponentId = "teambit.design/ui/button@1.2.0".parse().unwrap();
        assert_eq!(id.scope(), Some("teambit.design"));
        assert_eq!(id.name(), "ui/button");
        assert_eq!(id.version(), Some("1.2.0"));
        assert_eq!(id.to_string(), "teambit.design/ui/button@1.2.0");
    }

    #[test]
    fn test_parse_without_scope() {
        let id: ComponentId = "utils/string/pad".parse().unwrap();
        assert_eq!(id.scope(), None);
        assert_eq!(id.name(), "utils/string/pad");
        assert!(!id.has_version());
    }

    #[test]
    fn test_parse_empty_name_fails() {
        assert!("".parse::<ComponentId>().is_err());
        assert!("my.scope/".parse::<ComponentId>().is_err());
    }

    #[test]
    fn test_change_version() {
        let id: ComponentId = "my.scope/button".parse().unwrap();
        let versioned = id.change_version("0.0.3");
        assert_eq!(versioned.to_string(), "my.scope/button@0.0.3");
        assert!(versioned.is_equal_without_version(&id));
        assert_ne!(versioned, id);
    }

    #[test]
    fn test_serde_as_string() {
        let id: ComponentId = "my.scope/button@1.0.0".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"my.scope/button@1.0.0\"");
        let back: ComponentId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
