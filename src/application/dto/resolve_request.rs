use crate::ports::outbound::ComponentSnapshot;
use crate::shared::error::ResolverError;
use crate::shared::Result;

/// Components resolved at once when the caller does not say otherwise
pub const DEFAULT_CONCURRENCY: usize = 8;

/// ResolveRequest - Internal request DTO for the dependency resolution use case
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    /// Components to resolve, each with its raw dependency tree
    pub components: Vec<ComponentSnapshot>,
    /// Only components matching one of these patterns are resolved;
    /// empty means all components
    pub component_patterns: Vec<String>,
    /// Maximum number of components resolved concurrently
    pub concurrency: usize,
}

impl ResolveRequest {
    pub fn new(components: Vec<ComponentSnapshot>) -> Self {
        Self {
            components,
            component_patterns: Vec::new(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_component_patterns(mut self, patterns: Vec<String>) -> Self {
        self.component_patterns = patterns;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Checks the request before any component is resolved
    ///
    /// # Errors
    /// Returns `ResolverError::Validation` for a zero concurrency or an empty
    /// component pattern
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(ResolverError::Validation {
                message: "concurrency must be at least 1".to_string(),
            }
            .into());
        }
        if self.component_patterns.iter().any(|p| p.trim().is_empty()) {
            return Err(ResolverError::Validation {
                message: "component patterns must not be empty".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = ResolveRequest::new(Vec::new());
        assert_eq!(request.concurrency, DEFAULT_CONCURRENCY);
        assert!(request.component_patterns.is_empty());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let err = ResolveRequest::new(Vec::new())
            .with_concurrency(0)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("concurrency"));
    }

    #[test]
    fn test_blank_pattern_is_rejected() {
        let err = ResolveRequest::new(Vec::new())
            .with_component_patterns(vec!["my.scope/*".to_string(), "  ".to_string()])
            .validate()
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ResolverError>(),
            Some(ResolverError::Validation { .. })
        ));
    }
}
