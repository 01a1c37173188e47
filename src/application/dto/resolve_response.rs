use crate::dependency_resolution::domain::{
    ComponentId, DebugDependencies, DependenciesData, ExtensionEntry,
};
use serde::Serialize;

/// Resolution result of one component
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentResolution {
    pub id: ComponentId,
    #[serde(flatten)]
    pub data: DependenciesData,
    /// Extensions with their versions resolved
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<ExtensionEntry>,
    pub debug: DebugDependencies,
}

impl ComponentResolution {
    pub fn issue_count(&self) -> usize {
        self.data.issues.count()
    }
}

/// ResolveResponse - Internal response DTO from the dependency resolution use case
///
/// Results keep the order of the components in the request.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveResponse {
    pub results: Vec<ComponentResolution>,
    /// Sum of issue kinds over all components
    pub total_issues: usize,
}

impl ResolveResponse {
    pub fn new(results: Vec<ComponentResolution>) -> Self {
        let total_issues = results.iter().map(ComponentResolution::issue_count).sum();
        Self {
            results,
            total_issues,
        }
    }

    pub fn has_issues(&self) -> bool {
        self.total_issues > 0
    }

    pub fn components_with_issues(&self) -> impl Iterator<Item = &ComponentResolution> {
        self.results.iter().filter(|r| r.data.has_issues())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolution(id: &str, parse_error: Option<&str>) -> ComponentResolution {
        let mut data = DependenciesData::default();
        if let Some(file) = parse_error {
            data.issues
                .parse_errors
                .insert(file.to_string(), "Unexpected token".to_string());
        }
        ComponentResolution {
            id: id.parse().unwrap(),
            data,
            extensions: Vec::new(),
            debug: DebugDependencies::default(),
        }
    }

    #[test]
    fn test_total_issues_counts_all_components() {
        let response = ResolveResponse::new(vec![
            resolution("my.scope/button", Some("index.ts")),
            resolution("my.scope/card", None),
        ]);

        assert!(response.has_issues());
        assert_eq!(response.total_issues, 1);
        let with_issues: Vec<String> = response
            .components_with_issues()
            .map(|r| r.id.to_string())
            .collect();
        assert_eq!(with_issues, vec!["my.scope/button"]);
    }

    #[test]
    fn test_serialized_shape_flattens_dependencies_data() {
        let response = ResolveResponse::new(vec![resolution("my.scope/card@0.0.1", None)]);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["totalIssues"], 0);
        let first = &json["results"][0];
        assert_eq!(first["id"], "my.scope/card@0.0.1");
        assert!(first.get("packageDependencies").is_some());
        assert!(first.get("debug").is_some());
        assert!(first.get("extensions").is_none());
    }
}
