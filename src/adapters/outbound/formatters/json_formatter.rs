use crate::application::dto::ResolveResponse;
use crate::ports::outbound::ResolutionFormatter;
use crate::shared::Result;
use anyhow::Context;

/// JsonFormatter adapter writing the resolution results as pretty JSON
///
/// Each entry carries the component id, the dependencies data in its
/// persisted shape, the resolved extensions and the debug trace.
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionFormatter for JsonFormatter {
    fn format(&self, response: &ResolveResponse) -> Result<String> {
        serde_json::to_string_pretty(response)
            .context("Failed to serialize resolution results to JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::ComponentResolution;
    use crate::dependency_resolution::domain::{DebugDependencies, DependenciesData};

    #[test]
    fn test_format_is_valid_json() {
        let mut data = DependenciesData::default();
        data.package_dependencies
            .package_dependencies
            .insert("lodash".to_string(), "^4.17.21".to_string());
        data.core_aspects.push("teambit.react/react".to_string());
        let response = ResolveResponse::new(vec![ComponentResolution {
            id: "my.scope/button@0.0.1".parse().unwrap(),
            data,
            extensions: Vec::new(),
            debug: DebugDependencies::default(),
        }]);

        let output = JsonFormatter::new().format(&response).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["results"][0]["id"], "my.scope/button@0.0.1");
        assert_eq!(
            parsed["results"][0]["packageDependencies"]["packageDependencies"]["lodash"],
            "^4.17.21"
        );
        assert_eq!(parsed["results"][0]["coreAspects"][0], "teambit.react/react");
        assert_eq!(parsed["totalIssues"], 0);
    }

    #[test]
    fn test_format_empty_response() {
        let output = JsonFormatter::default()
            .format(&ResolveResponse::default())
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(parsed["results"].as_array().unwrap().is_empty());
    }
}
