use crate::application::dto::{ComponentResolution, ResolveResponse};
use crate::dependency_resolution::domain::{DependencyField, IssueKind, IssuesList};
use crate::ports::outbound::ResolutionFormatter;
use crate::shared::Result;
use owo_colors::{OwoColorize, Style};
use std::fmt::Write;

/// Styles used by the report; all plain when colors are off
struct Palette {
    heading: Style,
    ok: Style,
    issue: Style,
    dim: Style,
}

impl Palette {
    fn new(colored: bool) -> Self {
        if colored {
            Self {
                heading: Style::new().bold(),
                ok: Style::new().green(),
                issue: Style::new().yellow(),
                dim: Style::new().dimmed(),
            }
        } else {
            Self {
                heading: Style::new(),
                ok: Style::new(),
                issue: Style::new(),
                dim: Style::new(),
            }
        }
    }
}

/// TextFormatter adapter rendering a status-style report, one block per
/// component
pub struct TextFormatter {
    palette: Palette,
}

impl TextFormatter {
    /// Creates a formatter producing plain text
    pub fn new() -> Self {
        Self {
            palette: Palette::new(false),
        }
    }

    /// Creates a formatter producing ANSI-colored text
    pub fn with_colors() -> Self {
        Self {
            palette: Palette::new(true),
        }
    }

    fn write_component(&self, out: &mut String, result: &ComponentResolution) {
        let p = &self.palette;
        let status = if result.data.has_issues() {
            format!("{} issue(s)", result.issue_count())
                .style(p.issue)
                .to_string()
        } else {
            "ok".style(p.ok).to_string()
        };
        let _ = writeln!(out, "{} ... {}", result.id.style(p.heading), status);

        let deps = &result.data.dependencies;
        self.write_list(
            out,
            "dependencies",
            deps.dependencies.iter().map(|d| d.id.to_string()),
        );
        self.write_list(
            out,
            "devDependencies",
            deps.dev_dependencies.iter().map(|d| d.id.to_string()),
        );

        for field in DependencyField::ALL {
            let packages = result.data.package_dependencies.get(field);
            self.write_list(
                out,
                field.packages_key(),
                packages.iter().map(|(name, version)| format!("{}@{}", name, version)),
            );
        }

        if !result.data.core_aspects.is_empty() {
            self.write_list(out, "coreAspects", result.data.core_aspects.iter().cloned());
        }
        if !result.data.missing_package_dependencies.is_empty() {
            self.write_list(
                out,
                "missingPackageDependencies",
                result.data.missing_package_dependencies.iter().cloned(),
            );
        }

        for kind in result.data.issues.kinds() {
            let _ = writeln!(
                out,
                "   {} {}",
                "✖".style(p.issue),
                kind.description().style(p.issue)
            );
            for line in issue_details(&result.data.issues, kind) {
                let _ = writeln!(out, "      {}", line);
            }
        }
    }

    fn write_list(&self, out: &mut String, label: &str, items: impl Iterator<Item = String>) {
        let items: Vec<String> = items.collect();
        if items.is_empty() {
            return;
        }
        let _ = writeln!(out, "   {}:", label.style(self.palette.dim));
        for item in items {
            let _ = writeln!(out, "      {}", item);
        }
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// One line per offending file of an issue kind
fn issue_details(issues: &IssuesList, kind: IssueKind) -> Vec<String> {
    let file_list = |map: &std::collections::BTreeMap<String, Vec<String>>| -> Vec<String> {
        map.iter()
            .map(|(file, values)| format!("{} -> {}", file, values.join(", ")))
            .collect()
    };
    match kind {
        IssueKind::UntrackedDependencies => issues
            .untracked_dependencies
            .iter()
            .map(|(file, entry)| {
                let paths: Vec<&str> = entry
                    .untracked_files
                    .iter()
                    .map(|f| f.relative_path.as_str())
                    .collect();
                format!("{} -> {}", file, paths.join(", "))
            })
            .collect(),
        IssueKind::MissingPackagesDependenciesOnFs => {
            file_list(&issues.missing_packages_dependencies_on_fs)
        }
        IssueKind::MissingDependenciesOnFs => file_list(&issues.missing_dependencies_on_fs),
        IssueKind::RelativeComponentsAuthored => issues
            .relative_components_authored
            .iter()
            .map(|(file, entries)| {
                let ids: Vec<String> = entries.iter().map(|e| e.component_id.to_string()).collect();
                format!("{} -> {}", file, ids.join(", "))
            })
            .collect(),
        IssueKind::ParseErrors => issues
            .parse_errors
            .iter()
            .map(|(file, error)| format!("{} -> {}", file, error))
            .collect(),
        IssueKind::ResolveErrors => issues
            .resolve_errors
            .iter()
            .map(|(file, error)| format!("{} -> {}", file, error))
            .collect(),
        IssueKind::ImportNonMainFiles => file_list(&issues.import_non_main_files),
        IssueKind::MultipleEnvs => vec![issues.multiple_envs.join(", ")],
        IssueKind::MergeConfigHasConflict | IssueKind::LegacyInsideHarmony => Vec::new(),
    }
}

impl ResolutionFormatter for TextFormatter {
    fn format(&self, response: &ResolveResponse) -> Result<String> {
        let mut out = String::new();
        for result in &response.results {
            self.write_component(&mut out, result);
        }

        let components = response.results.len();
        let with_issues = response.components_with_issues().count();
        let summary = format!(
            "{} component(s) resolved, {} with issues",
            components, with_issues
        );
        if with_issues == 0 {
            let _ = writeln!(out, "\n{}", summary.style(self.palette.ok));
        } else {
            let _ = writeln!(out, "\n{}", summary.style(self.palette.issue));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency_resolution::domain::{
        DebugDependencies, DependenciesData, Dependency,
    };

    fn response() -> ResolveResponse {
        let mut clean = DependenciesData::default();
        clean
            .dependencies
            .dependencies
            .push(Dependency::new("my.scope/card@0.0.2".parse().unwrap(), vec![], None));
        clean
            .package_dependencies
            .peer_package_dependencies
            .insert("react".to_string(), "^18.0.0".to_string());

        let mut broken = DependenciesData::default();
        broken.issues.add_missing_packages("index.ts", &["left-pad".to_string()]);

        ResolveResponse::new(vec![
            ComponentResolution {
                id: "my.scope/button@0.0.1".parse().unwrap(),
                data: clean,
                extensions: Vec::new(),
                debug: DebugDependencies::default(),
            },
            ComponentResolution {
                id: "my.scope/list".parse().unwrap(),
                data: broken,
                extensions: Vec::new(),
                debug: DebugDependencies::default(),
            },
        ])
    }

    #[test]
    fn test_plain_report() {
        let output = TextFormatter::new().format(&response()).unwrap();

        assert!(output.contains("my.scope/button@0.0.1 ... ok"));
        assert!(output.contains("      my.scope/card@0.0.2"));
        assert!(output.contains("peerPackageDependencies:"));
        assert!(output.contains("react@^18.0.0"));
        assert!(output.contains("my.scope/list ... 1 issue(s)"));
        assert!(output.contains("missing packages dependencies"));
        assert!(output.contains("index.ts -> left-pad"));
        assert!(output.contains("2 component(s) resolved, 1 with issues"));
        assert!(!output.contains('\u{1b}'));
    }

    #[test]
    fn test_colored_report_has_ansi_codes() {
        let output = TextFormatter::with_colors().format(&response()).unwrap();
        assert!(output.contains('\u{1b}'));
    }

    #[test]
    fn test_empty_report() {
        let output = TextFormatter::default()
            .format(&ResolveResponse::default())
            .unwrap();
        assert_eq!(output.trim(), "0 component(s) resolved, 0 with issues");
    }
}
