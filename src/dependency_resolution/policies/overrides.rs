use super::wildcard::WildcardPattern;
use crate::dependency_resolution::domain::{ComponentId, DependencyField, PackageMap};
use crate::shared::error::ResolverError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Fields an override rule may never set
pub const FORBIDDEN_FIELDS: [&str; 4] = ["name", "main", "version", "bit"];

/// Env sub-fields inherited from more general rules
const ENV_INHERITED_FIELDS: [&str; 2] = ["compiler", "tester"];

/// One override rule, or the merged result of several matching rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideRule {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: PackageMap,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dev_dependencies: PackageMap,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub peer_dependencies: PackageMap,
    /// Component ids or patterns this wildcard rule does not apply to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
    /// `false` stops more general rules from being merged in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub propagate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<serde_json::Map<String, Value>>,
    /// Any other package.json field the rule sets
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

impl OverrideRule {
    pub fn field(&self, field: DependencyField) -> &PackageMap {
        match field {
            DependencyField::Dependencies => &self.dependencies,
            DependencyField::DevDependencies => &self.dev_dependencies,
            DependencyField::PeerDependencies => &self.peer_dependencies,
        }
    }

    fn field_mut(&mut self, field: DependencyField) -> &mut PackageMap {
        match field {
            DependencyField::Dependencies => &mut self.dependencies,
            DependencyField::DevDependencies => &mut self.dev_dependencies,
            DependencyField::PeerDependencies => &mut self.peer_dependencies,
        }
    }

    pub fn has_dependency_overrides(&self) -> bool {
        DependencyField::ALL
            .iter()
            .any(|field| !self.field(*field).is_empty())
    }

    /// Fills the fields this (more specific) rule leaves unset from `general`
    fn inherit_from(&mut self, general: &OverrideRule) {
        for field in DependencyField::ALL {
            let target = self.field_mut(field);
            for (name, value) in general.field(field) {
                target.entry(name.clone()).or_insert_with(|| value.clone());
            }
        }
        if let Some(general_env) = &general.env {
            let env = self.env.get_or_insert_with(serde_json::Map::new);
            for env_field in ENV_INHERITED_FIELDS {
                let missing = env.get(env_field).map_or(true, is_unset);
                match general_env.get(env_field) {
                    Some(value) if missing && !is_unset(value) => {
                        env.insert(env_field.to_string(), value.clone());
                    }
                    _ => {}
                }
            }
        }
        for (key, general_value) in &general.other {
            match (self.other.get_mut(key), general_value) {
                (Some(Value::Object(specific)), Value::Object(general_map)) => {
                    for (k, v) in general_map {
                        specific.entry(k.clone()).or_insert_with(|| v.clone());
                    }
                }
                (Some(specific), _) if !is_unset(specific) => {}
                _ => {
                    self.other.insert(key.clone(), general_value.clone());
                }
            }
        }
    }
}

fn is_unset(value: &Value) -> bool {
    matches!(value, Value::Null)
}

/// Compiled rule: the pattern plus its excludes
#[derive(Debug, Clone)]
struct CompiledRule {
    key: String,
    pattern: WildcardPattern,
    excludes: Vec<WildcardPattern>,
    rule: OverrideRule,
}

impl CompiledRule {
    fn is_excluded(&self, id: &ComponentId) -> bool {
        let without_version = id.to_string_without_version();
        self.excludes.iter().any(|exclude| {
            if exclude.has_wildcard() {
                exclude.matches_id(id)
            } else {
                exclude.as_str() == without_version
            }
        })
    }
}

/// User override rules keyed by component id or wildcard pattern
#[derive(Debug, Clone, Default)]
pub struct OverridesConfig {
    rules: Vec<CompiledRule>,
}

impl OverridesConfig {
    /// Validates raw configuration and builds the rule set.
    ///
    /// All validation happens here, before any component is resolved.
    pub fn from_value(value: &Value) -> Result<Self, ResolverError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        validate(value)?;
        let rules: BTreeMap<String, OverrideRule> =
            serde_json::from_value(value.clone()).map_err(|e| ResolverError::InvalidOverrides {
                rule: "overrides".to_string(),
                reason: e.to_string(),
            })?;
        Self::from_rules(rules)
    }

    pub fn from_rules(rules: BTreeMap<String, OverrideRule>) -> Result<Self, ResolverError> {
        let mut compiled = Vec::with_capacity(rules.len());
        for (key, rule) in rules {
            let pattern = WildcardPattern::parse(&key)?;
            let excludes = rule
                .exclude
                .iter()
                .map(|e| WildcardPattern::parse(e))
                .collect::<Result<Vec<_>, _>>()?;
            compiled.push(CompiledRule {
                key,
                pattern,
                excludes,
                rule,
            });
        }
        Ok(Self { rules: compiled })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// The rule key equal to the id without version
    pub fn find_exact_match(&self, id: &ComponentId) -> Option<&str> {
        let without_version = id.to_string_without_version();
        self.rules
            .iter()
            .find(|r| r.key == without_version)
            .map(|r| r.key.as_str())
    }

    pub fn remove_exact_match(&mut self, id: &ComponentId) -> bool {
        let without_version = id.to_string_without_version();
        let before = self.rules.len();
        self.rules.retain(|r| r.key != without_version);
        self.rules.len() != before
    }

    /// Keys of every rule applying to `id`, most specific first
    pub fn matching_rules(&self, id: &ComponentId) -> Vec<&str> {
        self.matching(id).into_iter().map(|r| r.key.as_str()).collect()
    }

    fn matching(&self, id: &ComponentId) -> Vec<&CompiledRule> {
        let without_version = id.to_string_without_version();
        let mut wildcard_matches: Vec<&CompiledRule> = self
            .rules
            .iter()
            .filter(|r| r.pattern.has_wildcard() && r.pattern.matches_id(id))
            .filter(|r| !r.is_excluded(id))
            .collect();
        wildcard_matches.sort_by(|a, b| sort_wildcards(&a.pattern, &b.pattern));

        let exact = self.rules.iter().find(|r| r.key == without_version);
        exact.into_iter().chain(wildcard_matches).collect()
    }

    /// Merged override data for a component, or `None` when no rule matches.
    ///
    /// Rules are folded from the most specific to the most general. A rule
    /// with `propagate: false` is the last one folded.
    pub fn get_override_component_data(&self, id: &ComponentId) -> Option<OverrideRule> {
        let matches = self.matching(id);
        if matches.is_empty() {
            return None;
        }
        let mut merged = OverrideRule::default();
        for current in matches {
            merged.inherit_from(&current.rule);
            if current.rule.propagate == Some(false) {
                merged.propagate = Some(false);
                break;
            }
        }
        Some(merged)
    }
}

/// Orders wildcard patterns from the most specific to the most general:
/// more namespaces first, then fewer wildcards, then the left-most wildcard.
/// Remaining ties fall back to the pattern text so the order is total.
pub fn sort_wildcards(a: &WildcardPattern, b: &WildcardPattern) -> Ordering {
    b.namespace_count()
        .cmp(&a.namespace_count())
        .then_with(|| a.wildcard_count().cmp(&b.wildcard_count()))
        .then_with(|| a.first_wildcard_index().cmp(&b.first_wildcard_index()))
        .then_with(|| a.as_str().cmp(b.as_str()))
}

/// Validates the raw `overrides` value
pub fn validate(value: &Value) -> Result<(), ResolverError> {
    let rules = value.as_object().ok_or_else(|| ResolverError::InvalidOverrides {
        rule: "overrides".to_string(),
        reason: format!("expected a mapping, got {}", type_name(value)),
    })?;
    for (id, rule) in rules {
        validate_rule(id, rule)?;
    }
    Ok(())
}

fn validate_rule(id: &str, rule: &Value) -> Result<(), ResolverError> {
    let invalid = |reason: String| ResolverError::InvalidOverrides {
        rule: id.to_string(),
        reason,
    };
    let fields = rule
        .as_object()
        .ok_or_else(|| invalid(format!("expected a mapping, got {}", type_name(rule))))?;
    for (field, value) in fields {
        if FORBIDDEN_FIELDS.contains(&field.as_str()) {
            return Err(invalid(format!(
                "found a forbidden field \"{}\". The following fields are not allowed: {}",
                field,
                FORBIDDEN_FIELDS.join(", ")
            )));
        }
        let is_dependency_field = DependencyField::ALL.iter().any(|f| f.as_str() == field);
        if is_dependency_field {
            let entries = value.as_object().ok_or_else(|| {
                invalid(format!(
                    "\"{}\" must be a mapping, got {}",
                    field,
                    type_name(value)
                ))
            })?;
            if let Some((name, version)) = entries.iter().find(|(_, v)| !v.is_string()) {
                return Err(invalid(format!(
                    "\"{}.{}\" must be a string, got {}",
                    field,
                    name,
                    type_name(version)
                )));
            }
        } else {
            match field.as_str() {
                "env" if !value.is_object() => {
                    return Err(invalid(format!(
                        "\"env\" must be a mapping, got {}",
                        type_name(value)
                    )));
                }
                "exclude" => {
                    let items = value.as_array().ok_or_else(|| {
                        invalid(format!("\"exclude\" must be a list, got {}", type_name(value)))
                    })?;
                    if items.iter().any(|item| !item.is_string()) {
                        return Err(invalid("\"exclude\" entries must be strings".to_string()));
                    }
                }
                "propagate" if !value.is_boolean() => {
                    return Err(invalid(format!(
                        "\"propagate\" must be a boolean, got {}",
                        type_name(value)
                    )));
                }
                _ => {}
            }
        }
    }
    Ok(())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
