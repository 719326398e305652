//! Resource Registry - Load resource descriptors from JSON
//!
//! This module loads the platform resource descriptors from an embedded JSON
//! file and provides lookup functions for the rest of the application.

use crate::api::Method;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Embedded resource JSON files (compiled into the binary)
const RESOURCE_FILES: &[&str] = &[include_str!("../resources/platform.json")];

/// Actions a resource may support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    List,
    Get,
    Add,
    Set,
    Delete,
    Resume,
    Suspend,
    Show,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::List => "list",
            Action::Get => "get",
            Action::Add => "add",
            Action::Set => "set",
            Action::Delete => "delete",
            Action::Resume => "resume",
            Action::Suspend => "suspend",
            Action::Show => "show",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional query parameter filled from a flag when that flag is present
#[derive(Debug, Clone, Deserialize)]
pub struct QueryDef {
    pub param: String,
    pub placeholder: String,
}

/// How one action maps onto an HTTP call
#[derive(Debug, Clone, Deserialize)]
pub struct ActionDef {
    pub method: Method,
    /// Path templates, most specific first. The first one whose placeholders
    /// can all be filled is used.
    pub paths: Vec<String>,
    #[serde(default)]
    pub query: Vec<QueryDef>,
}

/// Resource definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDef {
    pub display_name: String,
    pub actions: HashMap<Action, ActionDef>,
}

impl ResourceDef {
    pub fn action(&self, action: Action) -> Option<&ActionDef> {
        self.actions.get(&action)
    }

    pub fn supports(&self, action: Action) -> bool {
        self.actions.contains_key(&action)
    }
}

/// Root structure of resources/*.json
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceConfig {
    #[serde(default)]
    pub resources: HashMap<String, ResourceDef>,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<ResourceConfig> = OnceLock::new();

/// Get the resource registry (loads from embedded JSON on first access)
pub fn get_registry() -> &'static ResourceConfig {
    REGISTRY.get_or_init(|| {
        let mut final_config = ResourceConfig {
            resources: HashMap::new(),
        };

        for content in RESOURCE_FILES {
            let partial: ResourceConfig = serde_json::from_str(content)
                .unwrap_or_else(|e| panic!("Failed to parse embedded resource JSON: {}", e));
            final_config.resources.extend(partial.resources);
        }

        final_config
    })
}

/// Get a resource definition by key
pub fn get_resource(key: &str) -> Option<&'static ResourceDef> {
    get_registry().resources.get(key)
}

/// Get all resource keys, sorted
pub fn get_all_resource_keys() -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = get_registry()
        .resources
        .keys()
        .map(|s| s.as_str())
        .collect();
    keys.sort_unstable();
    keys
}

/// Placeholder names (without braces) appearing in a path template
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                out.push(&after[..end]);
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN_PLACEHOLDERS: &[&str] = &["id", "cluster", "project", "department", "nodegroup"];

    #[test]
    fn test_registry_loads_successfully() {
        let registry = get_registry();
        assert!(
            !registry.resources.is_empty(),
            "Registry should have resources"
        );
    }

    #[test]
    fn test_all_resources_present() {
        assert_eq!(
            get_all_resource_keys(),
            vec![
                "billing",
                "cluster",
                "department",
                "node",
                "nodegroup",
                "project",
                "topology",
                "workload"
            ]
        );
    }

    #[test]
    fn test_workload_actions() {
        let workload = get_resource("workload").unwrap();
        assert_eq!(workload.display_name, "Workload");
        assert!(workload.supports(Action::Resume));
        assert!(workload.supports(Action::Suspend));
        assert!(!workload.supports(Action::Add));

        let resume = workload.action(Action::Resume).unwrap();
        assert_eq!(resume.method, Method::Post);
        assert_eq!(resume.paths, vec!["projects/{project}/workloads/{id}/resume"]);
    }

    #[test]
    fn test_methods_follow_action_kind() {
        for (key, resource) in &get_registry().resources {
            for (action, def) in &resource.actions {
                let expected = match action {
                    Action::List | Action::Get | Action::Show => Method::Get,
                    Action::Add | Action::Resume | Action::Suspend => Method::Post,
                    Action::Set => Method::Patch,
                    Action::Delete => Method::Delete,
                };
                assert_eq!(def.method, expected, "{} {}", key, action);
                assert!(!def.paths.is_empty(), "{} {} has no path", key, action);
            }
        }
    }

    #[test]
    fn test_placeholders_are_known() {
        for resource in get_registry().resources.values() {
            for def in resource.actions.values() {
                for path in &def.paths {
                    for name in placeholders(path) {
                        assert!(KNOWN_PLACEHOLDERS.contains(&name), "unknown {{{}}}", name);
                    }
                }
                for q in &def.query {
                    assert!(KNOWN_PLACEHOLDERS.contains(&q.placeholder.as_str()));
                }
            }
        }
    }

    #[test]
    fn test_placeholders_parsing() {
        assert_eq!(
            placeholders("clusters/{cluster}/projects/{project}/workloads"),
            vec!["cluster", "project"]
        );
        assert!(placeholders("clusters").is_empty());
        assert_eq!(placeholders("a/{id}/{broken"), vec!["id"]);
    }
}
