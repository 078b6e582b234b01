//! Container task definitions as a source of variable names.
//!
//! Only the parts that declare environment variables are modelled: every
//! container's `environment` and `secrets` lists. Unknown fields are ignored.

use crate::env_snapshot::EnvSnapshot;
use crate::error::{CatalogError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;

/// Name/value pair from an `environment` or `secrets` list
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedVariable {
    #[serde(default)]
    pub name: Option<String>,

    /// Plain value for `environment`; secrets carry `valueFrom` instead
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerDefinition {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub environment: Vec<NamedVariable>,

    #[serde(default)]
    pub secrets: Vec<NamedVariable>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinition {
    #[serde(default)]
    pub family: Option<String>,

    #[serde(default)]
    pub container_definitions: Vec<ContainerDefinition>,
}

impl TaskDefinition {
    /// Read a task definition document.
    ///
    /// Accepts the bare definition or a `describe-task-definition` response
    /// (`{"taskDefinition": {...}}`).
    pub fn from_value(document: Value) -> Result<Self> {
        let document = match document {
            Value::Object(mut map) if map.contains_key("taskDefinition") => map
                .remove("taskDefinition")
                .unwrap_or(Value::Null),
            other => other,
        };
        if !document.is_object() {
            return Err(CatalogError::TaskDefinition(
                "expected a JSON object".to_string(),
            ));
        }
        serde_json::from_value(document).map_err(|e| CatalogError::TaskDefinition(e.to_string()))
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| CatalogError::TaskDefinition(e.to_string()))?;
        Self::from_value(value)
    }

    /// Every declared variable name across all containers, secrets included
    pub fn variable_names(&self) -> BTreeSet<String> {
        self.container_definitions
            .iter()
            .flat_map(|container| container.environment.iter().chain(&container.secrets))
            .filter_map(|var| var.name.as_deref())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// The environment a container launched from this definition would see.
    ///
    /// Secret values are not resolved; they appear with empty values.
    pub fn to_snapshot(&self) -> EnvSnapshot {
        let mut snapshot = EnvSnapshot::new();
        for container in &self.container_definitions {
            for var in container.environment.iter().chain(&container.secrets) {
                if let Some(name) = var.name.as_deref().filter(|n| !n.is_empty()) {
                    snapshot.set(name, var.value.clone().unwrap_or_default());
                }
            }
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn document() -> Value {
        json!({
            "family": "api",
            "containerDefinitions": [
                {
                    "name": "web",
                    "environment": [
                        {"name": "DB_URL", "value": "postgres://db"},
                        {"name": "DEBUG", "value": "0"}
                    ],
                    "secrets": [
                        {"name": "API_KEY", "valueFrom": "arn:aws:ssm:::parameter/key"}
                    ]
                },
                {
                    "name": "sidecar",
                    "environment": [{"name": "LOG_LEVEL", "value": "info"}, {"value": "orphan"}]
                }
            ]
        })
    }

    #[test]
    fn test_collects_environment_and_secret_names() {
        let def = TaskDefinition::from_value(document()).unwrap();
        assert_eq!(def.family.as_deref(), Some("api"));
        let names: Vec<_> = def.variable_names().into_iter().collect();
        assert_eq!(names, vec!["API_KEY", "DB_URL", "DEBUG", "LOG_LEVEL"]);
    }

    #[test]
    fn test_accepts_describe_response_wrapper() {
        let wrapped = json!({ "taskDefinition": document() });
        let def = TaskDefinition::from_value(wrapped).unwrap();
        assert_eq!(def.container_definitions.len(), 2);
    }

    #[test]
    fn test_snapshot_values() {
        let env = TaskDefinition::from_value(document()).unwrap().to_snapshot();
        assert_eq!(env.get("DB_URL"), Some("postgres://db"));
        assert_eq!(env.get("API_KEY"), Some(""));
        assert_eq!(env.len(), 4);
    }

    #[test]
    fn test_rejects_non_object() {
        let err = TaskDefinition::from_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, CatalogError::TaskDefinition(_)));
        assert!(TaskDefinition::from_json_str("{oops").is_err());
    }

    #[test]
    fn test_missing_containers_is_empty() {
        let def = TaskDefinition::from_value(json!({"family": "x"})).unwrap();
        assert!(def.variable_names().is_empty());
    }
}
