//! Task configuration schema (`tasks.yaml`).
//!
//! The file is a mapping from task key to a free-text instruction record:
//!
//! ```yaml
//! market_research_task:
//!   description: "Survey the current market for {topic}..."
//!   expected_output: "A structured market overview"
//!   agent: market_research_specialist
//! ```
//!
//! The `agent` field names the agent the task is bound to; the binding is
//! checked when the crew is assembled, not here.

use crate::error::{CrewlError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// All task specs, keyed by identifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Task specs keyed by identifier.
    #[serde(flatten)]
    pub tasks: BTreeMap<String, TaskSpec>,
}

/// Instructions for one unit of work.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskSpec {
    /// What the task should do.
    #[serde(default)]
    pub description: String,

    /// What a good result looks like.
    #[serde(default)]
    pub expected_output: String,

    /// Key of the agent this task is bound to.
    #[serde(default)]
    pub agent: String,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl TasksConfig {
    /// Load task specs from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CrewlError::UserError(format!(
                "failed to read tasks config '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse task specs from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: TasksConfig = serde_yaml::from_str(yaml)
            .map_err(|e| CrewlError::UserError(format!("failed to parse tasks config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the loaded specs: every task needs a description and an
    /// agent binding.
    pub fn validate(&self) -> Result<()> {
        for (key, spec) in &self.tasks {
            if key.trim().is_empty() {
                return Err(CrewlError::ConfigError(
                    "tasks config has an entry with an empty key".to_string(),
                ));
            }
            if spec.description.trim().is_empty() {
                return Err(CrewlError::ConfigError(format!(
                    "task '{}' has an empty description",
                    key
                )));
            }
            if spec.agent.trim().is_empty() {
                return Err(CrewlError::ConfigError(format!(
                    "task '{}' names no agent",
                    key
                )));
            }
        }
        Ok(())
    }

    /// Look up a spec by key.
    pub fn get(&self, key: &str) -> Option<&TaskSpec> {
        self.tasks.get(key)
    }

    /// Number of configured specs.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the file defined any specs at all.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
