//! Agent configuration schema (`agents.yaml`).
//!
//! The file is a mapping from agent key to a free-text profile:
//!
//! ```yaml
//! market_research_specialist:
//!   role: "Market Research Specialist"
//!   goal: "Map the market landscape for {topic}"
//!   backstory: "A veteran analyst who..."
//! ```
//!
//! Keys referenced by the pipeline are fixed (see [`crate::agent::AGENT_KEYS`]);
//! the file may carry additional entries, and profiles may carry unknown
//! fields, both preserved for forward compatibility.

use crate::error::{CrewlError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// All agent profiles, keyed by identifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentsConfig {
    /// Agent profiles keyed by identifier.
    #[serde(flatten)]
    pub agents: BTreeMap<String, AgentProfile>,
}

/// Role description, goal, and instructions for one agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentProfile {
    /// The role the agent plays (e.g. "Market Research Specialist").
    #[serde(default)]
    pub role: String,

    /// What the agent is trying to achieve.
    #[serde(default)]
    pub goal: String,

    /// Persona and working style, prepended to the prompt.
    #[serde(default)]
    pub backstory: String,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl AgentsConfig {
    /// Load agent profiles from a YAML file.
    ///
    /// A missing or unreadable file is a user error: the pipeline cannot be
    /// built without its agent definitions.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CrewlError::UserError(format!(
                "failed to read agents config '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse agent profiles from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: AgentsConfig = serde_yaml::from_str(yaml)
            .map_err(|e| CrewlError::UserError(format!("failed to parse agents config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the loaded profiles.
    ///
    /// Every profile must carry a non-empty role and goal; the backstory is
    /// optional.
    pub fn validate(&self) -> Result<()> {
        for (key, profile) in &self.agents {
            if key.trim().is_empty() {
                return Err(CrewlError::ConfigError(
                    "agents config has an entry with an empty key".to_string(),
                ));
            }
            if profile.role.trim().is_empty() {
                return Err(CrewlError::ConfigError(format!(
                    "agent '{}' has an empty role",
                    key
                )));
            }
            if profile.goal.trim().is_empty() {
                return Err(CrewlError::ConfigError(format!(
                    "agent '{}' has an empty goal",
                    key
                )));
            }
        }
        Ok(())
    }

    /// Look up a profile by key.
    pub fn get(&self, key: &str) -> Option<&AgentProfile> {
        self.agents.get(key)
    }

    /// Number of configured profiles.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the file defined any profiles at all.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
