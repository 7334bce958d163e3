//! Agent construction for the research crew.
//!
//! An agent is a configured reasoning unit: a profile looked up by a fixed
//! key from `agents.yaml`, a fresh model handle from the resolved settings,
//! the shared iteration cap, and the shared toolkit. Agents are built once
//! at pipeline-build time and never mutated afterwards.

mod config;

pub use config::{AgentProfile, AgentsConfig};

use crate::error::{CrewlError, Result};
use crate::settings::{ModelHandle, Settings};
use crate::tools::Toolkit;

/// The five agent keys the pipeline binds, in crew order.
pub const AGENT_KEYS: [&str; 5] = [
    "market_research_specialist",
    "competitive_intelligence_analyst",
    "customer_insights_researcher",
    "product_strategy_advisor",
    "business_analyst",
];

/// A configured reasoning unit bound to a model handle and a toolkit.
#[derive(Debug, Clone)]
pub struct Agent {
    /// Agent identifier; also its key in `agents.yaml`.
    pub name: String,

    /// Role, goal, and backstory from the config file.
    pub profile: AgentProfile,

    /// Model handle used for this agent's LLM calls.
    pub llm: ModelHandle,

    /// Max reasoning iterations per task.
    pub max_iter: u32,

    /// Whether task progress is echoed to stdout during a run.
    pub verbose: bool,

    /// Shared capability toolkit.
    pub tools: Toolkit,
}

/// Build the full agent set from resolved settings and loaded profiles.
///
/// Every agent in [`AGENT_KEYS`] must have a profile; a missing key fails
/// here, at construction time, rather than mid-run.
pub fn build_agents(
    settings: &Settings,
    config: &AgentsConfig,
    toolkit: &Toolkit,
) -> Result<Vec<Agent>> {
    AGENT_KEYS
        .iter()
        .map(|&key| {
            let profile = config.get(key).ok_or_else(|| {
                CrewlError::ConfigError(format!("agents config has no entry for '{}'", key))
            })?;

            Ok(Agent {
                name: key.to_string(),
                profile: profile.clone(),
                llm: settings.model_handle(),
                max_iter: settings.max_iter,
                verbose: true,
                tools: toolkit.clone(),
            })
        })
        .collect()
}
