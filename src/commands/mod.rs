//! Command implementations for crewl.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus a shared helper that assembles the crew from the
//! config files and the environment (every command needs the same wiring).

mod check;
mod plan;
mod run;

use crate::agent::{Agent, build_agents};
use crate::cli::{Command, ConfigArgs};
use crate::crew::{Crew, Process};
use crate::error::Result;
use crate::settings::Settings;
use crate::task::{Task, build_tasks};
use crate::tools::Toolkit;

pub use check::cmd_check;
pub use plan::cmd_plan;
pub use run::cmd_run;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Run(args) => run::cmd_run(args),
        Command::Plan(args) => plan::cmd_plan(args),
        Command::Check(args) => check::cmd_check(args),
    }
}

/// Everything needed to assemble or inspect the pipeline.
pub(crate) struct Wiring {
    pub settings: Settings,
    pub toolkit: Toolkit,
    pub agents: Vec<Agent>,
    pub tasks: Vec<Task>,
}

impl Wiring {
    /// Resolve settings from the environment, load both config files, and
    /// build the agent set and task chain. Fails on the first problem.
    pub(crate) fn resolve(config: &ConfigArgs) -> Result<Self> {
        let settings = Settings::from_env()?;
        let agents_config = crate::agent::AgentsConfig::load(&config.agents)?;
        let tasks_config = crate::task::TasksConfig::load(&config.tasks)?;

        let toolkit = Toolkit::standard();
        let agents = build_agents(&settings, &agents_config, &toolkit)?;
        let tasks = build_tasks(&tasks_config)?;

        Ok(Self {
            settings,
            toolkit,
            agents,
            tasks,
        })
    }

    /// Assemble the crew, consuming the wiring.
    pub(crate) fn into_crew(self) -> Result<Crew> {
        let max_rpm = self.settings.max_rpm;
        Crew::new(self.agents, self.tasks, Process::Sequential, max_rpm)
    }
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use std::path::Path;

    /// Write a complete agents.yaml / tasks.yaml pair under `dir/config/`.
    pub(crate) fn write_config_files(dir: &Path) {
        let config_dir = dir.join("config");
        std::fs::create_dir_all(&config_dir).unwrap();

        let agents: String = crate::agent::AGENT_KEYS
            .iter()
            .map(|key| {
                format!(
                    "{}:\n  role: \"Role for {}\"\n  goal: \"Goal\"\n  backstory: \"Story\"\n",
                    key, key
                )
            })
            .collect();
        std::fs::write(config_dir.join("agents.yaml"), agents).unwrap();

        let tasks: String = [
            ("market_research_task", "market_research_specialist"),
            ("competitive_intelligence_task", "competitive_intelligence_analyst"),
            ("customer_insights_task", "customer_insights_researcher"),
            ("product_strategy_task", "product_strategy_advisor"),
            ("business_analyst_task", "business_analyst"),
        ]
        .iter()
        .map(|(key, agent)| {
            format!(
                "{}:\n  description: \"Do {}\"\n  expected_output: \"Notes\"\n  agent: {}\n",
                key, key, agent
            )
        })
        .collect();
        std::fs::write(config_dir.join("tasks.yaml"), tasks).unwrap();
    }
}
