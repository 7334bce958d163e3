//! Task graph construction for the research crew.
//!
//! The pipeline is a fixed five-node chain. Each task carries the names of
//! the earlier tasks whose outputs feed its context (a reference by name,
//! used only for output lookup at run time), and the terminal task carries
//! the report output path.

mod config;

pub use config::{TaskSpec, TasksConfig};

use crate::error::{CrewlError, Result};
use std::path::PathBuf;

/// Where the terminal task writes its result, relative to the working
/// directory.
pub const REPORT_PATH: &str = "reports/report.md";

/// One unit of work bound to an instruction record, with explicit
/// upstream-output dependencies.
#[derive(Debug, Clone)]
pub struct Task {
    /// Pipeline node name.
    pub name: String,

    /// Instructions from the config file.
    pub spec: TaskSpec,

    /// Names of earlier tasks whose outputs form this task's context, in
    /// declared order.
    pub context: Vec<String>,

    /// Where to persist this task's output, if anywhere. Only the terminal
    /// task writes a file.
    pub output_file: Option<PathBuf>,
}

/// Build the fixed five-node task chain from loaded specs.
///
/// Edges, in order:
///
/// 1. `market_research_task` - root, no context
/// 2. `competitive_intelligence_task` - context: (1)
/// 3. `customer_insights_task` - context: (1), (2)
/// 4. `product_strategy_task` - context: (1), (2), (3)
/// 5. `business_analysis_task` - context: (4) only, writes the report
///
/// The terminal task deliberately narrows its context to the strategy
/// output alone instead of the full ancestor set, trading completeness for
/// a bounded final prompt.
pub fn build_tasks(config: &TasksConfig) -> Result<Vec<Task>> {
    let mut tasks = Vec::with_capacity(5);

    tasks.push(make_task(config, "market_research_task", "market_research_task", &[], None)?);

    tasks.push(make_task(
        config,
        "competitive_intelligence_task",
        "competitive_intelligence_task",
        &["market_research_task"],
        None,
    )?);

    tasks.push(make_task(
        config,
        "customer_insights_task",
        "customer_insights_task",
        &["market_research_task", "competitive_intelligence_task"],
        None,
    )?);

    tasks.push(make_task(
        config,
        "product_strategy_task",
        "product_strategy_task",
        &[
            "market_research_task",
            "competitive_intelligence_task",
            "customer_insights_task",
        ],
        None,
    )?);

    // The config file spells this key "business_analyst_task" while the
    // pipeline node is "business_analysis_task".
    tasks.push(make_task(
        config,
        "business_analysis_task",
        "business_analyst_task",
        &["product_strategy_task"],
        Some(PathBuf::from(REPORT_PATH)),
    )?);

    Ok(tasks)
}

/// Bind one task to its config entry, failing if the key is absent.
fn make_task(
    config: &TasksConfig,
    name: &str,
    key: &str,
    context: &[&str],
    output_file: Option<PathBuf>,
) -> Result<Task> {
    let spec = config
        .get(key)
        .ok_or_else(|| CrewlError::ConfigError(format!("tasks config has no entry for '{}'", key)))?;

    Ok(Task {
        name: name.to_string(),
        spec: spec.clone(),
        context: context.iter().map(|c| c.to_string()).collect(),
        output_file,
    })
}
