//! Crew assembly and sequential execution.
//!
//! A crew owns the full agent set and task list, validates the wiring at
//! construction, and executes tasks strictly in declared order. Each task
//! receives the verbatim outputs of the tasks in its context list; the
//! terminal task's output is persisted to its declared report path.
//!
//! Failure of any task aborts the remaining chain: there is no retry or
//! partial-completion policy at this layer.

use crate::agent::Agent;
use crate::error::{CrewlError, Result};
use crate::events::{Event, EventAction, RunLog};
use crate::runtime::TaskRuntime;
use crate::task::Task;
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Separator between upstream outputs in a task's context block.
const CONTEXT_SEPARATOR: &str = "\n\n";

/// Execution mode for the crew. Sequential is the only mode: tasks run one
/// after another, never concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Process {
    /// Tasks execute strictly in declared order.
    Sequential,
}

impl std::fmt::Display for Process {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Process::Sequential => write!(f, "sequential"),
        }
    }
}

/// Minimum-spacing limiter over runtime invocations.
///
/// The ceiling is expressed as requests per minute; the limiter enforces it
/// as a floor on inter-request spacing. The first invocation never waits.
#[derive(Debug)]
pub struct RpmLimiter {
    min_interval: Duration,
    last: Option<Instant>,
}

impl RpmLimiter {
    /// Build a limiter for `max_rpm` requests per minute. Zero disables
    /// throttling.
    pub fn new(max_rpm: u32) -> Self {
        let min_interval = if max_rpm == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(60.0 / f64::from(max_rpm))
        };
        Self {
            min_interval,
            last: None,
        }
    }

    /// The enforced minimum spacing between invocations.
    pub fn interval(&self) -> Duration {
        self.min_interval
    }

    /// Block until the next invocation is allowed, then mark it started.
    pub fn wait(&mut self) {
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                std::thread::sleep(self.min_interval - elapsed);
            }
        }
        self.last = Some(Instant::now());
    }
}

/// The result of one full pipeline run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Output of every task, keyed by task name.
    pub outputs: BTreeMap<String, String>,

    /// Output of the terminal task.
    pub final_output: String,

    /// Where the report was written, if the terminal task declared a path.
    pub report_path: Option<PathBuf>,
}

/// The ordered composition of agents and tasks, executed sequentially to
/// completion.
#[derive(Debug)]
pub struct Crew {
    agents: Vec<Agent>,
    tasks: Vec<Task>,
    process: Process,
    max_rpm: u32,
}

impl Crew {
    /// Assemble a crew, validating the wiring:
    ///
    /// - at least one task
    /// - task names are unique
    /// - every context entry names a task defined earlier in the list
    /// - every task's agent key resolves to a configured agent
    pub fn new(agents: Vec<Agent>, tasks: Vec<Task>, process: Process, max_rpm: u32) -> Result<Self> {
        if tasks.is_empty() {
            return Err(CrewlError::ConfigError(
                "crew has no tasks to execute".to_string(),
            ));
        }

        let agent_names: BTreeSet<&str> = agents.iter().map(|a| a.name.as_str()).collect();
        let mut seen: BTreeSet<&str> = BTreeSet::new();

        for task in &tasks {
            if !seen.insert(task.name.as_str()) {
                return Err(CrewlError::ConfigError(format!(
                    "duplicate task name '{}'",
                    task.name
                )));
            }

            for dep in &task.context {
                if !seen.contains(dep.as_str()) || dep == &task.name {
                    return Err(CrewlError::ConfigError(format!(
                        "task '{}' references context task '{}' which is not defined earlier in the pipeline",
                        task.name, dep
                    )));
                }
            }

            if !agent_names.contains(task.spec.agent.as_str()) {
                return Err(CrewlError::ConfigError(format!(
                    "task '{}' is bound to unknown agent '{}'",
                    task.name, task.spec.agent
                )));
            }
        }

        Ok(Self {
            agents,
            tasks,
            process,
            max_rpm,
        })
    }

    /// The agents, in crew order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// The tasks, in execution order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The execution mode.
    pub fn process(&self) -> Process {
        self.process
    }

    /// The crew-wide request-rate ceiling.
    pub fn max_rpm(&self) -> u32 {
        self.max_rpm
    }

    /// Execute every task in declared order.
    ///
    /// For each task: concatenate the outputs of its context tasks, wait on
    /// the rate limiter, invoke the runtime, and record the output. A task
    /// with an output file gets its result written there as well. The first
    /// runtime failure aborts the run and propagates.
    pub fn run(&self, runtime: &mut dyn TaskRuntime, log: &mut RunLog) -> Result<RunOutcome> {
        let mut limiter = RpmLimiter::new(self.max_rpm);
        let mut outputs: BTreeMap<String, String> = BTreeMap::new();
        let mut final_output = String::new();
        let mut report_path = None;

        log_best_effort(
            log,
            Event::new(EventAction::RunStart).with_details(json!({
                "process": self.process.to_string(),
                "tasks": self.tasks.len(),
                "max_rpm": self.max_rpm,
            })),
        );

        for task in &self.tasks {
            let agent = self.agent_for(task)?;

            // Every context task completed in an earlier iteration; Crew::new
            // guarantees the reference is backward.
            let context = task
                .context
                .iter()
                .map(|dep| outputs[dep].as_str())
                .collect::<Vec<_>>()
                .join(CONTEXT_SEPARATOR);

            if agent.verbose {
                println!("[{}] running {} ...", agent.name, task.name);
            }
            log_best_effort(
                log,
                Event::new(EventAction::TaskStart)
                    .with_task(&task.name)
                    .with_details(json!({"agent": agent.name, "context_tasks": task.context})),
            );

            limiter.wait();
            let result = runtime.invoke(agent, task, &context).inspect_err(|e| {
                log_best_effort(
                    log,
                    Event::new(EventAction::RunFailed)
                        .with_task(&task.name)
                        .with_details(json!({"error": e.to_string()})),
                );
            })?;

            if agent.verbose {
                println!(
                    "[{}] {} done in {:.1}s",
                    agent.name,
                    task.name,
                    result.duration.as_secs_f64()
                );
            }
            log_best_effort(
                log,
                Event::new(EventAction::TaskComplete)
                    .with_task(&task.name)
                    .with_details(json!({
                        "agent": agent.name,
                        "duration_ms": result.duration.as_millis() as u64,
                        "output_chars": result.output.len(),
                    })),
            );

            if let Some(path) = &task.output_file {
                write_report(path, &result.output)?;
                log_best_effort(
                    log,
                    Event::new(EventAction::ReportWritten)
                        .with_task(&task.name)
                        .with_details(json!({"path": path.display().to_string()})),
                );
                report_path = Some(path.clone());
            }

            final_output = result.output.clone();
            outputs.insert(task.name.clone(), result.output);
        }

        log_best_effort(log, Event::new(EventAction::RunComplete));

        Ok(RunOutcome {
            outputs,
            final_output,
            report_path,
        })
    }

    /// Resolve the agent a task is bound to. `Crew::new` already validated
    /// the binding, so a miss here is a wiring bug worth a hard error.
    fn agent_for(&self, task: &Task) -> Result<&Agent> {
        self.agents
            .iter()
            .find(|a| a.name == task.spec.agent)
            .ok_or_else(|| {
                CrewlError::ConfigError(format!(
                    "task '{}' is bound to unknown agent '{}'",
                    task.name, task.spec.agent
                ))
            })
    }
}

/// Persist a task output, creating parent directories as needed.
fn write_report(path: &std::path::Path, output: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            CrewlError::RuntimeError(format!(
                "failed to create report directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    std::fs::write(path, output).map_err(|e| {
        CrewlError::RuntimeError(format!(
            "failed to write report '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Append an event, warning instead of failing: the run log never takes the
/// pipeline down with it.
fn log_best_effort(log: &mut RunLog, event: Event) {
    if let Err(e) = log.append(&event) {
        eprintln!("Warning: failed to append run log event: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AGENT_KEYS, AgentsConfig, build_agents};
    use crate::runtime::TaskResult;
    use crate::settings::Settings;
    use crate::task::{REPORT_PATH, TasksConfig, build_tasks};
    use crate::test_support::DirGuard;
    use crate::tools::Toolkit;
    use tempfile::TempDir;

    /// Stub runtime: echoes "<task_name> result" appended to the
    /// concatenated context, recording every invocation.
    struct EchoRuntime {
        invocations: Vec<(String, String)>,
    }

    impl EchoRuntime {
        fn new() -> Self {
            Self {
                invocations: Vec::new(),
            }
        }
    }

    impl TaskRuntime for EchoRuntime {
        fn invoke(&mut self, _agent: &Agent, task: &Task, context: &str) -> Result<TaskResult> {
            self.invocations.push((task.name.clone(), context.to_string()));
            let output = if context.is_empty() {
                format!("{} result", task.name)
            } else {
                format!("{}\n{} result", context, task.name)
            };
            Ok(TaskResult {
                output,
                duration: Duration::from_millis(1),
            })
        }
    }

    /// Runtime that fails on a chosen task.
    struct FailingRuntime {
        fail_on: String,
        invoked: Vec<String>,
    }

    impl TaskRuntime for FailingRuntime {
        fn invoke(&mut self, _agent: &Agent, task: &Task, _context: &str) -> Result<TaskResult> {
            self.invoked.push(task.name.clone());
            if task.name == self.fail_on {
                return Err(CrewlError::RuntimeError("provider rejected".to_string()));
            }
            Ok(TaskResult {
                output: format!("{} result", task.name),
                duration: Duration::from_millis(1),
            })
        }
    }

    fn test_settings() -> Settings {
        Settings {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 300,
            max_iter: 2,
            max_rpm: 0,
        }
    }

    fn agents_yaml() -> String {
        AGENT_KEYS
            .iter()
            .map(|key| format!("{}:\n  role: \"Role\"\n  goal: \"Goal\"\n", key))
            .collect()
    }

    fn tasks_yaml() -> String {
        [
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
        .collect()
    }

    fn build_crew(max_rpm: u32) -> Crew {
        let settings = test_settings();
        let agents_config = AgentsConfig::from_yaml(&agents_yaml()).unwrap();
        let tasks_config = TasksConfig::from_yaml(&tasks_yaml()).unwrap();

        let agents = build_agents(&settings, &agents_config, &Toolkit::standard()).unwrap();
        let tasks = build_tasks(&tasks_config).unwrap();
        Crew::new(agents, tasks, Process::Sequential, max_rpm).unwrap()
    }

    #[test]
    fn end_to_end_run_writes_the_report() {
        let dir = TempDir::new().unwrap();
        let _guard = DirGuard::new(dir.path());

        let crew = build_crew(0);
        let mut runtime = EchoRuntime::new();
        let mut log = RunLog::disabled();

        let outcome = crew.run(&mut runtime, &mut log).unwrap();

        // The narrowed terminal context still carries the strategy output.
        assert!(outcome.final_output.contains("product_strategy_task result"));
        assert!(outcome.final_output.contains("business_analysis_task result"));

        let report_path = outcome.report_path.unwrap();
        assert_eq!(report_path, PathBuf::from(REPORT_PATH));
        let written = std::fs::read_to_string(&report_path).unwrap();
        assert_eq!(written, outcome.final_output);
    }

    #[test]
    fn tasks_execute_in_declared_order() {
        let dir = TempDir::new().unwrap();
        let _guard = DirGuard::new(dir.path());

        let crew = build_crew(0);
        let mut runtime = EchoRuntime::new();
        crew.run(&mut runtime, &mut RunLog::disabled()).unwrap();

        let order: Vec<&str> = runtime.invocations.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(
            order,
            vec![
                "market_research_task",
                "competitive_intelligence_task",
                "customer_insights_task",
                "product_strategy_task",
                "business_analysis_task",
            ]
        );
    }

    #[test]
    fn terminal_context_is_exactly_the_strategy_output() {
        let dir = TempDir::new().unwrap();
        let _guard = DirGuard::new(dir.path());

        let crew = build_crew(0);
        let mut runtime = EchoRuntime::new();
        let outcome = crew.run(&mut runtime, &mut RunLog::disabled()).unwrap();

        let (name, terminal_context) = runtime.invocations.last().unwrap();
        assert_eq!(name, "business_analysis_task");
        assert_eq!(terminal_context, &outcome.outputs["product_strategy_task"]);
    }

    #[test]
    fn context_concatenates_upstream_outputs_in_declared_order() {
        let dir = TempDir::new().unwrap();
        let _guard = DirGuard::new(dir.path());

        let crew = build_crew(0);
        let mut runtime = EchoRuntime::new();
        let outcome = crew.run(&mut runtime, &mut RunLog::disabled()).unwrap();

        let (_, insights_context) = &runtime.invocations[2];
        let expected = format!(
            "{}\n\n{}",
            outcome.outputs["market_research_task"],
            outcome.outputs["competitive_intelligence_task"]
        );
        assert_eq!(insights_context, &expected);
    }

    #[test]
    fn failure_aborts_the_remaining_chain() {
        let dir = TempDir::new().unwrap();
        let _guard = DirGuard::new(dir.path());

        let crew = build_crew(0);
        let mut runtime = FailingRuntime {
            fail_on: "customer_insights_task".to_string(),
            invoked: Vec::new(),
        };

        let err = crew.run(&mut runtime, &mut RunLog::disabled()).unwrap_err();
        assert!(err.to_string().contains("provider rejected"));

        // The two downstream tasks never ran, and no report was written.
        assert_eq!(runtime.invoked.len(), 3);
        assert!(!std::path::Path::new(REPORT_PATH).exists());
    }

    #[test]
    fn run_log_records_the_full_lifecycle() {
        let dir = TempDir::new().unwrap();
        let _guard = DirGuard::new(dir.path());

        let crew = build_crew(0);
        let log_path = dir.path().join("events.ndjson");
        let mut log = RunLog::new(&log_path);
        crew.run(&mut EchoRuntime::new(), &mut log).unwrap();

        let content = std::fs::read_to_string(&log_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        // run_start + 5 * (task_start + task_complete) + report_written + run_complete
        assert_eq!(lines.len(), 13);
        assert!(lines[0].contains("run_start"));
        assert!(lines[11].contains("report_written"));
        assert!(lines[12].contains("run_complete"));
    }

    #[test]
    fn unknown_agent_binding_fails_assembly() {
        let settings = test_settings();
        let agents_config = AgentsConfig::from_yaml(&agents_yaml()).unwrap();
        let agents = build_agents(&settings, &agents_config, &Toolkit::standard()).unwrap();

        let yaml = tasks_yaml().replace("agent: business_analyst\n", "agent: nobody\n");
        let tasks = build_tasks(&TasksConfig::from_yaml(&yaml).unwrap()).unwrap();

        let err = Crew::new(agents, tasks, Process::Sequential, 2).unwrap_err();
        assert!(err.to_string().contains("unknown agent 'nobody'"));
    }

    #[test]
    fn forward_context_reference_fails_assembly() {
        let settings = test_settings();
        let agents_config = AgentsConfig::from_yaml(&agents_yaml()).unwrap();
        let agents = build_agents(&settings, &agents_config, &Toolkit::standard()).unwrap();

        let tasks_config = TasksConfig::from_yaml(&tasks_yaml()).unwrap();
        let mut tasks = build_tasks(&tasks_config).unwrap();
        // Point the root task at a task defined later.
        tasks[0].context = vec!["product_strategy_task".to_string()];

        let err = Crew::new(agents, tasks, Process::Sequential, 2).unwrap_err();
        assert!(err.to_string().contains("not defined earlier"));
    }

    #[test]
    fn duplicate_task_names_fail_assembly() {
        let settings = test_settings();
        let agents_config = AgentsConfig::from_yaml(&agents_yaml()).unwrap();
        let agents = build_agents(&settings, &agents_config, &Toolkit::standard()).unwrap();

        let tasks_config = TasksConfig::from_yaml(&tasks_yaml()).unwrap();
        let mut tasks = build_tasks(&tasks_config).unwrap();
        let clone = tasks[0].clone();
        tasks.push(clone);

        let err = Crew::new(agents, tasks, Process::Sequential, 2).unwrap_err();
        assert!(err.to_string().contains("duplicate task name"));
    }

    #[test]
    fn empty_task_list_fails_assembly() {
        let err = Crew::new(vec![], vec![], Process::Sequential, 2).unwrap_err();
        assert!(err.to_string().contains("no tasks"));
    }

    #[test]
    fn limiter_interval_math() {
        assert_eq!(RpmLimiter::new(2).interval(), Duration::from_secs(30));
        assert_eq!(RpmLimiter::new(60).interval(), Duration::from_secs(1));
        assert_eq!(RpmLimiter::new(0).interval(), Duration::ZERO);
    }

    #[test]
    fn limiter_first_wait_does_not_block() {
        let mut limiter = RpmLimiter::new(2);
        let start = Instant::now();
        limiter.wait();
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn disabled_limiter_never_blocks() {
        let mut limiter = RpmLimiter::new(0);
        let start = Instant::now();
        for _ in 0..5 {
            limiter.wait();
        }
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
