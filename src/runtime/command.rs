//! Subprocess-backed task runtime.
//!
//! Each invocation composes the task prompt, writes it to a file, renders a
//! user-supplied command template, and runs the command with stdout
//! captured as the task output. The command is whatever LLM CLI the user
//! points us at; crewl imposes only the timeout and the knob values it
//! substitutes into the template.
//!
//! # Template Variables
//!
//! - `{agent}` - agent name (e.g. "market_research_specialist")
//! - `{task}` - task name (e.g. "market_research_task")
//! - `{model}` - resolved model identifier
//! - `{max_tokens}` - max output tokens
//! - `{max_iter}` - max reasoning iterations
//! - `{prompt_file}` - absolute path to the composed prompt file

use crate::agent::Agent;
use crate::error::{CrewlError, Result};
use crate::prompt::{TemplateError, compose_prompt, render_template};
use crate::runtime::{TaskResult, TaskRuntime};
use crate::task::Task;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

/// Default ceiling on one task invocation.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Interval between child-exit polls.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs each task by spawning a rendered command template as a subprocess.
#[derive(Debug)]
pub struct CommandRuntime {
    /// Command template with `{variable}` placeholders.
    command: String,

    /// Directory for prompt files and captured output logs.
    work_dir: PathBuf,

    /// Maximum execution time for one invocation.
    timeout: Duration,
}

impl CommandRuntime {
    /// Create a runtime for the given command template, keeping prompts and
    /// logs under `work_dir`.
    pub fn new(command: impl Into<String>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            work_dir: work_dir.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-invocation timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn prompts_dir(&self) -> PathBuf {
        self.work_dir.join("prompts")
    }

    fn logs_dir(&self) -> PathBuf {
        self.work_dir.join("logs")
    }
}

impl TaskRuntime for CommandRuntime {
    fn invoke(&mut self, agent: &Agent, task: &Task, context: &str) -> Result<TaskResult> {
        let prompts_dir = self.prompts_dir();
        let logs_dir = self.logs_dir();
        for dir in [&prompts_dir, &logs_dir] {
            std::fs::create_dir_all(dir).map_err(|e| {
                CrewlError::RuntimeError(format!(
                    "failed to create runtime directory '{}': {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        // Compose and persist the prompt so the command can read it.
        let prompt = compose_prompt(agent, task, context);
        let prompt_path = prompts_dir.join(format!("{}.md", task.name));
        std::fs::write(&prompt_path, &prompt).map_err(|e| {
            CrewlError::RuntimeError(format!(
                "failed to write prompt file '{}': {}",
                prompt_path.display(),
                e
            ))
        })?;
        let prompt_path = std::fs::canonicalize(&prompt_path).unwrap_or(prompt_path);

        let command_str = self.render_command(agent, task, &prompt_path)?;

        let args = shell_words::split(&command_str).map_err(|e| {
            CrewlError::UserError(format!(
                "failed to parse runner command '{}': {}\n\
                 Fix: check for unmatched quotes or invalid escape sequences.",
                command_str, e
            ))
        })?;
        if args.is_empty() {
            return Err(CrewlError::UserError(format!(
                "runner command is empty after parsing: '{}'",
                command_str
            )));
        }

        let stdout_path = logs_dir.join(format!("{}.stdout.log", task.name));
        let stderr_path = logs_dir.join(format!("{}.stderr.log", task.name));
        let stdout_file = create_log(&stdout_path)?;
        let stderr_file = create_log(&stderr_path)?;

        let start = Instant::now();
        let mut child = Command::new(&args[0])
            .args(&args[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout_file))
            .stderr(Stdio::from(stderr_file))
            .spawn()
            .map_err(|e| {
                CrewlError::RuntimeError(format!(
                    "failed to execute runner command '{}': {}\n\
                     Fix: ensure the command is installed and in PATH.",
                    args[0], e
                ))
            })?;

        let (exit_code, timed_out) = wait_with_timeout(&mut child, self.timeout)?;
        let duration = start.elapsed();

        if timed_out {
            return Err(CrewlError::RuntimeError(format!(
                "task '{}' timed out after {}s (command: {})",
                task.name,
                self.timeout.as_secs(),
                command_str
            )));
        }

        if exit_code != Some(0) {
            let stderr_tail = read_tail(&stderr_path, 20);
            return Err(CrewlError::RuntimeError(format!(
                "task '{}' runner exited with code {:?}\nstderr:\n{}",
                task.name, exit_code, stderr_tail
            )));
        }

        let output = std::fs::read_to_string(&stdout_path).map_err(|e| {
            CrewlError::RuntimeError(format!(
                "failed to read captured output '{}': {}",
                stdout_path.display(),
                e
            ))
        })?;

        Ok(TaskResult {
            output: output.trim_end().to_string(),
            duration,
        })
    }
}

impl CommandRuntime {
    /// Render the command template for one invocation.
    fn render_command(&self, agent: &Agent, task: &Task, prompt_path: &Path) -> Result<String> {
        let mut vars = HashMap::new();
        vars.insert("agent".to_string(), agent.name.clone());
        vars.insert("task".to_string(), task.name.clone());
        vars.insert("model".to_string(), agent.llm.model.clone());
        vars.insert("max_tokens".to_string(), agent.llm.max_tokens.to_string());
        vars.insert("max_iter".to_string(), agent.max_iter.to_string());
        vars.insert(
            "prompt_file".to_string(),
            prompt_path.display().to_string(),
        );

        render_template(&self.command, &vars).map_err(|e| match e {
            TemplateError::UndefinedVariable { name, .. } => CrewlError::UserError(format!(
                "runner command references undefined variable '{}'\n\
                 Command: {}\n\
                 Available variables: {}",
                name,
                self.command,
                sorted_names(&vars)
            )),
            other => CrewlError::UserError(format!("invalid runner command template: {}", other)),
        })
    }
}

fn create_log(path: &Path) -> Result<std::fs::File> {
    std::fs::File::create(path).map_err(|e| {
        CrewlError::RuntimeError(format!("failed to create log '{}': {}", path.display(), e))
    })
}

fn sorted_names(vars: &HashMap<String, String>) -> String {
    let mut names: Vec<&str> = vars.keys().map(String::as_str).collect();
    names.sort_unstable();
    names.join(", ")
}

/// Poll a child process until it exits or the timeout elapses.
///
/// Returns `(exit_code, timed_out)`; a timed-out child is killed first.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<(Option<i32>, bool)> {
    let start = Instant::now();

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok((status.code(), false)),
            Ok(None) => {
                if start.elapsed() >= timeout {
                    kill_child(child);
                    return Ok((None, true));
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                return Err(CrewlError::RuntimeError(format!(
                    "failed to check runner process status: {}",
                    e
                )));
            }
        }
    }
}

/// Kill a child and reap it; errors here mean it already exited.
fn kill_child(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Read the last `lines` lines of a log file, best-effort.
fn read_tail(path: &Path, lines: usize) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let all: Vec<&str> = content.lines().collect();
            let start = all.len().saturating_sub(lines);
            all[start..].join("\n")
        }
        Err(_) => String::from("(unavailable)"),
    }
}
