//! The execution seam between the crew and whatever actually runs a task.
//!
//! The crew itself only sequences tasks and moves context between them;
//! producing a result for one task is the runtime's job. The trait keeps
//! that boundary explicit and lets tests substitute a stub for the real
//! subprocess-backed runtime.

mod command;

pub use command::CommandRuntime;

use crate::agent::Agent;
use crate::error::Result;
use crate::task::Task;
use std::time::Duration;

/// The result of executing one task.
#[derive(Debug, Clone)]
pub struct TaskResult {
    /// The text the task produced.
    pub output: String,

    /// Wall-clock execution time.
    pub duration: Duration,
}

/// Executes one task for one agent, given the concatenated upstream
/// context. Possibly slow, blocking, and failure-prone; the crew treats it
/// as opaque.
pub trait TaskRuntime {
    /// Produce a result for `task`, reasoning as `agent`, with `context`
    /// carrying the verbatim outputs of the task's dependencies.
    fn invoke(&mut self, agent: &Agent, task: &Task, context: &str) -> Result<TaskResult>;
}
