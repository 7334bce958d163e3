//! Prompt composition from agent profiles, task specs, and upstream
//! context.
//!
//! The layout is fixed: persona first, then the task instructions and the
//! expected output, then (for non-root tasks) a context block carrying the
//! verbatim outputs of the tasks this one depends on.

mod template;

pub use template::{TemplateError, render_template};

use crate::agent::Agent;
use crate::task::Task;
use std::collections::HashMap;

/// Body template for every task prompt.
const PROMPT_TEMPLATE: &str = "\
You are {role}.
{backstory}

Your goal: {goal}

Tools available to you: {tools}

# Task: {task}
{description}

# Expected output
{expected_output}
";

/// Compose the full prompt for one task invocation.
///
/// `context` is the concatenated output of the task's upstream
/// dependencies; when empty (a root task) the context block is omitted
/// entirely rather than rendered blank.
///
/// The fixed template and the variables below are always in sync, so
/// rendering cannot fail; the expect documents that invariant.
pub fn compose_prompt(agent: &Agent, task: &Task, context: &str) -> String {
    let mut vars = HashMap::new();
    vars.insert("role".to_string(), agent.profile.role.clone());
    vars.insert("goal".to_string(), agent.profile.goal.clone());
    vars.insert("backstory".to_string(), agent.profile.backstory.clone());
    vars.insert("tools".to_string(), agent.tools.names());
    vars.insert("task".to_string(), task.name.clone());
    vars.insert("description".to_string(), task.spec.description.clone());
    vars.insert(
        "expected_output".to_string(),
        task.spec.expected_output.clone(),
    );

    let mut prompt = render_template(PROMPT_TEMPLATE, &vars)
        .expect("prompt template variables are fixed at compile time");

    if !context.is_empty() {
        prompt.push_str("\n# Context from earlier tasks\n");
        prompt.push_str(context);
        prompt.push('\n');
    }

    prompt
}
