//! The `plan` command: show the resolved pipeline without executing it.

use crate::cli::PlanArgs;
use crate::commands::Wiring;
use crate::error::Result;

pub fn cmd_plan(args: PlanArgs) -> Result<()> {
    let wiring = Wiring::resolve(&args.config)?;

    println!("Settings:");
    println!("  Model:       {}", wiring.settings.model);
    println!("  Max tokens:  {}", wiring.settings.max_tokens);
    println!("  Max iter:    {}", wiring.settings.max_iter);
    println!("  Max RPM:     {}", wiring.settings.max_rpm);
    println!("  Tools:       {}", wiring.toolkit.names());
    println!();

    println!("Agents ({}):", wiring.agents.len());
    for agent in &wiring.agents {
        println!("  {} - {}", agent.name, agent.profile.role);
    }
    println!();

    println!("Tasks ({}, sequential):", wiring.tasks.len());
    for (i, task) in wiring.tasks.iter().enumerate() {
        println!("  {}. {} (agent: {})", i + 1, task.name, task.spec.agent);
        if !task.context.is_empty() {
            println!("     context: {}", task.context.join(", "));
        }
        if let Some(path) = &task.output_file {
            println!("     writes:  {}", path.display());
        }
    }

    // Validates the wiring even though nothing executes.
    wiring.into_crew()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ConfigArgs;
    use crate::commands::test_fixtures::write_config_files;
    use crate::exit_codes;
    use crate::test_support::DirGuard;
    use serial_test::serial;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn plan_args() -> PlanArgs {
        PlanArgs {
            config: ConfigArgs {
                agents: PathBuf::from("config/agents.yaml"),
                tasks: PathBuf::from("config/tasks.yaml"),
            },
        }
    }

    #[test]
    #[serial]
    fn plan_succeeds_on_a_complete_config() {
        let dir = TempDir::new().unwrap();
        let _guard = DirGuard::new(dir.path());
        write_config_files(dir.path());

        cmd_plan(plan_args()).unwrap();
    }

    #[test]
    #[serial]
    fn plan_fails_without_config_files() {
        let dir = TempDir::new().unwrap();
        let _guard = DirGuard::new(dir.path());

        let err = cmd_plan(plan_args()).unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }
}
