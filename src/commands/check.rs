//! The `check` command: validate configuration files and environment.

use crate::cli::CheckArgs;
use crate::commands::Wiring;
use crate::error::Result;

pub fn cmd_check(args: CheckArgs) -> Result<()> {
    let wiring = Wiring::resolve(&args.config)?;
    let agent_count = wiring.agents.len();
    let task_count = wiring.tasks.len();

    // Crew assembly runs the cross-file checks (agent bindings, context
    // ordering).
    wiring.into_crew()?;

    println!(
        "OK: {} agents, {} tasks, wiring is consistent.",
        agent_count, task_count
    );
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

    fn check_args() -> CheckArgs {
        CheckArgs {
            config: ConfigArgs {
                agents: PathBuf::from("config/agents.yaml"),
                tasks: PathBuf::from("config/tasks.yaml"),
            },
        }
    }

    #[test]
    #[serial]
    fn check_passes_on_a_complete_config() {
        let dir = TempDir::new().unwrap();
        let _guard = DirGuard::new(dir.path());
        write_config_files(dir.path());

        cmd_check(check_args()).unwrap();
    }

    #[test]
    #[serial]
    fn check_reports_a_broken_agent_binding() {
        let dir = TempDir::new().unwrap();
        let _guard = DirGuard::new(dir.path());
        write_config_files(dir.path());

        // Rebind a task to an agent nobody configured.
        let tasks_path = dir.path().join("config/tasks.yaml");
        let tasks = std::fs::read_to_string(&tasks_path)
            .unwrap()
            .replace("agent: business_analyst\n", "agent: nobody\n");
        std::fs::write(&tasks_path, tasks).unwrap();

        let err = cmd_check(check_args()).unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::CONFIG_FAILURE);
        assert!(err.to_string().contains("nobody"));
    }

    #[test]
    #[serial]
    fn check_reports_a_missing_agent_entry() {
        let dir = TempDir::new().unwrap();
        let _guard = DirGuard::new(dir.path());
        write_config_files(dir.path());

        // Replace the agents file with one that lacks four required entries.
        let agents_path = dir.path().join("config/agents.yaml");
        std::fs::write(
            &agents_path,
            "market_research_specialist:\n  role: \"Specialist\"\n  goal: \"Research\"\n",
        )
        .unwrap();

        let err = cmd_check(check_args()).unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::CONFIG_FAILURE);
        assert!(err.to_string().contains("no entry for"));
    }
}
