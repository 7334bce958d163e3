//! The `run` command: execute the pipeline end to end.

use crate::cli::RunArgs;
use crate::commands::Wiring;
use crate::error::Result;
use crate::events::RunLog;
use crate::runtime::CommandRuntime;
use std::time::Duration;

pub fn cmd_run(args: RunArgs) -> Result<()> {
    let mut wiring = Wiring::resolve(&args.config)?;

    if args.quiet {
        for agent in &mut wiring.agents {
            agent.verbose = false;
        }
    }

    if let Some(output) = &args.output
        && let Some(terminal) = wiring.tasks.last_mut()
    {
        terminal.output_file = Some(output.clone());
    }

    let crew = wiring.into_crew()?;

    let mut runtime = CommandRuntime::new(&args.runner, &args.work_dir)
        .with_timeout(Duration::from_secs(args.timeout));
    let mut log = RunLog::new(args.work_dir.join("events.ndjson"));

    let outcome = crew.run(&mut runtime, &mut log)?;

    match &outcome.report_path {
        Some(path) => println!("Report written to {}", path.display()),
        None => println!("{}", outcome.final_output),
    }

    Ok(())
}
