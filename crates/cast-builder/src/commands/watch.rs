use std::io::{self, BufRead};

use camino::Utf8PathBuf;
use cast_pipeline::{ContentEvent, EventOutcome, WatchEngine};
use colored::Colorize;

use crate::commands::build::print_build_report;
use crate::errors::CliError;
use crate::println_pad;
use crate::utils::load_pipeline_config;

#[derive(Debug, Clone)]
pub struct WatchContentArgs {
    pub project_root: String,
}

pub fn watch_content(args: WatchContentArgs) -> miette::Result<()> {
    let project_root = Utf8PathBuf::from(args.project_root);
    let config = load_pipeline_config(&project_root)?;

    println_pad!(
        "{} {}",
        "👀 Watching content:".bright_blue().bold(),
        project_root.as_str().bright_cyan().bold()
    );

    let engine = WatchEngine::new(project_root.clone())
        .with_config(config)
        .with_outcome(print_outcome);

    let handle = engine
        .start()
        .map_err(|e| CliError::watch_failed(&project_root, e))?;

    print_build_report(handle.initial_build());
    println_pad!(
        "{}",
        "Waiting for changes. Type q and press Enter to stop.".dimmed()
    );

    wait_for_quit(io::stdin().lock()).map_err(CliError::from)?;

    handle
        .stop()
        .map_err(|e| CliError::watch_failed(&project_root, e))?;
    println_pad!("{}", "Stopped watching.".bright_green().bold());

    Ok(())
}

fn print_outcome(event: &ContentEvent, result: &cast_pipeline::Result<EventOutcome>) {
    match result {
        Ok(EventOutcome::Ignored) => {}
        Ok(outcome @ EventOutcome::ManifestReloaded { failed, .. }) if !failed.is_empty() => {
            println_pad!(
                "{} {} {}",
                "⚠".bright_yellow(),
                outcome.to_string().bright_yellow(),
                format!("({})", event).dimmed()
            )
        }
        Ok(outcome) => println_pad!(
            "{} {} {}",
            "✔".bright_green(),
            outcome.to_string().bright_white(),
            format!("({})", event).dimmed()
        ),
        Err(err) => println_pad!(
            "{} {} {}",
            "✖".bright_red(),
            err.to_string().bright_red(),
            format!("({})", event).dimmed()
        ),
    }
}

/// Block until a line reading `q` arrives or the input closes.
fn wait_for_quit(input: impl BufRead) -> io::Result<()> {
    for line in input.lines() {
        if line?.trim().eq_ignore_ascii_case("q") {
            break;
        }
    }

    Ok(())
}
