use camino::Utf8PathBuf;
use cast_pipeline::{BuildReport, BuildStage, ContentBuilder};
use colored::Colorize;

use crate::errors::CliError;
use crate::println_pad;
use crate::utils::load_pipeline_config;

#[derive(Debug, Clone)]
pub struct BuildContentArgs {
    pub project_root: String,
}

pub fn build_content(args: BuildContentArgs) -> miette::Result<()> {
    let project_root = Utf8PathBuf::from(args.project_root);
    let config = load_pipeline_config(&project_root)?;

    println_pad!(
        "{} {}",
        "🔨 Building content:".bright_blue().bold(),
        project_root.as_str().bright_cyan().bold()
    );

    let report = ContentBuilder::new(project_root.clone())
        .with_config(config)
        .with_progress(|progress| {
            if progress.stage == BuildStage::BuildingGroup {
                if let Some(group) = &progress.current_group {
                    println_pad!(
                        "  {} {} {}",
                        "•".bright_cyan(),
                        group.bright_white(),
                        format!("({}/{})", progress.current, progress.total).dimmed()
                    );
                }
            }
        })
        .build()
        .map_err(|e| CliError::build_failed(&project_root, e))?;

    print_build_report(&report);

    Ok(())
}

pub(crate) fn print_build_report(report: &BuildReport) {
    println_pad!("\n{}", "📦 Paks:".bright_yellow().bold());
    for pak in &report.paks {
        println_pad!(
            "  {} {} {}",
            "•".bright_cyan(),
            pak.path.as_str().bright_white(),
            format!("({} resources)", pak.resource_count).dimmed()
        );
    }

    if report.skipped > 0 {
        println_pad!(
            "{} {}",
            "Skipped (no decoder):".bright_yellow(),
            report.skipped.to_string().bright_white()
        );
    }

    println_pad!(
        "{} {} {} {}",
        "Content built successfully!".bright_green().bold(),
        report.resource_count().to_string().bright_white().bold(),
        "resources in".bright_green(),
        format!("{:.2?}", report.build_time).bright_white().bold()
    );
}
