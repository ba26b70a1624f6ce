use camino::{Utf8Path, Utf8PathBuf};
use cast_manifest::{ContentGroup, ContentManifest, MANIFEST_FILE_NAME};
use cast_pipeline::CONTENT_FOLDER;
use colored::Colorize;
use inquire::{validator::Validation, Text};
use miette::IntoDiagnostic;

use crate::errors::CliError;
use crate::println_pad;
use crate::utils::{is_valid_slug, validate_project_name};

/// Group created in every new project.
pub const DEFAULT_GROUP: &str = "base";

#[derive(Debug, Clone)]
pub struct InitProjectArgs {
    pub name: Option<String>,
    pub output_dir: Option<String>,
}

pub fn init_project(args: InitProjectArgs) -> miette::Result<()> {
    let name = match args.name {
        Some(name) => {
            validate_project_name(&name)?;
            name
        }
        None => prompt_project_name()?,
    };

    println_pad!(
        "{} {}",
        "🚀 Initializing new project:".bright_blue().bold(),
        name.bright_cyan().bold()
    );

    let output_dir = match args.output_dir {
        Some(output_dir) => Utf8PathBuf::from(output_dir),
        None => current_dir()?,
    };
    let project_dir = output_dir.join(&name);

    println_pad!(
        "{} {}",
        "📁 Creating project directory at:".bright_yellow(),
        project_dir.as_str().bright_white().bold()
    );

    create_project(&project_dir)?;

    println_pad!(
        "{}\n{} {}",
        "Project initialized successfully!".bright_green().bold(),
        "Location:".bright_green(),
        project_dir.as_str().bright_white().bold()
    );

    Ok(())
}

/// Scaffold `Content/content.json` with one empty group and its folder.
pub fn create_project(project_dir: &Utf8Path) -> miette::Result<Utf8PathBuf> {
    let content_dir = project_dir.join(CONTENT_FOLDER);
    let manifest_path = content_dir.join(MANIFEST_FILE_NAME);
    if manifest_path.exists() {
        return Err(CliError::ProjectAlreadyExists {
            path: project_dir.to_path_buf(),
        }
        .into());
    }

    std::fs::create_dir_all(content_dir.join(DEFAULT_GROUP)).map_err(CliError::from)?;

    let mut manifest = ContentManifest::default();
    manifest
        .content
        .insert(DEFAULT_GROUP.to_string(), ContentGroup::default());
    manifest.save(&manifest_path).into_diagnostic()?;

    Ok(manifest_path)
}

fn current_dir() -> miette::Result<Utf8PathBuf> {
    let dir = std::env::current_dir().map_err(CliError::from)?;
    Utf8PathBuf::from_path_buf(dir).map_err(|path| {
        miette::miette!("Current directory is not valid UTF-8: {}", path.display())
    })
}

fn prompt_project_name() -> miette::Result<String> {
    let validator = |input: &str| {
        if is_valid_slug(input) {
            Ok(Validation::Valid)
        } else {
            Ok(Validation::Invalid(
                "Project name must be alphanumeric and can only contain hyphens (no spaces or special characters)".into()
            ))
        }
    };

    let display_name = Text::new("Enter project name:").prompt().into_diagnostic()?;
    let slugified = slug::slugify(&display_name);

    let name = Text::new("Enter project folder name (no spaces or special characters):")
        .with_validator(validator)
        .with_default(&slugified)
        .with_placeholder(&slugified)
        .prompt()
        .into_diagnostic()?;

    Ok(name)
}
