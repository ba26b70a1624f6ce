use camino::Utf8PathBuf;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("No Cast project found at {path}: {reason}")]
    #[diagnostic(
        code(project::not_found),
        help("Pass the folder that contains Content/content.json, or create one with `cast-builder init`")
    )]
    ProjectNotFound { path: Utf8PathBuf, reason: String },

    #[error("Invalid project name: {name}")]
    #[diagnostic(
        code(project::invalid_name),
        help("Project names must be alphanumeric and contain no spaces or special characters")
    )]
    InvalidProjectName {
        name: String,
        #[label("invalid project name")]
        span: Option<SourceSpan>,
    },

    #[error("A project already exists at {path}")]
    #[diagnostic(
        code(project::already_exists),
        help("Choose another name or output directory")
    )]
    ProjectAlreadyExists { path: Utf8PathBuf },

    #[error("Configuration file error: {path}")]
    #[diagnostic(
        code(config::parse_error),
        help("Check cast.toml for syntax errors; every setting is optional")
    )]
    ConfigParseError {
        path: Utf8PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Content build failed")]
    #[diagnostic(
        code(build::failed),
        help("Fix the reported source file or manifest entry and run the build again")
    )]
    BuildFailed {
        #[source]
        source: cast_pipeline::Error,
    },

    #[error("Failed to watch content")]
    #[diagnostic(code(watch::failed))]
    WatchFailed {
        #[source]
        source: cast_pipeline::Error,
    },

    #[error("Failed to read pak file: {path}")]
    #[diagnostic(
        code(pak::read_failed),
        help("Make sure the file exists and was written by cast-builder")
    )]
    PakReadFailed {
        path: Utf8PathBuf,
        #[source]
        source: cast_pak::PakError,
    },

    #[error("IO operation failed")]
    #[diagnostic(code(io::operation_failed))]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl CliError {
    pub fn invalid_project_name(name: String, span: Option<SourceSpan>) -> Self {
        Self::InvalidProjectName { name, span }
    }

    pub fn config_parse_error(path: Utf8PathBuf, source: toml::de::Error) -> Self {
        Self::ConfigParseError { path, source }
    }

    /// Wrap a build error, reporting a missing project as such.
    pub fn build_failed(project_root: &Utf8PathBuf, source: cast_pipeline::Error) -> Self {
        match source {
            cast_pipeline::Error::InvalidProject(reason) => Self::ProjectNotFound {
                path: project_root.clone(),
                reason,
            },
            source => Self::BuildFailed { source },
        }
    }

    /// Wrap a watch error, reporting a missing project as such.
    pub fn watch_failed(project_root: &Utf8PathBuf, source: cast_pipeline::Error) -> Self {
        match source {
            cast_pipeline::Error::InvalidProject(reason) => Self::ProjectNotFound {
                path: project_root.clone(),
                reason,
            },
            source => Self::WatchFailed { source },
        }
    }

    pub fn pak_read_failed(path: Utf8PathBuf, source: cast_pak::PakError) -> Self {
        Self::PakReadFailed { path, source }
    }
}
