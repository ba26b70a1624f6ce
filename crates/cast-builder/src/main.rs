use clap::builder::{styling::AnsiColor, Styles};
use clap::ColorChoice;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use commands::{
    build_content, info_pak, init_project, watch_content, BuildContentArgs, InfoPakArgs,
    InitProjectArgs, WatchContentArgs,
};
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod errors;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Print debug logs from the pipeline
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new project with an empty content manifest
    Init {
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        output_dir: Option<String>,
    },
    /// Build every content group into a pak
    Build {
        /// The project directory (the one containing Content/)
        #[arg(default_value = ".")]
        project_root: String,
    },
    /// Build once, then rebuild paks as content files change
    Watch {
        /// The project directory (the one containing Content/)
        #[arg(default_value = ".")]
        project_root: String,
    },
    /// Show information about a pak file
    Info {
        /// The path to the pak file
        #[arg(short, long)]
        file_path: String,
    },
}

fn parse_args() -> Args {
    // Configure colored/styled help output
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default())
        .placeholder(AnsiColor::Blue.on_default());

    let matches = Args::command()
        .styles(styles)
        .color(ColorChoice::Auto)
        .get_matches();

    Args::from_arg_matches(&matches).expect("failed to parse arguments")
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "cast_builder=debug,cast_pipeline=debug"
    } else {
        "cast_builder=info,cast_pipeline=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn main() -> Result<()> {
    let args = parse_args();

    init_logging(args.verbose);

    match args.command {
        Commands::Init { name, output_dir } => {
            init_project(InitProjectArgs { name, output_dir })
        }
        Commands::Build { project_root } => build_content(BuildContentArgs { project_root }),
        Commands::Watch { project_root } => watch_content(WatchContentArgs { project_root }),
        Commands::Info { file_path } => info_pak(InfoPakArgs { file_path }),
    }
}
