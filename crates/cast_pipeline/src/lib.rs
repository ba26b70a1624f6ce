//! Content build pipeline for Cast projects.
//!
//! This crate compiles the sources declared in a project's `content.json` into
//! `.pak` files and keeps those paks up to date while the sources are edited:
//!
//! - **Full builds**: [`ContentBuilder`] rebuilds every group, all or nothing
//! - **Incremental rebuilds**: [`WatchSession`] applies one file event at a time
//! - **File watching**: [`WatchEngine`] feeds file system notifications to a
//!   single worker thread owning the session
//!
//! # Example
//!
//! ```no_run
//! use cast_pipeline::{ContentBuilder, WatchEngine};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = ContentBuilder::new("my-game").build()?;
//! println!("Built {} paks in {:?}", report.paks.len(), report.build_time);
//!
//! let engine = WatchEngine::new("my-game");
//! let handle = engine.start()?;
//! // ... edit files under my-game/Content ...
//! handle.stop()?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod diff;
pub mod error;
pub mod index;
pub mod project;
pub mod session;
pub mod watcher;

#[cfg(test)]
mod test_support;

pub use builder::{BuildProgress, BuildReport, BuildStage, BuiltPak, ContentBuilder};
pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use index::LookupIndex;
pub use project::{ContentPaths, CONTENT_FOLDER};
pub use session::{classify, ContentEvent, EventOutcome, EventTarget, WatchSession};
pub use watcher::{EventTranslator, WatchEngine, WatchHandle, WatchState};
