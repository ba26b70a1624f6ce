//! File watching and the watch worker.
//!
//! [`WatchEngine::start`] runs a full build, subscribes to the content folder and
//! hands every notification to a single worker thread that owns the
//! [`WatchSession`]. Notifications are queued on an unbounded channel and applied
//! strictly in order; a failing event is logged and the worker moves on.

use crate::builder::{BuildReport, ContentBuilder};
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::project::ContentPaths;
use crate::session::{ContentEvent, EventOutcome, WatchSession};
use camino::Utf8PathBuf;
use crossbeam_channel::{select, Receiver, Sender};
use notify::event::{MetadataKind, ModifyKind, RenameMode};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Lifecycle of a [`WatchEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Uninitialized,
    /// Running the initial full build.
    Building,
    Watching,
    Stopped,
}

/// Turns raw `notify` events into [`ContentEvent`]s.
///
/// Renames may arrive as a `From` half followed by a `To` half, as a single
/// `Both` event, or as all three. Halves are paired into one
/// [`ContentEvent::Renamed`] and a `Both` repeating the rename just paired is
/// dropped. A `From` half that is not followed by its `To` half means the file
/// left the watched folder and is reported as a deletion.
#[derive(Debug, Default)]
pub struct EventTranslator {
    pending_from: Option<Utf8PathBuf>,
    last_rename: Option<(Utf8PathBuf, Utf8PathBuf)>,
}

impl EventTranslator {
    pub fn translate(&mut self, event: notify::Event) -> Vec<ContentEvent> {
        let paths: Vec<Utf8PathBuf> = event
            .paths
            .into_iter()
            .filter_map(|p| match Utf8PathBuf::from_path_buf(p) {
                Ok(path) => Some(path),
                Err(p) => {
                    tracing::debug!("Ignoring non UTF-8 path {}", p.display());
                    None
                }
            })
            .collect();

        let mut events = Vec::new();

        if event.kind != EventKind::Modify(ModifyKind::Name(RenameMode::To)) {
            if let Some(from) = self.pending_from.take() {
                events.push(ContentEvent::Deleted(from));
            }
        }

        match event.kind {
            EventKind::Create(_) => {
                events.extend(paths.into_iter().map(ContentEvent::Created));
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
                self.pending_from = paths.into_iter().next();
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
                for to in paths {
                    match self.pending_from.take() {
                        Some(from) => {
                            self.last_rename = Some((from.clone(), to.clone()));
                            events.push(ContentEvent::Renamed { from, to });
                        }
                        None => events.push(ContentEvent::Created(to)),
                    }
                }
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
                if let [from, to] = paths.as_slice() {
                    let pair = (from.clone(), to.clone());
                    if self.last_rename.take().as_ref() != Some(&pair) {
                        events.push(ContentEvent::Renamed {
                            from: pair.0,
                            to: pair.1,
                        });
                    }
                }
            }
            EventKind::Modify(ModifyKind::Name(_)) => {
                // Backends that cannot tell the halves apart report each path separately.
                for path in paths {
                    if path.exists() {
                        events.push(ContentEvent::Created(path));
                    } else {
                        events.push(ContentEvent::Deleted(path));
                    }
                }
            }
            EventKind::Modify(
                ModifyKind::Data(_)
                | ModifyKind::Any
                | ModifyKind::Other
                | ModifyKind::Metadata(MetadataKind::WriteTime),
            ) => {
                events.extend(paths.into_iter().map(ContentEvent::Changed));
            }
            EventKind::Remove(_) => {
                events.extend(paths.into_iter().map(ContentEvent::Deleted));
            }
            _ => {}
        }

        events
    }
}

type OutcomeCallback = Arc<dyn Fn(&ContentEvent, &Result<EventOutcome>) + Send + Sync>;

/// Runs the initial build and then keeps a project's paks in sync with its sources.
pub struct WatchEngine {
    project_root: Utf8PathBuf,
    config: PipelineConfig,
    state: Arc<Mutex<WatchState>>,
    outcome_callback: Option<OutcomeCallback>,
}

impl WatchEngine {
    pub fn new(project_root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            config: PipelineConfig::default(),
            state: Arc::new(Mutex::new(WatchState::Uninitialized)),
            outcome_callback: None,
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a callback invoked on the worker thread after every applied event.
    pub fn with_outcome<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ContentEvent, &Result<EventOutcome>) + Send + Sync + 'static,
    {
        self.outcome_callback = Some(Arc::new(callback));
        self
    }

    pub fn state(&self) -> WatchState {
        read_state(&self.state)
    }

    /// Build the project, subscribe to its content folder and start the worker.
    ///
    /// If the build or the subscription fails the engine returns to
    /// [`WatchState::Uninitialized`].
    pub fn start(&self) -> Result<WatchHandle> {
        set_state(&self.state, WatchState::Building);

        match self.start_inner() {
            Ok(handle) => {
                set_state(&self.state, WatchState::Watching);
                Ok(handle)
            }
            Err(err) => {
                set_state(&self.state, WatchState::Uninitialized);
                Err(err)
            }
        }
    }

    fn start_inner(&self) -> Result<WatchHandle> {
        let paths = ContentPaths::resolve(self.project_root.clone())?;

        let initial_build = ContentBuilder::new(self.project_root.clone())
            .with_config(self.config.clone())
            .build()?;

        let session = WatchSession::new(paths.clone(), self.config.clone())?;

        let (event_tx, event_rx) = crossbeam_channel::unbounded();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            // The worker may already be gone during shutdown.
            let _ = event_tx.send(res);
        })?;
        watcher.watch(paths.content_dir.as_std_path(), RecursiveMode::Recursive)?;

        tracing::info!("Watching {}", paths.content_dir);

        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded(1);
        let callback = self.outcome_callback.clone();
        let worker = thread::Builder::new()
            .name("cast-watch".to_string())
            .spawn(move || run_worker(session, event_rx, shutdown_rx, callback))?;

        Ok(WatchHandle {
            watcher: Some(watcher),
            shutdown_tx,
            worker: Some(worker),
            state: Arc::clone(&self.state),
            initial_build,
        })
    }
}

/// A running watch. Dropping the handle stops the watch as well.
pub struct WatchHandle {
    watcher: Option<RecommendedWatcher>,
    shutdown_tx: Sender<()>,
    worker: Option<JoinHandle<()>>,
    state: Arc<Mutex<WatchState>>,
    initial_build: BuildReport,
}

impl WatchHandle {
    pub fn state(&self) -> WatchState {
        read_state(&self.state)
    }

    /// Report of the full build that ran before watching started.
    pub fn initial_build(&self) -> &BuildReport {
        &self.initial_build
    }

    /// Unsubscribe from the file system and wait for the worker to finish the
    /// event it is currently applying.
    pub fn stop(mut self) -> Result<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<()> {
        // Dropping the watcher ends the notification stream.
        self.watcher.take();

        let Some(worker) = self.worker.take() else {
            return Ok(());
        };

        let _ = self.shutdown_tx.send(());
        let joined = worker.join();
        set_state(&self.state, WatchState::Stopped);
        tracing::info!("Stopped watching");

        joined.map_err(|_| Error::WorkerPanicked)
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            tracing::error!("Failed to stop watch worker: {}", err);
        }
    }
}

/// Drain raw notifications until shutdown, applying them to `session` in order.
pub(crate) fn run_worker(
    mut session: WatchSession,
    events: Receiver<notify::Result<notify::Event>>,
    shutdown: Receiver<()>,
    callback: Option<OutcomeCallback>,
) {
    let mut translator = EventTranslator::default();

    loop {
        select! {
            recv(shutdown) -> _ => break,
            recv(events) -> msg => match msg {
                Ok(Ok(raw)) => {
                    for event in translator.translate(raw) {
                        apply_event(&mut session, &event, callback.as_deref());
                    }
                }
                Ok(Err(err)) => tracing::error!("Watch error: {}", err),
                Err(_) => break,
            },
        }
    }
}

fn apply_event(
    session: &mut WatchSession,
    event: &ContentEvent,
    callback: Option<&(dyn Fn(&ContentEvent, &Result<EventOutcome>) + Send + Sync)>,
) {
    let start_time = Instant::now();
    let result = session.apply(event);
    let elapsed = start_time.elapsed();

    match &result {
        Ok(EventOutcome::Ignored) => tracing::debug!("Ignored {}", event),
        Ok(outcome) => tracing::info!("{} ({} in {:?})", outcome, event, elapsed),
        Err(err) => tracing::error!("Failed to handle {}: {}", event, err),
    }

    if let Some(callback) = callback {
        callback(event, &result);
    }
}

fn read_state(state: &Mutex<WatchState>) -> WatchState {
    *state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn set_state(state: &Mutex<WatchState>, value: WatchState) {
    *state.lock().unwrap_or_else(PoisonError::into_inner) = value;
}
