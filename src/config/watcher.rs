//! Workspace and Configuration Watcher
//!
//! Watches the workspace root for marker file changes and the configuration
//! file for edits, turning file system events into [`Trigger`]s.

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::marker::MarkerFileSet;
use crate::service::Trigger;

/// Watches marker files and the configuration file
pub struct WorkspaceWatcher {
    /// Workspace folder being watched
    workspace: PathBuf,
    /// Marker files that count as a change
    markers: MarkerFileSet,
    /// Path to the configuration file, if it is watched
    config_path: Option<PathBuf>,
    /// File system watcher
    _watcher: RecommendedWatcher,
    /// Receiver for file system events
    event_rx: Receiver<notify::Result<Event>>,
    /// Flag to indicate if watching is active
    is_watching: Arc<Mutex<bool>>,
}

impl WorkspaceWatcher {
    /// Create a new watcher
    ///
    /// The workspace folder must exist. The configuration file's directory is
    /// watched only if it exists; a missing one is logged and skipped.
    pub fn new(workspace: PathBuf, markers: MarkerFileSet, config_path: Option<PathBuf>) -> Result<Self> {
        let (event_tx, event_rx) = channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            if let Err(e) = event_tx.send(res) {
                error!("Failed to send file watch event: {}", e);
            }
        })
        .map_err(|e| Error::WatchFailed {
            reason: format!("Failed to create watcher: {}", e),
        })?;

        watcher
            .watch(&workspace, RecursiveMode::NonRecursive)
            .map_err(|e| Error::WatchFailed {
                reason: format!("Failed to watch {}: {}", workspace.display(), e),
            })?;
        info!("Watching {} for marker files", workspace.display());

        // Watch the config file's parent directory
        // (watching the file directly can miss some editor save patterns)
        let config_path = match config_path {
            Some(path) => match path.parent().filter(|dir| dir.is_dir()) {
                Some(dir) => match watcher.watch(dir, RecursiveMode::NonRecursive) {
                    Ok(()) => {
                        info!("Watching config file: {}", path.display());
                        Some(path)
                    }
                    Err(e) => {
                        warn!("Not watching {}: {}", path.display(), e);
                        None
                    }
                },
                None => {
                    warn!(
                        "Config directory for {} does not exist, not watching it",
                        path.display()
                    );
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            workspace,
            markers,
            config_path,
            _watcher: watcher,
            event_rx,
            is_watching: Arc::new(Mutex::new(true)),
        })
    }

    /// Drain pending events and return the trigger they add up to
    ///
    /// Several events arriving between polls collapse into one trigger. A
    /// configuration change outranks a folder change, which outranks a marker
    /// file change.
    pub fn poll(&mut self) -> Option<Trigger> {
        let mut pending: Option<Trigger> = None;

        loop {
            match self.event_rx.try_recv() {
                Ok(Ok(event)) => {
                    if let Some(trigger) = self.classify(&event) {
                        debug!("{:?} from {:?}", trigger, event.paths);
                        pending = Some(match pending {
                            Some(current) => current.max(trigger),
                            None => trigger,
                        });
                    }
                }
                Ok(Err(e)) => {
                    error!("File watch error: {}", e);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    error!("File watch channel disconnected");
                    self.set_watching(false);
                    break;
                }
            }
        }

        pending
    }

    /// Map a file system event to the trigger it represents
    pub fn classify(&self, event: &Event) -> Option<Trigger> {
        event
            .paths
            .iter()
            .filter_map(|path| self.classify_path(path))
            .max()
    }

    fn classify_path(&self, path: &Path) -> Option<Trigger> {
        if let Some(config_path) = &self.config_path {
            if same_file(path, config_path) {
                return Some(Trigger::ConfigChanged);
            }
        }

        if same_file(path, &self.workspace) {
            return Some(Trigger::FolderChanged);
        }

        let in_workspace = path
            .parent()
            .is_some_and(|parent| same_file(parent, &self.workspace));
        let is_marker = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.markers.contains(name));

        if in_workspace && is_marker {
            Some(Trigger::FileChanged)
        } else {
            None
        }
    }

    /// Poll in the background, once per second, invoking `on_trigger` for
    /// every coalesced trigger until [`WorkspaceWatcher::stop`] is called or
    /// the event channel closes.
    pub fn run_background(
        mut self,
        on_trigger: impl Fn(Trigger) + Send + 'static,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                "Background watcher started for: {}",
                self.workspace.display()
            );

            loop {
                if let Some(trigger) = self.poll() {
                    on_trigger(trigger);
                }

                if !self.is_watching() {
                    warn!("Workspace watcher stopped");
                    break;
                }

                sleep(Duration::from_secs(1)).await;
            }
        })
    }

    /// Stop watching for changes
    pub fn stop(&mut self) {
        self.set_watching(false);
    }

    /// Check if the watcher is still active
    pub fn is_watching(&self) -> bool {
        self.is_watching.lock().map(|flag| *flag).unwrap_or(false)
    }

    /// Handle that can stop a watcher moved into [`WorkspaceWatcher::run_background`]
    pub fn stop_handle(&self) -> Arc<Mutex<bool>> {
        Arc::clone(&self.is_watching)
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    fn set_watching(&self, value: bool) {
        if let Ok(mut flag) = self.is_watching.lock() {
            *flag = value;
        }
    }
}

/// Compare paths, resolving symlinks when both sides still exist
fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(ca), Ok(cb)) => ca == cb,
        _ => false,
    }
}
