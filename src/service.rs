//! Refresh, reset and add-rule actions
//!
//! [`TintService`] ties resolution to the configuration store and the settings
//! output. Every way a refresh can be requested (startup, file change, folder
//! change, configuration change, manual) goes through [`TintService::refresh`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::color::HexColor;
use crate::config::loader::ConfigLoader;
use crate::config::Config;
use crate::diagnostics::{DiagnosticSink, TracingDiagnostics};
use crate::error::Result;
use crate::pattern::RuleSet;
use crate::platform::{FilesystemOps, Platform};
use crate::resolver::{ColorResolution, ColorResolver, ColorSource};
use crate::rules;
use crate::settings::{FileSettingsLocator, SettingsLocator};

/// Why a refresh was requested
///
/// Ordered by how much they invalidate: when several arrive together only the
/// greatest needs handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Trigger {
    Startup,
    Manual,
    FileChanged,
    FolderChanged,
    ConfigChanged,
}

impl Trigger {
    /// Triggers that still apply when `auto_apply` is off
    pub fn is_manual(self) -> bool {
        matches!(self, Trigger::Manual)
    }
}

/// What a refresh did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A color was resolved and written
    Applied { color: HexColor, source: ColorSource },
    /// Nothing resolved; the current appearance was left alone
    Unchanged,
    /// No workspace folder was open
    NoWorkspace,
    /// Automatic refresh is disabled and the trigger was not manual
    Skipped,
}

impl RefreshOutcome {
    pub fn status_message(&self) -> String {
        match self {
            RefreshOutcome::Applied { color, source } => {
                format!("Title bar color {} from {}", color, source)
            }
            RefreshOutcome::Unchanged => "No title bar color applies".to_string(),
            RefreshOutcome::NoWorkspace => "No workspace folder open".to_string(),
            RefreshOutcome::Skipped => "Automatic apply is disabled".to_string(),
        }
    }
}

/// Only the first folder of a multi-folder workspace is considered
pub fn first_folder(folders: &[PathBuf]) -> Option<&Path> {
    folders.first().map(PathBuf::as_path)
}

/// Title bar color actions over one configuration store
pub struct TintService {
    loader: ConfigLoader,
    config: Config,
    filesystem: Box<dyn FilesystemOps>,
    settings: Box<dyn SettingsLocator>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl TintService {
    /// Load configuration through `loader` and use the platform defaults
    pub fn new(mut loader: ConfigLoader) -> Result<Self> {
        let config = loader.load()?;
        Ok(Self::with_parts(
            loader,
            config,
            Platform::filesystem(),
            Box::new(FileSettingsLocator::default()),
            Arc::new(TracingDiagnostics),
        ))
    }

    pub fn with_parts(
        loader: ConfigLoader,
        config: Config,
        filesystem: Box<dyn FilesystemOps>,
        settings: Box<dyn SettingsLocator>,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            loader,
            config,
            filesystem,
            settings,
            diagnostics,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Configuration file this service reads and writes
    pub fn config_path(&self) -> PathBuf {
        self.loader.config_path()
    }

    /// Re-read the configuration file
    pub fn reload_config(&mut self) -> Result<()> {
        self.config = self.loader.load()?;
        debug!("Configuration reloaded");
        Ok(())
    }

    /// Resolve without touching any settings
    pub fn resolve(&self, folders: &[PathBuf]) -> ColorResolution {
        match first_folder(folders) {
            Some(workspace) => self.resolve_folder(workspace),
            None => ColorResolution::Absent,
        }
    }

    fn resolve_folder(&self, workspace: &Path) -> ColorResolution {
        ColorResolver::new(self.filesystem.as_ref(), self.diagnostics.as_ref()).resolve(
            workspace,
            self.config.marker_files,
            &self.config.path_colors,
            &self.config.match_type,
            self.config.case_sensitive,
        )
    }

    /// Resolve and apply the color for the first folder
    ///
    /// An absent result leaves the current appearance as it is.
    pub fn refresh(&self, trigger: Trigger, folders: &[PathBuf]) -> Result<RefreshOutcome> {
        if !self.config.auto_apply && !trigger.is_manual() {
            debug!("Skipping {:?} refresh, auto_apply is off", trigger);
            return Ok(RefreshOutcome::Skipped);
        }

        let Some(workspace) = first_folder(folders) else {
            debug!("{:?} refresh without a workspace folder", trigger);
            return Ok(RefreshOutcome::NoWorkspace);
        };

        match self.resolve_folder(workspace) {
            ColorResolution::Absent => {
                debug!("No color for {}", workspace.display());
                Ok(RefreshOutcome::Unchanged)
            }
            ColorResolution::Present { color, source } => {
                let sink = self
                    .settings
                    .sink_for(self.config.apply_scope, Some(workspace))?;
                sink.apply(&color)?;
                info!("{:?}: {} from {}", trigger, color, source);
                Ok(RefreshOutcome::Applied { color, source })
            }
        }
    }

    /// Remove the applied color in the configured scope
    pub fn reset(&self, folders: &[PathBuf]) -> Result<()> {
        let sink = self
            .settings
            .sink_for(self.config.apply_scope, first_folder(folders))?;
        sink.clear()?;
        info!("Title bar color reset");
        Ok(())
    }

    /// Validate and store a new path rule in the global configuration
    ///
    /// The rule is added on top of the configuration file as it is on disk,
    /// so rules edited in since the last load are kept. Nothing is written
    /// when the rule is rejected or the file no longer parses. The caller
    /// decides whether to refresh afterwards.
    pub fn add_rule(&mut self, pattern: &str, color: &str) -> Result<&RuleSet> {
        let mut config = if self.loader.config_path().exists() {
            self.loader.load()?
        } else {
            self.config.clone()
        };
        let updated = rules::add_rule(&config.path_colors, pattern, color)?;

        config.path_colors = updated;
        let path = self.loader.save(&config)?;
        info!("Added path rule '{}' to {}", pattern.trim(), path.display());

        self.config = config;
        Ok(&self.config.path_colors)
    }
}
