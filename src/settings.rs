//! Editor settings output
//!
//! The resolved color is written into the editor's `settings.json` under
//! `workbench.colorCustomizations`, setting the active and inactive title bar
//! backgrounds to the same value. Everything else in the file is preserved.
//!
//! Settings files are JSONC: comments and trailing commas are accepted when
//! reading. A file with comments is never rewritten, since the comments would
//! be lost; only an edit that is already in place succeeds there.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::color::HexColor;
use crate::error::{Error, Result};
use crate::platform::{PathOps, Platform};

/// Settings object holding color overrides
pub const COLOR_CUSTOMIZATIONS_KEY: &str = "workbench.colorCustomizations";

/// Title bar background of the focused window
pub const ACTIVE_BACKGROUND_KEY: &str = "titleBar.activeBackground";

/// Title bar background of unfocused windows
pub const INACTIVE_BACKGROUND_KEY: &str = "titleBar.inactiveBackground";

/// Which settings file receives the color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplyScope {
    /// `<workspace>/.vscode/settings.json`
    #[default]
    Workspace,
    /// The user-level settings file
    Global,
}

/// Destination for title bar colors
pub trait SettingsSink: Send + Sync {
    /// Set both title bar keys to `color`
    fn apply(&self, color: &HexColor) -> Result<()>;

    /// Remove both title bar keys
    fn clear(&self) -> Result<()>;
}

/// Picks the [`SettingsSink`] for a scope and workspace
pub trait SettingsLocator: Send + Sync {
    fn sink_for(&self, scope: ApplyScope, workspace: Option<&Path>) -> Result<Box<dyn SettingsSink>>;
}

/// Edits a JSON settings file in place
#[derive(Debug, Clone)]
pub struct SettingsFileWriter {
    path: PathBuf,
}

impl SettingsFileWriter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Settings file for the workspace folder
    pub fn workspace(workspace: &Path) -> Self {
        Self::new(workspace.join(".vscode").join("settings.json"))
    }

    /// User-level settings file
    pub fn global(paths: &dyn PathOps) -> Result<Self> {
        Ok(Self::new(paths.host_settings_dir()?.join("settings.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current top-level object, `None` when the file does not exist
    fn read_settings(&self) -> Result<Option<SettingsDocument>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let (json, has_comments) = strip_jsonc(&content);
        if json.trim().is_empty() {
            return Ok(Some(SettingsDocument {
                settings: Map::new(),
                has_comments,
            }));
        }

        match serde_json::from_str::<Value>(&json) {
            Ok(Value::Object(settings)) => Ok(Some(SettingsDocument {
                settings,
                has_comments,
            })),
            Ok(_) => Err(Error::SettingsParseFailed {
                path: self.path.clone(),
                reason: "top level is not a JSON object".to_string(),
            }),
            Err(e) => Err(Error::SettingsParseFailed {
                path: self.path.clone(),
                reason: format!("not valid JSON or JSONC: {}", e),
            }),
        }
    }

    fn write_document(&self, document: &SettingsDocument) -> Result<()> {
        if document.has_comments {
            return Err(Error::SettingsWriteFailed {
                path: self.path.clone(),
                reason: "file has JSONC comments that rewriting would drop; \
                         set the title bar colors by hand or remove the comments"
                    .to_string(),
            });
        }
        self.write_settings(&document.settings)
    }

    fn write_settings(&self, settings: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::SettingsWriteFailed {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
        }

        let mut content = serde_json::to_string_pretty(settings)?;
        content.push('\n');
        fs::write(&self.path, content).map_err(|e| Error::SettingsWriteFailed {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    fn customizations_mut<'m>(
        &self,
        settings: &'m mut Map<String, Value>,
    ) -> Result<&'m mut Map<String, Value>> {
        settings
            .entry(COLOR_CUSTOMIZATIONS_KEY)
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
            .ok_or_else(|| Error::SettingsParseFailed {
                path: self.path.clone(),
                reason: format!("'{}' is not an object", COLOR_CUSTOMIZATIONS_KEY),
            })
    }
}

impl SettingsSink for SettingsFileWriter {
    fn apply(&self, color: &HexColor) -> Result<()> {
        let mut document = self.read_settings()?.unwrap_or_default();
        let customizations = self.customizations_mut(&mut document.settings)?;

        let value = Value::String(color.to_string());
        let unchanged = customizations.get(ACTIVE_BACKGROUND_KEY) == Some(&value)
            && customizations.get(INACTIVE_BACKGROUND_KEY) == Some(&value);
        if unchanged {
            debug!("{} already set in {}", color, self.path.display());
            return Ok(());
        }

        customizations.insert(ACTIVE_BACKGROUND_KEY.to_string(), value.clone());
        customizations.insert(INACTIVE_BACKGROUND_KEY.to_string(), value);
        self.write_document(&document)?;
        info!("Applied {} to {}", color, self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let Some(mut document) = self.read_settings()? else {
            return Ok(());
        };

        let Some(customizations) = document
            .settings
            .get_mut(COLOR_CUSTOMIZATIONS_KEY)
            .and_then(Value::as_object_mut)
        else {
            return Ok(());
        };

        let removed_active = customizations.shift_remove(ACTIVE_BACKGROUND_KEY).is_some();
        let removed_inactive = customizations.shift_remove(INACTIVE_BACKGROUND_KEY).is_some();
        if !removed_active && !removed_inactive {
            return Ok(());
        }

        if customizations.is_empty() {
            document.settings.shift_remove(COLOR_CUSTOMIZATIONS_KEY);
        }

        self.write_document(&document)?;
        info!("Cleared title bar color in {}", self.path.display());
        Ok(())
    }
}

/// A parsed settings file
#[derive(Debug, Default)]
struct SettingsDocument {
    settings: Map<String, Value>,
    has_comments: bool,
}

/// Turn JSONC into plain JSON by dropping `//` and `/* */` comments and
/// trailing commas. Also reports whether any comment was dropped.
fn strip_jsonc(text: &str) -> (String, bool) {
    let mut json = String::with_capacity(text.len());
    let mut has_comments = false;
    let mut in_string = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_string {
            json.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        json.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                json.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                has_comments = true;
                for c in chars.by_ref() {
                    if c == '\n' {
                        json.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                has_comments = true;
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if c == '\n' {
                        json.push('\n');
                    }
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            _ => json.push(c),
        }
    }

    (remove_trailing_commas(&json), has_comments)
}

fn remove_trailing_commas(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in json.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
        } else if c == ',' {
            let next = json[i + 1..].trim_start().chars().next();
            if matches!(next, Some('}') | Some(']')) {
                continue;
            }
        }
        out.push(c);
    }

    out
}

/// Maps scopes to settings files on disk
pub struct FileSettingsLocator {
    paths: Box<dyn PathOps>,
}

impl FileSettingsLocator {
    pub fn new(paths: Box<dyn PathOps>) -> Self {
        Self { paths }
    }
}

impl Default for FileSettingsLocator {
    fn default() -> Self {
        Self::new(Platform::paths())
    }
}

impl SettingsLocator for FileSettingsLocator {
    fn sink_for(&self, scope: ApplyScope, workspace: Option<&Path>) -> Result<Box<dyn SettingsSink>> {
        match (scope, workspace) {
            (ApplyScope::Global, _) => Ok(Box::new(SettingsFileWriter::global(self.paths.as_ref())?)),
            (ApplyScope::Workspace, Some(workspace)) => {
                Ok(Box::new(SettingsFileWriter::workspace(workspace)))
            }
            (ApplyScope::Workspace, None) => Err(Error::DirectoryNotFound {
                kind: "workspace".to_string(),
            }),
        }
    }
}
