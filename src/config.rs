//! Editor settings supplied by the settings collaborator.
//!
//! Settings arrive as JSON with camelCase keys. Missing keys fall back to the
//! defaults, so an older settings file keeps working after a new key is added.
//! Two environment variables can override the stored values:
//!
//! - `SKETCH_CANVAS_EDITOR`: external editor command template
//! - `SKETCH_CANVAS_IMMEDIATE_PREVIEW`: `true`/`false`/`1`/`0`

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_EXTERNAL_EDITOR: &str = "gedit *ASYPATH";
pub const EDITOR_ENV: &str = "SKETCH_CANVAS_EDITOR";
pub const IMMEDIATE_PREVIEW_ENV: &str = "SKETCH_CANVAS_IMMEDIATE_PREVIEW";

/// Placeholder in the editor template replaced by the open file's path.
const PATH_PLACEHOLDER: &str = "ASYPATH";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Command template for the external editor; `*ASYPATH` marks the file path.
    pub external_editor: String,
    /// Render the selected object with its candidate transform while dragging.
    pub enable_immediate_preview: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self { external_editor: DEFAULT_EXTERNAL_EDITOR.to_string(), enable_immediate_preview: true }
    }
}

impl Settings {
    /// Parse settings JSON, filling missing keys with defaults.
    ///
    /// # Errors
    ///
    /// Returns `Parse` for malformed JSON or mistyped values.
    pub fn from_json(raw: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// # Errors
    ///
    /// Returns `Parse` if serialization fails.
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Apply environment overrides. Unparsable values are logged and ignored.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(env_var)
    }

    /// Apply overrides from an arbitrary lookup (the environment in production).
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(editor) = lookup(EDITOR_ENV) {
            self.external_editor = editor;
        }
        if let Some(raw) = lookup(IMMEDIATE_PREVIEW_ENV) {
            match parse_bool(&raw) {
                Some(enabled) => self.enable_immediate_preview = enabled,
                None => warn!(var = IMMEDIATE_PREVIEW_ENV, value = %raw, "ignoring unparsable override"),
            }
        }
        self
    }

    /// Expand the editor template for `path` into argv words.
    ///
    /// `*ASYPATH` becomes the quoted path; other `*`-prefixed words are dropped.
    #[must_use]
    pub fn editor_command(&self, path: &str) -> Vec<String> {
        self.external_editor
            .split_whitespace()
            .filter_map(|word| match word.strip_prefix('*') {
                Some(PATH_PLACEHOLDER) => Some(format!("\"{path}\"")),
                Some(_) => None,
                None => Some(word.to_string()),
            })
            .collect()
    }
}

fn env_var(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(value) => Some(value),
        Err(std::env::VarError::NotPresent) => None,
        Err(e) => {
            warn!(var = key, error = %e, "ignoring unreadable override");
            None
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
