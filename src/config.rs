use crate::editor::history::DEFAULT_HISTORY_LIMIT;
use serde::{Deserialize, Serialize};
use std::fs;

/// How unrecognized handle names are treated when reading a saved graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandlePolicy {
    /// Unknown or missing names fall back to `out-B` (source) / `in-T` (target).
    #[default]
    Lenient,
    /// Unknown or missing names are a conversion error.
    Strict,
}

/// Editor settings. Every field has a default, so a partial JSON file is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of undo entries kept.
    pub history_limit: usize,
    pub handle_policy: HandlePolicy,
    /// Prefix of client-generated step and transition IDs.
    pub temp_id_prefix: String,
    /// Refuse to save while the validator reports issues.
    pub block_save_on_issues: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            handle_policy: HandlePolicy::default(),
            temp_id_prefix: "temp_".to_string(),
            block_save_on_issues: false,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load editor settings from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }
}
