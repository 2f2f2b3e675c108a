//! Editor configuration
//!
//! Plain serde data with YAML (de)serialization. The core does no file I/O;
//! hosts read the YAML from wherever they keep it and hand over the string.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::editable::EditOptions;

/// Editing preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Spaces per indent level and tab stop
    #[serde(default = "default_tab_width")]
    pub tab_width: usize,
    /// Copy indentation (and open a level after `{([:`) on newline
    #[serde(default = "default_true")]
    pub auto_indent: bool,
    #[serde(default = "default_true")]
    pub auto_pair_brackets: bool,
    /// Edits closer together than this undo as one step
    #[serde(default = "default_undo_coalesce_ms")]
    pub undo_coalesce_ms: u64,
    /// Longest stretch of continuous typing that undoes as one step
    #[serde(default = "default_undo_group_max_ms")]
    pub undo_group_max_ms: u64,
    #[serde(default = "default_undo_limit")]
    pub undo_limit: usize,
    #[serde(default = "default_completion_max_items")]
    pub completion_max_items: usize,
    #[serde(default)]
    pub search_case_sensitive: bool,
    /// Selected theme id (e.g., "default-dark")
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_tab_width() -> usize {
    4
}

fn default_true() -> bool {
    true
}

fn default_undo_coalesce_ms() -> u64 {
    300
}

fn default_undo_group_max_ms() -> u64 {
    2000
}

fn default_undo_limit() -> usize {
    crate::editable::DEFAULT_UNDO_LIMIT
}

fn default_completion_max_items() -> usize {
    crate::completion::DEFAULT_MAX_ITEMS
}

fn default_theme() -> String {
    "default-dark".to_string()
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_width: default_tab_width(),
            auto_indent: true,
            auto_pair_brackets: true,
            undo_coalesce_ms: default_undo_coalesce_ms(),
            undo_group_max_ms: default_undo_group_max_ms(),
            undo_limit: default_undo_limit(),
            completion_max_items: default_completion_max_items(),
            search_case_sensitive: false,
            theme: default_theme(),
        }
    }
}

impl EditorConfig {
    /// Parse from YAML; missing fields take their defaults
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).context("Failed to parse editor config")?;
        tracing::debug!(?config, "loaded config");
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize editor config")
    }

    /// Policy handed to the edit engine
    pub fn edit_options(&self) -> EditOptions {
        EditOptions {
            tab_width: self.tab_width.max(1),
            auto_pair_brackets: self.auto_pair_brackets,
        }
    }

    pub fn undo_coalesce_window(&self) -> Duration {
        Duration::from_millis(self.undo_coalesce_ms)
    }

    pub fn undo_group_max_span(&self) -> Duration {
        Duration::from_millis(self.undo_group_max_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = EditorConfig::from_yaml("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.undo_coalesce_window(), Duration::from_millis(300));
        assert_eq!(config.undo_group_max_span(), Duration::from_millis(2000));
    }

    #[test]
    fn test_partial_yaml() {
        let config = EditorConfig::from_yaml("tab_width: 2\nauto_indent: false\n").unwrap();
        assert_eq!(config.tab_width, 2);
        assert!(!config.auto_indent);
        assert!(config.auto_pair_brackets);
        assert_eq!(config.edit_options().tab_width, 2);
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = EditorConfig {
            theme: "default-light".to_string(),
            search_case_sensitive: true,
            ..EditorConfig::default()
        };
        let yaml = config.to_yaml().unwrap();
        assert_eq!(EditorConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn test_invalid_yaml_errors() {
        assert!(EditorConfig::from_yaml("tab_width: [").is_err());
        assert!(EditorConfig::from_yaml("tab_width: lots").is_err());
    }
}
