// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Orgchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Editor configuration: node sizes, spacings and gesture timings.
//!
//! Every field has a default, so a partial JSON document (or `{}`) is a valid
//! configuration.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub layout: LayoutConfig,
    pub drag: DragConfig,
    /// Label given to nodes created by "add child".
    pub default_child_label: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            drag: DragConfig::default(),
            default_child_label: "Subsidiary".to_owned(),
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|source| ConfigError::Json { path: None, source })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        serde_json::from_str(&json)
            .map_err(|source| ConfigError::Json { path: Some(path.to_path_buf()), source })
    }
}

/// Fixed node geometry and spacing used by both layout passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub node_width: f64,
    pub node_height: f64,
    /// Horizontal gap between neighbours of one rank (rank pass).
    pub node_separation: f64,
    /// Vertical gap between ranks.
    pub rank_separation: f64,
    /// Horizontal gap between siblings (centering pass).
    pub sibling_gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 200.0,
            node_height: 54.0,
            node_separation: 50.0,
            rank_separation: 100.0,
            sibling_gap: 16.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    pub click_delay_ms: u64,
    /// `0` processes every pointer move immediately.
    pub move_debounce_ms: u64,
    pub preview_spacing: f64,
    pub preview_width: f64,
    pub preview_height: f64,
    pub dimmed_opacity: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            click_delay_ms: 300,
            move_debounce_ms: 0,
            preview_spacing: 60.0,
            preview_width: 100.0,
            preview_height: 27.0,
            dimmed_opacity: 0.3,
        }
    }
}

impl DragConfig {
    pub fn click_delay(&self) -> Duration {
        Duration::from_millis(self.click_delay_ms)
    }

    pub fn move_debounce(&self) -> Duration {
        Duration::from_millis(self.move_debounce_ms)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Json { path: Option<PathBuf>, source: serde_json::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path: Some(path), source } => {
                write!(f, "json error at {path:?}: {source}")
            }
            Self::Json { path: None, source } => write!(f, "json error: {source}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}
