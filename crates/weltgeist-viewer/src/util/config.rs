use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use weltgeist_core::{CoreResult, LayoutMode};

use crate::graph::layout::LayoutConfig;
use crate::graph::timeline::TimeWindow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub layout_mode: LayoutMode,

    pub level_origin: f32,
    pub level_spacing: f32,
    pub lane_spacing: f32,
    pub tie_spacing: f32,
    pub x_origin: f32,
    pub timeline_width: f32,
    pub horizontal_spacing: f32,
    pub vertical_spacing: f32,

    /// Any event date form: "1400", "1400-06", "1400-06-01".
    pub timeline_start: String,
    pub timeline_end: String,

    pub search_limit: usize,
    pub seed_sample_data: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        let layout = LayoutConfig::default();
        Self {
            layout_mode: LayoutMode::Chronological,
            level_origin: layout.level_origin,
            level_spacing: layout.level_spacing,
            lane_spacing: layout.lane_spacing,
            tie_spacing: layout.tie_spacing,
            x_origin: layout.x_origin,
            timeline_width: layout.timeline_width,
            horizontal_spacing: layout.horizontal_spacing,
            vertical_spacing: layout.vertical_spacing,
            timeline_start: "1400-01-01".to_string(),
            timeline_end: "2025-01-01".to_string(),
            search_limit: 50,
            seed_sample_data: true,
        }
    }
}

impl ViewerConfig {
    /// Layout settings described by this config; fails on a malformed time range.
    pub fn layout_config(&self) -> CoreResult<LayoutConfig> {
        Ok(LayoutConfig {
            level_origin: self.level_origin,
            level_spacing: self.level_spacing,
            lane_spacing: self.lane_spacing,
            tie_spacing: self.tie_spacing,
            x_origin: self.x_origin,
            timeline_width: self.timeline_width,
            window: TimeWindow::parse(&self.timeline_start, &self.timeline_end)?,
            horizontal_spacing: self.horizontal_spacing,
            vertical_spacing: self.vertical_spacing,
        })
    }
}

fn config_file_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "weltgeist")?;
    Some(proj.config_dir().join("viewer.toml"))
}

pub fn load_or_default() -> ViewerConfig {
    let Some(path) = config_file_path() else {
        return ViewerConfig::default();
    };
    load_or_default_from_path(&path)
}

pub fn load_or_default_from_path(path: &Path) -> ViewerConfig {
    let Ok(contents) = fs::read_to_string(path) else {
        return ViewerConfig::default();
    };
    match toml::from_str(&contents) {
        Ok(cfg) => cfg,
        Err(err) => {
            tracing::warn!(path = %path.display(), "ignoring unreadable viewer config: {err}");
            ViewerConfig::default()
        }
    }
}

pub fn save(cfg: &ViewerConfig) -> anyhow::Result<()> {
    let Some(path) = config_file_path() else {
        return Err(anyhow::anyhow!("no config directory available"));
    };
    save_to_path(cfg, &path)
}

pub fn save_to_path(cfg: &ViewerConfig, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    let data = toml::to_string_pretty(cfg).context("failed to serialize viewer config")?;
    fs::write(path, data)
        .with_context(|| format!("failed to write viewer config {}", path.display()))?;
    Ok(())
}
