use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use directories::{BaseDirs, ProjectDirs};
use egui::{Color32, Stroke};
use serde::Deserialize;
use tracing::{debug, warn};

const CONFIG_FILE_NAME: &str = "mapedit.toml";

fn alpha_to_u8(alpha: f32) -> u8 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        (alpha.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

fn rgba(color: [u8; 3], alpha: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(color[0], color[1], color[2], alpha_to_u8(alpha))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StrokeStyle {
    pub color: [u8; 3],
    pub alpha: f32,
    pub thickness: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: [51, 153, 204],
            alpha: 1.0,
            thickness: 1.25,
        }
    }
}

impl StrokeStyle {
    pub fn color32(&self) -> Color32 {
        rgba(self.color, self.alpha)
    }

    pub fn stroke(&self) -> Stroke {
        Stroke {
            width: self.thickness.max(0.1),
            color: self.color32(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FillStyle {
    pub color: [u8; 3],
    pub alpha: f32,
}

impl Default for FillStyle {
    fn default() -> Self {
        Self {
            color: [255, 255, 255],
            alpha: 0.4,
        }
    }
}

impl FillStyle {
    pub fn color32(&self) -> Color32 {
        rgba(self.color, self.alpha)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PointStyle {
    pub color: [u8; 3],
    pub alpha: f32,
    pub radius: f32,
}

impl Default for PointStyle {
    fn default() -> Self {
        Self {
            color: [51, 153, 204],
            alpha: 1.0,
            radius: 5.0,
        }
    }
}

impl PointStyle {
    pub fn color32(&self) -> Color32 {
        rgba(self.color, self.alpha)
    }

    pub const fn radius(&self) -> f32 {
        self.radius.max(0.1)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    pub enabled: bool,
    /// Snap distance in screen pixels.
    pub pixel_tolerance: f64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            pixel_tolerance: 10.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Initial content of the service URL field.
    pub base_url: String,
    /// Projection code sent with extent queries.
    pub projection: String,
    pub snap: SnapConfig,
    /// Pick and finish distance in screen pixels.
    pub hit_tolerance: f64,
    /// Zoom levels per scroll notch.
    pub scroll_zoom_step: f32,
    pub feature_line: StrokeStyle,
    pub feature_fill: FillStyle,
    pub selected_line: StrokeStyle,
    pub sketch_line: StrokeStyle,
    pub vertex: PointStyle,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            projection: "EPSG:3857".to_string(),
            snap: SnapConfig::default(),
            hit_tolerance: 6.0,
            scroll_zoom_step: 0.5,
            feature_line: StrokeStyle::default(),
            feature_fill: FillStyle::default(),
            selected_line: StrokeStyle {
                color: [0, 153, 255],
                alpha: 1.0,
                thickness: 3.0,
            },
            sketch_line: StrokeStyle {
                color: [255, 165, 0],
                alpha: 0.9,
                thickness: 2.0,
            },
            vertex: PointStyle::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Self {
        for path in Self::candidate_paths() {
            let Ok(contents) = fs::read_to_string(&path) else {
                continue;
            };
            match Self::parse(&contents, &path) {
                Ok(cfg) => {
                    debug!(path = %path.display(), "config loaded");
                    return cfg;
                }
                Err(err) => warn!("{err:#}"),
            }
        }
        Self::default()
    }

    fn parse(contents: &str, path: &Path) -> anyhow::Result<Self> {
        toml::from_str::<Self>(contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    pub fn snap_tolerance(&self) -> f64 {
        self.snap.pixel_tolerance.clamp(0.0, 100.0)
    }

    pub fn hit_tolerance_px(&self) -> f64 {
        self.hit_tolerance.clamp(1.0, 50.0)
    }

    pub fn scroll_zoom_factor(&self) -> f32 {
        self.scroll_zoom_step.clamp(0.05, 4.0)
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(exe_path) = std::env::current_exe()
            && let Some(dir) = exe_path.parent()
        {
            paths.push(dir.join(CONFIG_FILE_NAME));
        }

        if let Some(proj_dirs) = ProjectDirs::from("dev", "Mapedit", "Mapedit") {
            paths.push(proj_dirs.config_dir().join(CONFIG_FILE_NAME));
        }

        if let Some(base_dirs) = BaseDirs::new() {
            paths.push(base_dirs.config_dir().join("mapedit").join(CONFIG_FILE_NAME));
        }

        paths
    }
}
