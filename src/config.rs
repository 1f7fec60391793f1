//! Configuration persistence for seamweave settings

use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Serializable color representation for config storage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl ShapeColor {
    /// Build a color from 8-bit channels
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Convert to image crate RGBA format (0-255)
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            255,
        ]
    }
}

/// Where exported collages are written when no explicit path is given
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SaveLocation {
    #[default]
    Pictures,
    Documents,
}

/// Editor configuration loaded from `<config_dir>/seamweave/config.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Canvas width in logical units; height follows the aspect ratio
    pub canvas_width: f32,
    /// Oversampling multiplier used by export
    pub export_pixel_density: f32,
    /// Piece background and unselected seam stroke (must match)
    pub seam_color: ShapeColor,
    /// Canvas background outside every piece
    pub canvas_color: ShapeColor,
    /// Outline color of the selected piece
    pub selection_color: ShapeColor,
    /// Seam stroke width for unselected pieces
    pub seam_width: f32,
    /// Outline width for the selected piece
    pub selection_width: f32,
    /// Radius of vertex drag handles
    pub vertex_handle_radius: f32,
    pub vertex_handle_color: ShapeColor,
    /// Radius of triangle split handles
    pub split_handle_radius: f32,
    pub split_handle_color: ShapeColor,
    /// File name used for exports
    pub export_file_name: String,
    /// Prefix the export name with a local timestamp
    pub export_timestamped: bool,
    pub save_location: SaveLocation,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            export_pixel_density: 3.0,
            // Light neutral gray; a sub-pixel gap between pieces shows this
            seam_color: ShapeColor::from_rgb8(0xf5, 0xf5, 0xf5),
            canvas_color: ShapeColor::from_rgb8(0xff, 0xff, 0xff),
            selection_color: ShapeColor::from_rgb8(0x18, 0x90, 0xff),
            seam_width: 0.8,
            selection_width: 3.0,
            vertex_handle_radius: 6.0,
            vertex_handle_color: ShapeColor::from_rgb8(0xff, 0x4d, 0x4f),
            split_handle_radius: 8.0,
            split_handle_color: ShapeColor::from_rgb8(0xff, 0x85, 0xc0),
            export_file_name: "seamweave_collage.png".to_string(),
            export_timestamped: false,
            save_location: SaveLocation::Pictures,
        }
    }
}

impl EditorConfig {
    /// Application directory name under the user config dir
    pub const ID: &'static str = "seamweave";

    /// Default config file location
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::ID).join("config.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            log::warn!("Could not determine config directory, using defaults");
            return Self::default();
        };
        if !path.exists() {
            let config = Self::default();
            config.save();
            return config;
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:?}", err);
                Self::default()
            }
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &std::path::Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config.sanitized())
    }

    /// Save configuration to disk
    pub fn save(&self) {
        let Some(path) = Self::path() else {
            log::error!("Could not determine config directory for saving");
            return;
        };
        if let Err(err) = self.save_to(&path) {
            log::error!("Failed to save config: {:?}", err);
        }
    }

    pub fn save_to(&self, path: &std::path::Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Replace non-positive sizes with their defaults
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.canvas_width.is_finite() && self.canvas_width > 0.0) {
            log::warn!("Ignoring invalid canvas width {}", self.canvas_width);
            self.canvas_width = defaults.canvas_width;
        }
        if !(self.export_pixel_density.is_finite() && self.export_pixel_density > 0.0) {
            log::warn!("Ignoring invalid export density {}", self.export_pixel_density);
            self.export_pixel_density = defaults.export_pixel_density;
        }
        if self.export_file_name.trim().is_empty() {
            self.export_file_name = defaults.export_file_name;
        }
        self
    }
}
