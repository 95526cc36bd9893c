//! Pole and demo settings with TOML persistence.
//!
//! Every section uses `#[serde(default)]`, so a file that only overrides
//! `[view_scale]` or `[lighting]` still loads with the rest at defaults.

use std::path::Path;

use log::warn;
use nalgebra::{Point3, Quaternion, Unit, UnitQuaternion};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lighting::LightingPreset;
use crate::pole::{ObjectData, ViewData, ViewScale};

/// Default drag sensitivity: 90 degrees per 250 pixels.
pub const DEFAULT_ROTATION_SCALE: f32 = 90.0 / 250.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct PoleConfig {
    /// Plain values serialize ahead of the tables below.
    pub object_rotation_scale: RotationScale,
    pub view: ViewSection,
    pub view_scale: ViewScaleSection,
    pub object: ObjectSection,
    pub lighting: LightingSection,
    pub display: DisplaySection,
}

/// Initial camera placement. Orientation is stored as `[w, x, y, z]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewSection {
    pub target: [f32; 3],
    pub orientation: [f32; 4],
    pub radius: f32,
    pub spin_rotation_deg: f32,
}

impl Default for ViewSection {
    fn default() -> Self {
        Self {
            target: [0.0, 0.5, 0.0],
            // 30 degrees down about X.
            orientation: [0.965_925_8, -0.258_819, 0.0, 0.0],
            radius: 20.0,
            spin_rotation_deg: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewScaleSection {
    pub min_radius: f32,
    pub max_radius: f32,
    pub large_radius_delta: f32,
    pub small_radius_delta: f32,
    pub large_pos_offset: f32,
    pub small_pos_offset: f32,
    pub rotation_scale: f32,
}

impl Default for ViewScaleSection {
    fn default() -> Self {
        Self {
            min_radius: 3.0,
            max_radius: 80.0,
            large_radius_delta: 4.0,
            small_radius_delta: 1.0,
            large_pos_offset: 5.0,
            small_pos_offset: 1.0,
            rotation_scale: DEFAULT_ROTATION_SCALE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ObjectSection {
    pub position: [f32; 3],
    pub orientation: [f32; 4],
}

impl Default for ObjectSection {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            orientation: [1.0, 0.0, 0.0, 0.0],
        }
    }
}

/// Degrees per pixel for the object pole
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct RotationScale(pub f32);

impl Default for RotationScale {
    fn default() -> Self {
        Self(DEFAULT_ROTATION_SCALE)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightingSection {
    pub preset: LightingPreset,
    pub gamma: f32,
    pub gamma_correct: bool,
}

impl Default for LightingSection {
    fn default() -> Self {
        Self {
            preset: LightingPreset::Hdr,
            gamma: 2.2,
            gamma_correct: false,
        }
    }
}

/// Terminal output settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplaySection {
    pub target_fps: u32,
    /// Pixel size of one terminal cell, used to turn cell coordinates into
    /// the pixel coordinates the poles expect.
    pub cell_width_px: f32,
    pub cell_height_px: f32,
    pub fov_deg: f32,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            target_fps: 30,
            cell_width_px: 8.0,
            cell_height_px: 16.0,
            fov_deg: 45.0,
        }
    }
}

impl PoleConfig {
    /// Load a config from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))
    }

    /// Save the config as pretty-printed TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| Error::ConfigSerialize(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn view_data(&self) -> ViewData {
        ViewData {
            target: Point3::from(self.view.target),
            orientation: to_unit_quaternion(self.view.orientation, "view.orientation"),
            radius: self.view_scale().clamp_radius(self.view.radius),
            spin_rotation_deg: self.view.spin_rotation_deg,
        }
    }

    /// Pole limits. A swapped min/max pair is put back in order.
    pub fn view_scale(&self) -> ViewScale {
        let s = &self.view_scale;
        let (min_radius, max_radius) = if s.min_radius <= s.max_radius {
            (s.min_radius, s.max_radius)
        } else {
            warn!(
                "view_scale.min_radius {} exceeds max_radius {}; swapping",
                s.min_radius, s.max_radius
            );
            (s.max_radius, s.min_radius)
        };
        ViewScale {
            min_radius,
            max_radius,
            large_radius_delta: s.large_radius_delta,
            small_radius_delta: s.small_radius_delta,
            large_pos_offset: s.large_pos_offset,
            small_pos_offset: s.small_pos_offset,
            rotation_scale: s.rotation_scale,
        }
    }

    pub fn object_data(&self) -> ObjectData {
        ObjectData {
            position: Point3::from(self.object.position),
            orientation: to_unit_quaternion(self.object.orientation, "object.orientation"),
        }
    }
}

fn to_unit_quaternion([w, x, y, z]: [f32; 4], field: &str) -> UnitQuaternion<f32> {
    Unit::try_new(Quaternion::new(w, x, y, z), f32::EPSILON).unwrap_or_else(|| {
        warn!("{field} is not a valid rotation; using identity");
        UnitQuaternion::identity()
    })
}
