/// Per-surface lighting math: Phong reflection, HDR tone scaling, gamma
use nalgebra::{Point3, Vector3, Vector4};

use crate::lighting::LightBlock;

/// Which terms of the Phong model contribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightingModel {
    DiffuseOnly,
    DiffuseAndSpecular,
    SpecularOnly,
}

impl LightingModel {
    /// Cycle through the models in display order.
    pub fn next(self) -> Self {
        match self {
            Self::DiffuseAndSpecular => Self::SpecularOnly,
            Self::SpecularOnly => Self::DiffuseOnly,
            Self::DiffuseOnly => Self::DiffuseAndSpecular,
        }
    }
}

/// A surface sample in camera space (the eye sits at the origin)
#[derive(Debug, Clone, Copy)]
pub struct Surface {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

/// Reflected fraction of a light arriving from `to_light` (normalized).
pub fn phong(surface: &Surface, to_light: &Vector3<f32>, model: LightingModel, shininess: f32) -> f32 {
    let normal = surface.normal.normalize();
    let cos_incidence = normal.dot(to_light).max(0.0);

    let specular = if cos_incidence > 0.0 {
        let to_eye = (-surface.position.coords).try_normalize(f32::EPSILON).unwrap_or_else(Vector3::z);
        let reflected = 2.0 * normal.dot(to_light) * normal - to_light;
        to_eye.dot(&reflected).max(0.0).powf(shininess)
    } else {
        0.0
    };

    match model {
        LightingModel::DiffuseOnly => cos_incidence,
        LightingModel::DiffuseAndSpecular => cos_incidence + specular,
        LightingModel::SpecularOnly => specular,
    }
}

/// Inverse-square falloff scaled so intensity halves at the half-light distance.
pub fn attenuate(intensity: f32, distance_sq: f32, attenuation: f32) -> f32 {
    intensity / (1.0 + attenuation * distance_sq)
}

/// Perceived brightness of an RGB(A) color.
pub fn luminance(color: &Vector4<f32>) -> f32 {
    0.2126 * color.x + 0.7152 * color.y + 0.0722 * color.z
}

/// Raise the color channels to `1 / gamma`, leaving alpha untouched.
pub fn gamma_correct(color: &Vector4<f32>, gamma: f32) -> Vector4<f32> {
    let inv = 1.0 / gamma;
    Vector4::new(
        color.x.max(0.0).powf(inv),
        color.y.max(0.0).powf(inv),
        color.z.max(0.0).powf(inv),
        color.w,
    )
}

/// Total brightness of a surface in `[0, 1]`, after HDR scaling and gamma.
pub fn shade(surface: &Surface, block: &LightBlock, model: LightingModel, shininess: f32) -> f32 {
    let mut accumulated = luminance(&block.ambient_intensity);

    for light in &block.lights {
        let position = light.camera_space_position;
        let (to_light, intensity) = if position.w == 0.0 {
            (position.xyz(), luminance(&light.intensity))
        } else {
            let offset = position.xyz() / position.w - surface.position.coords;
            let intensity = attenuate(
                luminance(&light.intensity),
                offset.norm_squared(),
                block.light_attenuation,
            );
            (offset, intensity)
        };
        if let Some(to_light) = to_light.try_normalize(f32::EPSILON) {
            accumulated += intensity * phong(surface, &to_light, model, shininess);
        }
    }

    let max_intensity = if block.max_intensity > 0.0 {
        block.max_intensity
    } else {
        1.0
    };
    let scaled = (accumulated / max_intensity).clamp(0.0, 1.0);
    if block.gamma > 0.0 {
        scaled.powf(1.0 / block.gamma)
    } else {
        scaled
    }
}

/// Gamma correction toggle and exponent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammaSettings {
    pub enabled: bool,
    pub value: f32,
}

impl GammaSettings {
    const STEP: f32 = 0.1;
    const MIN: f32 = 1.0;

    pub fn new(enabled: bool, value: f32) -> Self {
        Self {
            enabled,
            value: value.max(Self::MIN),
        }
    }

    /// Exponent to apply: the configured value when enabled, otherwise 1.
    pub fn effective(&self) -> f32 {
        if self.enabled {
            self.value
        } else {
            1.0
        }
    }

    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    pub fn raise(&mut self) {
        self.value += Self::STEP;
    }

    pub fn lower(&mut self) {
        self.value = (self.value - Self::STEP).max(Self::MIN);
    }
}

impl Default for GammaSettings {
    fn default() -> Self {
        Self::new(false, 2.2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lighting::PerLight;

    fn facing_up() -> Surface {
        Surface {
            position: Point3::new(0.0, 0.0, -5.0),
            normal: Vector3::y(),
        }
    }

    fn block(lights: Vec<PerLight>) -> LightBlock {
        LightBlock {
            ambient_intensity: Vector4::zeros(),
            light_attenuation: 0.0,
            max_intensity: 1.0,
            gamma: 1.0,
            lights,
        }
    }

    #[test]
    fn test_diffuse_follows_incidence() {
        let surface = facing_up();
        let overhead = phong(&surface, &Vector3::y(), LightingModel::DiffuseOnly, 4.0);
        assert!((overhead - 1.0).abs() < 1e-6);

        let grazing = Vector3::new(1.0, 1.0, 0.0).normalize();
        let slanted = phong(&surface, &grazing, LightingModel::DiffuseOnly, 4.0);
        assert!((slanted - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-5);

        let below = phong(&surface, &-Vector3::y(), LightingModel::DiffuseAndSpecular, 4.0);
        assert_eq!(below, 0.0);
    }

    #[test]
    fn test_specular_peaks_at_mirror_direction() {
        // Light reflected straight back to the eye.
        let surface = Surface {
            position: Point3::new(0.0, 0.0, -5.0),
            normal: Vector3::z(),
        };
        let specular = phong(&surface, &Vector3::z(), LightingModel::SpecularOnly, 8.0);
        assert!((specular - 1.0).abs() < 1e-5);

        let off_axis = Vector3::new(0.5, 0.0, 1.0).normalize();
        let weaker = phong(&surface, &off_axis, LightingModel::SpecularOnly, 8.0);
        assert!(weaker < specular);
    }

    #[test]
    fn test_model_cycle() {
        let start = LightingModel::DiffuseAndSpecular;
        assert_eq!(start.next().next().next(), start);
    }

    #[test]
    fn test_attenuation_halves_at_half_distance() {
        let attenuation = 1.0 / (70.0 * 70.0);
        let halved = attenuate(2.0, 70.0 * 70.0, attenuation);
        assert!((halved - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_gamma_correct_keeps_alpha() {
        let color = Vector4::new(0.25, 1.0, 0.0, 0.5);
        let corrected = gamma_correct(&color, 2.0);
        assert!((corrected - Vector4::new(0.5, 1.0, 0.0, 0.5)).norm() < 1e-6);
    }

    #[test]
    fn test_shade_directional_and_hdr_scaling() {
        let sun = PerLight {
            camera_space_position: Vector4::new(0.0, 1.0, 0.0, 0.0),
            intensity: Vector4::new(2.0, 2.0, 2.0, 1.0),
        };
        let mut lights = block(vec![sun]);
        let surface = facing_up();

        assert_eq!(shade(&surface, &lights, LightingModel::DiffuseOnly, 4.0), 1.0);

        lights.max_intensity = 4.0;
        let half = shade(&surface, &lights, LightingModel::DiffuseOnly, 4.0);
        assert!((half - 0.5).abs() < 1e-5);

        lights.gamma = 2.0;
        let corrected = shade(&surface, &lights, LightingModel::DiffuseOnly, 4.0);
        assert!((corrected - 0.5_f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_shade_point_light_attenuates() {
        let near = PerLight {
            camera_space_position: Vector4::new(0.0, 1.0, -5.0, 1.0),
            intensity: Vector4::new(0.5, 0.5, 0.5, 1.0),
        };
        let far = PerLight {
            camera_space_position: Vector4::new(0.0, 10.0, -5.0, 1.0),
            ..near
        };
        let mut near_block = block(vec![near]);
        near_block.light_attenuation = 0.1;
        let mut far_block = block(vec![far]);
        far_block.light_attenuation = 0.1;

        let surface = facing_up();
        let bright = shade(&surface, &near_block, LightingModel::DiffuseOnly, 4.0);
        let dim = shade(&surface, &far_block, LightingModel::DiffuseOnly, 4.0);
        assert!(bright > dim);
        assert!(dim > 0.0);
    }

    #[test]
    fn test_gamma_settings() {
        let mut gamma = GammaSettings::default();
        assert_eq!(gamma.effective(), 1.0);
        assert!(gamma.toggle());
        assert!((gamma.effective() - 2.2).abs() < 1e-6);

        for _ in 0..30 {
            gamma.lower();
        }
        assert_eq!(gamma.value, 1.0);
        gamma.raise();
        assert!((gamma.value - 1.1).abs() < 1e-6);
    }
}
