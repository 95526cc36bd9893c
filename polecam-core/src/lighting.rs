/// Day/night light timeline: a looping sun plus point lights on paths
use std::collections::HashMap;

use nalgebra::{Matrix4, Vector3, Vector4};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::keyframe::{Keyframe, KeyframeSampler};
use crate::timer::{Timer, TimerKind};
use crate::transform::axis_rotation;

/// Distance at which a point light's intensity is halved
pub const HALF_LIGHT_DISTANCE: f32 = 70.0;
pub const LIGHT_ATTENUATION: f32 = 1.0 / (HALF_LIGHT_DISTANCE * HALF_LIGHT_DISTANCE);

/// Seconds of real time per simulated day
const SUN_DAY_SECS: f32 = 30.0;
/// Tilt keeping the sun from passing exactly overhead
const SUN_TILT_DEG: f32 = 5.0;

fn sky_daylight() -> Vector4<f32> {
    Vector4::new(0.65, 0.65, 1.0, 1.0)
}

fn grey(v: f32) -> Vector4<f32> {
    Vector4::new(v, v, v, 1.0)
}

fn black() -> Vector4<f32> {
    grey(0.0)
}

/// Sun state at one time of day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunlightKey {
    /// Time of day in `[0, 1)`, where 0 is noon.
    pub norm_time: f32,
    pub ambient: Vector4<f32>,
    pub sunlight: Vector4<f32>,
    pub background: Vector4<f32>,
    pub max_intensity: f32,
}

impl SunlightKey {
    /// `hours` counts from noon.
    pub fn at_hour(
        hours: f32,
        ambient: Vector4<f32>,
        sunlight: Vector4<f32>,
        background: Vector4<f32>,
        max_intensity: f32,
    ) -> Self {
        Self {
            norm_time: hours / 24.0,
            ambient,
            sunlight,
            background,
            max_intensity,
        }
    }

    /// Day cycle with moderate HDR sunlight.
    pub fn hdr_day() -> Vec<Self> {
        let dusk_ambient = Vector4::new(0.225, 0.075, 0.075, 1.0);
        let dusk_light = Vector4::new(0.45, 0.15, 0.15, 1.0);
        let dusk_sky = Vector4::new(0.5, 0.1, 0.1, 1.0);
        vec![
            Self::at_hour(0.0, grey(0.6), grey(1.8), sky_daylight(), 3.0),
            Self::at_hour(4.5, grey(0.6), grey(1.8), sky_daylight(), 3.0),
            Self::at_hour(6.5, dusk_ambient, dusk_light, dusk_sky, 1.5),
            Self::at_hour(8.0, black(), black(), black(), 1.0),
            Self::at_hour(18.0, black(), black(), black(), 1.0),
            Self::at_hour(19.5, dusk_ambient, dusk_light, dusk_sky, 1.5),
            Self::at_hour(20.5, grey(0.6), grey(1.8), sky_daylight(), 3.0),
        ]
    }

    /// Day cycle with bright sunlight meant to be viewed gamma corrected.
    pub fn gamma_day() -> Vec<Self> {
        let sunlight = grey(6.5);
        let bright_ambient = grey(0.4);
        let dusk_ambient = Vector4::new(0.01, 0.025, 0.025, 1.0);
        let dusk_light = Vector4::new(2.5, 0.2, 0.2, 1.0);
        let dusk_sky = Vector4::new(0.5, 0.1, 0.1, 1.0);
        vec![
            Self::at_hour(0.0, bright_ambient, sunlight, sky_daylight(), 10.0),
            Self::at_hour(4.5, bright_ambient, sunlight, sky_daylight(), 10.0),
            Self::at_hour(6.5, dusk_ambient, dusk_light, dusk_sky, 5.0),
            Self::at_hour(8.0, black(), black(), black(), 3.0),
            Self::at_hour(18.0, black(), black(), black(), 3.0),
            Self::at_hour(19.5, dusk_ambient, dusk_light, dusk_sky, 5.0),
            Self::at_hour(20.5, bright_ambient, sunlight, sky_daylight(), 10.0),
        ]
    }
}

/// Named sunlight setups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightingPreset {
    Hdr,
    Gamma,
}

impl LightingPreset {
    pub fn sunlight_keys(self) -> Vec<SunlightKey> {
        match self {
            Self::Hdr => SunlightKey::hdr_day(),
            Self::Gamma => SunlightKey::gamma_day(),
        }
    }

    pub fn point_light_intensities(self) -> [Vector4<f32>; 3] {
        [
            grey(0.6),
            Vector4::new(0.0, 0.0, 0.7, 1.0),
            Vector4::new(0.7, 0.0, 0.0, 1.0),
        ]
    }
}

/// Which timers a pause/rewind command applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTarget {
    All,
    Sun,
    Lights,
}

impl TimerTarget {
    fn includes_sun(self) -> bool {
        matches!(self, Self::All | Self::Sun)
    }

    fn includes_lights(self) -> bool {
        matches!(self, Self::All | Self::Lights)
    }
}

/// A point light travelling along a closed path at constant speed
#[derive(Debug, Clone)]
pub struct PointLight {
    path: KeyframeSampler<Vector3<f32>>,
    timer: Timer,
    intensity: Vector4<f32>,
}

impl PointLight {
    pub fn new(points: &[Vector3<f32>], loop_secs: f32, intensity: Vector4<f32>) -> Result<Self> {
        Ok(Self {
            path: KeyframeSampler::constant_velocity(points, true)?,
            timer: Timer::new(TimerKind::Loop, loop_secs),
            intensity,
        })
    }

    pub fn world_position(&self) -> Vector3<f32> {
        self.path.sample(self.timer.alpha())
    }

    pub fn intensity(&self) -> Vector4<f32> {
        self.intensity
    }
}

/// One light as seen from the camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerLight {
    /// `w == 0` for directional lights, `w == 1` for positional ones.
    pub camera_space_position: Vector4<f32>,
    pub intensity: Vector4<f32>,
}

/// All lighting inputs for one frame, in camera space
#[derive(Debug, Clone, PartialEq)]
pub struct LightBlock {
    pub ambient_intensity: Vector4<f32>,
    pub light_attenuation: f32,
    pub max_intensity: f32,
    pub gamma: f32,
    /// The sun first, then the point lights.
    pub lights: Vec<PerLight>,
}

/// Time-driven lighting state
#[derive(Debug, Clone)]
pub struct LightTimeline {
    sun_timer: Timer,
    ambient: KeyframeSampler<Vector4<f32>>,
    sunlight: KeyframeSampler<Vector4<f32>>,
    background: KeyframeSampler<Vector4<f32>>,
    max_intensity: KeyframeSampler<f32>,
    point_lights: Vec<PointLight>,
    extra_timers: HashMap<String, Timer>,
    attenuation: f32,
}

impl LightTimeline {
    pub fn new(sunlight: &[SunlightKey], point_lights: Vec<PointLight>) -> Result<Self> {
        let (ambient, sun, background, max_intensity) = build_samplers(sunlight)?;
        Ok(Self {
            sun_timer: Timer::new(TimerKind::Loop, SUN_DAY_SECS),
            ambient,
            sunlight: sun,
            background,
            max_intensity,
            point_lights,
            extra_timers: HashMap::new(),
            attenuation: LIGHT_ATTENUATION,
        })
    }

    pub fn set_sunlight(&mut self, keys: &[SunlightKey]) -> Result<()> {
        let (ambient, sun, background, max_intensity) = build_samplers(keys)?;
        self.ambient = ambient;
        self.sunlight = sun;
        self.background = background;
        self.max_intensity = max_intensity;
        Ok(())
    }

    /// Switch sunlight and point light colors to a preset.
    pub fn apply_preset(&mut self, preset: LightingPreset) -> Result<()> {
        self.set_sunlight(&preset.sunlight_keys())?;
        for (light, intensity) in self
            .point_lights
            .iter_mut()
            .zip(preset.point_light_intensities())
        {
            light.intensity = intensity;
        }
        log::debug!("lighting preset switched to {:?}", preset);
        Ok(())
    }

    pub fn set_attenuation(&mut self, attenuation: f32) {
        self.attenuation = attenuation;
    }

    pub fn update_time(&mut self, dt: f32) {
        self.sun_timer.update(dt);
        for timer in self.light_timers_mut() {
            timer.update(dt);
        }
    }

    pub fn set_pause(&mut self, target: TimerTarget, paused: bool) {
        if target.includes_sun() {
            self.sun_timer.set_pause(paused);
        }
        if target.includes_lights() {
            for timer in self.light_timers_mut() {
                timer.set_pause(paused);
            }
        }
    }

    /// Flip the pause state of `target` and return the new state.
    pub fn toggle_pause(&mut self, target: TimerTarget) -> bool {
        let paused = !self.is_paused(target);
        self.set_pause(target, paused);
        paused
    }

    pub fn is_paused(&self, target: TimerTarget) -> bool {
        if target.includes_sun() {
            return self.sun_timer.is_paused();
        }
        self.point_lights
            .first()
            .map(|light| light.timer.is_paused())
            .or_else(|| self.extra_timers.values().next().map(Timer::is_paused))
            .unwrap_or(false)
    }

    pub fn rewind(&mut self, target: TimerTarget, secs: f32) {
        if target.includes_sun() {
            self.sun_timer.rewind(secs);
        }
        if target.includes_lights() {
            for timer in self.light_timers_mut() {
                timer.rewind(secs);
            }
        }
    }

    pub fn fast_forward(&mut self, target: TimerTarget, secs: f32) {
        if target.includes_sun() {
            self.sun_timer.fast_forward(secs);
        }
        if target.includes_lights() {
            for timer in self.light_timers_mut() {
                timer.fast_forward(secs);
            }
        }
    }

    /// Position in the day cycle, 0 at noon.
    pub fn sun_alpha(&self) -> f32 {
        self.sun_timer.alpha()
    }

    /// World-space direction towards the sun (`w == 0`).
    pub fn sun_direction(&self) -> Vector4<f32> {
        let angle = std::f32::consts::TAU * self.sun_alpha();
        let direction = Vector3::new(angle.sin(), angle.cos(), 0.0);
        let tilted = axis_rotation(&Vector3::y(), SUN_TILT_DEG) * direction;
        tilted.push(0.0)
    }

    pub fn sunlight_intensity(&self) -> Vector4<f32> {
        self.sunlight.sample(self.sun_alpha())
    }

    pub fn ambient_intensity(&self) -> Vector4<f32> {
        self.ambient.sample(self.sun_alpha())
    }

    pub fn background_color(&self) -> Vector4<f32> {
        self.background.sample(self.sun_alpha())
    }

    pub fn max_intensity(&self) -> f32 {
        self.max_intensity.sample(self.sun_alpha())
    }

    /// Simulated wall-clock time as `(hours, minutes)`.
    pub fn sun_time(&self) -> (u32, u32) {
        let mut hours = self.sun_alpha() * 24.0 + 12.0;
        if hours >= 24.0 {
            hours -= 24.0;
        }
        let whole_hours = hours.floor();
        let minutes = ((hours - whole_hours) * 60.0).floor();
        (whole_hours as u32, minutes as u32)
    }

    pub fn point_light_count(&self) -> usize {
        self.point_lights.len()
    }

    pub fn world_light_position(&self, index: usize) -> Result<Vector3<f32>> {
        self.point_light(index).map(PointLight::world_position)
    }

    pub fn point_light_intensity(&self, index: usize) -> Result<Vector4<f32>> {
        self.point_light(index).map(PointLight::intensity)
    }

    pub fn set_point_light_intensity(&mut self, index: usize, intensity: Vector4<f32>) -> Result<()> {
        let count = self.point_lights.len();
        let light = self
            .point_lights
            .get_mut(index)
            .ok_or(Error::LightIndex { index, count })?;
        light.intensity = intensity;
        Ok(())
    }

    /// Add a named timer that follows the light timers' pause and seek commands.
    pub fn create_timer(&mut self, name: &str, kind: TimerKind, secs: f32) {
        self.extra_timers.insert(name.to_owned(), Timer::new(kind, secs));
    }

    pub fn timer_value(&self, name: &str) -> Option<f32> {
        self.extra_timers.get(name).map(Timer::alpha)
    }

    /// Lighting inputs for a frame rendered with `world_to_camera`.
    pub fn light_block(&self, world_to_camera: &Matrix4<f32>, gamma: f32) -> LightBlock {
        let mut lights = Vec::with_capacity(self.point_lights.len() + 1);
        lights.push(PerLight {
            camera_space_position: world_to_camera * self.sun_direction(),
            intensity: self.sunlight_intensity(),
        });
        lights.extend(self.point_lights.iter().map(|light| PerLight {
            camera_space_position: world_to_camera * light.world_position().push(1.0),
            intensity: light.intensity,
        }));

        LightBlock {
            ambient_intensity: self.ambient_intensity(),
            light_attenuation: self.attenuation,
            max_intensity: self.max_intensity(),
            gamma,
            lights,
        }
    }

    fn point_light(&self, index: usize) -> Result<&PointLight> {
        self.point_lights.get(index).ok_or(Error::LightIndex {
            index,
            count: self.point_lights.len(),
        })
    }

    fn light_timers_mut(&mut self) -> impl Iterator<Item = &mut Timer> {
        self.point_lights
            .iter_mut()
            .map(|light| &mut light.timer)
            .chain(self.extra_timers.values_mut())
    }
}

type SunSamplers = (
    KeyframeSampler<Vector4<f32>>,
    KeyframeSampler<Vector4<f32>>,
    KeyframeSampler<Vector4<f32>>,
    KeyframeSampler<f32>,
);

fn build_samplers(keys: &[SunlightKey]) -> Result<SunSamplers> {
    let track = |value: fn(&SunlightKey) -> Vector4<f32>| {
        KeyframeSampler::timed(
            keys.iter().map(|key| Keyframe::new(key.norm_time, value(key))).collect(),
            true,
        )
    };
    let max_intensity = KeyframeSampler::timed(
        keys.iter()
            .map(|key| Keyframe::new(key.norm_time, key.max_intensity))
            .collect(),
        true,
    )?;
    Ok((
        track(|key| key.ambient)?,
        track(|key| key.sunlight)?,
        track(|key| key.background)?,
        max_intensity,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_light() -> PointLight {
        PointLight::new(
            &[
                Vector3::new(0.0, 1.0, 0.0),
                Vector3::new(10.0, 1.0, 0.0),
                Vector3::new(10.0, 1.0, 10.0),
                Vector3::new(0.0, 1.0, 10.0),
            ],
            8.0,
            grey(0.5),
        )
        .unwrap()
    }

    fn timeline() -> LightTimeline {
        LightTimeline::new(&SunlightKey::hdr_day(), vec![square_light()]).unwrap()
    }

    #[test]
    fn test_empty_sunlight_is_rejected() {
        assert!(LightTimeline::new(&[], Vec::new()).is_err());
    }

    #[test]
    fn test_noon_values() {
        let lights = timeline();
        assert_eq!(lights.background_color(), sky_daylight());
        assert_eq!(lights.max_intensity(), 3.0);
        assert_eq!(lights.sun_time(), (12, 0));

        let sun = lights.sun_direction();
        assert!((sun - Vector4::new(0.0, 1.0, 0.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn test_sun_sets_over_the_day() {
        let mut lights = timeline();
        lights.update_time(7.5);
        assert_eq!(lights.sun_time(), (18, 0));

        let sun = lights.sun_direction();
        assert!(sun.y.abs() < 1e-5);
        assert_eq!(sun.w, 0.0);
        assert!((sun.xyz().norm() - 1.0).abs() < 1e-5);

        lights.update_time(7.5);
        assert_eq!(lights.sun_time(), (0, 0));
        assert_eq!(lights.sunlight_intensity(), black());
        assert_eq!(lights.max_intensity(), 1.0);
    }

    #[test]
    fn test_sun_time_wraps_past_midnight() {
        let mut lights = timeline();
        lights.update_time(22.5);
        assert_eq!(lights.sun_time(), (6, 0));
    }

    #[test]
    fn test_point_light_follows_path() {
        let mut lights = timeline();
        assert_eq!(lights.world_light_position(0).unwrap(), Vector3::new(0.0, 1.0, 0.0));
        lights.update_time(2.0);
        let position = lights.world_light_position(0).unwrap();
        assert!((position - Vector3::new(10.0, 1.0, 0.0)).norm() < 1e-4);
    }

    #[test]
    fn test_pause_sun_only() {
        let mut lights = timeline();
        assert!(lights.toggle_pause(TimerTarget::Sun));
        assert!(lights.is_paused(TimerTarget::Sun));
        assert!(!lights.is_paused(TimerTarget::Lights));

        lights.update_time(2.0);
        assert_eq!(lights.sun_alpha(), 0.0);
        assert!(lights.world_light_position(0).unwrap().x > 9.9);

        assert!(!lights.toggle_pause(TimerTarget::All));
        assert!(!lights.is_paused(TimerTarget::Sun));
    }

    #[test]
    fn test_pause_lights_only() {
        let mut lights = timeline();
        lights.set_pause(TimerTarget::Lights, true);
        lights.update_time(3.0);
        assert!(lights.sun_alpha() > 0.0);
        assert_eq!(lights.world_light_position(0).unwrap(), Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_rewind_and_fast_forward_targets() {
        let mut lights = timeline();
        lights.fast_forward(TimerTarget::Sun, 15.0);
        assert!((lights.sun_alpha() - 0.5).abs() < 1e-6);
        assert_eq!(lights.world_light_position(0).unwrap(), Vector3::new(0.0, 1.0, 0.0));

        lights.fast_forward(TimerTarget::All, 2.0);
        lights.rewind(TimerTarget::Lights, 2.0);
        assert_eq!(lights.world_light_position(0).unwrap(), Vector3::new(0.0, 1.0, 0.0));
        assert!(lights.sun_alpha() > 0.5);
    }

    #[test]
    fn test_extra_timers() {
        let mut lights = timeline();
        assert_eq!(lights.timer_value("tetra"), None);

        lights.create_timer("tetra", TimerKind::Loop, 2.5);
        lights.update_time(1.25);
        assert!((lights.timer_value("tetra").unwrap() - 0.5).abs() < 1e-6);

        lights.set_pause(TimerTarget::Lights, true);
        lights.update_time(1.0);
        assert!((lights.timer_value("tetra").unwrap() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_point_light_index_errors() {
        let mut lights = timeline();
        assert!(matches!(
            lights.set_point_light_intensity(3, grey(1.0)),
            Err(Error::LightIndex { index: 3, count: 1 })
        ));
        assert!(lights.world_light_position(1).is_err());

        lights.set_point_light_intensity(0, grey(0.9)).unwrap();
        assert_eq!(lights.point_light_intensity(0).unwrap(), grey(0.9));
    }

    #[test]
    fn test_presets() {
        let mut lights = timeline();
        lights.apply_preset(LightingPreset::Gamma).unwrap();
        assert_eq!(lights.max_intensity(), 10.0);
        assert_eq!(lights.sunlight_intensity(), grey(6.5));
        assert_eq!(lights.point_light_intensity(0).unwrap(), grey(0.6));

        lights.apply_preset(LightingPreset::Hdr).unwrap();
        assert_eq!(lights.max_intensity(), 3.0);
    }

    #[test]
    fn test_light_block_in_camera_space() {
        let lights = timeline();
        let world_to_camera = Matrix4::new_translation(&Vector3::new(0.0, 0.0, -5.0));
        let block = lights.light_block(&world_to_camera, 2.2);

        assert_eq!(block.lights.len(), 2);
        assert_eq!(block.gamma, 2.2);
        assert_eq!(block.light_attenuation, LIGHT_ATTENUATION);

        // Directions ignore the camera translation, positions do not.
        let sun = block.lights[0].camera_space_position;
        assert!((sun - Vector4::new(0.0, 1.0, 0.0, 0.0)).norm() < 1e-5);
        let point = block.lights[1].camera_space_position;
        assert!((point - Vector4::new(0.0, 1.0, -5.0, 1.0)).norm() < 1e-5);
    }
}
