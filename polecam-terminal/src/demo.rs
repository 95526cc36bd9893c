/// Terminal-independent demo state: the poles, the light timeline and the
/// per-frame toggles driven by keyboard commands
use log::{debug, info, warn};
use nalgebra::{Matrix4, Vector3};
use polecam_core::config::PoleConfig;
use polecam_core::lighting::{LightBlock, LightTimeline, LightingPreset, PointLight, TimerTarget};
use polecam_core::shading::{GammaSettings, LightingModel};
use polecam_core::timer::TimerKind;
use polecam_core::{MatrixStack, Mesh, MouseButton, MousePole, PoleEvent, Result};

use crate::input::Command;
use crate::scene::{Scene, SceneState};

/// Name of the timer that spins the tetrahedron.
pub const TETRA_TIMER: &str = "tetra";

const TETRA_SPIN_SECS: f32 = 6.0;
const SEEK_SECS: f32 = 1.0;

/// Toggles and selections read by the renderer. Only [`Demo::update`]
/// changes them.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameState {
    pub timer_target: TimerTarget,
    pub preset: LightingPreset,
    pub gamma: GammaSettings,
    pub lighting_model: LightingModel,
    pub show_target: bool,
    /// Status line message, e.g. the time of day after a space press.
    pub message: Option<String>,
    pub running: bool,
}

impl FrameState {
    fn new(config: &PoleConfig) -> Self {
        Self {
            timer_target: TimerTarget::All,
            preset: config.lighting.preset,
            gamma: GammaSettings::new(config.lighting.gamma_correct, config.lighting.gamma),
            lighting_model: LightingModel::DiffuseAndSpecular,
            show_target: false,
            message: None,
            running: true,
        }
    }
}

pub struct Demo {
    view_pole: MousePole,
    object_pole: MousePole,
    lights: LightTimeline,
    scene: Scene,
    frame: FrameState,
    pending: Vec<Command>,
}

impl Demo {
    pub fn new(config: &PoleConfig) -> Result<Self> {
        let view_pole = MousePole::view(config.view_data(), config.view_scale(), MouseButton::Left);
        let mut object_pole = MousePole::object(
            config.object_data(),
            config.object_rotation_scale.0,
            MouseButton::Right,
        );
        object_pole.sync_view(&view_pole);

        let mut lights = LightTimeline::new(&config.lighting.preset.sunlight_keys(), point_lights()?)?;
        lights.apply_preset(config.lighting.preset)?;
        lights.create_timer(TETRA_TIMER, TimerKind::Loop, TETRA_SPIN_SECS);

        Ok(Self {
            view_pole,
            object_pole,
            lights,
            scene: Scene::new(),
            frame: FrameState::new(config),
            pending: Vec::new(),
        })
    }

    /// Forward a mouse event to both poles; each ignores buttons it isn't bound to.
    pub fn handle_pole_event(&mut self, event: &PoleEvent) {
        self.view_pole.handle(event);
        self.object_pole.handle(event);
        self.object_pole.sync_view(&self.view_pole);
    }

    /// Queue a keyboard command for the next update.
    pub fn queue(&mut self, command: Command) {
        self.pending.push(command);
    }

    /// Apply queued commands, then advance time by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        let commands = std::mem::take(&mut self.pending);
        for command in commands {
            self.apply(command, dt);
        }
        self.lights.update_time(dt);
    }

    fn apply(&mut self, command: Command, dt: f32) {
        let target = self.frame.timer_target;
        match command {
            Command::Quit => self.frame.running = false,
            Command::Move { key, fine } => {
                self.view_pole.handle(&PoleEvent::Key {
                    key,
                    fine,
                    frame_duration: dt,
                });
            }
            Command::TogglePause => {
                let paused = self.lights.toggle_pause(target);
                self.frame.message = Some(format!(
                    "{:?} timers {}",
                    target,
                    if paused { "paused" } else { "running" }
                ));
            }
            Command::Rewind => self.lights.rewind(target, SEEK_SECS),
            Command::FastForward => self.lights.fast_forward(target, SEEK_SECS),
            Command::SelectTarget(next) => {
                self.frame.timer_target = next;
                self.frame.message = Some(format!("Timer target: {next:?}"));
            }
            Command::Preset(preset) => match self.lights.apply_preset(preset) {
                Ok(()) => {
                    self.frame.preset = preset;
                    self.frame.gamma.enabled = preset == LightingPreset::Gamma;
                    self.frame.message = Some(format!("Lighting preset: {preset:?}"));
                }
                Err(err) => warn!("could not apply {preset:?} preset: {err}"),
            },
            Command::ToggleGamma => {
                let enabled = self.frame.gamma.toggle();
                debug!("gamma correction {}", if enabled { "on" } else { "off" });
            }
            Command::GammaUp => self.frame.gamma.raise(),
            Command::GammaDown => self.frame.gamma.lower(),
            Command::CycleLightingModel => {
                self.frame.lighting_model = self.frame.lighting_model.next();
            }
            Command::ToggleTargetMarker => self.frame.show_target = !self.frame.show_target,
            Command::ShowSunTime => {
                let (hours, minutes) = self.lights.sun_time();
                info!("sun time {hours:02}:{minutes:02}");
                self.frame.message = Some(format!("{hours:02}:{minutes:02}"));
            }
        }
    }

    pub fn frame(&self) -> &FrameState {
        &self.frame
    }

    pub fn view_pole(&self) -> &MousePole {
        &self.view_pole
    }

    pub fn object_pole(&self) -> &MousePole {
        &self.object_pole
    }

    pub fn lights(&self) -> &LightTimeline {
        &self.lights
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view_pole.calc_matrix()
    }

    pub fn light_block(&self) -> LightBlock {
        self.lights
            .light_block(&self.view_matrix(), self.frame.gamma.effective())
    }

    /// Walk the scene from the current camera, handing each mesh and its
    /// model-view matrix to `draw`.
    pub fn draw_scene<F>(&self, draw: F)
    where
        F: FnMut(&Mesh, &Matrix4<f32>),
    {
        let state = SceneState {
            object: self.object_pole.calc_matrix(),
            tetra_alpha: self.lights.timer_value(TETRA_TIMER).unwrap_or(0.0),
            target: self.frame.show_target.then(|| self.view_pole.position()),
        };
        let mut stack = MatrixStack::with_base(self.view_matrix());
        self.scene.draw(&mut stack, &state, draw);
    }
}

/// Three coloured lights circling the scene on closed paths.
fn point_lights() -> Result<Vec<PointLight>> {
    let intensities = LightingPreset::Hdr.point_light_intensities();
    Ok(vec![
        PointLight::new(
            &[
                Vector3::new(-10.0, 3.0, -8.0),
                Vector3::new(-2.0, 3.0, -8.0),
                Vector3::new(-2.0, 3.0, 0.0),
                Vector3::new(-10.0, 3.0, 0.0),
            ],
            15.0,
            intensities[0],
        )?,
        PointLight::new(
            &[
                Vector3::new(0.0, 2.0, 8.0),
                Vector3::new(8.0, 2.0, 8.0),
                Vector3::new(8.0, 6.0, 0.0),
                Vector3::new(0.0, 6.0, 0.0),
            ],
            25.0,
            intensities[1],
        )?,
        PointLight::new(
            &[
                Vector3::new(-8.0, 1.0, 6.0),
                Vector3::new(0.0, 4.0, 2.0),
                Vector3::new(6.0, 1.0, -6.0),
            ],
            10.0,
            intensities[2],
        )?,
    ])
}
