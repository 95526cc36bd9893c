/// Mouse poles: orbit controllers for cameras and manipulable objects
///
/// A pole keeps a pivot position, a unit quaternion orientation and, for
/// cameras, a distance from the pivot. Dragging with the bound mouse button
/// rotates it, the wheel zooms and the movement keys slide the pivot.
use nalgebra::{Matrix4, Point2, Point3, UnitQuaternion, Vector2, Vector3};

use crate::input::{Modifiers, MouseButton, PoleEvent};
use crate::transform::axis_rotation;

/// Camera placement around a target point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewData {
    pub target: Point3<f32>,
    /// Camera-to-world rotation of the camera around the target.
    pub orientation: UnitQuaternion<f32>,
    pub radius: f32,
    pub spin_rotation_deg: f32,
}

/// Object placement in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectData {
    pub position: Point3<f32>,
    pub orientation: UnitQuaternion<f32>,
}

/// Step sizes and limits for a pole
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewScale {
    pub min_radius: f32,
    pub max_radius: f32,
    pub large_radius_delta: f32,
    pub small_radius_delta: f32,
    pub large_pos_offset: f32,
    pub small_pos_offset: f32,
    /// Degrees of rotation per pixel of drag.
    pub rotation_scale: f32,
}

impl ViewScale {
    /// Scale for poles that only rotate; radius is pinned at zero.
    pub fn rotation_only(rotation_scale: f32) -> Self {
        Self {
            min_radius: 0.0,
            max_radius: 0.0,
            large_radius_delta: 0.0,
            small_radius_delta: 0.0,
            large_pos_offset: 0.0,
            small_pos_offset: 0.0,
            rotation_scale,
        }
    }

    pub fn clamp_radius(&self, radius: f32) -> f32 {
        radius.max(self.min_radius).min(self.max_radius)
    }
}

/// Which output matrix a pole produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoleKind {
    /// World-to-camera matrix of a camera orbiting its target.
    View,
    /// Model matrix of an object rotating about its own position.
    Object,
}

/// How cursor movement is turned into rotation during a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateMode {
    /// Horizontal and vertical movement both rotate.
    DualAxis,
    /// Only the dominant screen axis of the movement rotates.
    SingleAxis,
    /// Rotate about the view direction.
    Spin,
    /// Roll the camera's up vector (view poles only).
    ChangeUp,
}

impl RotateMode {
    /// Pick the drag mode from the modifiers held at button press.
    ///
    /// Shift is the fine-step modifier and never changes the mode. Holding
    /// both Ctrl and Alt is not a defined combination and rotates freely.
    pub fn select(kind: PoleKind, modifiers: Modifiers) -> Self {
        let ctrl = modifiers.contains(Modifiers::CTRL);
        let alt = modifiers.contains(Modifiers::ALT);
        match (ctrl, alt) {
            (true, false) => Self::SingleAxis,
            (false, true) => match kind {
                PoleKind::View => Self::ChangeUp,
                PoleKind::Object => Self::Spin,
            },
            _ => Self::DualAxis,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct DragSession {
    mode: RotateMode,
    start_cursor: Point2<f32>,
    start_orientation: UnitQuaternion<f32>,
    start_spin_deg: f32,
}

/// Orbit controller shared by cameras and objects
#[derive(Debug, Clone)]
pub struct MousePole {
    kind: PoleKind,
    button: MouseButton,
    scale: ViewScale,
    initial: ViewData,

    position: Point3<f32>,
    orientation: UnitQuaternion<f32>,
    radius: f32,
    spin_rotation_deg: f32,
    /// World-to-camera rotation that object drags are expressed in.
    view_rotation: UnitQuaternion<f32>,
    drag: Option<DragSession>,
}

impl MousePole {
    /// Create a camera pole orbiting `data.target`.
    pub fn view(data: ViewData, scale: ViewScale, button: MouseButton) -> Self {
        let initial = ViewData {
            radius: scale.clamp_radius(data.radius),
            ..data
        };
        Self {
            kind: PoleKind::View,
            button,
            scale,
            initial,
            position: initial.target,
            orientation: initial.orientation,
            radius: initial.radius,
            spin_rotation_deg: initial.spin_rotation_deg,
            view_rotation: UnitQuaternion::identity(),
            drag: None,
        }
    }

    /// Create an object pole rotating in place at `data.position`.
    pub fn object(data: ObjectData, rotation_scale: f32, button: MouseButton) -> Self {
        let initial = ViewData {
            target: data.position,
            orientation: data.orientation,
            radius: 0.0,
            spin_rotation_deg: 0.0,
        };
        Self {
            kind: PoleKind::Object,
            button,
            scale: ViewScale::rotation_only(rotation_scale),
            initial,
            position: data.position,
            orientation: data.orientation,
            radius: 0.0,
            spin_rotation_deg: 0.0,
            view_rotation: UnitQuaternion::identity(),
            drag: None,
        }
    }

    /// Forward one input event.
    pub fn handle(&mut self, event: &PoleEvent) {
        match *event {
            PoleEvent::Button {
                button,
                pressed,
                modifiers,
                position,
            } => self.mouse_click(button, pressed, modifiers, position),
            PoleEvent::Move { position } => self.mouse_move(position),
            PoleEvent::Wheel {
                direction,
                modifiers,
                position,
            } => self.mouse_wheel(direction, modifiers, position),
            PoleEvent::Key {
                key,
                fine,
                frame_duration,
            } => self.char_press(key, fine, frame_duration),
        }
    }

    pub fn mouse_click(
        &mut self,
        button: MouseButton,
        pressed: bool,
        modifiers: Modifiers,
        position: Point2<f32>,
    ) {
        if button != self.button {
            return;
        }

        if pressed {
            if self.drag.is_some() {
                log::trace!("{:?} pole: press ignored, drag already active", self.kind);
                return;
            }
            let mode = RotateMode::select(self.kind, modifiers);
            log::debug!(
                "{:?} pole: begin {:?} drag at ({}, {})",
                self.kind,
                mode,
                position.x,
                position.y
            );
            self.drag = Some(DragSession {
                mode,
                start_cursor: position,
                start_orientation: self.orientation,
                start_spin_deg: self.spin_rotation_deg,
            });
        } else {
            // The last move already committed the orientation.
            match self.drag.take() {
                Some(session) => log::debug!("{:?} pole: end {:?} drag", self.kind, session.mode),
                None => log::trace!("{:?} pole: release without press ignored", self.kind),
            }
        }
    }

    pub fn mouse_move(&mut self, position: Point2<f32>) {
        let Some(session) = self.drag else {
            return;
        };

        let diff: Vector2<f32> = position - session.start_cursor;
        let yaw_deg = diff.x * self.scale.rotation_scale;
        let pitch_deg = diff.y * self.scale.rotation_scale;

        if self.kind == PoleKind::View && session.mode == RotateMode::ChangeUp {
            self.spin_rotation_deg = session.start_spin_deg + yaw_deg;
            return;
        }

        let screen = screen_rotation(session.mode, yaw_deg, pitch_deg);
        let start = session.start_orientation;
        let delta = match self.kind {
            // The camera turns opposite to how the scene should appear to turn.
            PoleKind::View => screen.inverse(),
            PoleKind::Object => {
                let world = self.view_rotation.inverse() * screen * self.view_rotation;
                start.inverse() * world * start
            }
        };

        let mut orientation = start * delta;
        orientation.renormalize();
        self.orientation = orientation;
    }

    /// Zoom a view pole towards (`direction > 0`) or away from its target.
    pub fn mouse_wheel(&mut self, direction: i32, modifiers: Modifiers, _position: Point2<f32>) {
        if self.kind != PoleKind::View || direction == 0 {
            return;
        }

        let step = if modifiers.contains(Modifiers::SHIFT) {
            self.scale.small_radius_delta
        } else {
            self.scale.large_radius_delta
        };
        let radius = if direction > 0 {
            self.radius - step
        } else {
            self.radius + step
        };
        self.radius = self.scale.clamp_radius(radius);
    }

    /// Slide a view pole's target along the camera axes.
    ///
    /// `w`/`s` move forward and back, `a`/`d` left and right, `e`/`q` up and
    /// down. Any other key is ignored.
    pub fn char_press(&mut self, key: char, fine: bool, frame_duration: f32) {
        if self.kind != PoleKind::View {
            return;
        }

        let direction = match key.to_ascii_lowercase() {
            'w' => Vector3::new(0.0, 0.0, -1.0),
            's' => Vector3::new(0.0, 0.0, 1.0),
            'd' => Vector3::new(1.0, 0.0, 0.0),
            'a' => Vector3::new(-1.0, 0.0, 0.0),
            'e' => Vector3::new(0.0, 1.0, 0.0),
            'q' => Vector3::new(0.0, -1.0, 0.0),
            _ => return,
        };
        let step = if fine {
            self.scale.small_pos_offset
        } else {
            self.scale.large_pos_offset
        };

        let camera_offset = direction * (step * frame_duration);
        self.position += self.view_rotation().inverse() * camera_offset;
    }

    /// The matrix for the current state, including any drag in progress.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        match self.kind {
            PoleKind::View => {
                Matrix4::new_translation(&Vector3::new(0.0, 0.0, -self.radius))
                    * self.view_rotation().to_homogeneous()
                    * Matrix4::new_translation(&-self.position.coords)
            }
            PoleKind::Object => {
                Matrix4::new_translation(&self.position.coords) * self.orientation.to_homogeneous()
            }
        }
    }

    /// World-to-camera rotation.
    ///
    /// For view poles this is the rotation part of [`Self::calc_matrix`]. For
    /// object poles it is the camera rotation drags are made relative to.
    pub fn view_rotation(&self) -> UnitQuaternion<f32> {
        match self.kind {
            PoleKind::View => {
                axis_rotation(&Vector3::z(), self.spin_rotation_deg) * self.orientation.inverse()
            }
            PoleKind::Object => self.view_rotation,
        }
    }

    /// Set the camera rotation object drags are relative to.
    ///
    /// Has no effect on view poles, whose rotation comes from their own state.
    pub fn set_view_rotation(&mut self, rotation: UnitQuaternion<f32>) {
        self.view_rotation = rotation;
    }

    /// Make object drags relative to the given camera pole.
    pub fn sync_view(&mut self, view: &MousePole) {
        self.set_view_rotation(view.view_rotation());
    }

    /// Restore the construction-time state and drop any drag.
    pub fn reset(&mut self) {
        self.position = self.initial.target;
        self.orientation = self.initial.orientation;
        self.radius = self.initial.radius;
        self.spin_rotation_deg = self.initial.spin_rotation_deg;
        self.drag = None;
    }

    pub fn kind(&self) -> PoleKind {
        self.kind
    }

    pub fn button(&self) -> MouseButton {
        self.button
    }

    pub fn scale(&self) -> &ViewScale {
        &self.scale
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn orientation(&self) -> UnitQuaternion<f32> {
        self.orientation
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn spin_rotation_deg(&self) -> f32 {
        self.spin_rotation_deg
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn drag_mode(&self) -> Option<RotateMode> {
        self.drag.map(|session| session.mode)
    }

    pub fn view_data(&self) -> ViewData {
        ViewData {
            target: self.position,
            orientation: self.orientation,
            radius: self.radius,
            spin_rotation_deg: self.spin_rotation_deg,
        }
    }

    pub fn object_data(&self) -> ObjectData {
        ObjectData {
            position: self.position,
            orientation: self.orientation,
        }
    }
}

/// Rotation of the scene as seen on screen for a drag of the given size.
fn screen_rotation(mode: RotateMode, yaw_deg: f32, pitch_deg: f32) -> UnitQuaternion<f32> {
    let yaw = || axis_rotation(&Vector3::y(), yaw_deg);
    let pitch = || axis_rotation(&Vector3::x(), pitch_deg);
    match mode {
        RotateMode::DualAxis => pitch() * yaw(),
        RotateMode::SingleAxis => {
            if yaw_deg.abs() > pitch_deg.abs() {
                yaw()
            } else {
                pitch()
            }
        }
        RotateMode::Spin | RotateMode::ChangeUp => axis_rotation(&Vector3::z(), -yaw_deg),
    }
}
