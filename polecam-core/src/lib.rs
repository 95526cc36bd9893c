/// polecam Core Library - Matrix stack and mouse-driven orbit controllers
///
/// This library provides the frontend-independent core: a hierarchical
/// matrix stack, view and object poles driven by mouse/keyboard events,
/// and the light timeline and shading math used by the demos.

pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod keyframe;
pub mod lighting;
pub mod matrix_stack;
pub mod pole;
pub mod projection;
pub mod shading;
pub mod timer;
pub mod transform;

// Re-export commonly used types
pub use config::PoleConfig;
pub use error::{Error, Result};
pub use geometry::{Mesh, Triangle, Vertex};
pub use input::{Modifiers, MouseButton, PoleEvent};
pub use matrix_stack::{MatrixStack, StackScope};
pub use pole::{MousePole, ObjectData, PoleKind, RotateMode, ViewData, ViewScale};
pub use projection::Projection;
pub use transform::Transform;
