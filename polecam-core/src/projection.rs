/// Perspective projection from camera space to the screen
use nalgebra::{Matrix4, Point3, Vector4};

use crate::transform::Transform;

/// Perspective frustum parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fov_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

/// A projected point: screen position in pixels (Y down) and NDC depth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
}

impl Projection {
    pub fn new(fov_deg: f32, width: u32, height: u32) -> Self {
        Self {
            fov_deg,
            aspect: width as f32 / height.max(1) as f32,
            near: 0.1,
            far: 200.0,
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        Transform::perspective(self.fov_deg, self.aspect, self.near, self.far)
    }

    /// Project a camera-space point to normalized device coordinates.
    ///
    /// Points at or behind the eye plane have no projection.
    pub fn project(&self, point: &Point3<f32>) -> Option<Point3<f32>> {
        let clip = self.matrix() * Vector4::new(point.x, point.y, point.z, 1.0);
        if clip.w <= 1e-6 {
            return None;
        }
        Some(Point3::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w))
    }

    /// Project a camera-space point onto a `width` x `height` pixel grid.
    pub fn to_screen(&self, point: &Point3<f32>, width: u32, height: u32) -> Option<ScreenPoint> {
        let ndc = self.project(point)?;
        Some(ScreenPoint {
            x: (ndc.x + 1.0) * 0.5 * width as f32,
            y: (1.0 - ndc.y) * 0.5 * height as f32,
            depth: ndc.z,
        })
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(45.0, 800, 600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_creation() {
        let projection = Projection::new(45.0, 800, 600);
        assert!((projection.aspect - 800.0 / 600.0).abs() < 1e-6);

        let degenerate = Projection::new(45.0, 80, 0);
        assert_eq!(degenerate.aspect, 80.0);
    }

    #[test]
    fn test_center_projects_to_screen_center() {
        let projection = Projection::new(60.0, 100, 50);
        let screen = projection
            .to_screen(&Point3::new(0.0, 0.0, -10.0), 100, 50)
            .unwrap();
        assert!((screen.x - 50.0).abs() < 1e-4);
        assert!((screen.y - 25.0).abs() < 1e-4);
        assert!(screen.depth > -1.0 && screen.depth < 1.0);
    }

    #[test]
    fn test_up_is_screen_top() {
        let projection = Projection::new(60.0, 100, 100);
        let above = projection
            .to_screen(&Point3::new(0.0, 1.0, -5.0), 100, 100)
            .unwrap();
        assert!(above.y < 50.0);
    }

    #[test]
    fn test_behind_eye_is_rejected() {
        let projection = Projection::default();
        assert!(projection.project(&Point3::new(0.0, 0.0, 1.0)).is_none());
        assert!(projection.project(&Point3::origin()).is_none());
    }

    #[test]
    fn test_nearer_is_smaller_depth() {
        let projection = Projection::default();
        let near = projection.project(&Point3::new(0.0, 0.0, -1.0)).unwrap();
        let far = projection.project(&Point3::new(0.0, 0.0, -50.0)).unwrap();
        assert!(near.z < far.z);
    }
}
