/// Elementary transformation matrices, with angles given in degrees
use nalgebra::{Matrix4, Unit, UnitQuaternion, Vector3};

/// Builder for the elementary matrices composed by the matrix stack
pub struct Transform;

impl Transform {
    /// Create a translation matrix
    pub fn translation(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Create a rotation matrix about an arbitrary axis.
    ///
    /// The axis does not need to be normalized. A zero-length axis yields the
    /// identity.
    pub fn rotation(axis: &Vector3<f32>, degrees: f32) -> Matrix4<f32> {
        axis_rotation(axis, degrees).to_homogeneous()
    }

    pub fn rotation_x(degrees: f32) -> Matrix4<f32> {
        Self::rotation(&Vector3::x(), degrees)
    }

    pub fn rotation_y(degrees: f32) -> Matrix4<f32> {
        Self::rotation(&Vector3::y(), degrees)
    }

    pub fn rotation_z(degrees: f32) -> Matrix4<f32> {
        Self::rotation(&Vector3::z(), degrees)
    }

    /// Create a scale matrix
    pub fn scale(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    /// Create an OpenGL-style perspective matrix from a vertical field of view
    pub fn perspective(fov_deg: f32, aspect: f32, near: f32, far: f32) -> Matrix4<f32> {
        Matrix4::new_perspective(aspect, fov_deg.to_radians(), near, far)
    }

    /// Create a model-view-projection matrix
    pub fn mvp(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }
}

/// Quaternion rotating `degrees` about `axis` (right-handed).
pub fn axis_rotation(axis: &Vector3<f32>, degrees: f32) -> UnitQuaternion<f32> {
    match Unit::try_new(*axis, f32::EPSILON) {
        Some(axis) => UnitQuaternion::from_axis_angle(&axis, degrees.to_radians()),
        None => UnitQuaternion::identity(),
    }
}
