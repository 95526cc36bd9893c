/// Matrix stack for hierarchical model/view transforms
use std::ops::{Deref, DerefMut};

use nalgebra::{Matrix4, Vector3};

use crate::error::{Error, Result};
use crate::transform::Transform;

/// A stack of 4x4 matrices whose top is the current cumulative transform.
///
/// The stack always holds at least one matrix. Every transform helper
/// right-multiplies the top (`top = top * M`), so the most recently applied
/// transform is the first one applied to geometry.
#[derive(Debug, Clone)]
pub struct MatrixStack {
    current: Matrix4<f32>,
    saved: Vec<Matrix4<f32>>,
}

impl MatrixStack {
    pub fn new() -> Self {
        Self::with_base(Matrix4::identity())
    }

    pub fn with_base(base: Matrix4<f32>) -> Self {
        Self {
            current: base,
            saved: Vec::new(),
        }
    }

    /// Duplicate the top matrix.
    pub fn push(&mut self) -> &mut Self {
        self.saved.push(self.current);
        self
    }

    /// Remove and return the top matrix.
    ///
    /// Popping the base matrix is a push/pop mismatch in the caller and fails
    /// with [`Error::StackUnderflow`], leaving the stack untouched.
    pub fn pop(&mut self) -> Result<Matrix4<f32>> {
        match self.saved.pop() {
            Some(previous) => Ok(std::mem::replace(&mut self.current, previous)),
            None => {
                log::error!("matrix stack underflow: pop without matching push");
                Err(Error::StackUnderflow)
            }
        }
    }

    /// Push and return a guard that restores the current depth when dropped.
    pub fn scope(&mut self) -> StackScope<'_> {
        let depth = self.depth();
        self.push();
        StackScope { stack: self, depth }
    }

    pub fn top(&self) -> Matrix4<f32> {
        self.current
    }

    /// Number of matrices on the stack, base included.
    pub fn depth(&self) -> usize {
        self.saved.len() + 1
    }

    pub fn apply_matrix(&mut self, matrix: &Matrix4<f32>) -> &mut Self {
        self.current *= matrix;
        self
    }

    pub fn translate(&mut self, dx: f32, dy: f32, dz: f32) -> &mut Self {
        self.apply_matrix(&Transform::translation(dx, dy, dz))
    }

    pub fn translate_by(&mut self, offset: &Vector3<f32>) -> &mut Self {
        self.translate(offset.x, offset.y, offset.z)
    }

    pub fn rotate(&mut self, axis: &Vector3<f32>, degrees: f32) -> &mut Self {
        self.apply_matrix(&Transform::rotation(axis, degrees))
    }

    pub fn rotate_x(&mut self, degrees: f32) -> &mut Self {
        self.apply_matrix(&Transform::rotation_x(degrees))
    }

    pub fn rotate_y(&mut self, degrees: f32) -> &mut Self {
        self.apply_matrix(&Transform::rotation_y(degrees))
    }

    pub fn rotate_z(&mut self, degrees: f32) -> &mut Self {
        self.apply_matrix(&Transform::rotation_z(degrees))
    }

    pub fn scale(&mut self, sx: f32, sy: f32, sz: f32) -> &mut Self {
        self.apply_matrix(&Transform::scale(sx, sy, sz))
    }

    pub fn scale_uniform(&mut self, s: f32) -> &mut Self {
        self.scale(s, s, s)
    }

    pub fn perspective(&mut self, fov_deg: f32, aspect: f32, near: f32, far: f32) -> &mut Self {
        self.apply_matrix(&Transform::perspective(fov_deg, aspect, near, far))
    }

    /// Replace the top matrix without composing it with the previous one.
    pub fn set_matrix(&mut self, matrix: Matrix4<f32>) -> &mut Self {
        self.current = matrix;
        self
    }

    pub fn set_identity(&mut self) -> &mut Self {
        self.set_matrix(Matrix4::identity())
    }

    /// Reset to a single identity matrix.
    pub fn clear(&mut self) {
        self.clear_to(Matrix4::identity());
    }

    /// Reset to a single caller-supplied base matrix.
    pub fn clear_to(&mut self, base: Matrix4<f32>) {
        self.saved.clear();
        self.current = base;
    }

    fn truncate(&mut self, depth: usize) {
        while self.depth() > depth.max(1) {
            if let Some(previous) = self.saved.pop() {
                self.current = previous;
            }
        }
    }
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard returned by [`MatrixStack::scope`].
///
/// Dereferences to the stack; on drop every matrix pushed since the scope
/// was opened is popped, including ones the scope body forgot to pop.
pub struct StackScope<'a> {
    stack: &'a mut MatrixStack,
    depth: usize,
}

impl Deref for StackScope<'_> {
    type Target = MatrixStack;

    fn deref(&self) -> &MatrixStack {
        self.stack
    }
}

impl DerefMut for StackScope<'_> {
    fn deref_mut(&mut self) -> &mut MatrixStack {
        self.stack
    }
}

impl Drop for StackScope<'_> {
    fn drop(&mut self) {
        self.stack.truncate(self.depth);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn approx_eq(a: &Matrix4<f32>, b: &Matrix4<f32>) -> bool {
        (a - b).norm() < 1e-5
    }

    #[test]
    fn test_new_stack_is_identity() {
        let stack = MatrixStack::new();
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top(), Matrix4::identity());
    }

    #[test]
    fn test_push_pop_round_trip() {
        let mut stack = MatrixStack::new();
        stack.translate(1.0, 2.0, 3.0).rotate_y(30.0);
        let before = stack.top();

        stack.push();
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.top(), before);

        stack.scale(2.0, 2.0, 2.0);
        stack.pop().unwrap();
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top(), before);
    }

    #[test]
    fn test_pop_returns_removed_top() {
        let mut stack = MatrixStack::new();
        stack.push().translate(0.0, 1.0, 0.0);
        let popped = stack.pop().unwrap();
        assert!(approx_eq(&popped, &Transform::translation(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_depth_tracks_net_pushes() {
        let mut stack = MatrixStack::new();
        for _ in 0..5 {
            stack.push();
            stack.apply_matrix(&Transform::rotation_x(10.0));
        }
        for _ in 0..3 {
            stack.pop().unwrap();
        }
        assert_eq!(stack.depth(), 1 + 5 - 3);
    }

    #[test]
    fn test_pop_base_underflows() {
        let mut stack = MatrixStack::new();
        stack.translate(4.0, 0.0, 0.0);
        let top = stack.top();

        assert!(matches!(stack.pop(), Err(Error::StackUnderflow)));
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top(), top);
    }

    #[test]
    fn test_apply_matrix_composes_innermost() {
        // Scale first, then translate: the point is scaled before moving.
        let mut stack = MatrixStack::new();
        stack.translate(10.0, 0.0, 0.0).scale(2.0, 2.0, 2.0);
        let p = stack.top().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((p - Point3::new(12.0, 0.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn test_set_matrix_replaces_top() {
        let mut stack = MatrixStack::new();
        stack.translate(1.0, 1.0, 1.0);
        let seed = Transform::rotation_z(45.0);
        stack.set_matrix(seed);
        assert_eq!(stack.top(), seed);

        stack.set_identity();
        assert_eq!(stack.top(), Matrix4::identity());
    }

    #[test]
    fn test_clear_resets_to_single_base() {
        let mut stack = MatrixStack::new();
        stack.push().push().translate(3.0, 0.0, 0.0);
        stack.clear();
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top(), Matrix4::identity());

        let base = Transform::scale(2.0, 2.0, 2.0);
        stack.push();
        stack.clear_to(base);
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top(), base);
    }

    #[test]
    fn test_scope_restores_depth() {
        let mut stack = MatrixStack::new();
        let outer = stack.top();
        {
            let mut scope = stack.scope();
            scope.translate(0.0, 5.0, 0.0);
            // A forgotten inner push is cleaned up as well.
            scope.push().rotate_x(90.0);
            assert_eq!(scope.depth(), 3);
        }
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top(), outer);
    }

    #[test]
    fn test_nested_scopes() {
        let mut stack = MatrixStack::new();
        let mut outer = stack.scope();
        outer.translate(1.0, 0.0, 0.0);
        let after_translate = outer.top();
        {
            let mut inner = outer.scope();
            inner.scale_uniform(3.0);
            assert_eq!(inner.depth(), 3);
        }
        assert_eq!(outer.depth(), 2);
        assert_eq!(outer.top(), after_translate);
    }

    #[test]
    fn test_rotate_matches_axis_helpers() {
        let mut a = MatrixStack::new();
        a.rotate(&Vector3::z(), 33.0);
        let mut b = MatrixStack::new();
        b.rotate_z(33.0);
        assert!(approx_eq(&a.top(), &b.top()));
    }
}
