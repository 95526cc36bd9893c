/// Demo scene: a ground plane, a tower, a spinning tetrahedron and the
/// object-pole cube, laid out through matrix stack scopes
use nalgebra::{Matrix4, Point3};
use polecam_core::{MatrixStack, Mesh};

/// Meshes reused every frame
pub struct Scene {
    ground: Mesh,
    cube: Mesh,
    tetrahedron: Mesh,
}

/// Per-frame inputs that move things in the scene
#[derive(Debug, Clone, Copy)]
pub struct SceneState {
    /// Object-pole matrix for the movable cube.
    pub object: Matrix4<f32>,
    /// Spin progress of the tetrahedron in `[0, 1)`.
    pub tetra_alpha: f32,
    /// Draw a marker at the camera target when set.
    pub target: Option<Point3<f32>>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            ground: Mesh::plane(30.0),
            cube: Mesh::cube(1.0),
            tetrahedron: Mesh::tetrahedron(1.0),
        }
    }

    /// Walk the scene with `stack` holding the world-to-camera matrix.
    ///
    /// `draw` receives each mesh with its model-view matrix. The stack is
    /// left exactly as it was passed in.
    pub fn draw<F>(&self, stack: &mut MatrixStack, state: &SceneState, mut draw: F)
    where
        F: FnMut(&Mesh, &Matrix4<f32>),
    {
        draw(&self.ground, &stack.top());

        {
            let mut tower = stack.scope();
            tower.translate(-6.0, 0.0, -4.0);
            {
                let mut base = tower.scope();
                base.translate(0.0, 2.5, 0.0).scale(2.0, 5.0, 2.0);
                draw(&self.cube, &base.top());
            }
            tower.translate(0.0, 5.5, 0.0).rotate_y(45.0).scale_uniform(1.5);
            draw(&self.cube, &tower.top());
        }

        {
            let mut tetra = stack.scope();
            tetra
                .translate(5.0, 1.5, 3.0)
                .rotate_y(360.0 * state.tetra_alpha)
                .rotate_x(35.264)
                .scale_uniform(2.0);
            draw(&self.tetrahedron, &tetra.top());
        }

        {
            let mut object = stack.scope();
            object.apply_matrix(&state.object).translate(0.0, 1.0, 0.0).scale_uniform(2.0);
            draw(&self.cube, &object.top());
        }

        if let Some(target) = state.target {
            let mut marker = stack.scope();
            marker.translate_by(&target.coords).scale_uniform(0.3);
            draw(&self.cube, &marker.top());
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
