/// ASCII rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix3, Matrix4, Point3};
use polecam_core::lighting::LightBlock;
use polecam_core::projection::ScreenPoint;
use polecam_core::shading::{self, LightingModel, Surface};
use polecam_core::{Mesh, Projection, Triangle};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

const SHININESS: f32 = 8.0;

/// Lighting inputs shared by every mesh drawn in a frame
pub struct ShadingParams<'a> {
    pub lights: &'a LightBlock,
    pub model: LightingModel,
}

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if (width, height) != (self.width, self.height) {
            *self = Self::new(width, height);
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    /// Draw a mesh whose vertices are mapped to camera space by `model_view`.
    pub fn render_mesh(
        &mut self,
        mesh: &Mesh,
        model_view: &Matrix4<f32>,
        projection: &Projection,
        params: &ShadingParams,
    ) {
        let normal_matrix = normal_matrix(model_view);
        for triangle in &mesh.triangles {
            self.render_triangle(triangle, model_view, &normal_matrix, projection, params);
        }
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        model_view: &Matrix4<f32>,
        normal_matrix: &Matrix3<f32>,
        projection: &Projection,
        params: &ShadingParams,
    ) {
        let camera = triangle
            .vertices
            .map(|vertex| model_view.transform_point(&vertex.position));

        let Some(normal) = (normal_matrix * triangle.vertices[0].normal).try_normalize(f32::EPSILON)
        else {
            return;
        };
        let centroid = Point3::from((camera[0].coords + camera[1].coords + camera[2].coords) / 3.0);

        // Back-face culling: the eye sits at the camera-space origin.
        if normal.dot(&-centroid.coords) <= 0.0 {
            return;
        }

        let mut screen = [ScreenPoint { x: 0.0, y: 0.0, depth: 0.0 }; 3];
        for (slot, point) in screen.iter_mut().zip(&camera) {
            match projection.to_screen(point, self.width as u32, self.height as u32) {
                Some(projected) if projected.depth >= -1.0 => *slot = projected,
                _ => return, // Crosses the near plane
            }
        }

        let surface = Surface {
            position: centroid,
            normal,
        };
        let brightness = shading::shade(&surface, params.lights, params.model, SHININESS);
        self.rasterize_triangle(&screen, ramp_char(brightness));
    }

    fn rasterize_triangle(&mut self, coords: &[ScreenPoint; 3], character: char) {
        let [v0, v1, v2] = *coords;

        // Bounding box clipped to the screen
        let min_x = v0.x.min(v1.x).min(v2.x).floor().max(0.0) as i32;
        let max_x = (v0.x.max(v1.x).max(v2.x).ceil() as i32).min(self.width as i32 - 1);
        let min_y = v0.y.min(v1.y).min(v2.y).floor().max(0.0) as i32;
        let max_y = (v0.y.max(v1.y).max(v2.y).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f32 + 0.5, y as f32 + 0.5);
                let Some((w0, w1, w2)) = barycentric((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y), p)
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = character;
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let c = self.char_buffer[y * self.width + x];

                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Map brightness in `[0, 1]` onto the luminosity ramp. Lit surfaces never
/// fall all the way to blank.
fn ramp_char(brightness: f32) -> char {
    let last = LUMINOSITY_RAMP.len() - 1;
    let index = (brightness.clamp(0.0, 1.0) * last as f32).round() as usize;
    LUMINOSITY_RAMP[index.clamp(1, last)]
}

/// Inverse-transpose of the upper 3x3, so normals survive non-uniform scale.
fn normal_matrix(model_view: &Matrix4<f32>) -> Matrix3<f32> {
    let linear: Matrix3<f32> = model_view.fixed_view::<3, 3>(0, 0).into_owned();
    linear
        .try_inverse()
        .map(|inverse| inverse.transpose())
        .unwrap_or(linear)
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector4;
    use polecam_core::Transform;

    fn ambient(level: f32) -> LightBlock {
        LightBlock {
            ambient_intensity: Vector4::new(level, level, level, 1.0),
            light_attenuation: 0.0,
            max_intensity: 1.0,
            gamma: 1.0,
            lights: Vec::new(),
        }
    }

    /// A unit plane stood up to face the camera, `distance` units away.
    fn facing_plane(distance: f32) -> Matrix4<f32> {
        Transform::translation(0.0, 0.0, -distance) * Transform::rotation_x(90.0)
    }

    #[test]
    fn test_plane_fills_center() {
        let mut renderer = AsciiRenderer::new(40, 20);
        let projection = Projection::new(60.0, 40, 20);
        let lights = ambient(1.0);
        let params = ShadingParams {
            lights: &lights,
            model: LightingModel::DiffuseOnly,
        };

        renderer.render_mesh(&Mesh::plane(2.0), &facing_plane(4.0), &projection, &params);
        assert_eq!(renderer.char_at(20, 10), Some('@'));
        assert_eq!(renderer.char_at(0, 0), Some(' '));

        renderer.clear();
        assert_eq!(renderer.char_at(20, 10), Some(' '));
    }

    #[test]
    fn test_back_faces_are_culled() {
        let mut renderer = AsciiRenderer::new(40, 20);
        let projection = Projection::new(60.0, 40, 20);
        let lights = ambient(1.0);
        let params = ShadingParams {
            lights: &lights,
            model: LightingModel::DiffuseOnly,
        };

        let away = Transform::translation(0.0, 0.0, -4.0) * Transform::rotation_x(-90.0);
        renderer.render_mesh(&Mesh::plane(2.0), &away, &projection, &params);
        assert_eq!(renderer.char_at(20, 10), Some(' '));
    }

    #[test]
    fn test_nearer_surface_wins() {
        let mut renderer = AsciiRenderer::new(40, 20);
        let projection = Projection::new(60.0, 40, 20);
        let bright = ambient(1.0);
        let dim = ambient(0.3);

        let near = ShadingParams {
            lights: &bright,
            model: LightingModel::DiffuseOnly,
        };
        let far = ShadingParams {
            lights: &dim,
            model: LightingModel::DiffuseOnly,
        };

        renderer.render_mesh(&Mesh::plane(2.0), &facing_plane(3.0), &projection, &near);
        renderer.render_mesh(&Mesh::plane(2.0), &facing_plane(6.0), &projection, &far);
        assert_eq!(renderer.char_at(20, 10), Some('@'));
    }

    #[test]
    fn test_behind_camera_is_skipped() {
        let mut renderer = AsciiRenderer::new(10, 10);
        let projection = Projection::new(60.0, 10, 10);
        let lights = ambient(1.0);
        let params = ShadingParams {
            lights: &lights,
            model: LightingModel::DiffuseOnly,
        };
        let behind = Transform::translation(0.0, 0.0, 4.0) * Transform::rotation_x(-90.0);
        renderer.render_mesh(&Mesh::cube(1.0), &behind, &projection, &params);
        assert!((0..10).all(|y| (0..10).all(|x| renderer.char_at(x, y) == Some(' '))));
    }

    #[test]
    fn test_ramp_char_bounds() {
        assert_eq!(ramp_char(0.0), '.');
        assert_eq!(ramp_char(1.0), '@');
        assert_eq!(ramp_char(7.0), '@');
    }

    #[test]
    fn test_resize_reallocates() {
        let mut renderer = AsciiRenderer::new(4, 4);
        renderer.resize(8, 2);
        assert_eq!((renderer.width(), renderer.height()), (8, 2));
        assert_eq!(renderer.char_at(7, 1), Some(' '));
        assert_eq!(renderer.char_at(0, 2), None);
    }
}
