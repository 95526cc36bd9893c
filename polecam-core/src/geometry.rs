/// Triangle meshes for the demo scenes
use nalgebra::{Point3, Vector3};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices, counter-clockwise when viewed
/// from the side its normal points to
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Flat-shaded triangle whose vertex normals all equal the face normal.
    pub fn flat(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        let normal = (b - a)
            .cross(&(c - a))
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::y);
        Self::new(
            Vertex::new(a, normal),
            Vertex::new(b, normal),
            Vertex::new(c, normal),
        )
    }

    /// Face normal from the winding order; `None` for degenerate triangles.
    pub fn face_normal(&self) -> Option<Vector3<f32>> {
        let [v0, v1, v2] = self.vertices.map(|v| v.position);
        (v1 - v0).cross(&(v2 - v0)).try_normalize(f32::EPSILON)
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Add a quad given counter-clockwise corners.
    pub fn add_quad(&mut self, corners: [Point3<f32>; 4]) {
        let [a, b, c, d] = corners;
        self.add_triangle(Triangle::flat(a, b, c));
        self.add_triangle(Triangle::flat(a, c, d));
    }

    /// Axis-aligned cube centred on the origin.
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let corner = |x: f32, y: f32, z: f32| Point3::new(x * h, y * h, z * h);

        // Corner signs per face, counter-clockwise seen from outside.
        const FACES: [[[f32; 3]; 4]; 6] = [
            [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]],
            [[1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0]],
            [[-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0], [-1.0, 1.0, -1.0]],
            [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]],
            [[1.0, -1.0, 1.0], [1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0]],
            [[-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0]],
        ];

        let mut mesh = Self::with_capacity(12);
        for face in FACES {
            mesh.add_quad(face.map(|[x, y, z]| corner(x, y, z)));
        }
        mesh
    }

    /// Square in the XZ plane facing +Y.
    pub fn plane(size: f32) -> Self {
        let h = size / 2.0;
        let mut mesh = Self::with_capacity(2);
        mesh.add_quad([
            Point3::new(-h, 0.0, h),
            Point3::new(h, 0.0, h),
            Point3::new(h, 0.0, -h),
            Point3::new(-h, 0.0, -h),
        ]);
        mesh
    }

    /// Regular tetrahedron inscribed in a cube of the given size.
    pub fn tetrahedron(size: f32) -> Self {
        let h = size / 2.0;
        let a = Point3::new(h, h, h);
        let b = Point3::new(-h, -h, h);
        let c = Point3::new(-h, h, -h);
        let d = Point3::new(h, -h, -h);

        let mut mesh = Self::with_capacity(4);
        mesh.add_triangle(Triangle::flat(a, b, d));
        mesh.add_triangle(Triangle::flat(a, c, b));
        mesh.add_triangle(Triangle::flat(a, d, c));
        mesh.add_triangle(Triangle::flat(b, c, d));
        mesh
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn centroid(triangle: &Triangle) -> Vector3<f32> {
        triangle
            .vertices
            .iter()
            .map(|v| v.position.coords)
            .sum::<Vector3<f32>>()
            / 3.0
    }

    /// Every face of a convex solid centred on the origin points away from it.
    fn assert_outward(mesh: &Mesh) {
        for triangle in &mesh.triangles {
            let normal = triangle.face_normal().unwrap();
            assert!(normal.dot(&centroid(triangle)) > 0.0, "{triangle:?}");
            assert!((triangle.vertices[0].normal - normal).norm() < 1e-6);
        }
    }

    #[test]
    fn test_cube() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.len(), 12);
        assert_outward(&cube);
        for triangle in &cube.triangles {
            for vertex in &triangle.vertices {
                assert_eq!(vertex.position.coords.amax(), 1.0);
            }
        }
    }

    #[test]
    fn test_tetrahedron() {
        let tetra = Mesh::tetrahedron(1.0);
        assert_eq!(tetra.len(), 4);
        assert_outward(&tetra);
    }

    #[test]
    fn test_plane_faces_up() {
        let plane = Mesh::plane(10.0);
        assert_eq!(plane.len(), 2);
        for triangle in &plane.triangles {
            assert!((triangle.face_normal().unwrap() - Vector3::y()).norm() < 1e-6);
        }
    }

    #[test]
    fn test_degenerate_triangle() {
        let p = Point3::new(1.0, 1.0, 1.0);
        let triangle = Triangle::flat(p, p, p);
        assert!(triangle.face_normal().is_none());
        assert_eq!(triangle.vertices[0].normal, Vector3::y());
    }
}
