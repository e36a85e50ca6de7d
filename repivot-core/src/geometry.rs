/// Mesh primitives: per-vertex channels stored in index order
use nalgebra::{Point3, Vector3};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }
}

/// A triangle resolved from a mesh face
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub positions: [Point3<f32>; 3],
}

impl Triangle {
    pub fn new(p0: Point3<f32>, p1: Point3<f32>, p2: Point3<f32>) -> Self {
        Self {
            positions: [p0, p1, p2],
        }
    }

    /// Face normal from winding order. Zero for degenerate triangles.
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let [v0, v1, v2] = self.positions;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1
            .cross(&edge2)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros)
    }
}

/// An indexed triangle mesh.
///
/// Vertex channels are parallel arrays: `positions[i]` and `normals[i]`
/// describe the same vertex, and `faces` index into both. Operations that
/// move vertices never reorder them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Point3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub faces: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, faces: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            faces: Vec::with_capacity(faces),
        }
    }

    /// Build a mesh from bare positions, with zero normals and no faces.
    pub fn from_positions(positions: Vec<Point3<f32>>) -> Self {
        let normals = vec![Vector3::zeros(); positions.len()];
        Self {
            positions,
            normals,
            faces: Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn vertex(&self, index: usize) -> Option<Vertex> {
        let position = *self.positions.get(index)?;
        let normal = self.normals.get(index).copied().unwrap_or_else(Vector3::zeros);
        Some(Vertex { position, normal })
    }

    /// Append a vertex and return its index
    pub fn push_vertex(&mut self, vertex: Vertex) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(vertex.position);
        self.normals.push(vertex.normal);
        index
    }

    /// Append a triangle as three new vertices sharing `normal`.
    pub fn add_triangle(&mut self, triangle: Triangle, normal: Vector3<f32>) {
        let [a, b, c] = triangle.positions.map(|position| {
            self.push_vertex(Vertex { position, normal })
        });
        self.faces.push([a, b, c]);
    }

    /// Resolve every face to its triangle. Faces with out-of-range indices
    /// are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.faces.iter().filter_map(|&[a, b, c]| {
            Some(Triangle::new(
                *self.positions.get(a as usize)?,
                *self.positions.get(b as usize)?,
                *self.positions.get(c as usize)?,
            ))
        })
    }

    /// Create a cube centered on the origin, four vertices per face
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let mut mesh = Self::with_capacity(24, 12);

        // (normal, four corners counter-clockwise seen from outside)
        let sides: [([f32; 3], [[f32; 3]; 4]); 6] = [
            ([0.0, 0.0, 1.0], [[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]]),
            ([0.0, 0.0, -1.0], [[h, -h, -h], [-h, -h, -h], [-h, h, -h], [h, h, -h]]),
            ([0.0, 1.0, 0.0], [[-h, h, h], [h, h, h], [h, h, -h], [-h, h, -h]]),
            ([0.0, -1.0, 0.0], [[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]]),
            ([1.0, 0.0, 0.0], [[h, -h, h], [h, -h, -h], [h, h, -h], [h, h, h]]),
            ([-1.0, 0.0, 0.0], [[-h, -h, -h], [-h, -h, h], [-h, h, h], [-h, h, -h]]),
        ];

        for ([nx, ny, nz], corners) in sides {
            let [a, b, c, d] =
                corners.map(|[x, y, z]| mesh.push_vertex(Vertex::new(x, y, z, nx, ny, nz)));
            mesh.faces.push([a, b, c]);
            mesh.faces.push([a, c, d]);
        }

        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cube_layout() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.normals.len(), 24);
        assert_eq!(cube.faces.len(), 12);
        assert!(cube.positions.iter().all(|p| p.coords.amax() == 1.0));
    }

    #[test]
    fn test_cube_winding_matches_normals() {
        let cube = Mesh::cube(2.0);
        for (face, triangle) in cube.faces.iter().zip(cube.triangles()) {
            let stored = cube.normals[face[0] as usize];
            assert_relative_eq!(triangle.calculate_normal(), stored, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_add_triangle_appends_in_order() {
        let mut mesh = Mesh::new();
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        mesh.add_triangle(tri, tri.calculate_normal());
        mesh.add_triangle(tri, tri.calculate_normal());

        assert_eq!(mesh.faces, vec![[0, 1, 2], [3, 4, 5]]);
        assert_eq!(mesh.positions[4], Point3::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.vertex(2).map(|v| v.normal), Some(Vector3::z()));
    }

    #[test]
    fn test_degenerate_triangle_normal_is_zero() {
        let p = Point3::new(1.0, 1.0, 1.0);
        assert_eq!(Triangle::new(p, p, p).calculate_normal(), Vector3::zeros());
    }

    #[test]
    fn test_triangles_skips_bad_indices() {
        let mut mesh = Mesh::from_positions(vec![Point3::origin(); 3]);
        mesh.faces.push([0, 1, 2]);
        mesh.faces.push([0, 1, 7]);
        assert_eq!(mesh.triangles().count(), 1);
    }
}
